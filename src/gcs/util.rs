use crate::{
    api::{Call, RequestField, Verb},
    globals::GlobalParams,
    transfer::Transfer,
    Error, Result,
};
use bytes::{BufMut, Bytes, BytesMut};
use serde_json::{Map, Value};

const MULTIPART_BOUNDARY: &str = "storage_cli_multipart_boundary";

/// A request that is ready to be sent
#[derive(Debug)]
pub struct Prepared {
    pub verb: Verb,
    pub url: url::Url,
    pub content_type: Option<String>,
    pub body: Option<Bytes>,
}

/// Renders a scalar JSON value the way it's sent in a query string
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Renders a path parameter as a single segment. Empty and dot segments are
/// rejected, the URL would otherwise address a different resource
fn path_segment(param: &'static str, value: &Value) -> Result<String> {
    let segment = query_value(value);

    if matches!(segment.as_str(), "" | "." | "..") {
        return Err(Error::InvalidPathParameter {
            param,
            value: segment,
        });
    }

    Ok(segment)
}

/// Verifies that every path parameter of the call is present and can be
/// sent as a path segment
pub fn check_path_parameters(call: &dyn Call) -> Result<()> {
    let request = call.to_json()?;

    for param in call.method().path_params() {
        let value = request
            .get(param)
            .ok_or_else(|| Error::MissingPathParameter(param.to_owned()))?;
        path_segment(param, value)?;
    }

    Ok(())
}

/// Assembles the URL and body for a call
///
/// Path parameters are taken out of the request and percent-encoded as single
/// segments, then the body is taken out, and anything left over is sent in the
/// query in declaration order, followed by the global parameters
pub fn prepare(call: &dyn Call, globals: &GlobalParams, transfer: &Transfer) -> Result<Prepared> {
    let method = call.method();
    let request = match call.to_json()? {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let upload = transfer.upload.as_ref().filter(|_| method.upload);
    let download = transfer.download.is_some();

    let mut url = globals.endpoint.clone();
    if upload.is_some() {
        url.set_path(&format!("/upload{}", globals.endpoint.path()));
    }

    let mut remaining = request.clone();

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| Error::InvalidEndpoint(globals.endpoint.clone()))?;
        segments.pop_if_empty();

        for part in method.relative_path.split('/') {
            match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                Some(param) => {
                    let value = remaining
                        .remove(param)
                        .ok_or_else(|| Error::MissingPathParameter(param.to_owned()))?;
                    segments.push(&path_segment(param, &value)?);
                }
                None => {
                    segments.push(part);
                }
            }
        }
    }

    let metadata = match method.request_field {
        RequestField::None => None,
        RequestField::Field(field) => remaining.remove(field),
        RequestField::Whole => {
            remaining.clear();
            Some(Value::Object(request))
        }
    };

    let mut query: Vec<(String, String)> = remaining
        .iter()
        .map(|(k, v)| (k.clone(), query_value(v)))
        .collect();

    if upload.is_some() {
        let kind = if metadata.is_some() { "multipart" } else { "media" };
        query.push(("uploadType".to_owned(), kind.to_owned()));
    }

    if download {
        query.push(("alt".to_owned(), "media".to_owned()));
    }

    query.extend(
        globals
            .query_pairs()
            .into_iter()
            .filter(|(name, _)| !(download && *name == "alt"))
            .map(|(name, value)| (name.to_owned(), value)),
    );

    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }

    let (content_type, body) = match (upload, metadata) {
        (Some(upload), None) => (Some(upload.mime_type.clone()), Some(upload.read()?)),
        (Some(upload), Some(metadata)) => {
            let media = upload.read()?;
            (
                Some(format!("multipart/related; boundary={MULTIPART_BOUNDARY}")),
                Some(multipart(&metadata, &upload.mime_type, &media)),
            )
        }
        (None, Some(metadata)) => (
            Some("application/json".to_owned()),
            Some(Bytes::from(metadata.to_string())),
        ),
        (None, None) => (None, None),
    };

    Ok(Prepared {
        verb: method.verb,
        url,
        content_type,
        body,
    })
}

/// Creates a `multipart/related` body with the JSON metadata followed by the media
fn multipart(metadata: &Value, mime_type: &str, media: &[u8]) -> Bytes {
    let metadata = metadata.to_string();
    let mut buffer = BytesMut::with_capacity(metadata.len() + media.len() + 256);

    buffer.put_slice(b"--");
    buffer.put_slice(MULTIPART_BOUNDARY.as_bytes());
    buffer.put_slice(b"\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n");
    buffer.put_slice(metadata.as_bytes());
    buffer.put_slice(b"\r\n--");
    buffer.put_slice(MULTIPART_BOUNDARY.as_bytes());
    buffer.put_slice(b"\r\nContent-Type: ");
    buffer.put_slice(mime_type.as_bytes());
    buffer.put_slice(b"\r\n\r\n");
    buffer.put_slice(media);
    buffer.put_slice(b"\r\n--");
    buffer.put_slice(MULTIPART_BOUNDARY.as_bytes());
    buffer.put_slice(b"--\r\n");

    buffer.freeze()
}

/// Converts a prepared request into a `reqwest::blocking::Request`
pub fn convert_request(
    prepared: Prepared,
    client: &reqwest::blocking::Client,
) -> Result<reqwest::blocking::Request> {
    let uri = prepared.url;

    let mut builder = match prepared.verb {
        Verb::Get => client.get(uri),
        Verb::Post => client.post(uri),
        Verb::Delete => client.delete(uri),
        Verb::Patch => client.patch(uri),
        Verb::Put => client.put(uri),
    };

    if let Some(ct) = prepared.content_type {
        builder = builder.header(http::header::CONTENT_TYPE, ct);
    }

    if let Some(body) = prepared.body {
        builder = builder.body(body);
    }

    builder.build().map_err(Error::Transport)
}

#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(serde::Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<u16>,
    message: String,
}

/// Extracts the error from a non-success response
pub fn api_error(status: http::StatusCode, content_type: Option<&str>, body: &[u8]) -> Error {
    let is_text = content_type.map_or(false, |ct| ct.starts_with("text/plain"));

    if !is_text {
        if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) {
            return Error::Server {
                status: envelope.error.code.unwrap_or(status.as_u16()),
                message: envelope.error.message,
            };
        }
    }

    let message = match std::str::from_utf8(body).map(str::trim) {
        Ok(text) if !text.is_empty() => text.to_owned(),
        _ => format!("failed to retrieve error for {status}"),
    };

    Error::Server {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        api::{buckets, objects},
        model::Projection,
        transfer::{Download, Upload},
    };

    fn globals() -> GlobalParams {
        GlobalParams::new(url::Url::parse(crate::globals::DEFAULT_ENDPOINT).unwrap())
    }

    fn get_object(object: &str) -> objects::GetObject {
        objects::GetObject {
            selector: objects::ObjectSelector {
                bucket: "bucket".to_owned(),
                object: object.to_owned(),
                generation: None,
                generation_match: Default::default(),
                metageneration_match: Default::default(),
            },
            projection: None,
        }
    }

    #[test]
    fn path_segments_are_encoded() {
        let prepared = prepare(
            &get_object("some dir/file?.txt"),
            &globals(),
            &Transfer::default(),
        )
        .unwrap();

        assert_eq!(prepared.verb, Verb::Get);
        assert_eq!(
            prepared.url.as_str(),
            "https://www.googleapis.com/storage/v1/b/bucket/o/some%20dir%2Ffile%3F.txt"
        );
        assert!(prepared.body.is_none());
    }

    #[test]
    fn dot_segments_are_rejected() {
        for name in [".", "..", ""] {
            let request = get_object(name);

            assert!(
                matches!(
                    prepare(&request, &globals(), &Transfer::default()),
                    Err(Error::InvalidPathParameter { param: "object", value }) if value == name
                ),
                "{name:?}"
            );
            assert!(matches!(
                check_path_parameters(&request),
                Err(Error::InvalidPathParameter { param: "object", .. })
            ));
        }

        let mut request = objects::DeleteObject(get_object("obj").selector);
        request.0.bucket = "..".to_owned();
        assert!(matches!(
            check_path_parameters(&request),
            Err(Error::InvalidPathParameter { param: "bucket", .. })
        ));

        for name in ["...", ".hidden", "dir/.."] {
            check_path_parameters(&get_object(name)).unwrap();
            let prepared = prepare(&get_object(name), &globals(), &Transfer::default()).unwrap();
            assert_eq!(prepared.url.path_segments().unwrap().count(), 6, "{name}");
        }
    }

    #[test]
    fn only_present_fields_are_queried() {
        let mut request = get_object("obj");
        request.selector.generation = Some(12);
        request.projection = Some(Projection::NoAcl);

        let mut gp = globals();
        gp.fields = Some("name,size".to_owned());

        let prepared = prepare(&request, &gp, &Transfer::default()).unwrap();
        assert_eq!(
            prepared.url.query(),
            Some("generation=12&projection=noAcl&fields=name%2Csize")
        );
    }

    #[test]
    fn downloads_override_alt() {
        let mut gp = globals();
        gp.alt = Some("json".to_owned());

        let transfer = Transfer {
            upload: None,
            download: Some(Download {
                path: "out".into(),
                overwrite: false,
            }),
        };

        let prepared = prepare(&get_object("obj"), &gp, &transfer).unwrap();
        assert_eq!(prepared.url.query(), Some("alt=media"));
    }

    #[test]
    fn body_field_is_not_queried() {
        let request = buckets::InsertBucket {
            project: "proj".to_owned(),
            bucket: Some(crate::model::Bucket {
                name: Some("new-bucket".to_owned()),
                ..Default::default()
            }),
            predefined_acl: None,
            projection: None,
        };

        let prepared = prepare(&request, &globals(), &Transfer::default()).unwrap();
        assert_eq!(prepared.verb, Verb::Post);
        assert_eq!(
            prepared.url.as_str(),
            "https://www.googleapis.com/storage/v1/b?project=proj"
        );
        assert_eq!(prepared.content_type.as_deref(), Some("application/json"));
        assert_eq!(
            prepared.body.unwrap(),
            Bytes::from_static(br#"{"name":"new-bucket"}"#)
        );
    }

    #[test]
    fn uploads() {
        let td = tempfile::tempdir().unwrap();
        let path = camino::Utf8PathBuf::from_path_buf(td.path().join("data.txt")).unwrap();
        std::fs::write(&path, "hello").unwrap();

        let mut request = objects::InsertObject {
            bucket: "bucket".to_owned(),
            content_encoding: None,
            generation_match: Default::default(),
            metageneration_match: Default::default(),
            name: Some("data.txt".to_owned()),
            object: None,
            predefined_acl: None,
            projection: None,
        };

        let transfer = Transfer {
            upload: Some(Upload {
                path,
                mime_type: "text/plain".to_owned(),
            }),
            download: None,
        };

        let prepared = prepare(&request, &globals(), &transfer).unwrap();
        assert_eq!(
            prepared.url.as_str(),
            "https://www.googleapis.com/upload/storage/v1/b/bucket/o?name=data.txt&uploadType=media"
        );
        assert_eq!(prepared.content_type.as_deref(), Some("text/plain"));
        assert_eq!(prepared.body.unwrap(), Bytes::from_static(b"hello"));

        request.object = Some(crate::model::Object {
            content_type: Some("text/plain".to_owned()),
            ..Default::default()
        });

        let prepared = prepare(&request, &globals(), &transfer).unwrap();
        assert_eq!(
            prepared.url.query(),
            Some("name=data.txt&uploadType=multipart")
        );
        assert!(prepared
            .content_type
            .unwrap()
            .starts_with("multipart/related; boundary="));

        let body = String::from_utf8(prepared.body.unwrap().to_vec()).unwrap();
        let meta = body.find(r#"{"contentType":"text/plain"}"#).unwrap();
        let media = body.find("\r\n\r\nhello\r\n").unwrap();
        assert!(meta < media);
    }

    #[test]
    fn whole_request_is_the_body() {
        let request = crate::api::channels::StopChannel(crate::model::Channel {
            id: Some("chan".to_owned()),
            resource_id: Some("res".to_owned()),
            ..Default::default()
        });

        let prepared = prepare(&request, &globals(), &Transfer::default()).unwrap();
        assert_eq!(
            prepared.url.as_str(),
            "https://www.googleapis.com/storage/v1/channels/stop"
        );
        assert_eq!(
            prepared.body.unwrap(),
            Bytes::from_static(br#"{"id":"chan","resourceId":"res"}"#)
        );
    }

    #[test]
    fn decodes_api_errors() {
        let body = br#"{"error": {"code": 404, "message": "No such object: bucket/obj"}}"#;
        match api_error(http::StatusCode::NOT_FOUND, Some("application/json"), body) {
            Error::Server { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "No such object: bucket/obj");
            }
            other => panic!("unexpected {other:?}"),
        }

        match api_error(
            http::StatusCode::FORBIDDEN,
            Some("text/plain; charset=utf-8"),
            b"Forbidden\n",
        ) {
            Error::Server { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Forbidden");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
