pub mod util;

use crate::{
    api::{Call, Outcome},
    globals::GlobalParams,
    transfer::Transfer,
    Error, Result,
};

pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/devstorage.full_control"];

/// Performs calls against the storage API
pub trait StorageApi {
    fn execute(
        &self,
        call: &dyn Call,
        globals: &GlobalParams,
        transfer: &Transfer,
    ) -> Result<Outcome>;
}

/// A [`StorageApi`] that sends requests over HTTP
pub struct StorageClient {
    client: reqwest::blocking::Client,
}

impl StorageClient {
    /// Creates a client, acquiring a bearer token from the default credentials
    /// on the system unless the requests carry their own
    pub fn connect(globals: &GlobalParams) -> Result<Self> {
        let mut hm = reqwest::header::HeaderMap::new();

        if !globals.has_credentials() {
            let auth_token = crate::get_bearer_token(SCOPES).map_err(Error::Credentials)?;
            hm.insert(http::header::AUTHORIZATION, auth_token);
        }

        let client = reqwest::blocking::Client::builder()
            .default_headers(hm)
            .build()
            .map_err(Error::Transport)?;

        Ok(Self { client })
    }
}

impl StorageApi for StorageClient {
    fn execute(
        &self,
        call: &dyn Call,
        globals: &GlobalParams,
        transfer: &Transfer,
    ) -> Result<Outcome> {
        let prepared = util::prepare(call, globals, transfer)?;
        let request = util::convert_request(prepared, &self.client)?;

        if globals.log_request {
            tracing::info!(
                method = %request.method(),
                url = %redacted(request.url()),
                "sending request"
            );
        }

        let mut response = self.client.execute(request).map_err(Error::Transport)?;
        let status = response.status();

        if globals.log_response {
            tracing::info!(%status, "received response");
        }

        if !status.is_success() {
            let content_type = response
                .headers()
                .get(http::header::CONTENT_TYPE)
                .and_then(|ct| ct.to_str().ok())
                .map(String::from);
            let body = response.bytes().map_err(Error::Transport)?;

            return Err(util::api_error(status, content_type.as_deref(), &body));
        }

        if let Some(download) = &transfer.download {
            let size = download.write(&mut response)?;
            tracing::debug!(path = %download.path, size, "download complete");

            return Ok(Outcome::Downloaded {
                path: download.path.clone(),
                size,
            });
        }

        let body = response.bytes().map_err(Error::Transport)?;
        call.decode(&body)
    }
}

/// Strips credentials from a URL before it's logged
fn redacted(url: &url::Url) -> url::Url {
    let mut url = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "key" || k == "oauth_token" {
                "<redacted>".into()
            } else {
                v
            };
            (k.into_owned(), v.into_owned())
        })
        .collect();

    if !pairs.is_empty() {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    url
}

#[cfg(test)]
mod test {
    #[test]
    fn redacts_credentials() {
        let url = url::Url::parse(
            "https://www.googleapis.com/storage/v1/b?project=p&key=secret&oauth_token=tok",
        )
        .unwrap();

        assert_eq!(
            super::redacted(&url).as_str(),
            "https://www.googleapis.com/storage/v1/b?project=p&key=%3Credacted%3E&oauth_token=%3Credacted%3E"
        );
    }
}
