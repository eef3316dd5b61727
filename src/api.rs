//! The operations of the Cloud Storage JSON API, one request type per operation

pub mod bucket_access_controls;
pub mod buckets;
pub mod channels;
pub mod default_object_access_controls;
pub mod object_access_controls;
pub mod objects;

use crate::{
    builder::{Arguments, FromArguments},
    registry::CommandSpec,
    Error, Result,
};
use camino::Utf8PathBuf;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        })
    }
}

/// Where the body of a request comes from
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RequestField {
    /// The request has no body
    None,
    /// The named field of the request is the body, if present
    Field(&'static str),
    /// The request itself is the body
    Whole,
}

/// Describes how a request is sent over HTTP
#[derive(Copy, Clone, Debug)]
pub struct MethodInfo {
    pub verb: Verb,
    /// Path relative to the API endpoint, with `{param}` placeholders that
    /// are filled from the request's fields of the same name
    pub relative_path: &'static str,
    pub request_field: RequestField,
    /// Whether media can be uploaded along with the request
    pub upload: bool,
}

impl MethodInfo {
    pub const fn new(verb: Verb, relative_path: &'static str) -> Self {
        Self {
            verb,
            relative_path,
            request_field: RequestField::None,
            upload: false,
        }
    }

    pub const fn body(mut self, field: &'static str) -> Self {
        self.request_field = RequestField::Field(field);
        self
    }

    pub const fn whole_body(mut self) -> Self {
        self.request_field = RequestField::Whole;
        self
    }

    pub const fn upload(mut self) -> Self {
        self.upload = true;
        self
    }

    /// The names of the path parameters, in order
    pub fn path_params(&self) -> impl Iterator<Item = &'static str> {
        self.relative_path
            .split('/')
            .filter_map(|seg| seg.strip_prefix('{')?.strip_suffix('}'))
    }
}

/// A typed request for a single API operation
pub trait ApiRequest: Serialize + fmt::Debug + 'static {
    type Response: DeserializeOwned + Serialize;
    const METHOD: MethodInfo;
}

/// The result of an API call
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Resource(serde_json::Value),
    /// The operation succeeded but returned nothing
    Empty,
    /// The object's data was written to a file
    Downloaded { path: Utf8PathBuf, size: u64 },
}

/// An [`ApiRequest`] with its types erased so that the dispatcher can treat
/// every operation the same way
pub trait Call: fmt::Debug {
    fn method(&self) -> MethodInfo;
    /// The request's fields, in declaration order, omitting any that weren't supplied
    fn to_json(&self) -> Result<serde_json::Value>;
    /// Decodes a response body into the operation's response type
    fn decode(&self, body: &[u8]) -> Result<Outcome>;
}

impl<R: ApiRequest> Call for R {
    fn method(&self) -> MethodInfo {
        R::METHOD
    }

    fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(Error::Decode)
    }

    fn decode(&self, body: &[u8]) -> Result<Outcome> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Outcome::Empty);
        }

        let response: R::Response = serde_json::from_slice(body).map_err(Error::Decode)?;
        let value = serde_json::to_value(&response).map_err(Error::Decode)?;

        match &value {
            serde_json::Value::Object(map) if map.is_empty() => Ok(Outcome::Empty),
            serde_json::Value::Null => Ok(Outcome::Empty),
            _ => Ok(Outcome::Resource(value)),
        }
    }
}

/// Preconditions on an object's generation
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_generation_match: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_generation_not_match: Option<i64>,
}

/// Preconditions on a resource's metageneration
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetagenerationMatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_metageneration_match: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_metageneration_not_match: Option<i64>,
}

impl FromArguments for GenerationMatch {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        Ok(Self {
            if_generation_match: args.integer("ifGenerationMatch")?,
            if_generation_not_match: args.integer("ifGenerationNotMatch")?,
        })
    }
}

impl FromArguments for MetagenerationMatch {
    fn from_arguments(args: &Arguments<'_>) -> Result<Self> {
        Ok(Self {
            if_metageneration_match: args.integer("ifMetagenerationMatch")?,
            if_metageneration_not_match: args.integer("ifMetagenerationNotMatch")?,
        })
    }
}

pub(crate) mod flags {
    use crate::registry::FlagSpec;

    pub fn if_generation_match() -> [FlagSpec; 2] {
        [
            FlagSpec::integer(
                "ifGenerationMatch",
                "Makes the operation conditional on whether the object's current generation matches the given value.",
            ),
            FlagSpec::integer(
                "ifGenerationNotMatch",
                "Makes the operation conditional on whether the object's current generation does not match the given value.",
            ),
        ]
    }

    pub fn if_metageneration_match(subject: Subject) -> [FlagSpec; 2] {
        match subject {
            Subject::Bucket => [
                FlagSpec::integer(
                    "ifMetagenerationMatch",
                    "Makes the return of the bucket metadata conditional on whether the bucket's current metageneration matches the given value.",
                ),
                FlagSpec::integer(
                    "ifMetagenerationNotMatch",
                    "Makes the return of the bucket metadata conditional on whether the bucket's current metageneration does not match the given value.",
                ),
            ],
            Subject::Object => [
                FlagSpec::integer(
                    "ifMetagenerationMatch",
                    "Makes the operation conditional on whether the object's current metageneration matches the given value.",
                ),
                FlagSpec::integer(
                    "ifMetagenerationNotMatch",
                    "Makes the operation conditional on whether the object's current metageneration does not match the given value.",
                ),
            ],
        }
    }

    #[derive(Copy, Clone)]
    pub enum Subject {
        Bucket,
        Object,
    }
}

/// Every command, for every resource
pub fn commands() -> Vec<CommandSpec> {
    let mut commands = Vec::new();
    commands.extend(bucket_access_controls::commands());
    commands.extend(buckets::commands());
    commands.extend(channels::commands());
    commands.extend(default_object_access_controls::commands());
    commands.extend(object_access_controls::commands());
    commands.extend(objects::commands());
    commands
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn path_params() {
        let method = MethodInfo::new(
            Verb::Post,
            "b/{sourceBucket}/o/{sourceObject}/copyTo/b/{destinationBucket}/o/{destinationObject}",
        );
        assert_eq!(
            method.path_params().collect::<Vec<_>>(),
            [
                "sourceBucket",
                "sourceObject",
                "destinationBucket",
                "destinationObject"
            ]
        );
    }

    #[test]
    fn empty_responses() {
        let request = buckets::DeleteBucket {
            bucket: "b".to_owned(),
            preconditions: Default::default(),
        };

        assert_eq!(request.decode(b"").unwrap(), Outcome::Empty);
        assert_eq!(request.decode(b"{}").unwrap(), Outcome::Empty);
    }

    #[test]
    fn decodes_typed_responses() {
        let request = buckets::GetBucket {
            bucket: "b".to_owned(),
            preconditions: Default::default(),
            projection: None,
        };

        let outcome = request
            .decode(br#"{"name": "b", "metageneration": "3", "unknownField": 1}"#)
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Resource(serde_json::json!({ "metageneration": "3", "name": "b" }))
        );

        assert!(matches!(request.decode(b"[1, 2]"), Err(Error::Decode(_))));
    }
}
