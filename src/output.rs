//! Renders the outcome of a call as text

use crate::api::Outcome;
use number_prefix::NumberPrefix;

#[derive(serde::Serialize)]
struct DownloadSummary<'a> {
    path: &'a str,
    size: u64,
    human_size: String,
}

/// Formats a byte count, eg. `1.5 KiB`
pub fn human_size(size: u64) -> String {
    match NumberPrefix::binary(size as f64) {
        NumberPrefix::Standalone(bytes) => format!("{bytes} B"),
        NumberPrefix::Prefixed(prefix, n) => format!("{n:.1} {prefix}B"),
    }
}

/// Formats an outcome as YAML, fields are kept in the order the resource
/// declares them, and empty responses produce no output at all
pub fn format(outcome: &Outcome) -> Result<String, serde_yaml::Error> {
    match outcome {
        Outcome::Empty => Ok(String::new()),
        Outcome::Resource(value) => serde_yaml::to_string(value),
        Outcome::Downloaded { path, size } => serde_yaml::to_string(&DownloadSummary {
            path: path.as_str(),
            size: *size,
            human_size: human_size(*size),
        }),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_is_silent() {
        assert_eq!(format(&Outcome::Empty).unwrap(), "");
    }

    #[test]
    fn keeps_field_order() {
        let value: serde_json::Value =
            serde_json::from_str(r#"{"name": "obj", "bucket": "b", "acl": [{"role": "OWNER"}, {"role": "READER"}]}"#)
                .unwrap();

        let text = format(&Outcome::Resource(value.clone())).unwrap();

        let name = text.find("name: obj").unwrap();
        let bucket = text.find("bucket: b").unwrap();
        let acl = text.find("acl:").unwrap();
        assert!(name < bucket && bucket < acl, "{text}");
        assert!(text.contains("role: OWNER") && text.contains("role: READER"));

        // Deterministic and parses back to the same structure
        assert_eq!(text, format(&Outcome::Resource(value.clone())).unwrap());
        let reparsed: serde_json::Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(reparsed, value);
    }

    #[test]
    fn download_summary() {
        let text = format(&Outcome::Downloaded {
            path: "out/file.bin".into(),
            size: 1536,
        })
        .unwrap();

        assert!(text.contains("path: out/file.bin"), "{text}");
        assert!(text.contains("size: 1536"), "{text}");
        assert!(text.contains("human_size: 1.5 KiB"), "{text}");
    }

    #[test]
    fn sizes() {
        assert_eq!(human_size(12), "12 B");
        assert_eq!(human_size(3 * 1024 * 1024), "3.0 MiB");
    }
}
