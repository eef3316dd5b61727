use serde_json::{json, Value};
use storage_cli::{
    dispatch::Dispatcher,
    registry::{CommandSpec, FlagKind},
};

/// Flags that describe the transfer rather than the request
const MEDIA_FLAGS: &[&str] = &[
    "upload_filename",
    "upload_mime_type",
    "download_filename",
    "overwrite",
];

fn positional_values(spec: &CommandSpec) -> Vec<String> {
    spec.positional.iter().map(|p| format!("pos-{p}")).collect()
}

fn argv(spec: &CommandSpec, extra: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut argv = vec!["storage-cli".to_owned(), spec.name.to_owned()];
    argv.extend(positional_values(spec));
    argv.extend(extra);
    argv
}

fn request_json(dispatcher: &Dispatcher, argv: Vec<String>) -> serde_json::Map<String, Value> {
    let invocation = dispatcher
        .prepare(argv.clone())
        .unwrap_or_else(|err| panic!("{argv:?} failed: {err:#}"));

    match invocation.call.to_json().unwrap() {
        Value::Object(map) => map,
        other => panic!("{argv:?} produced a non-object {other}"),
    }
}

#[test]
fn every_command_is_registered() {
    let dispatcher = Dispatcher::default();
    assert_eq!(dispatcher.registry().len(), 34);
}

/// Supplying only the positionals populates only the positional fields, the
/// declared defaults of flags are never copied into the request
#[test]
fn positionals_only() {
    let dispatcher = Dispatcher::default();

    for spec in dispatcher.registry().iter() {
        let request = request_json(&dispatcher, argv(spec, None));

        let mut keys: Vec<_> = request.keys().map(String::as_str).collect();
        keys.sort_unstable();
        let mut expected = spec.positional.to_vec();
        expected.sort_unstable();

        assert_eq!(keys, expected, "{}", spec.name);

        for (param, value) in spec.positional.iter().zip(positional_values(spec)) {
            assert_eq!(request[*param], json!(value), "{}", spec.name);
        }
    }
}

/// Every supplied flag is converted according to its declared kind and
/// copied into the request under its own name
#[test]
fn all_flags_supplied() {
    let dispatcher = Dispatcher::default();

    for spec in dispatcher.registry().iter() {
        let flags: Vec<_> = spec
            .flags
            .iter()
            .filter(|f| !MEDIA_FLAGS.contains(&f.name))
            .collect();

        let values: Vec<(&str, String)> = flags
            .iter()
            .map(|flag| {
                let value = match &flag.kind {
                    FlagKind::String => format!("text-{}", flag.name),
                    FlagKind::Integer => "42".to_owned(),
                    FlagKind::Boolean => "true".to_owned(),
                    FlagKind::Choice(values) => values[0].get_name().to_owned(),
                    FlagKind::Json => "{}".to_owned(),
                };
                (flag.name, value)
            })
            .collect();

        let request = request_json(
            &dispatcher,
            argv(
                spec,
                values.iter().map(|(name, value)| format!("--{name}={value}")),
            ),
        );

        assert_eq!(
            request.len(),
            spec.positional.len() + values.len(),
            "{}: {request:?}",
            spec.name
        );

        for ((name, raw), flag) in values.iter().zip(&flags) {
            let value = &request[*name];
            match &flag.kind {
                FlagKind::String | FlagKind::Choice(_) => {
                    assert_eq!(value, &json!(raw), "{}.{name}", spec.name);
                }
                // 64-bit fields of resources are sent as strings
                FlagKind::Integer => assert!(
                    value == &json!(42) || value == &json!("42"),
                    "{}.{name} = {value}",
                    spec.name
                ),
                FlagKind::Boolean => assert_eq!(value, &json!(true), "{}.{name}", spec.name),
                FlagKind::Json => assert_eq!(value, &json!({}), "{}.{name}", spec.name),
            }
        }
    }
}

#[test]
fn typed_conversions() {
    let dispatcher = Dispatcher::default();

    let request = request_json(
        &dispatcher,
        [
            "storage-cli",
            "buckets_get",
            "my-bucket",
            "--ifMetagenerationMatch=42",
            "--projection=full",
        ]
        .map(String::from)
        .to_vec(),
    );

    assert_eq!(
        Value::Object(request),
        json!({
            "bucket": "my-bucket",
            "ifMetagenerationMatch": 42,
            "projection": "full",
        })
    );

    let request = request_json(
        &dispatcher,
        [
            "storage-cli",
            "objects_compose",
            "dest-bucket",
            "dir/dest-object",
            r#"--composeRequest={"sourceObjects": [{"name": "a", "generation": 5}, {"name": "b"}]}"#,
            "--destinationPredefinedAcl=bucketOwnerRead",
        ]
        .map(String::from)
        .to_vec(),
    );

    assert_eq!(
        Value::Object(request),
        json!({
            "destinationBucket": "dest-bucket",
            "destinationObject": "dir/dest-object",
            "composeRequest": {
                "sourceObjects": [{ "generation": "5", "name": "a" }, { "name": "b" }],
            },
            "destinationPredefinedAcl": "bucketOwnerRead",
        })
    );
}

#[test]
fn positionals_are_verbatim() {
    let dispatcher = Dispatcher::default();

    let request = request_json(
        &dispatcher,
        [
            "storage-cli",
            "objectAccessControls_get",
            "bucket",
            "path/to/ünïcode object",
            "user-someone@example.com",
        ]
        .map(String::from)
        .to_vec(),
    );

    assert_eq!(request["object"], json!("path/to/ünïcode object"));
    assert_eq!(request["entity"], json!("user-someone@example.com"));
}
