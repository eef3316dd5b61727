use assert_cmd::Command;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("storage-cli").unwrap();
    cmd.env_remove("STORAGE_API_ENDPOINT")
        .env_remove("STORAGE_API_KEY")
        .env_remove("STORAGE_OAUTH_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn stderr_of(args: &[&str], code: i32) -> String {
    let assert = cli().args(args).assert().code(code);
    String::from_utf8_lossy(&assert.get_output().stderr).into_owned()
}

#[test]
fn unknown_command() {
    let stderr = stderr_of(&["objects_frobnicate", "bucket"], 1);
    assert!(stderr.contains("unknown command 'objects_frobnicate'"), "{stderr}");
    assert!(stderr.contains("objects_get <bucket> <object>"), "{stderr}");
}

#[test]
fn missing_command() {
    let stderr = stderr_of(&[], 1);
    assert!(stderr.contains("no command"), "{stderr}");
}

#[test]
fn wrong_positional_count() {
    let stderr = stderr_of(&["objects_get", "only-a-bucket"], 1);
    assert!(stderr.contains("usage: objects_get <bucket> <object>"), "{stderr}");

    let stderr = stderr_of(&["channels_stop", "unexpected"], 1);
    assert!(stderr.contains("usage: channels_stop"), "{stderr}");
}

#[test]
fn bad_integer() {
    let stderr = stderr_of(&["objects_get", "b", "o", "--ifGenerationMatch=abc"], 1);
    assert!(stderr.contains("--ifGenerationMatch"), "{stderr}");
    assert!(stderr.contains("abc"), "{stderr}");
}

#[test]
fn bad_json() {
    let stderr = stderr_of(&["buckets_insert", "my-project", "--bucket={\"name\""], 1);
    assert!(stderr.contains("--bucket"), "{stderr}");
}

#[test]
fn bad_enum() {
    let stderr = stderr_of(&["buckets_get", "b", "--projection=most"], 1);
    assert!(stderr.contains("most"), "{stderr}");
}

#[test]
fn unknown_flag() {
    stderr_of(&["buckets_get", "b", "--ifGenerationMatch=1"], 1);
}

#[test]
fn download_does_not_clobber() {
    let td = tempfile::tempdir().unwrap();
    let target = td.path().join("existing.bin");
    std::fs::write(&target, "keep me").unwrap();

    let target_arg = format!("--download_filename={}", target.display());
    let stderr = stderr_of(&["objects_get", "b", "o", &target_arg, "--key=k"], 1);

    assert!(stderr.contains("already exists"), "{stderr}");
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "keep me");
}

#[test]
fn missing_upload_source() {
    let td = tempfile::tempdir().unwrap();
    let source = td.path().join("does-not-exist.txt");

    let source_arg = format!("--upload_filename={}", source.display());
    let stderr = stderr_of(&["objects_insert", "b", &source_arg, "--key=k"], 1);
    assert!(stderr.contains("does-not-exist.txt"), "{stderr}");
}

#[test]
fn help() {
    let assert = cli().arg("--help").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("objects_insert"), "{stdout}");
    assert!(stdout.contains("--api_endpoint"), "{stdout}");

    let assert = cli().args(["objects_insert", "--help"]).assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("--upload_filename"), "{stdout}");
    assert!(stdout.contains("objects_insert <bucket>"), "{stdout}");
}

#[test]
fn unknown_mime_type_is_reported() {
    let td = tempfile::tempdir().unwrap();
    let source = td.path().join("data.weirdext");
    std::fs::write(&source, "payload").unwrap();

    let source_arg = format!("--upload_filename={}", source.display());
    let stderr = stderr_of(
        &[
            "objects_insert",
            "b",
            &source_arg,
            "--name=x",
            "--key=k",
            "--api_endpoint=http://127.0.0.1:9/storage/v1/",
        ],
        1,
    );

    assert!(stderr.contains("unable to determine MIME type"), "{stderr}");
    assert!(stderr.contains("data.weirdext"), "{stderr}");
}

#[test]
fn dot_object_names_are_rejected() {
    let stderr = stderr_of(&["objects_delete", "b", "..", "--key=k"], 1);
    assert!(stderr.contains("'..' is not a valid object"), "{stderr}");
}
