//! CLI integration tests for proto-jsonschema binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("proto-jsonschema"))
}

// Helper to create a temp descriptor file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const BOOKSTORE: &str = r#"{
    "messages": [
        {
            "full_name": "bookstore.v1.Genre",
            "fields": [
                {
                    "name": "name",
                    "kind": "string",
                    "options": { "description": "The name of the genre" },
                    "rules": { "string": { "min_len": 1, "max_len": 50 } }
                }
            ]
        },
        {
            "full_name": "bookstore.v1.Shelf",
            "fields": [
                { "name": "shelf_id", "kind": "int64" },
                { "name": "tags", "kind": "string", "cardinality": "repeated" },
                {
                    "name": "counts",
                    "kind": "int32",
                    "cardinality": "map",
                    "map_value": { "name": "value", "kind": "int32" }
                },
                {
                    "name": "format",
                    "kind": "enum",
                    "type_name": ".bookstore.v1.Format",
                    "presence": true
                },
                {
                    "name": "created_at",
                    "kind": "message",
                    "type_name": "google.protobuf.Timestamp"
                }
            ]
        },
        {
            "full_name": "bookstore.v1.Category",
            "fields": [
                { "name": "parent", "kind": "message", "type_name": "bookstore.v1.Category" }
            ]
        }
    ],
    "enums": [
        {
            "full_name": "bookstore.v1.Format",
            "values": [
                { "name": "FORMAT_UNSPECIFIED", "number": 0 },
                { "name": "FORMAT_HARDCOVER", "number": 1 }
            ]
        }
    ]
}"#;

const LEGACY: &str = r#"{
    "messages": [
        { "full_name": "legacy.Ok", "fields": [{ "name": "id", "kind": "string" }] },
        { "full_name": "legacy.Old", "fields": [{ "name": "data", "kind": "group" }] }
    ]
}"#;

mod generate_command {
    use super::*;

    #[test]
    fn single_message() {
        let dir = TempDir::new().unwrap();
        let set = write_temp_file(&dir, "set.json", BOOKSTORE);

        cmd()
            .args([
                "generate",
                set.to_str().unwrap(),
                "--message",
                "bookstore.v1.Genre",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""title":"Genre""#))
            .stdout(predicate::str::contains(r#""required":["name"]"#))
            .stdout(predicate::str::contains(r#""minLength":1,"maxLength":50"#));
    }

    #[test]
    fn all_messages_keyed_by_name() {
        let dir = TempDir::new().unwrap();
        let set = write_temp_file(&dir, "set.json", BOOKSTORE);

        let output = cmd()
            .args(["generate", set.to_str().unwrap()])
            .output()
            .unwrap();
        assert!(output.status.success());

        let all: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let names: Vec<&String> = all.as_object().unwrap().keys().collect();
        assert_eq!(
            names,
            ["bookstore.v1.Genre", "bookstore.v1.Shelf", "bookstore.v1.Category"]
        );
    }

    #[test]
    fn field_shapes() {
        let dir = TempDir::new().unwrap();
        let set = write_temp_file(&dir, "set.json", BOOKSTORE);

        let output = cmd()
            .args(["generate", set.to_str().unwrap(), "-m", "bookstore.v1.Shelf"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let props = &schema["properties"];
        assert_eq!(props["shelfId"]["pattern"], "^-?[0-9]+$");
        assert_eq!(props["tags"]["type"], serde_json::json!(["array", "null"]));
        assert_eq!(props["counts"]["additionalProperties"]["type"], "integer");
        assert_eq!(props["format"]["type"], serde_json::json!(["string", "null"]));
        assert_eq!(props["createdAt"]["format"], "date-time");
    }

    #[test]
    fn with_pretty() {
        let dir = TempDir::new().unwrap();
        let set = write_temp_file(&dir, "set.json", BOOKSTORE);

        cmd()
            .args([
                "generate",
                set.to_str().unwrap(),
                "-m",
                "bookstore.v1.Genre",
                "--pretty",
            ])
            .assert()
            .success()
            // Pretty output has newlines and indentation
            .stdout(predicate::str::contains("{\n"));
    }

    #[test]
    fn with_output_file() {
        let dir = TempDir::new().unwrap();
        let set = write_temp_file(&dir, "set.json", BOOKSTORE);
        let output = dir.path().join("genre.schema.json");

        cmd()
            .args([
                "generate",
                set.to_str().unwrap(),
                "-m",
                "bookstore.v1.Genre",
                "--output",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains(r#""$schema":"https://json-schema.org/draft/2020-12/schema""#));
    }

    #[test]
    fn recursive_message_terminates() {
        let dir = TempDir::new().unwrap();
        let set = write_temp_file(&dir, "set.json", BOOKSTORE);

        cmd()
            .args(["generate", set.to_str().unwrap(), "-m", "bookstore.v1.Category"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""parent":{"type":"object"}"#))
            .stdout(predicate::str::contains("$ref").not());
    }

    #[test]
    fn with_check() {
        let dir = TempDir::new().unwrap();
        let set = write_temp_file(&dir, "set.json", BOOKSTORE);

        cmd()
            .args(["generate", set.to_str().unwrap(), "--check"])
            .assert()
            .success();
    }

    #[test]
    fn unknown_message() {
        let dir = TempDir::new().unwrap();
        let set = write_temp_file(&dir, "set.json", BOOKSTORE);

        cmd()
            .args(["generate", set.to_str().unwrap(), "-m", "bookstore.v1.Nope"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains(
                "message descriptor not found: bookstore.v1.Nope",
            ));
    }

    #[test]
    fn unsupported_kind() {
        let dir = TempDir::new().unwrap();
        let set = write_temp_file(&dir, "set.json", LEGACY);

        cmd()
            .args(["generate", set.to_str().unwrap(), "-m", "legacy.Old"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("unsupported field kind: group"));
    }
}

mod list_command {
    use super::*;

    #[test]
    fn lists_in_declaration_order() {
        let dir = TempDir::new().unwrap();
        let set = write_temp_file(&dir, "set.json", BOOKSTORE);

        cmd()
            .args(["list", set.to_str().unwrap()])
            .assert()
            .success()
            .stdout("bookstore.v1.Genre\nbookstore.v1.Shelf\nbookstore.v1.Category\n");
    }
}

mod check_command {
    use super::*;

    #[test]
    fn all_pass() {
        let dir = TempDir::new().unwrap();
        let set = write_temp_file(&dir, "set.json", BOOKSTORE);

        cmd()
            .args(["check", set.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("3 messages checked, all passed"));
    }

    #[test]
    fn failure_exits_one() {
        let dir = TempDir::new().unwrap();
        let set = write_temp_file(&dir, "set.json", LEGACY);

        cmd()
            .args(["check", set.to_str().unwrap()])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("legacy.Old"))
            .stdout(predicate::str::contains("unsupported field kind: group"))
            .stdout(predicate::str::contains("1 passed, 1 failed"));
    }

    #[test]
    fn json_output() {
        let dir = TempDir::new().unwrap();
        let set = write_temp_file(&dir, "set.json", LEGACY);

        let output = cmd()
            .args(["check", set.to_str().unwrap(), "--format", "json"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["checked"], 2);
        assert_eq!(report["failed"], 1);
        assert_eq!(report["results"][0]["status"], "ok");
        assert!(report["results"][0].get("error").is_none());
        assert_eq!(report["results"][1]["status"], "error");
    }
}

mod error_handling {
    use super::*;

    #[test]
    fn file_not_found() {
        cmd()
            .args(["list", "/nonexistent/set.json"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("file not found"));
    }

    #[test]
    fn invalid_json() {
        let dir = TempDir::new().unwrap();
        let set = write_temp_file(&dir, "set.json", "{ not json");

        cmd()
            .args(["generate", set.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid descriptor JSON"));
    }

    #[test]
    fn unresolved_type() {
        let dir = TempDir::new().unwrap();
        let set = write_temp_file(
            &dir,
            "set.json",
            r#"{ "messages": [{ "full_name": "a.M",
                 "fields": [{ "name": "x", "kind": "message", "type_name": "a.Gone" }] }] }"#,
        );

        cmd()
            .args(["list", set.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("unknown type 'a.Gone'"));
    }
}

mod help_and_version {
    use super::*;

    #[test]
    fn help_flag() {
        cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("generate"))
            .stdout(predicate::str::contains("check"));
    }

    #[test]
    fn version_flag() {
        cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("proto-jsonschema"));
    }

    #[test]
    fn missing_descriptor_path() {
        cmd().arg("generate").assert().failure();
    }
}
