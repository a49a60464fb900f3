use infragen_sqlc::{ConfigError, ConfigMerger};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

const SQLC: &str = r#"version: "2"
sql:
  - schema: sql/schema/schema.sql
    queries:
      - query/existing.sql
    engine: postgresql
    gen:
      go:
        package: db
        out: db
        sql_package: pgx/v5
        emit_json_tags: true
"#;

#[test]
fn merge_is_idempotent_on_disk() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("sqlc.yml");
    fs::write(&path, SQLC).unwrap();

    let merger = ConfigMerger::default();
    let first = merger.merge_reference(&path, "sql/query/user.sql").unwrap();
    assert_eq!(first.appended, 1);
    let once = fs::read_to_string(&path).unwrap();

    let second = merger.merge_reference(&path, "sql/query/user.sql").unwrap();
    assert_eq!(second.appended, 0);
    assert_eq!(second.already_present, 1);
    let twice = fs::read_to_string(&path).unwrap();

    assert_eq!(once, twice);
    assert_eq!(once.matches("sql/query/user.sql").count(), 1);
    assert!(once.contains("query/existing.sql"));
    assert!(once.contains("sql_package: pgx/v5"));
    assert!(!temp.path().join("sqlc.yml.tmp").exists());
}

#[test]
fn missing_collection_key_leaves_file_unchanged() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("sqlc.yml");
    let original = "version: \"2\"\nplugins: []\n";
    fs::write(&path, original).unwrap();

    let err = ConfigMerger::default()
        .merge_reference(&path, "sql/query/user.sql")
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidStructure { .. }), "{err}");
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn missing_file_is_not_found() {
    let temp = tempdir().unwrap();
    let err = ConfigMerger::default()
        .merge_reference(temp.path().join("sqlc.yml"), "q.sql")
        .unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)), "{err}");
}

#[test]
fn malformed_yaml_is_parse_error() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("sqlc.yml");
    fs::write(&path, "sql: [unclosed\n").unwrap();

    let err = ConfigMerger::default()
        .merge_reference(&path, "q.sql")
        .unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
}

#[cfg(unix)]
#[test]
fn merge_updates_symlink_target_and_keeps_mode() {
    use std::os::unix::fs::PermissionsExt;

    let temp = tempdir().unwrap();
    let real = temp.path().join("sqlc.shared.yml");
    let link = temp.path().join("sqlc.yml");
    fs::write(&real, SQLC).unwrap();
    fs::set_permissions(&real, fs::Permissions::from_mode(0o640)).unwrap();
    std::os::unix::fs::symlink(&real, &link).unwrap();

    let report = ConfigMerger::default()
        .merge_reference(&link, "sql/query/user.sql")
        .unwrap();
    assert_eq!(report.appended, 1);

    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert!(fs::read_to_string(&real).unwrap().contains("sql/query/user.sql"));
    assert_eq!(fs::metadata(&real).unwrap().permissions().mode() & 0o777, 0o640);
}
