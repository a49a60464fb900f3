use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const STORE_GO: &str = r#"package infra

type Store interface {
	Get(id string) (string, error)
	Put(id, value string) error
}

type StoreImpl struct{}

var _ Store = StoreImpl{}
"#;

const USER_GO: &str = r#"package entity

type User struct {
	Name string
}

func NewUser(name string) *User {
	return &User{Name: name}
}
"#;

const SQLC: &str = "version: \"2\"\nsql:\n  - engine: postgresql\n    queries:\n      - sql/query/user.sql\n";

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn setup_project() -> TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();
    write(root, "pkg/infra/store.go", STORE_GO);
    write(root, "pkg/domain/entity/user.go", USER_GO);
    write(root, "pkg/domain/entity/note.go", "package entity\n\ntype Note struct{}\n");
    write(root, "pkg/infra/sqlc.yml", SQLC);
    temp
}

#[allow(deprecated)]
fn infragen(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("infragen").expect("binary");
    cmd.arg("--root").arg(root).arg("--quiet");
    cmd
}

#[test]
fn extract_prints_facts_as_json() {
    let temp = setup_project();
    let output = infragen(temp.path())
        .arg("extract")
        .arg("pkg/infra/store.go")
        .arg("--json")
        .output()
        .expect("command run");
    assert!(output.status.success());

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(body["contract"]["name"], "Store");
    assert_eq!(body["contract"]["methods"], serde_json::json!(["Get", "Put"]));
    assert_eq!(body["binding"]["struct_name"], "StoreImpl");
    assert_eq!(body["assertion"]["text"], "var _ Store = StoreImpl{}");
}

#[test]
fn extract_reports_missing_interface() {
    let temp = setup_project();
    infragen(temp.path())
        .arg("extract")
        .arg("pkg/domain/entity/note.go")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No interface declaration found"));
}

#[test]
fn catalog_lists_qualifying_entities_only() {
    let temp = setup_project();
    let output = infragen(temp.path())
        .arg("catalog")
        .arg("--json")
        .output()
        .expect("command run");
    assert!(output.status.success());

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let entries = body.as_array().expect("array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["path"], "pkg/domain/entity/user.go");
    assert_eq!(entries[0]["entity_name"], "User");
}

#[test]
fn catalog_renders_markdown() {
    let temp = setup_project();
    infragen(temp.path())
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Entity Definition"))
        .stdout(predicate::str::contains("## pkg/domain/entity/user.go"))
        .stdout(predicate::str::contains("func NewUser(name string) *User"));
}

#[test]
fn sqlc_add_is_idempotent() {
    let temp = setup_project();
    let config = temp.path().join("pkg/infra/sqlc.yml");

    infragen(temp.path())
        .arg("sqlc-add")
        .arg("sql/query/store.sql")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 appended"));
    let once = fs::read_to_string(&config).unwrap();

    infragen(temp.path())
        .arg("sqlc-add")
        .arg("sql/query/store.sql")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 already present"));
    assert_eq!(fs::read_to_string(&config).unwrap(), once);
    assert_eq!(once.matches("sql/query/store.sql").count(), 1);
}

#[test]
fn sqlc_add_rejects_config_without_sql_blocks() {
    let temp = setup_project();
    write(temp.path(), "pkg/infra/sqlc.yml", "version: \"2\"\n");

    infragen(temp.path())
        .arg("sqlc-add")
        .arg("sql/query/store.sql")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing top-level `sql` key"));
    assert_eq!(
        fs::read_to_string(temp.path().join("pkg/infra/sqlc.yml")).unwrap(),
        "version: \"2\"\n"
    );
}

#[test]
fn program_requires_api_key() {
    let temp = setup_project();
    write(
        temp.path(),
        "infragen.toml",
        "[oracle]\napi_key_env = \"INFRAGEN_TEST_MISSING_KEY\"\n",
    );

    infragen(temp.path())
        .env_remove("INFRAGEN_TEST_MISSING_KEY")
        .arg("program")
        .arg("pkg/infra/store.go")
        .assert()
        .failure()
        .stderr(predicate::str::contains("INFRAGEN_TEST_MISSING_KEY"));
    assert_eq!(
        fs::read_to_string(temp.path().join("pkg/infra/store.go")).unwrap(),
        STORE_GO
    );
}

#[test]
fn invalid_config_is_rejected() {
    let temp = setup_project();
    write(temp.path(), "infragen.toml", "[oracle]\ntimeout_secs = 0\n");

    infragen(temp.path())
        .arg("catalog")
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout_secs"));
}

#[test]
fn empty_model_override_is_rejected() {
    let temp = setup_project();

    infragen(temp.path())
        .arg("--model")
        .arg("")
        .arg("program")
        .arg("pkg/infra/store.go")
        .assert()
        .failure()
        .stderr(predicate::str::contains("oracle.model must not be empty"));
    assert_eq!(
        fs::read_to_string(temp.path().join("pkg/infra/store.go")).unwrap(),
        STORE_GO
    );
}
