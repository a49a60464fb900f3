use infragen_facts::{extract_source_facts, ExtractionError};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

#[test]
fn extracts_facts_from_file_on_disk() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("user.go");
    fs::write(
        &path,
        r#"package infra

import (
	"context"

	"example.com/app/pkg/domain/entity"
)

// UserRepository loads users.
type UserRepository interface {
	FindByID(ctx context.Context, id entity.UserID) (*entity.User, error)
	List(ctx context.Context) ([]*entity.User, error)
}

type UserRepositoryImpl struct {
	Cache Cache
}

var _ UserRepository = UserRepositoryImpl{}

func (r *UserRepositoryImpl) old() {}
"#,
    )
    .unwrap();

    let facts = extract_source_facts(&path).expect("extraction");
    assert_eq!(facts.contract.name, "UserRepository");
    assert_eq!(facts.method_names(), ["FindByID", "List"]);
    assert_eq!(facts.binding.struct_name, "UserRepositoryImpl");
    assert_eq!(
        facts.assertion.text,
        "var _ UserRepository = UserRepositoryImpl{}"
    );
}

#[test]
fn file_without_interface_is_rejected_and_left_untouched() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("plain.go");
    let code = "package infra\n\ntype Plain struct{}\n";
    fs::write(&path, code).unwrap();

    let err = extract_source_facts(&path).unwrap_err();
    assert!(matches!(err, ExtractionError::NoInterfaceFound(_)), "{err}");
    assert_eq!(fs::read_to_string(&path).unwrap(), code);
}

#[test]
fn missing_file_is_io_error() {
    let temp = tempdir().unwrap();
    let err = extract_source_facts(temp.path().join("missing.go")).unwrap_err();
    assert!(matches!(err, ExtractionError::Io { .. }), "{err}");
}

#[test]
fn unparsable_file_is_parse_error() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("broken.go");
    fs::write(&path, "package infra\n\ntype Store interface {\n").unwrap();

    let err = extract_source_facts(&path).unwrap_err();
    assert!(matches!(err, ExtractionError::Parse { .. }), "{err}");
}
