use crate::config::ProjectLayout;
use crate::error::{GeneratorError, Result};
use crate::gomod::GoModSummary;
use crate::prompt::ReferenceFile;
use infragen_catalog::EntityCatalog;
use std::path::Path;

/// Read a required reference file
pub fn read_reference(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| GeneratorError::Reference {
        path: path.to_path_buf(),
        source,
    })
}

/// Scan the entities root; a missing root yields an empty catalog
pub fn load_catalog(layout: &ProjectLayout) -> Result<EntityCatalog> {
    let root = layout.entities_root();
    if !root.is_dir() {
        log::warn!(
            "Entities root {} does not exist, continuing without entity definitions",
            layout.display_path(&root)
        );
        return Ok(EntityCatalog::default());
    }
    Ok(EntityCatalog::scan(&root)?)
}

/// Database schema text; missing schema is tolerated
pub fn load_schema(layout: &ProjectLayout) -> String {
    let path = layout.schema_file();
    match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Could not read DB schema {}: {e}", layout.display_path(&path));
            String::new()
        }
    }
}

/// Reference material for the program stage. Every file is required.
#[derive(Debug, Clone)]
pub struct ProgramReferences {
    pub db_files: Vec<ReferenceFile>,
    pub tx_provider: String,
    pub go_mod: GoModSummary,
}

impl ProgramReferences {
    /// Load `db.go`, `models.go`, `<stem>.sql.go`, the transaction provider and `go.mod`
    pub fn load(layout: &ProjectLayout, source_file: &Path) -> Result<Self> {
        let stem = source_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let db_files = ["db.go".to_string(), "models.go".to_string(), format!("{stem}.sql.go")]
            .iter()
            .map(|name| -> Result<ReferenceFile> {
                let path = layout.db_file(name);
                Ok(ReferenceFile {
                    label: layout.display_path(&path),
                    content: read_reference(&path)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let tx_provider = read_reference(&layout.tx_provider_file())?;
        let go_mod = GoModSummary::parse(&read_reference(&layout.go_mod())?);

        Ok(Self {
            db_files,
            tx_provider,
            go_mod,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_entities_root_is_empty_catalog() {
        let temp = tempdir().unwrap();
        let layout = ProjectLayout::new(temp.path(), LayoutConfig::default());
        assert!(load_catalog(&layout).unwrap().is_empty());
        assert_eq!(load_schema(&layout), "");
    }

    #[test]
    fn program_references_require_every_file() {
        let temp = tempdir().unwrap();
        let layout = ProjectLayout::new(temp.path(), LayoutConfig::default());
        let db = temp.path().join("pkg/infra/db");
        fs::create_dir_all(&db).unwrap();
        fs::write(db.join("db.go"), "package db\n").unwrap();
        fs::write(db.join("models.go"), "package db\n").unwrap();

        let source = temp.path().join("pkg/infra/store.go");
        let err = ProgramReferences::load(&layout, &source).unwrap_err();
        assert!(
            matches!(&err, GeneratorError::Reference { path, .. } if path.ends_with("store.sql.go")),
            "{err}"
        );

        fs::write(db.join("store.sql.go"), "package db\n").unwrap();
        fs::write(temp.path().join("pkg/infra/txProvider.go"), "package infra\n").unwrap();
        fs::write(temp.path().join("go.mod"), "module example.com/app\n\ngo 1.22\n").unwrap();

        let refs = ProgramReferences::load(&layout, &source).unwrap();
        let labels: Vec<_> = refs.db_files.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["pkg/infra/db/db.go", "pkg/infra/db/models.go", "pkg/infra/db/store.sql.go"]
        );
        assert_eq!(refs.go_mod.module_path(), Some("example.com/app"));
    }
}
