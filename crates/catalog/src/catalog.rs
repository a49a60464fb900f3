use crate::error::Result;
use crate::scanner::FileScanner;
use infragen_facts::{entity_name_from_file_name, printer, DeclarationKind, GoParser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Type declaration plus constructor excerpt for one entity file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntityRecord {
    /// Source file path
    pub path: PathBuf,

    /// Entity name derived from the file name (`user.go` → `User`)
    pub entity_name: String,

    /// Printed declarations up to and including `New<Entity>`, imports excluded
    pub code: String,
}

/// Try to build a record for one file.
///
/// Returns `Ok(None)` when the file does not declare both the entity type
/// and its `New<Entity>` constructor.
pub fn build_entity_record(parser: &mut GoParser, path: &Path) -> Result<Option<EntityRecord>> {
    let Some(entity_name) = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(entity_name_from_file_name)
    else {
        return Ok(None);
    };

    let source = parser.parse_file(path)?;
    let declarations = source.declarations();
    let constructor_name = format!("New{entity_name}");

    let has_type = declarations.iter().any(|decl| {
        source
            .type_specs(decl)
            .iter()
            .any(|spec| spec.name == entity_name)
    });
    let constructor_end = declarations
        .iter()
        .filter(|decl| source.function_name(decl) == Some(constructor_name.as_str()))
        .map(|decl| decl.end_offset())
        .last();

    let Some(constructor_end) = constructor_end.filter(|_| has_type) else {
        log::debug!(
            "Skipping {}: needs type {entity_name} and func {constructor_name}",
            path.display()
        );
        return Ok(None);
    };

    let code = printer::print_declarations(
        declarations
            .iter()
            .filter(|decl| decl.kind != DeclarationKind::Import)
            .filter(|decl| decl.end_offset() <= constructor_end)
            .map(|decl| source.node_text(decl.node)),
    );

    Ok(Some(EntityRecord {
        path: path.to_path_buf(),
        entity_name,
        code,
    }))
}

/// Entity records found under one root
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityCatalog {
    pub records: Vec<EntityRecord>,
}

impl EntityCatalog {
    /// Scan a root directory. Records are in walk order.
    pub fn scan(root: impl AsRef<Path>) -> Result<Self> {
        let files = FileScanner::new(root).scan()?;
        let mut parser = GoParser::new()?;
        let mut records = Vec::new();
        for path in files {
            if let Some(record) = build_entity_record(&mut parser, &path)? {
                records.push(record);
            }
        }
        log::info!("Catalog contains {} entities", records.len());
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records ordered by file path
    pub fn sorted(&self) -> Vec<&EntityRecord> {
        let mut records: Vec<_> = self.records.iter().collect();
        records.sort_by(|a, b| a.path.cmp(&b.path));
        records
    }

    /// Render as a markdown reference section, paths shown relative to `base`
    pub fn render(&self, base: impl AsRef<Path>) -> String {
        let base = base.as_ref();
        let mut out = String::from(
            "# Entity Definition\n\
             The function we are implementing references the following entities. \
             Each entry lists the type definitions and the New function used to build the entity:\n",
        );
        for record in self.sorted() {
            let shown = record.path.strip_prefix(base).unwrap_or(&record.path);
            out.push_str(&format!("## {}\n", shown.display()));
            out.push_str("```\n");
            out.push_str(&record.code);
            out.push_str("\n```\n");
        }
        out
    }
}
