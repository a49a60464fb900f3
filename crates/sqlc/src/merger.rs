use crate::error::{ConfigError, Result};
use crate::node::ConfigNode;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Keys that locate the lists to update: `<collection_key>[*].<list_key>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeTarget {
    pub collection_key: String,
    pub list_key: String,
}

impl Default for MergeTarget {
    fn default() -> Self {
        Self {
            collection_key: "sql".to_string(),
            list_key: "queries".to_string(),
        }
    }
}

/// What one merge did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub config_path: PathBuf,
    pub reference: String,
    /// Lists the reference was appended to
    pub appended: usize,
    /// Lists that already held the reference
    pub already_present: usize,
    /// Blocks skipped because of their shape
    pub skipped_blocks: usize,
}

/// Inserts a reference into every qualifying list of a configuration document
#[derive(Debug, Clone, Default)]
pub struct ConfigMerger {
    target: MergeTarget,
}

impl ConfigMerger {
    pub fn new(target: MergeTarget) -> Self {
        Self { target }
    }

    /// Load, update and persist the document at `config_path`.
    ///
    /// The file is untouched unless every step up to serialization succeeds.
    pub fn merge_reference(&self, config_path: impl AsRef<Path>, reference: &str) -> Result<MergeReport> {
        let config_path = config_path.as_ref();
        let text = fs::read_to_string(config_path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ConfigError::NotFound(config_path.to_path_buf()),
            _ => ConfigError::Io {
                path: config_path.to_path_buf(),
                source,
            },
        })?;

        let value: serde_yaml::Value =
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: config_path.to_path_buf(),
                source,
            })?;
        let mut root = ConfigNode::from(value);

        let mut report = self.apply(&mut root, reference).map_err(|reason| {
            ConfigError::InvalidStructure {
                path: config_path.to_path_buf(),
                reason,
            }
        })?;
        report.config_path = config_path.to_path_buf();

        let serialized =
            serde_yaml::to_string(&serde_yaml::Value::from(root)).map_err(ConfigError::Serialize)?;
        write_atomic(config_path, &serialized)?;

        log::info!(
            "Updated {} with {reference} ({} appended, {} already present, {} skipped)",
            config_path.display(),
            report.appended,
            report.already_present,
            report.skipped_blocks
        );
        Ok(report)
    }

    /// Update an in-memory document. `Err` carries the reason the top-level
    /// structure is unusable.
    pub fn apply(&self, root: &mut ConfigNode, reference: &str) -> std::result::Result<MergeReport, String> {
        let collection_key = &self.target.collection_key;
        let list_key = &self.target.list_key;

        if !root.is_mapping() {
            return Err(format!("document root is a {}, expected a mapping", root.shape()));
        }
        let blocks = root
            .get_mut(collection_key)
            .ok_or_else(|| format!("missing top-level `{collection_key}` key"))?;
        let shape = blocks.shape();
        let blocks = blocks
            .as_list_mut()
            .ok_or_else(|| format!("`{collection_key}` is a {shape}, expected a list of blocks"))?;

        let mut report = MergeReport {
            reference: reference.to_string(),
            ..MergeReport::default()
        };

        for (idx, block) in blocks.iter_mut().enumerate() {
            let Some(list) = block.get_mut(list_key) else {
                log::warn!("Skipping {collection_key}[{idx}]: no `{list_key}` key");
                report.skipped_blocks += 1;
                continue;
            };
            let shape = list.shape();
            let Some(items) = list.as_list_mut() else {
                log::warn!("Skipping {collection_key}[{idx}]: `{list_key}` is a {shape}, expected a list");
                report.skipped_blocks += 1;
                continue;
            };
            if items.iter().any(|item| item.as_str().is_none()) {
                log::warn!("Skipping {collection_key}[{idx}]: `{list_key}` holds non-string entries");
                report.skipped_blocks += 1;
                continue;
            }

            if items.iter().any(|item| item.as_str() == Some(reference)) {
                report.already_present += 1;
            } else {
                items.push(ConfigNode::string(reference));
                report.appended += 1;
            }
        }

        Ok(report)
    }
}

/// Replace the file behind `path` (following symlinks), keeping its permissions
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    let target = fs::canonicalize(path).map_err(io_err)?;
    let permissions = fs::metadata(&target).map_err(io_err)?.permissions();

    let mut name = target.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    let tmp = target.with_file_name(name);

    let written = fs::write(&tmp, contents)
        .and_then(|_| fs::set_permissions(&tmp, permissions))
        .and_then(|_| fs::rename(&tmp, &target));
    if let Err(source) = written {
        let _ = fs::remove_file(&tmp);
        return Err(io_err(source));
    }
    Ok(())
}
