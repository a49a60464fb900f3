use crate::error::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Generator configuration, read from `infragen.toml` at the project root
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub layout: LayoutConfig,
    pub oracle: OracleSettings,
    pub format: FormatSettings,
}

/// Project-relative locations of everything the generator reads or writes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Base directory of infrastructure code; query references are relative to it
    pub infra_base: PathBuf,

    /// Directory scanned for entity definitions
    pub entities_root: PathBuf,

    /// Directory holding sqlc output (`db.go`, `models.go`, `*.sql.go`)
    pub db_dir: PathBuf,

    pub schema_file: PathBuf,
    pub tx_provider_file: PathBuf,

    /// Root directory for generated query files
    pub query_dir: PathBuf,

    pub sqlc_config: PathBuf,
    pub go_mod: PathBuf,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            infra_base: PathBuf::from("pkg/infra"),
            entities_root: PathBuf::from("pkg/domain/entity"),
            db_dir: PathBuf::from("pkg/infra/db"),
            schema_file: PathBuf::from("pkg/infra/sql/schema/schema.sql"),
            tx_provider_file: PathBuf::from("pkg/infra/txProvider.go"),
            query_dir: PathBuf::from("pkg/infra/sql/query"),
            sqlc_config: PathBuf::from("pkg/infra/sqlc.yml"),
            go_mod: PathBuf::from("go.mod"),
        }
    }
}

/// Oracle endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OracleSettings {
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4.1-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

/// External formatter invocation. `{file}` in `args` expands to the target path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormatSettings {
    /// Formatter program; empty disables formatting
    pub command: String,
    pub args: Vec<String>,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            command: "goimports".to_string(),
            args: vec!["-srcdir".to_string(), "{file}".to_string()],
        }
    }
}

impl GeneratorConfig {
    pub const FILE_NAME: &'static str = "infragen.toml";

    /// Load `explicit`, or `<root>/infragen.toml` when present, or defaults
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = root.join(Self::FILE_NAME);
                if !candidate.exists() {
                    log::debug!("No {} under {}, using defaults", Self::FILE_NAME, root.display());
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let text = std::fs::read_to_string(&path).map_err(|source| GeneratorError::Reference {
            path: path.clone(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| GeneratorError::ConfigFile {
            path: path.clone(),
            source,
        })?;
        config.validate().map_err(GeneratorError::InvalidConfig)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        let layout = &self.layout;
        let paths = [
            ("layout.infra_base", &layout.infra_base),
            ("layout.entities_root", &layout.entities_root),
            ("layout.db_dir", &layout.db_dir),
            ("layout.schema_file", &layout.schema_file),
            ("layout.tx_provider_file", &layout.tx_provider_file),
            ("layout.query_dir", &layout.query_dir),
            ("layout.sqlc_config", &layout.sqlc_config),
            ("layout.go_mod", &layout.go_mod),
        ];
        for (name, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(format!("{name} must not be empty"));
            }
        }

        if self.oracle.model.trim().is_empty() {
            return Err("oracle.model must not be empty".to_string());
        }
        if self.oracle.api_key_env.trim().is_empty() {
            return Err("oracle.api_key_env must not be empty".to_string());
        }
        if self.oracle.timeout_secs == 0 {
            return Err("oracle.timeout_secs must be > 0".to_string());
        }

        Ok(())
    }
}

/// Layout resolved against a project root
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
    config: LayoutConfig,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>, config: LayoutConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a user-supplied path against the project root
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn infra_base(&self) -> PathBuf {
        self.root.join(&self.config.infra_base)
    }

    pub fn entities_root(&self) -> PathBuf {
        self.root.join(&self.config.entities_root)
    }

    pub fn db_dir(&self) -> PathBuf {
        self.root.join(&self.config.db_dir)
    }

    pub fn db_file(&self, name: &str) -> PathBuf {
        self.db_dir().join(name)
    }

    pub fn schema_file(&self) -> PathBuf {
        self.root.join(&self.config.schema_file)
    }

    pub fn tx_provider_file(&self) -> PathBuf {
        self.root.join(&self.config.tx_provider_file)
    }

    pub fn sqlc_config(&self) -> PathBuf {
        self.root.join(&self.config.sqlc_config)
    }

    pub fn go_mod(&self) -> PathBuf {
        self.root.join(&self.config.go_mod)
    }

    /// `<query_dir>/<dir of source relative to infra_base>/<stem>.sql`
    pub fn query_output_path(&self, source_file: &Path) -> PathBuf {
        let infra_base = self.infra_base();
        let sub_dir = source_file
            .parent()
            .and_then(|dir| dir.strip_prefix(&infra_base).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let stem = source_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.root
            .join(&self.config.query_dir)
            .join(sub_dir)
            .join(format!("{stem}.sql"))
    }

    /// Reference string for a query file: relative to infra_base, `/`-separated
    pub fn query_reference(&self, query_file: &Path) -> String {
        let relative = query_file
            .strip_prefix(self.infra_base())
            .or_else(|_| query_file.strip_prefix(&self.root))
            .unwrap_or(query_file);
        slash_path(relative)
    }

    /// Path relative to the project root, for display and prompts
    pub fn display_path(&self, path: &Path) -> String {
        slash_path(path.strip_prefix(&self.root).unwrap_or(path))
    }
}

fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
