//! # Infragen sqlc
//!
//! Registers generated query files in an sqlc configuration document.
//!
//! The document is loaded into a small [`ConfigNode`] tree, every
//! `sql[*].queries` list receives the reference exactly once, and the whole
//! document is written back through a temporary sibling file.
//!
//! Structure problems at the top (`sql` missing or not a list) are hard
//! errors. Problems inside a single block (no `queries` list, or a list
//! holding non-strings) only skip that block with a warning.
//!
//! ## Example
//!
//! ```no_run
//! use infragen_sqlc::ConfigMerger;
//!
//! let report = ConfigMerger::default().merge_reference("pkg/infra/sqlc.yml", "sql/query/user.sql")?;
//! println!("appended to {} lists", report.appended);
//! # Ok::<(), infragen_sqlc::ConfigError>(())
//! ```

mod error;
mod merger;
mod node;

pub use error::{ConfigError, Result};
pub use merger::{ConfigMerger, MergeReport, MergeTarget};
pub use node::ConfigNode;
