//! # Infragen Catalog
//!
//! Builds the entity catalog used as reference context for generation.
//!
//! ## Pipeline
//!
//! ```text
//! Entities root
//!     │
//!     ├──> File Scanner (walkdir, `.go` only, `_test.go` skipped)
//!     │      └─> Source files
//!     │
//!     ├──> Per file: `foo.go` must declare type `Foo` and func `NewFoo`
//!     │      └─> otherwise skipped silently
//!     │
//!     └──> EntityRecord: every non-import declaration ending at or
//!          before the end of `NewFoo`, printed in order
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use infragen_catalog::EntityCatalog;
//!
//! let catalog = EntityCatalog::scan("pkg/domain/entity")?;
//! println!("{}", catalog.render("."));
//! # Ok::<(), infragen_catalog::CatalogError>(())
//! ```

mod catalog;
mod error;
mod scanner;

pub use catalog::{build_entity_record, EntityCatalog, EntityRecord};
pub use error::{CatalogError, Result};
pub use scanner::FileScanner;
