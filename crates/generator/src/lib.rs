//! # Infragen Generator
//!
//! Drives generation of Go infrastructure code for one interface file.
//!
//! ## Stages
//!
//! ```text
//! Target file (pkg/infra/**/foo.go)
//!     │
//!     ├──> Facts: interface, FooImpl struct, conformance assertion
//!     │
//!     ├──> Query stage
//!     │      ├─> one oracle call per method → {queries}
//!     │      ├─> pkg/infra/sql/query/**/foo.sql
//!     │      └─> sqlc.yml `sql[*].queries` += sql/query/**/foo.sql
//!     │
//!     └──> Program stage
//!            ├─> reference material (db.go, models.go, foo.sql.go,
//!            │   txProvider.go, go.mod, entity catalog)
//!            ├─> one oracle call per method → {code, import, doccomment}
//!            ├─> assemble: package, sorted imports, interface, struct,
//!            │   assertion, methods in interface order
//!            └─> formatter → foo.go (written once, atomically)
//! ```
//!
//! Oracle calls are awaited one at a time. Any failure before the final
//! write leaves the target file untouched.

mod assembler;
mod config;
mod error;
mod formatter;
mod fragment;
mod gomod;
mod persist;
mod program;
mod prompt;
mod queries;
mod references;

pub use assembler::{assemble, merge_imports, render_import_block, AssembledArtifact};
pub use config::{FormatSettings, GeneratorConfig, LayoutConfig, OracleSettings, ProjectLayout};
pub use error::{AssemblyError, GeneratorError, Result};
pub use formatter::{CommandFormatter, Formatter, PassthroughFormatter};
pub use fragment::{parse_import_block, GenerationFragment, MethodResponse};
pub use gomod::GoModSummary;
pub use persist::write_atomic;
pub use program::{ProgramGenerator, ProgramReport};
pub use prompt::{GenerationContext, QueryContext, ReferenceFile, IMPLEMENTATION_GUIDELINES};
pub use queries::{QueryGenerator, QueryReport, QueryResponse};
pub use references::{load_catalog, load_schema, read_reference, ProgramReferences};
