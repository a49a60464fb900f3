//! # Infragen Facts
//!
//! Structural fact extraction from Go source files.
//!
//! ## Pipeline
//!
//! ```text
//! Source File
//!     │
//!     ├──> Tree-sitter Parsing (tree-sitter-go) → AST
//!     │      └─> syntax errors surface as ExtractionError::Parse
//!     │
//!     ├──> First interface declaration (first match wins)
//!     │      └─> name + method names in declaration order
//!     │
//!     ├──> `<Interface>Impl` struct declaration
//!     │
//!     └──> `var _ <Interface> = <Interface>Impl{}` assertion
//! ```
//!
//! Every extracted text goes through [`printer::print_declaration`], so
//! extracting the same unchanged source twice yields byte-identical text.
//!
//! ## Example
//!
//! ```rust
//! use infragen_facts::{GoParser, SourceFacts};
//!
//! let code = r#"package infra
//!
//! type Store interface {
//!     Get(id string) string
//!     Put(id, value string)
//! }
//!
//! type StoreImpl struct{}
//!
//! var _ Store = StoreImpl{}
//! "#;
//!
//! let mut parser = GoParser::new().unwrap();
//! let source = parser.parse("store.go", code).unwrap();
//! let facts = SourceFacts::from_source(&source).unwrap();
//! assert_eq!(facts.method_names(), ["Get", "Put"]);
//! assert_eq!(facts.binding.struct_name, "StoreImpl");
//! ```

mod error;
mod extractor;
pub mod printer;
mod source;
mod types;

pub use error::{ExtractionError, Result};
pub use extractor::{
    extract_source_facts, find_conformance_assertion, find_first_interface, find_implementation,
    InterfaceLookup,
};
pub use source::{
    entity_name_from_file_name, is_go_source_file, Declaration, DeclarationKind, GoParser,
    GoSource, TypeSpec, TypeSpecKind, GO_EXTENSION, GO_TEST_SUFFIX,
};
pub use types::{ConformanceAssertion, ImplementationBinding, InterfaceContract, SourceFacts};
