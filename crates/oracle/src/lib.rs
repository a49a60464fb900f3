//! # Infragen Oracle
//!
//! Contract and clients for the external generation oracle: a service that
//! takes a free-form text prompt plus a JSON schema and returns a JSON
//! document conforming to that schema.
//!
//! The oracle is an explicit collaborator. It is constructed once by the
//! caller and passed by reference to whatever needs it, so tests can swap in
//! [`ScriptedOracle`].
//!
//! ## Example
//!
//! ```rust
//! use infragen_oracle::{request_structured, ScriptedOracle};
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct Answer {
//!     text: String,
//! }
//!
//! # tokio_test_block(async {
//! let oracle = ScriptedOracle::new();
//! oracle.push_json(&serde_json::json!({ "text": "hello" }));
//! let answer: Answer = request_structured(&oracle, "say hello").await.unwrap();
//! assert_eq!(answer.text, "hello");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod client;
mod error;
mod oracle;
mod scripted;

pub use client::{OpenAiConfig, OpenAiOracle};
pub use error::{OracleError, Result};
pub use oracle::{request_structured, Oracle, OracleRequest};
pub use scripted::ScriptedOracle;
