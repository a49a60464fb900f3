use crate::config::ProjectLayout;
use crate::error::{GeneratorError, Result};
use crate::persist::write_atomic;
use crate::program::read_target;
use crate::prompt::QueryContext;
use crate::references::{load_catalog, load_schema};
use infragen_oracle::{request_structured, Oracle};
use infragen_sqlc::{ConfigMerger, MergeReport};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Structured oracle response of the query stage
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct QueryResponse {
    #[schemars(description = "sqlc-annotated SQL queries, one per element")]
    pub queries: Vec<String>,
}

/// Outcome of one query-stage run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryReport {
    /// Written query file
    pub query_file: PathBuf,
    pub query_count: usize,
    pub merge: MergeReport,
}

/// Generates the sqlc query file backing an infrastructure interface
pub struct QueryGenerator<'a> {
    oracle: &'a dyn Oracle,
    layout: &'a ProjectLayout,
    merger: ConfigMerger,
}

impl<'a> QueryGenerator<'a> {
    pub fn new(oracle: &'a dyn Oracle, layout: &'a ProjectLayout) -> Self {
        Self {
            oracle,
            layout,
            merger: ConfigMerger::default(),
        }
    }

    pub async fn generate(&self, file: &Path) -> Result<QueryReport> {
        let path = self.layout.resolve(file);
        let (facts, _) = read_target(&path)?;
        if facts.method_names().is_empty() {
            return Err(GeneratorError::NoMethods(facts.contract.name));
        }

        let catalog = load_catalog(self.layout)?;
        let context = QueryContext {
            interface_text: facts.contract.text.clone(),
            schema: load_schema(self.layout),
            catalog: catalog.render(self.layout.root()),
        };

        let mut queries = Vec::new();
        for method in facts.method_names() {
            log::info!("Generating queries for {method}");
            let response: QueryResponse = request_structured(self.oracle, context.method_prompt(method))
                .await
                .map_err(|e| GeneratorError::oracle(method, e))?;
            queries.extend(response.queries);
        }

        let query_file = self.layout.query_output_path(&path);
        write_atomic(&query_file, &queries.join("\n\n")).await?;
        log::info!(
            "Wrote {} queries to {}",
            queries.len(),
            self.layout.display_path(&query_file)
        );

        let reference = self.layout.query_reference(&query_file);
        let merge = self
            .merger
            .merge_reference(self.layout.sqlc_config(), &reference)?;

        Ok(QueryReport {
            query_file,
            query_count: queries.len(),
            merge,
        })
    }
}
