use crate::assembler::assemble;
use crate::config::ProjectLayout;
use crate::error::{GeneratorError, Result};
use crate::formatter::Formatter;
use crate::fragment::{GenerationFragment, MethodResponse};
use crate::persist::write_atomic;
use crate::prompt::{GenerationContext, IMPLEMENTATION_GUIDELINES};
use crate::references::{load_catalog, ProgramReferences};
use infragen_facts::{GoParser, SourceFacts};
use infragen_oracle::{request_structured, Oracle};
use std::path::{Path, PathBuf};

/// Outcome of one program-stage run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramReport {
    /// File that was overwritten
    pub path: PathBuf,
    /// Methods generated, in interface order
    pub methods: Vec<String>,
    /// Final import set
    pub imports: Vec<String>,
}

/// Regenerates an infrastructure file method by method.
///
/// The oracle is called once per interface method, sequentially, in
/// declaration order. The target file is only written after every fragment
/// has been obtained and assembled.
pub struct ProgramGenerator<'a> {
    oracle: &'a dyn Oracle,
    formatter: &'a dyn Formatter,
    layout: &'a ProjectLayout,
}

/// Facts plus package name of a parsed target file
pub(crate) fn read_target(path: &Path) -> Result<(SourceFacts, String)> {
    let mut parser = GoParser::new()?;
    let source = parser.parse_file(path)?;
    let facts = SourceFacts::from_source(&source)?;
    let package = source
        .package_name()
        .map(str::to_string)
        .or_else(|| {
            path.parent()
                .and_then(|dir| dir.file_name())
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_default();
    Ok((facts, package))
}

impl<'a> ProgramGenerator<'a> {
    pub fn new(oracle: &'a dyn Oracle, formatter: &'a dyn Formatter, layout: &'a ProjectLayout) -> Self {
        Self {
            oracle,
            formatter,
            layout,
        }
    }

    /// Gather the reference material shared by every method prompt
    pub fn build_context(&self, path: &Path, facts: &SourceFacts) -> Result<GenerationContext> {
        let references = ProgramReferences::load(self.layout, path)?;
        let catalog = load_catalog(self.layout)?;
        let package_dir = path
            .parent()
            .map(|dir| self.layout.display_path(dir))
            .unwrap_or_default();

        Ok(GenerationContext {
            interface_text: facts.contract.text.clone(),
            struct_text: facts.binding.text.clone(),
            assertion_text: facts.assertion.text.clone(),
            db_files: references.db_files,
            catalog: catalog.render(self.layout.root()),
            tx_provider: references.tx_provider,
            guidelines: IMPLEMENTATION_GUIDELINES.to_string(),
            go_mod: references.go_mod.render(),
            package_dir,
            entities_dir: self.layout.display_path(&self.layout.entities_root()),
            db_dir: self.layout.display_path(&self.layout.db_dir()),
            infra_dir: self.layout.display_path(&self.layout.infra_base()),
        })
    }

    /// One oracle call per method, in method order. The first failure aborts.
    pub async fn collect_fragments(
        &self,
        facts: &SourceFacts,
        context: &GenerationContext,
    ) -> Result<Vec<GenerationFragment>> {
        let methods = facts.method_names();
        let mut fragments = Vec::with_capacity(methods.len());
        for (idx, method) in methods.iter().enumerate() {
            log::info!("Generating {method} ({}/{})", idx + 1, methods.len());
            let response: MethodResponse = request_structured(self.oracle, context.method_prompt(method))
                .await
                .map_err(|e| GeneratorError::oracle(method, e))?;
            fragments.push(GenerationFragment::from_response(method, response)?);
        }
        Ok(fragments)
    }

    /// Regenerate `file` in place
    pub async fn generate(&self, file: &Path) -> Result<ProgramReport> {
        let path = self.layout.resolve(file);
        let (facts, package) = read_target(&path)?;
        log::info!(
            "Interface {} in {} declares {} methods",
            facts.contract.name,
            self.layout.display_path(&path),
            facts.method_names().len()
        );

        let context = self.build_context(&path, &facts)?;
        let fragments = self.collect_fragments(&facts, &context).await?;

        let artifact = assemble(&package, &facts, &fragments)?;
        let formatted = self.formatter.format(&path, &artifact.text).await?;
        write_atomic(&path, &formatted).await?;
        log::info!("Updated {}", self.layout.display_path(&path));

        Ok(ProgramReport {
            path,
            methods: facts.method_names().to_vec(),
            imports: artifact.imports,
        })
    }
}
