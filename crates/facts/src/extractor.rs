use crate::error::{ExtractionError, Result};
use crate::source::{DeclarationKind, GoParser, GoSource, TypeSpecKind};
use crate::types::{ConformanceAssertion, ImplementationBinding, InterfaceContract, SourceFacts};
use std::path::Path;
use tree_sitter::Node;

/// Outcome of the interface search.
///
/// Only the first interface-kind type declaration in file order is ever
/// reported; later interfaces in the same file are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceLookup {
    Found(InterfaceContract),
    NotFound,
}

/// Read, parse and extract facts from a file on disk
pub fn extract_source_facts(path: impl AsRef<Path>) -> Result<SourceFacts> {
    let mut parser = GoParser::new()?;
    let source = parser.parse_file(path)?;
    SourceFacts::from_source(&source)
}

impl SourceFacts {
    /// Extract the interface contract, its implementation struct and the
    /// conformance assertion from a parsed file
    pub fn from_source(source: &GoSource) -> Result<Self> {
        let contract = match find_first_interface(source) {
            InterfaceLookup::Found(contract) => contract,
            InterfaceLookup::NotFound => {
                return Err(ExtractionError::NoInterfaceFound(source.path().to_path_buf()))
            }
        };

        let binding = find_implementation(source, &contract.name).ok_or_else(|| {
            ExtractionError::ImplNotFound {
                path: source.path().to_path_buf(),
                struct_name: contract.implementation_name(),
            }
        })?;

        let assertion = find_conformance_assertion(source, &contract.name, &binding.struct_name)
            .ok_or_else(|| ExtractionError::AssertionNotFound {
                path: source.path().to_path_buf(),
                interface: contract.name.clone(),
                implementation: binding.struct_name.clone(),
            })?;

        log::debug!(
            "Extracted interface {} ({} methods) from {}",
            contract.name,
            contract.methods.len(),
            source.path().display()
        );

        Ok(Self {
            contract,
            binding,
            assertion,
        })
    }
}

/// Find the first interface declared in the file
pub fn find_first_interface(source: &GoSource) -> InterfaceLookup {
    for decl in source.declarations() {
        let Some(spec) = source
            .type_specs(&decl)
            .into_iter()
            .find(|spec| spec.kind == TypeSpecKind::Interface)
        else {
            continue;
        };

        let methods = spec
            .node
            .child_by_field_name("type")
            .map(|body| interface_method_names(source, body))
            .unwrap_or_default();

        return InterfaceLookup::Found(InterfaceContract {
            name: spec.name.to_string(),
            methods,
            text: source.print(decl.node),
        });
    }
    InterfaceLookup::NotFound
}

/// Method names of an `interface_type` node; embedded types contribute nothing
fn interface_method_names(source: &GoSource, body: Node<'_>) -> Vec<String> {
    let mut cursor = body.walk();
    let members: Vec<_> = body.named_children(&mut cursor).collect();
    members
        .into_iter()
        // Older grammars call this node `method_spec`
        .filter(|member| matches!(member.kind(), "method_elem" | "method_spec"))
        .filter_map(|member| member.child_by_field_name("name"))
        .map(|name| source.node_text(name).to_string())
        .collect()
}

/// Find the struct-kind declaration named `<interface>Impl`
pub fn find_implementation(source: &GoSource, interface_name: &str) -> Option<ImplementationBinding> {
    let struct_name = format!("{interface_name}Impl");
    source.declarations().into_iter().find_map(|decl| {
        source
            .type_specs(&decl)
            .into_iter()
            .any(|spec| spec.name == struct_name && spec.kind == TypeSpecKind::Struct)
            .then(|| ImplementationBinding {
                struct_name: struct_name.clone(),
                text: source.print(decl.node),
            })
    })
}

/// Find `var _ <interface> = <implementation>{...}`
pub fn find_conformance_assertion(
    source: &GoSource,
    interface_name: &str,
    struct_name: &str,
) -> Option<ConformanceAssertion> {
    source
        .declarations()
        .into_iter()
        .filter(|decl| decl.kind == DeclarationKind::Var)
        .find(|decl| {
            source
                .var_specs(decl)
                .into_iter()
                .any(|spec| is_assertion_spec(source, spec, interface_name, struct_name))
        })
        .map(|decl| ConformanceAssertion {
            interface_name: interface_name.to_string(),
            struct_name: struct_name.to_string(),
            text: source.print(decl.node),
        })
}

fn is_assertion_spec(source: &GoSource, spec: Node<'_>, interface_name: &str, struct_name: &str) -> bool {
    let declared_type = spec.child_by_field_name("type");
    let type_matches = declared_type.is_some_and(|ty| {
        ty.kind() == "type_identifier" && source.node_text(ty) == interface_name
    });
    if !type_matches {
        return false;
    }

    let mut cursor = spec.walk();
    let names: Vec<_> = spec.children_by_field_name("name", &mut cursor).collect();
    let Some(blank_idx) = names.iter().position(|name| source.node_text(*name) == "_") else {
        return false;
    };

    let Some(values) = spec.child_by_field_name("value") else {
        return false;
    };
    let mut value_cursor = values.walk();
    let Some(value) = values.named_children(&mut value_cursor).nth(blank_idx) else {
        return false;
    };

    value.kind() == "composite_literal"
        && value.child_by_field_name("type").is_some_and(|ty| {
            ty.kind() == "type_identifier" && source.node_text(ty) == struct_name
        })
}
