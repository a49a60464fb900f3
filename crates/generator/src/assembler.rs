use crate::error::AssemblyError;
use crate::fragment::GenerationFragment;
use infragen_facts::SourceFacts;
use std::collections::{BTreeSet, HashMap};

/// The merged source text plus the import set it was built with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledArtifact {
    pub text: String,
    pub imports: Vec<String>,
}

/// Union of all fragment imports, trimmed, deduplicated and sorted
pub fn merge_imports<'a>(fragments: impl IntoIterator<Item = &'a GenerationFragment>) -> Vec<String> {
    fragments
        .into_iter()
        .flat_map(|fragment| fragment.imports.iter())
        .map(|spec| spec.trim())
        .filter(|spec| !spec.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Grouped import block, or an empty string when there is nothing to import
pub fn render_import_block(imports: &[String]) -> String {
    if imports.is_empty() {
        return String::new();
    }
    let mut block = String::from("import (\n");
    for spec in imports {
        block.push('\t');
        block.push_str(spec);
        block.push('\n');
    }
    block.push(')');
    block
}

/// Put fragments into interface method order.
///
/// Every method needs exactly one fragment; fragments for unknown methods
/// are rejected.
fn order_fragments<'a>(
    facts: &SourceFacts,
    fragments: &'a [GenerationFragment],
) -> Result<Vec<&'a GenerationFragment>, AssemblyError> {
    let mut by_method: HashMap<&str, &GenerationFragment> = HashMap::with_capacity(fragments.len());
    for fragment in fragments {
        if facts.contract.method_position(&fragment.method).is_none()
            || by_method.insert(fragment.method.as_str(), fragment).is_some()
        {
            return Err(AssemblyError::UnexpectedFragment(fragment.method.clone()));
        }
    }

    facts
        .method_names()
        .iter()
        .map(|method| {
            by_method
                .get(method.as_str())
                .copied()
                .ok_or_else(|| AssemblyError::MissingFragment(method.clone()))
        })
        .collect()
}

/// Build the full source file from extracted facts and generated fragments
pub fn assemble(
    package: &str,
    facts: &SourceFacts,
    fragments: &[GenerationFragment],
) -> Result<AssembledArtifact, AssemblyError> {
    let ordered = order_fragments(facts, fragments)?;
    let imports = merge_imports(ordered.iter().copied());

    let mut sections = vec![format!("package {package}")];
    let import_block = render_import_block(&imports);
    if !import_block.is_empty() {
        sections.push(import_block);
    }
    sections.push(facts.contract.text.clone());
    // A grouped `type ( ... )` declaration already carries the struct
    if facts.binding.text != facts.contract.text {
        sections.push(facts.binding.text.clone());
    }
    sections.push(facts.assertion.text.clone());

    for fragment in ordered {
        let code = fragment.code.trim_end();
        let doc = fragment.doc_comment.trim_end();
        if doc.trim().is_empty() {
            sections.push(code.to_string());
        } else {
            sections.push(format!("{doc}\n{code}"));
        }
    }

    let mut text = sections.join("\n\n");
    text.push('\n');
    Ok(AssembledArtifact { text, imports })
}

#[cfg(test)]
mod tests {
    use super::*;
    use infragen_facts::{ConformanceAssertion, ImplementationBinding, InterfaceContract};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn fragment(method: &str, imports: &[&str]) -> GenerationFragment {
        GenerationFragment {
            method: method.to_string(),
            code: format!("func (s *StoreImpl) {method}() {{}}"),
            doc_comment: String::new(),
            imports: imports.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn store_facts() -> SourceFacts {
        SourceFacts {
            contract: InterfaceContract {
                name: "Store".to_string(),
                methods: vec!["Get".to_string(), "Put".to_string()],
                text: "type Store interface {\n\tGet()\n\tPut()\n}".to_string(),
            },
            binding: ImplementationBinding {
                struct_name: "StoreImpl".to_string(),
                text: "type StoreImpl struct{}".to_string(),
            },
            assertion: ConformanceAssertion {
                interface_name: "Store".to_string(),
                struct_name: "StoreImpl".to_string(),
                text: "var _ Store = StoreImpl{}".to_string(),
            },
        }
    }

    #[test]
    fn imports_are_deduplicated_and_sorted() {
        let merged = merge_imports(&[fragment("Get", &["b", " a "]), fragment("Put", &["c", "b"])]);
        assert_eq!(merged, vec!["a", "b", "c"]);
    }

    #[test]
    fn assembles_in_method_order() {
        let mut put = fragment("Put", &["\"time\""]);
        put.doc_comment = "// Put stores".to_string();
        let get = fragment("Get", &["\"fmt\""]);

        let artifact = assemble("infra", &store_facts(), &[put, get]).unwrap();
        assert_eq!(
            artifact.text,
            "package infra\n\n\
             import (\n\t\"fmt\"\n\t\"time\"\n)\n\n\
             type Store interface {\n\tGet()\n\tPut()\n}\n\n\
             type StoreImpl struct{}\n\n\
             var _ Store = StoreImpl{}\n\n\
             func (s *StoreImpl) Get() {}\n\n\
             // Put stores\nfunc (s *StoreImpl) Put() {}\n"
        );
    }

    #[test]
    fn grouped_type_declaration_is_emitted_once() {
        let mut facts = store_facts();
        let group = "type (\n\tStore interface {\n\t\tGet()\n\t\tPut()\n\t}\n\tStoreImpl struct{}\n)".to_string();
        facts.contract.text = group.clone();
        facts.binding.text = group.clone();

        let artifact = assemble("infra", &facts, &[fragment("Get", &[]), fragment("Put", &[])]).unwrap();
        assert_eq!(artifact.text.matches("StoreImpl struct{}").count(), 1);
        assert!(artifact.text.contains(&format!("{group}\n\nvar _ Store = StoreImpl{{}}")));
    }

    #[test]
    fn omits_empty_import_block() {
        let artifact = assemble("infra", &store_facts(), &[fragment("Get", &[]), fragment("Put", &[])]).unwrap();
        assert!(!artifact.text.contains("import"));
        assert!(artifact.imports.is_empty());
    }

    #[test]
    fn rejects_missing_and_unexpected_fragments() {
        let facts = store_facts();
        assert!(matches!(
            assemble("infra", &facts, &[fragment("Get", &[])]),
            Err(AssemblyError::MissingFragment(m)) if m == "Put"
        ));
        assert!(matches!(
            assemble("infra", &facts, &[fragment("Get", &[]), fragment("Get", &[]), fragment("Put", &[])]),
            Err(AssemblyError::UnexpectedFragment(m)) if m == "Get"
        ));
        assert!(matches!(
            assemble("infra", &facts, &[fragment("Get", &[]), fragment("Put", &[]), fragment("Drop", &[])]),
            Err(AssemblyError::UnexpectedFragment(m)) if m == "Drop"
        ));
    }

    fn import_lists() -> impl Strategy<Value = Vec<Vec<String>>> {
        let spec = prop::sample::select(vec!["\"fmt\"", "\"time\"", "\"context\"", "db \"app/db\"", "\"errors\""]);
        prop::collection::vec(prop::collection::vec(spec.prop_map(str::to_string), 0..4), 0..6)
    }

    proptest! {
        #[test]
        fn merge_is_commutative_and_idempotent(lists in import_lists()) {
            let fragments: Vec<_> = lists
                .iter()
                .enumerate()
                .map(|(i, imports)| GenerationFragment {
                    method: format!("M{i}"),
                    code: String::new(),
                    doc_comment: String::new(),
                    imports: imports.clone(),
                })
                .collect();

            let forward = merge_imports(&fragments);
            let backward = merge_imports(fragments.iter().rev());
            prop_assert_eq!(&forward, &backward);

            let again = merge_imports(&[GenerationFragment {
                method: "all".to_string(),
                code: String::new(),
                doc_comment: String::new(),
                imports: forward.clone(),
            }]);
            prop_assert_eq!(&forward, &again);

            let mut sorted = forward.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(forward, sorted);
        }
    }
}
