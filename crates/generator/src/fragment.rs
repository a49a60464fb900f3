use crate::error::AssemblyError;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Structured oracle response for one method
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MethodResponse {
    #[schemars(description = "The code of the implemented function")]
    pub code: String,

    #[schemars(description = "The import statements of the function")]
    pub import: String,

    #[schemars(description = "The documentation comment before the function")]
    pub doccomment: String,
}

/// One method's generated code, ready for assembly
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationFragment {
    pub method: String,
    pub code: String,
    pub doc_comment: String,
    /// Normalized import specs, e.g. `"fmt"` or `db "example.com/app/db"`
    pub imports: Vec<String>,
}

impl GenerationFragment {
    pub fn from_response(method: &str, response: MethodResponse) -> Result<Self, AssemblyError> {
        let imports = parse_import_block(&response.import).map_err(|reason| {
            AssemblyError::ImportParse {
                method: method.to_string(),
                reason,
            }
        })?;
        Ok(Self {
            method: method.to_string(),
            code: response.code,
            doc_comment: response.doccomment,
            imports,
        })
    }
}

fn import_spec_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r#"^(?:(?P<alias>[A-Za-z_][A-Za-z0-9_]*|\.)\s+)?(?P<path>"[^"\s]+"|`[^`\s]+`)\s*(?://.*)?$"#,
            )
            .ok()
        })
        .as_ref()
}

/// Normalize one import spec: alias and path separated by a single space
fn normalize_spec(line: &str) -> Option<String> {
    let caps = import_spec_pattern()?.captures(line.trim())?;
    let path = &caps["path"];
    Some(match caps.name("alias") {
        Some(alias) => format!("{} {path}", alias.as_str()),
        None => path.to_string(),
    })
}

/// Text after the `import` keyword, when the line starts with the keyword
fn after_import_keyword(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("import")?;
    match rest.chars().next() {
        Some(c) if c.is_whitespace() || matches!(c, '(' | '"' | '`') => Some(rest),
        _ => None,
    }
}

/// Split an import block into individual specs.
///
/// Accepts `import ( ... )` groups, single `import "x"` lines, bare spec
/// lines, or nothing at all. Blank and comment lines are ignored.
pub fn parse_import_block(block: &str) -> Result<Vec<String>, String> {
    let mut specs = Vec::new();
    let mut in_group = false;

    for raw in block.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        if in_group {
            if line == ")" {
                in_group = false;
                continue;
            }
            specs.push(normalize_spec(line).ok_or_else(|| format!("not an import spec: `{line}`"))?);
            continue;
        }

        let Some(rest) = after_import_keyword(line) else {
            specs.push(normalize_spec(line).ok_or_else(|| format!("not an import spec: `{line}`"))?);
            continue;
        };
        let rest = rest.trim();
        if let Some(group) = rest.strip_prefix('(') {
            let group = group.trim();
            if let Some(inline) = group.strip_suffix(')') {
                for part in inline.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                    specs.push(normalize_spec(part).ok_or_else(|| format!("not an import spec: `{part}`"))?);
                }
            } else if group.is_empty() || group.starts_with("//") {
                in_group = true;
            } else {
                in_group = true;
                specs.push(normalize_spec(group).ok_or_else(|| format!("not an import spec: `{group}`"))?);
            }
        } else {
            specs.push(normalize_spec(rest).ok_or_else(|| format!("not an import spec: `{line}`"))?);
        }
    }

    if in_group {
        return Err("unterminated import group".to_string());
    }
    Ok(specs)
}
