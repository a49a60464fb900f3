/// Module path, Go version and direct dependencies of a `go.mod` file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoModSummary {
    pub module_line: Option<String>,
    pub go_line: Option<String>,
    pub requires: Vec<String>,
}

const INDIRECT_MARKER: &str = "// indirect";

impl GoModSummary {
    /// Parse `go.mod` text, dropping `// indirect` requirements
    pub fn parse(text: &str) -> Self {
        let mut summary = Self::default();
        let mut in_require = false;

        for line in text.lines().map(str::trim) {
            if in_require {
                if line == ")" {
                    in_require = false;
                } else if !line.is_empty() && !line.contains(INDIRECT_MARKER) {
                    summary.requires.push(line.to_string());
                }
                continue;
            }

            if line.starts_with("module ") {
                summary.module_line = Some(line.to_string());
            } else if line.starts_with("go ") {
                summary.go_line = Some(line.to_string());
            } else if let Some(rest) = line.strip_prefix("require") {
                let rest = rest.trim();
                if rest == "(" {
                    in_require = true;
                } else if !rest.is_empty() && !rest.contains(INDIRECT_MARKER) {
                    summary.requires.push(rest.to_string());
                }
            }
        }

        summary
    }

    /// Module path without the `module` keyword
    pub fn module_path(&self) -> Option<&str> {
        self.module_line
            .as_deref()
            .and_then(|line| line.strip_prefix("module "))
            .map(|path| path.trim().trim_matches('"'))
    }

    /// Render in `go.mod` syntax
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in [&self.module_line, &self.go_line].into_iter().flatten() {
            out.push_str(line);
            out.push_str("\n\n");
        }
        if !self.requires.is_empty() {
            out.push_str("require (\n");
            for dep in &self.requires {
                out.push('\t');
                out.push_str(dep);
                out.push('\n');
            }
            out.push_str(")\n");
        }
        out
    }
}
