use crate::config::FormatSettings;
use crate::error::AssemblyError;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Final cosmetic pass over an assembled file.
///
/// `path` is the file the text will be written to; formatters may use it to
/// resolve imports relative to the package.
#[async_trait]
pub trait Formatter: Send + Sync {
    async fn format(&self, path: &Path, source: &str) -> Result<String, AssemblyError>;
}

/// Returns the input unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughFormatter;

#[async_trait]
impl Formatter for PassthroughFormatter {
    async fn format(&self, _path: &Path, source: &str) -> Result<String, AssemblyError> {
        Ok(source.to_string())
    }
}

/// Pipes source through an external program (stdin to stdout)
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
}

impl CommandFormatter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build the formatter described by configuration; `None` when disabled
    pub fn from_settings(settings: &FormatSettings) -> Option<Self> {
        let program = settings.command.trim();
        if program.is_empty() {
            return None;
        }
        Some(Self::new(program, settings.args.clone()))
    }

    fn expand_args(&self, path: &Path) -> Vec<String> {
        let file = path.to_string_lossy();
        self.args.iter().map(|arg| arg.replace("{file}", &file)).collect()
    }
}

#[async_trait]
impl Formatter for CommandFormatter {
    async fn format(&self, path: &Path, source: &str) -> Result<String, AssemblyError> {
        let args = self.expand_args(path);
        log::debug!("Running formatter: {} {}", self.program, args.join(" "));

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AssemblyError::Formatter(format!("failed to start {}: {e}", self.program)))?;

        // Feed stdin while the output is drained
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AssemblyError::Formatter("formatter stdin unavailable".to_string()))?;
        let input = source.as_bytes().to_vec();
        let writer = tokio::spawn(async move {
            let result = stdin.write_all(&input).await;
            drop(stdin);
            result
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| AssemblyError::Formatter(format!("{} did not finish: {e}", self.program)))?;
        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(AssemblyError::Formatter(format!("failed to feed {}: {e}", self.program)))
            }
            Err(e) => return Err(AssemblyError::Formatter(format!("stdin task failed: {e}"))),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AssemblyError::Formatter(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| AssemblyError::Formatter(format!("{} produced non-UTF-8 output: {e}", self.program)))
    }
}
