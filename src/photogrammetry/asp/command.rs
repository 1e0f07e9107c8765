use std::fmt;
use std::path::{Path, PathBuf};

use crate::photogrammetry::common::error::Result;

/// A fully assembled external tool invocation.
///
/// Arguments are passed to the tool as separate tokens; nothing is re-split
/// or quoted by a shell.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub program: String,
    pub args: Vec<String>,
    /// Directory receiving the tool's stdout/stderr log, if any
    pub log_directory: Option<PathBuf>,
}

impl ToolCall {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            log_directory: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn path(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy())
    }

    pub fn paths<'a>(self, paths: impl IntoIterator<Item = &'a PathBuf>) -> Self {
        self.args(paths.into_iter().map(|p| p.to_string_lossy().into_owned()))
    }

    pub fn log_to(mut self, directory: PathBuf) -> Self {
        self.log_directory = Some(directory);
        self
    }

    /// Name of the tool without any leading directory
    pub fn tool_name(&self) -> &str {
        Path::new(&self.program)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.program)
    }
}

impl fmt::Display for ToolCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

pub trait CommandRunner {
    fn run(&self, call: &ToolCall) -> Result<()>;
}
