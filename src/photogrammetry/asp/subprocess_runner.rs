//! Runs ASP tools as child processes.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, error};

use crate::photogrammetry::asp::command::{CommandRunner, ToolCall};
use crate::photogrammetry::asp::fs::create_dir;
use crate::photogrammetry::common::error::{PipelineError, Result};

/// Executes tool calls with [`std::process::Command`], waiting for each to exit.
///
/// With a log directory, stdout and stderr go to
/// `<log_directory>/<tool>_<unix millis>.log`; in verbose mode stdout is
/// also echoed to the terminal. Without one, stdout is shown only in verbose
/// mode and stderr is inherited.
pub struct SubprocessRunner {
    verbose: bool,
}

impl SubprocessRunner {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn log_file_path(directory: &Path, tool: &str) -> PathBuf {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        directory.join(format!("{tool}_{millis}.log"))
    }

    /// Copies the tool's stdout to the terminal and the log file as raw bytes.
    fn tee(stdout: ChildStdout, mut log: File) -> io::Result<()> {
        let mut reader = BufReader::new(stdout);
        let mut terminal = io::stdout().lock();
        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                return Ok(());
            }
            terminal.write_all(&line)?;
            log.write_all(&line)?;
        }
    }

    fn failure(call: &ToolCall, status: String, log_file: Option<PathBuf>) -> PipelineError {
        error!("{} failed: {}", call.tool_name(), status);
        PipelineError::SubprocessFailure {
            program: call.tool_name().to_string(),
            status,
            log_file,
        }
    }
}

impl Default for SubprocessRunner {
    fn default() -> Self {
        Self::new(false)
    }
}

impl CommandRunner for SubprocessRunner {
    fn run(&self, call: &ToolCall) -> Result<()> {
        let mut command = Command::new(&call.program);
        command.args(&call.args);

        let log = match &call.log_directory {
            Some(directory) => {
                create_dir(directory)?;
                let path = Self::log_file_path(directory, call.tool_name());
                let file = File::create(&path)?;
                command.stderr(file.try_clone()?);
                if self.verbose {
                    command.stdout(Stdio::piped());
                } else {
                    command.stdout(file.try_clone()?);
                }
                Some((path, file))
            }
            None => {
                if !self.verbose {
                    command.stdout(Stdio::null());
                }
                None
            }
        };
        let log_file = log.as_ref().map(|(path, _)| path.clone());

        debug!("Spawning {}", call);
        let mut child = command
            .spawn()
            .map_err(|e| Self::failure(call, e.to_string(), log_file.clone()))?;

        // The pipe is closed when tee returns, so the child cannot block on a
        // full pipe while it is waited on.
        let copied = match (child.stdout.take(), log) {
            (Some(stdout), Some((_, file))) => Self::tee(stdout, file),
            _ => Ok(()),
        };

        let status = child.wait()?;
        copied?;
        if !status.success() {
            return Err(Self::failure(call, status.to_string(), log_file));
        }

        debug!("{} finished", call.tool_name());
        Ok(())
    }
}
