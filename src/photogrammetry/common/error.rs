use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Missing input: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("{program} failed with {status}{}", log_hint(.log_file))]
    SubprocessFailure {
        program: String,
        status: String,
        log_file: Option<PathBuf>,
    },

    #[error("Unexpected file name format: {0}")]
    FormatError(String),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Failed to read raster: {0}")]
    RasterReadError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

fn log_hint(log_file: &Option<PathBuf>) -> String {
    match log_file {
        Some(path) => format!(" (see {})", path.display()),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
