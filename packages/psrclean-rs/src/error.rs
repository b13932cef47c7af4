use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Input file not found: {0}")]
    FileNotFound(String),

    #[error(
        "Malformed sample file {path}: {byte_len} bytes is not a multiple of the {element_size}-byte sample size"
    )]
    MalformedInput {
        path: String,
        byte_len: u64,
        element_size: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Output {output} for {input} is already claimed by {claimed_by} in this batch")]
    OutputCollision {
        input: String,
        output: String,
        claimed_by: String,
    },

    #[error("Failed to create worker pool: {0}")]
    WorkerPool(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CleanError>;
