//! Error types for the pipeline

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Output file could not be opened; fatal at startup
    #[error("failed to open output file '{path}': {source}")]
    OpenOutput {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error with context
    #[error("IO error while {operation}: {source}")]
    IoOperation {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Config file parse error
    #[error("config error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Enqueue attempted after the channel was closed
    #[error("hand-off channel is closed")]
    ChannelClosed,

    /// A pipeline thread panicked
    #[error("worker thread '{name}' panicked")]
    WorkerPanicked { name: String },

    /// Sink error (generic)
    #[error("sink error: {0}")]
    SinkError(String),
}

impl PipelineError {
    /// Create an output-open error with the offending path
    pub fn open_output(path: impl Into<String>, source: std::io::Error) -> Self {
        PipelineError::OpenOutput {
            path: path.into(),
            source,
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(operation: impl Into<String>, source: std::io::Error) -> Self {
        PipelineError::IoOperation {
            operation: operation.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a worker panic error
    pub fn worker_panicked(name: impl Into<String>) -> Self {
        PipelineError::WorkerPanicked { name: name.into() }
    }

    /// Create a sink error (generic)
    pub fn sink<S: Into<String>>(msg: S) -> Self {
        PipelineError::SinkError(msg.into())
    }
}
