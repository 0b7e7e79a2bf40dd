use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read layouts file {path}: {source}")]
    LayoutsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse layouts file: {0}")]
    LayoutsFileParse(#[from] serde_yaml::Error),

    #[error("layout validation failed: {0}")]
    Validation(String),
}
