use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("malformed threat model: {0}")]
    MalformedModel(String),

    #[error("failed to fetch threat model for {platform} from branch '{branch}': HTTP {status}")]
    Fetch {
        platform: String,
        branch: String,
        status: u16,
    },

    #[error("failed to connect to threat model source: {0}")]
    Connection(String),

    #[error("threat model file not found: {0}")]
    ModelNotFound(String),

    #[error("invalid checks file: {0}")]
    InvalidChecksFile(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScoreError>;
