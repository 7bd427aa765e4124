use std::path::PathBuf;

/// Failures while reading or validating a catalog source.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("content_meta {0}")]
    Meta(String),

    #[error("unknown enum value: {0}")]
    UnknownEnum(String),

    #[error("{0}")]
    Validation(String),
}

/// Engine configuration rejected before a session can start.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("grasp cap {value} outside {min}..={max}")]
    GraspCapOutOfRange { value: u32, min: u32, max: u32 },

    #[error("card rank {0} outside 1..=4")]
    RankOutOfRange(u8),

    #[error("max_awakening_passes must be >= 1")]
    NoAwakeningPasses,
}
