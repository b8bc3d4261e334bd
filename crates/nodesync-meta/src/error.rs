//! Error types for nodesync-meta

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] nodesync_fs::Error),

    #[error("Invalid value for {setting}: {value}")]
    InvalidSetting { setting: String, value: String },

    #[error("Invalid inventory {code}: {message}")]
    InvalidInventory { code: String, message: String },
}
