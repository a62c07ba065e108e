/// Result alias that carries the custom [`FolioError`] type.
pub type Result<T> = std::result::Result<T, FolioError>;

/// Common error type for the core crate.
///
/// None of these are fatal to the host: visual failures degrade locally and
/// the variants exist so callers can log or surface a readable message.
#[derive(Debug, thiserror::Error)]
pub enum FolioError {
    /// Free-form message for failures that have no dedicated variant.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Project data or configuration could not be parsed.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Navigation or selection referenced an item that does not exist.
    #[error("index {index} is out of range for a gallery of {len} items")]
    IndexOutOfRange { index: usize, len: usize },
    /// Geometry was requested for a gallery without items.
    #[error("gallery has no items")]
    EmptyGallery,
    #[error("duplicate gallery item id `{0}`")]
    DuplicateItem(String),
    #[error("`{0}` is not a #rrggbb colour")]
    InvalidColor(String),
}

impl FolioError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
