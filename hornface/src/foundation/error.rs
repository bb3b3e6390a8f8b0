/// Convenience result type used across Hornface.
pub type HornfaceResult<T> = Result<T, HornfaceError>;

/// Top-level error taxonomy used by compositor APIs.
#[derive(thiserror::Error, Debug)]
pub enum HornfaceError {
    /// A sprite asset could not be read or decoded. Fatal for startup.
    #[error("asset load failure: {0}")]
    AssetLoad(String),

    /// The video source could not be acquired (permission denied or no device). Fatal for startup.
    #[error("camera access failure: {0}")]
    CameraAccess(String),

    /// A detection rectangle with non-positive or non-finite extent.
    #[error("degenerate face rectangle: {0}")]
    DegenerateRect(String),

    /// An asset was queried before the registry finished decoding.
    #[error("asset not ready: {0}")]
    AssetNotReady(String),

    /// Export was requested before any frame was rendered.
    #[error("no frame available for export")]
    NoFrameAvailable,

    /// Invalid user-provided configuration or data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HornfaceError {
    /// Build a [`HornfaceError::AssetLoad`] value.
    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad(msg.into())
    }

    /// Build a [`HornfaceError::CameraAccess`] value.
    pub fn camera_access(msg: impl Into<String>) -> Self {
        Self::CameraAccess(msg.into())
    }

    /// Build a [`HornfaceError::DegenerateRect`] value.
    pub fn degenerate_rect(msg: impl Into<String>) -> Self {
        Self::DegenerateRect(msg.into())
    }

    /// Build a [`HornfaceError::AssetNotReady`] value.
    pub fn asset_not_ready(msg: impl Into<String>) -> Self {
        Self::AssetNotReady(msg.into())
    }

    /// Build a [`HornfaceError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`HornfaceError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error must abort startup rather than being recovered locally.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::AssetLoad(_) | Self::CameraAccess(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
