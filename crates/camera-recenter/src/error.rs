use camera_recenter_core::RecenterError;

/// Errors produced by the file-level helpers and the CLI.
#[derive(thiserror::Error, Debug)]
pub enum RecenterIoError {
    #[error("image decode failure: {0}")]
    ImageDecodeFailure(#[source] image::ImageError),

    #[error("image encode failure: {0}")]
    ImageEncodeFailure(#[source] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("cannot encode an image with {channels} channels (expected 1, 2, 3 or 4)")]
    UnsupportedChannels { channels: usize },

    #[error(transparent)]
    Recenter(#[from] RecenterError),
}
