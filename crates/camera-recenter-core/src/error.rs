/// Errors returned by the re-centering routines.
///
/// Every variant except [`RecenterError::SingularHomography`], which only
/// [`warp_perspective`](crate::warp_perspective) returns, can come out of the
/// re-centering entry points. Every variant is detected before any pixel is touched; no partial
/// results are produced.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RecenterError {
    #[error("invalid intrinsics matrix: {reason}")]
    InvalidIntrinsics { reason: &'static str },

    #[error("cannot align a zero-length or non-finite vector")]
    InvalidVector,

    #[error("invalid output size (width={width}, height={height})")]
    InvalidOutputSize { width: usize, height: usize },

    #[error("homography is singular")]
    SingularHomography,

    #[error("invalid image buffer: {reason}")]
    InvalidImage { reason: String },
}
