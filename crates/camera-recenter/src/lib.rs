//! High-level facade crate for the `camera-recenter` workspace.
//!
//! This crate provides:
//! - re-exports of the geometry in `camera-recenter-core`
//! - adapters between `image::DynamicImage` and the core
//!   buffer types, plus load/save helpers
//! - JSON configuration and report types used by the `camera-recenter` CLI
//!
//! ## Quickstart
//!
//! ```no_run
//! use camera_recenter::{io, recenter_image, PinholeIntrinsics};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let src = io::load_image("frame.png", io::ColorMode::Rgb)?;
//! let k = PinholeIntrinsics::centered(1000.0, src.width, src.height).matrix();
//! let out = recenter_image(&src.view(), 600.0, 400.0, &k, None)?;
//! io::save_image("recentered.png", &out)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `camera_recenter::core`: rotation, intrinsics, homography, image and warp.
//! - `camera_recenter::config`: JSON run configuration and report.
//! - `camera_recenter::io`: decoding and encoding files.
//! - `camera_recenter::logging`: log backend setup for the CLI (`cli` feature).

pub use camera_recenter_core as core;
pub use nalgebra;
pub use camera_recenter_core::{
    recenter_image, recenter_image_with, recentering_homography, rotate_to_align, BorderMode,
    CameraMatrix, Homography, Image, ImageView, PinholeIntrinsics, RecenterError, RecenterParams,
    RecenterResult, Recentering,
};

pub mod config;
mod error;

pub mod io;
#[cfg(feature = "cli")]
pub mod logging;

pub use error::RecenterIoError;
