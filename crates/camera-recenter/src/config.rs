//! JSON configuration and report helpers for re-centering runs.

use crate::RecenterIoError;
use camera_recenter_core::{BorderMode, PinholeIntrinsics, RecenterParams, Recentering};
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Focal length (pixels) assumed when a config carries no intrinsics.
pub const DEFAULT_FOCAL_PX: f64 = 1000.0;

/// Configuration for one re-centering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecenterConfig {
    /// Path to the input image.
    pub image_path: String,
    /// Source pixel `[x, y]` that becomes the new image center.
    pub target: [f64; 2],
    /// Source intrinsics. Defaults to `DEFAULT_FOCAL_PX` with the principal
    /// point at the image center.
    #[serde(default)]
    pub intrinsics: Option<PinholeIntrinsics>,
    /// Output `[width, height]`; defaults to the input size.
    #[serde(default)]
    pub output_size: Option<[usize; 2]>,
    #[serde(default)]
    pub border: BorderMode,
    /// Where to write the re-centered image.
    #[serde(default)]
    pub output_path: Option<String>,
    /// Where to write the JSON report, if anywhere.
    #[serde(default)]
    pub report_path: Option<String>,
}

impl RecenterConfig {
    pub fn new(image_path: impl Into<String>, target_x: f64, target_y: f64) -> Self {
        Self {
            image_path: image_path.into(),
            target: [target_x, target_y],
            intrinsics: None,
            output_size: None,
            border: BorderMode::default(),
            output_path: None,
            report_path: None,
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, RecenterIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), RecenterIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output image path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("recentered.png"))
    }

    /// Intrinsics for a source of the given size.
    pub fn intrinsics_for(&self, width: usize, height: usize) -> PinholeIntrinsics {
        self.intrinsics
            .unwrap_or_else(|| PinholeIntrinsics::centered(DEFAULT_FOCAL_PX, width, height))
    }

    /// Build core parameters for a source of the given size.
    pub fn build_params(&self, width: usize, height: usize) -> RecenterParams {
        let k = self.intrinsics_for(width, height);
        let mut params =
            RecenterParams::new(self.target[0], self.target[1], k.matrix()).with_border(self.border);
        if let Some([w, h]) = self.output_size {
            params = params.with_output_size(w, h);
        }
        params
    }
}

/// Summary of a run, written next to the output image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecenterReport {
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub output_path: Option<String>,
    pub input_size: [usize; 2],
    pub output_size: [usize; 2],
    pub target: [f64; 2],
    pub intrinsics: PinholeIntrinsics,
    pub new_intrinsics: PinholeIntrinsics,
    /// Row-major rotation matrix.
    pub rotation: [[f64; 3]; 3],
    /// Row-major homography, source pixels to output pixels.
    pub homography: [[f64; 3]; 3],
    /// Source location sampled by the output principal point.
    pub center_source: Option<[f64; 2]>,
}

impl RecenterReport {
    pub fn new(
        input_size: [usize; 2],
        params: &RecenterParams,
        geometry: &Recentering,
    ) -> Self {
        let (cx, cy) = geometry.output_center();
        Self {
            image_path: None,
            output_path: None,
            input_size,
            output_size: [geometry.output_width, geometry.output_height],
            target: params.target,
            intrinsics: PinholeIntrinsics::from_matrix(&params.intrinsics),
            new_intrinsics: geometry.new_intrinsics,
            rotation: rows(&geometry.rotation),
            homography: geometry.h_out_from_src.to_array(),
            center_source: geometry.source_of(cx, cy).map(|(x, y)| [x, y]),
        }
    }

    pub fn with_paths(mut self, image_path: Option<String>, output_path: Option<String>) -> Self {
        self.image_path = image_path;
        self.output_path = output_path;
        self
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), RecenterIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, RecenterIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

fn rows(m: &Matrix3<f64>) -> [[f64; 3]; 3] {
    std::array::from_fn(|r| std::array::from_fn(|c| m[(r, c)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use camera_recenter_core::recentering_homography;

    #[test]
    fn minimal_json_uses_defaults() {
        let cfg: RecenterConfig =
            serde_json::from_str(r#"{ "image_path": "a.png", "target": [600, 400] }"#).unwrap();
        assert_eq!(cfg.border, BorderMode::Constant(0));
        assert_eq!(cfg.output_path(), PathBuf::from("recentered.png"));
        assert_eq!(
            cfg.intrinsics_for(800, 600),
            PinholeIntrinsics::new(1000.0, 1000.0, 400.0, 300.0)
        );
        let params = cfg.build_params(800, 600);
        assert_eq!(params.output_size, None);
        assert_eq!(params.target, [600.0, 400.0]);
    }

    #[test]
    fn overrides_reach_params() {
        let cfg: RecenterConfig = serde_json::from_str(
            r#"{
                "image_path": "a.png",
                "target": [10.5, 20.0],
                "intrinsics": { "fx": 500, "fy": 510, "cx": 50, "cy": 40 },
                "output_size": [64, 48],
                "border": "replicate"
            }"#,
        )
        .unwrap();
        let params = cfg.build_params(100, 80);
        assert_eq!(params.output_size, Some((64, 48)));
        assert_eq!(params.border, BorderMode::Replicate);
        assert_eq!(params.intrinsics[(1, 1)], 510.0);
    }

    #[test]
    fn config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        let mut cfg = RecenterConfig::new("in.png", 1.0, 2.0);
        cfg.output_path = Some("out.png".to_string());
        cfg.border = BorderMode::Constant(128);
        cfg.write_json(&path).unwrap();
        assert_eq!(RecenterConfig::load_json(&path).unwrap(), cfg);
    }

    #[test]
    fn missing_config_is_io_error() {
        let err = RecenterConfig::load_json("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, RecenterIoError::Io(_)));
    }

    #[test]
    fn report_records_center_source() {
        let cfg = RecenterConfig::new("in.png", 600.0, 400.0);
        let params = cfg.build_params(800, 600);
        let g = recentering_homography(600.0, 400.0, &params.intrinsics, 800, 600).unwrap();
        let report = RecenterReport::new([800, 600], &params, &g);
        let [x, y] = report.center_source.unwrap();
        assert_relative_eq!(x, 600.0, epsilon = 1e-9);
        assert_relative_eq!(y, 400.0, epsilon = 1e-9);
        assert_eq!(report.output_size, [800, 600]);
        assert_eq!(report.new_intrinsics.cx, 400.0);
        assert_eq!(report.rotation[0][2], g.rotation[(0, 2)]);
        assert_eq!(report.rotation[2][0], g.rotation[(2, 0)]);
        assert_eq!(report.homography, g.h_out_from_src.to_array());
    }
}
