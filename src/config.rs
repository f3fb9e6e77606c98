use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::Grid;

/// Wavelength grid settings, fixed for the lifetime of a session.
///
/// ```json
/// { "wl_min": 300.0, "wl_max": 800.0, "wl_step": 2.0 }
/// ```
/// Missing fields take the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub wl_min: f64,
    pub wl_max: f64,
    pub wl_step: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            wl_min: Grid::DEFAULT_MIN,
            wl_max: Grid::DEFAULT_MAX,
            wl_step: Grid::DEFAULT_STEP,
        }
    }
}

impl GridConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Replace any field given on the command line.
    pub fn with_overrides(
        mut self,
        wl_min: Option<f64>,
        wl_max: Option<f64>,
        wl_step: Option<f64>,
    ) -> Self {
        if let Some(v) = wl_min {
            self.wl_min = v;
        }
        if let Some(v) = wl_max {
            self.wl_max = v;
        }
        if let Some(v) = wl_step {
            self.wl_step = v;
        }
        self
    }

    /// Validated grid for these settings.
    pub fn grid(&self) -> Result<Grid> {
        Grid::new(self.wl_min, self.wl_max, self.wl_step).context("invalid grid configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = GridConfig::default();
        assert_eq!(cfg.grid().unwrap(), Grid::default());
    }

    #[test]
    fn test_partial_json_and_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.json");
        std::fs::write(&path, r#"{ "wl_step": 5.0 }"#).unwrap();

        let cfg = GridConfig::load(&path).unwrap();
        assert_eq!(cfg.wl_min, 300.0);
        assert_eq!(cfg.wl_step, 5.0);
        assert_eq!(cfg.grid().unwrap().len(), 101);

        let cfg = cfg.with_overrides(Some(400.0), None, Some(1.0));
        assert_eq!(cfg.grid().unwrap().len(), 401);
    }

    #[test]
    fn test_invalid_grid_reported() {
        let cfg = GridConfig::default().with_overrides(None, None, Some(3.0));
        assert!(cfg.grid().is_err());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(GridConfig::load(&path).is_err());
    }
}
