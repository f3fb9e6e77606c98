use log::debug;

use super::model::{Grid, RawSpectrum, Spectrum};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Resampling raw measurements onto the shared grid
// ---------------------------------------------------------------------------

/// Resample `raw` onto `grid` by piecewise-linear interpolation.
///
/// Grid points outside the measured domain are `0.0` (no extrapolation).
/// Both the raw wavelengths and the grid ascend, so a single forward scan
/// finds each bracketing interval; the scan index lives only for this call.
/// A grid point that coincides with a measured wavelength takes that value
/// unchanged, which keeps resampling idempotent.
pub fn resample(raw: &RawSpectrum, name: impl Into<String>, grid: Grid) -> Result<Spectrum> {
    let name = name.into();
    let wls = raw.wavelengths();
    let vals = raw.values();
    let (first, last) = raw.domain();

    let mut samples = Vec::with_capacity(grid.len());
    let mut i = 1;

    for wl in grid.wavelengths() {
        if wl < first || wl > last {
            samples.push(0.0);
            continue;
        }
        // wl <= last, so the scan stops inside the table.
        while wl > wls[i] {
            i += 1;
        }
        if wl == wls[i] {
            samples.push(vals[i]);
            continue;
        }
        // RawSpectrum guarantees strictly ascending wavelengths, so dw > 0.
        let dw = wls[i] - wls[i - 1];
        samples.push(vals[i - 1] + (wl - wls[i - 1]) * (vals[i] - vals[i - 1]) / dw);
    }

    debug!(
        "resampled '{name}': {} raw points over {first}..{last} nm onto {grid}",
        raw.len()
    );
    Spectrum::from_samples(name, grid, samples)
}

impl RawSpectrum {
    /// Shorthand for [`resample`].
    pub fn resample(&self, name: impl Into<String>, grid: Grid) -> Result<Spectrum> {
        resample(self, name, grid)
    }
}

impl Spectrum {
    /// Move this spectrum onto `grid`. A matching grid returns an identical copy.
    pub fn resample_to(&self, grid: Grid) -> Result<Spectrum> {
        if grid == self.grid {
            return Ok(self.clone());
        }
        resample(&self.to_raw()?, self.name.clone(), grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn triangle() -> RawSpectrum {
        RawSpectrum::from_pairs([(300.0, 0.0), (400.0, 1.0), (500.0, 0.0)]).unwrap()
    }

    #[test]
    fn test_duplicate_wavelengths_never_reach_interpolation() {
        let dup = RawSpectrum::from_pairs([(400.0, 0.0), (450.0, 0.5), (450.0, 1.0), (500.0, 0.0)]);
        assert!(matches!(dup, Err(crate::error::SpectrumError::MalformedInput(_))));

        let steep = RawSpectrum::from_pairs([(449.0, 0.0), (450.0, 1.0), (451.0, 0.0)]).unwrap();
        let sp = resample(&steep, "steep", Grid::default()).unwrap();
        assert!(sp.samples().iter().all(|v| v.is_finite()));
        assert_eq!(sp.at(450.0), Some(1.0));
    }

    #[test]
    fn test_triangle_peak_and_ramp() {
        let grid = Grid::new(300.0, 500.0, 2.0).unwrap();
        let sp = resample(&triangle(), "triangle", grid).unwrap();

        assert_eq!(sp.len(), 101);
        assert_eq!(sp.at(300.0), Some(0.0));
        assert_eq!(sp.at(400.0), Some(1.0));
        assert_eq!(sp.at(500.0), Some(0.0));
        assert_relative_eq!(sp.at(350.0).unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(sp.at(450.0).unwrap(), 0.5, epsilon = 1e-12);
        assert_relative_eq!(sp.at(302.0).unwrap(), 0.02, epsilon = 1e-12);
        assert_eq!(sp.peak_wavelength().unwrap(), 400.0);
    }

    #[test]
    fn test_output_always_on_configured_grid() {
        let grid = Grid::default();
        let narrow = RawSpectrum::from_pairs([(510.0, 0.3), (512.5, 0.4)]).unwrap();
        let wide = RawSpectrum::from_pairs([(100.0, 0.3), (900.0, 0.4)]).unwrap();
        let dense = RawSpectrum::from_pairs((0..2000).map(|i| (250.0 + i as f64 * 0.3, 0.5))).unwrap();

        for raw in [narrow, wide, dense] {
            let sp = raw.resample("x", grid).unwrap();
            assert_eq!(sp.grid(), grid);
            assert_eq!(sp.len(), grid.len());
        }
    }

    #[test]
    fn test_zero_outside_measured_domain() {
        let grid = Grid::default();
        let raw = RawSpectrum::from_pairs([(451.0, 0.7), (455.0, 0.9), (601.0, 0.8)]).unwrap();
        let sp = raw.resample("band", grid).unwrap();

        for (wl, v) in grid.wavelengths().zip(sp.samples()) {
            if wl < 451.0 || wl > 601.0 {
                assert_eq!(*v, 0.0, "expected zero at {wl}");
            } else {
                assert!(*v > 0.0, "expected signal at {wl}");
            }
        }
    }

    #[test]
    fn test_interpolates_between_irregular_points() {
        let grid = Grid::new(300.0, 310.0, 2.0).unwrap();
        let raw = RawSpectrum::from_pairs([(299.0, 0.0), (303.0, 0.4), (309.5, 1.0), (320.0, 1.0)])
            .unwrap();
        let sp = raw.resample("irregular", grid).unwrap();

        let expected = [0.1, 0.3, 0.4 + 1.0 * 0.6 / 6.5, 0.4 + 3.0 * 0.6 / 6.5, 0.4 + 5.0 * 0.6 / 6.5, 1.0];
        for (got, want) in sp.samples().iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_resampling_is_idempotent() {
        let grid = Grid::default();
        let raw = RawSpectrum::from_pairs([(333.3, 0.12), (471.7, 0.93), (512.0, 0.4), (777.7, 0.05)])
            .unwrap();
        let once = raw.resample("dye", grid).unwrap();
        let twice = once.to_raw().unwrap().resample("dye", grid).unwrap();
        assert_eq!(once.samples(), twice.samples());
        assert_eq!(once.resample_to(grid).unwrap(), once);
    }

    #[test]
    fn test_resample_to_other_grid() {
        let sp = triangle()
            .resample("triangle", Grid::new(300.0, 500.0, 2.0).unwrap())
            .unwrap();
        let coarse = sp.resample_to(Grid::new(300.0, 800.0, 10.0).unwrap()).unwrap();
        assert_eq!(coarse.len(), 51);
        assert_eq!(coarse.at(400.0), Some(1.0));
        assert_eq!(coarse.at(600.0), Some(0.0));
    }

    #[test]
    fn test_scan_state_not_shared_between_calls() {
        let grid = Grid::default();
        let late = RawSpectrum::from_pairs([(700.0, 1.0), (750.0, 1.0)]).unwrap();
        let early = RawSpectrum::from_pairs([(300.0, 1.0), (310.0, 0.0)]).unwrap();

        let first = early.resample("early", grid).unwrap();
        let _ = late.resample("late", grid).unwrap();
        let again = early.resample("early", grid).unwrap();
        assert_eq!(first, again);
    }
}
