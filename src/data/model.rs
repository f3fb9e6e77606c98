use std::fmt;

use crate::error::{Result, SpectrumError};

// ---------------------------------------------------------------------------
// Grid – the shared wavelength axis
// ---------------------------------------------------------------------------

/// Uniformly spaced wavelength axis, `min..=max` in steps of `step` (nm).
///
/// Every resampled [`Spectrum`] in a session carries the same `Grid`, which is
/// what lets two spectra be multiplied index by index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    min: f64,
    max: f64,
    step: f64,
    len: usize,
}

impl Grid {
    pub const DEFAULT_MIN: f64 = 300.0;
    pub const DEFAULT_MAX: f64 = 800.0;
    pub const DEFAULT_STEP: f64 = 2.0;
    /// Upper bound on the number of grid points a caller may request.
    pub const MAX_POINTS: usize = 1_000_000;

    /// Build a grid, checking that `step` divides `max - min` exactly.
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self> {
        if !(min.is_finite() && max.is_finite() && step.is_finite()) {
            return Err(SpectrumError::InvalidGrid(format!(
                "non-finite bounds ({min}, {max}, {step})"
            )));
        }
        if step <= 0.0 {
            return Err(SpectrumError::InvalidGrid(format!("step {step} must be positive")));
        }
        if max <= min {
            return Err(SpectrumError::InvalidGrid(format!(
                "max {max} must be greater than min {min}"
            )));
        }
        let intervals = (max - min) / step;
        let rounded = intervals.round();
        if (intervals - rounded).abs() > 1e-9 {
            return Err(SpectrumError::InvalidGrid(format!(
                "step {step} does not divide {min}..{max} evenly"
            )));
        }
        if rounded >= Self::MAX_POINTS as f64 {
            return Err(SpectrumError::InvalidGrid(format!(
                "step {step} over {min}..{max} gives more than {} points",
                Self::MAX_POINTS
            )));
        }
        Ok(Grid {
            min,
            max,
            step,
            len: rounded as usize + 1,
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of grid points, `1 + (max - min) / step`.
    pub fn len(&self) -> usize {
        self.len
    }

    /// A validated grid always has at least two points.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Wavelength at index `i`, `min + i * step`. The last index is `max` exactly.
    pub fn wavelength(&self, i: usize) -> f64 {
        if i + 1 == self.len {
            self.max
        } else {
            self.min + i as f64 * self.step
        }
    }

    pub fn wavelengths(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len).map(move |i| self.wavelength(i))
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid {
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
            step: Self::DEFAULT_STEP,
            len: ((Self::DEFAULT_MAX - Self::DEFAULT_MIN) / Self::DEFAULT_STEP) as usize + 1,
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..={} nm step {} ({} points)",
            self.min, self.max, self.step, self.len
        )
    }
}

// ---------------------------------------------------------------------------
// RawSpectrum – measured pairs as delivered by a source
// ---------------------------------------------------------------------------

/// Irregularly sampled measurement: strictly ascending wavelengths with one
/// value each. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSpectrum {
    wavelengths: Vec<f64>,
    values: Vec<f64>,
}

impl RawSpectrum {
    /// Validate and wrap a wavelength/value table.
    ///
    /// Fails with [`SpectrumError::MalformedInput`] when the columns differ in
    /// length, hold fewer than two points, contain non-finite numbers, or the
    /// wavelengths are not strictly ascending.
    pub fn new(wavelengths: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        if wavelengths.len() != values.len() {
            return Err(SpectrumError::MalformedInput(format!(
                "{} wavelengths but {} values",
                wavelengths.len(),
                values.len()
            )));
        }
        if wavelengths.len() < 2 {
            return Err(SpectrumError::MalformedInput(format!(
                "need at least 2 points, got {}",
                wavelengths.len()
            )));
        }
        if let Some(bad) = wavelengths
            .iter()
            .chain(values.iter())
            .find(|v| !v.is_finite())
        {
            return Err(SpectrumError::MalformedInput(format!("non-finite number {bad}")));
        }
        if let Some(i) = (1..wavelengths.len()).find(|&i| wavelengths[i] <= wavelengths[i - 1]) {
            return Err(SpectrumError::MalformedInput(format!(
                "wavelength {} at index {i} does not follow {}",
                wavelengths[i],
                wavelengths[i - 1]
            )));
        }
        Ok(RawSpectrum {
            wavelengths,
            values,
        })
    }

    /// Build from `(wavelength, value)` pairs in order.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let (wavelengths, values) = pairs.into_iter().unzip();
        Self::new(wavelengths, values)
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    /// Measured domain `(first, last)` wavelength.
    pub fn domain(&self) -> (f64, f64) {
        (self.wavelengths[0], self.wavelengths[self.wavelengths.len() - 1])
    }
}

// ---------------------------------------------------------------------------
// Spectrum – resampled onto a Grid
// ---------------------------------------------------------------------------

/// Intensities sampled on a fixed [`Grid`], keyed by `name`.
///
/// Only canonical samples are stored; the point series and the peak are
/// derived on demand (see `analysis`). Samples change only through
/// [`Spectrum::multiply`].
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    pub(crate) name: String,
    pub(crate) grid: Grid,
    pub(crate) samples: Vec<f64>,
}

impl Spectrum {
    /// Wrap samples that were already computed on `grid`.
    pub fn from_samples(name: impl Into<String>, grid: Grid, samples: Vec<f64>) -> Result<Self> {
        if samples.len() != grid.len() {
            return Err(SpectrumError::GridMismatch {
                expected: grid.to_string(),
                found: format!("{} samples", samples.len()),
            });
        }
        Ok(Spectrum {
            name: name.into(),
            grid,
            samples,
        })
    }

    /// Spectrum with every sample set to `value`.
    pub fn filled(name: impl Into<String>, grid: Grid, value: f64) -> Self {
        Spectrum {
            name: name.into(),
            grid,
            samples: vec![value; grid.len()],
        }
    }

    /// All-zero spectrum, the result of resampling a source with no usable data.
    pub fn zeros(name: impl Into<String>, grid: Grid) -> Self {
        Self::filled(name, grid, 0.0)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at the grid point closest to `wavelength`, or `None` outside the grid.
    pub fn at(&self, wavelength: f64) -> Option<f64> {
        if !(self.grid.min()..=self.grid.max()).contains(&wavelength) {
            return None;
        }
        let idx = ((wavelength - self.grid.min()) / self.grid.step()).round() as usize;
        self.samples.get(idx).copied()
    }

    /// View this spectrum as raw pairs on its own grid.
    pub fn to_raw(&self) -> Result<RawSpectrum> {
        RawSpectrum::new(self.grid.wavelengths().collect(), self.samples.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_matches_constants() {
        let grid = Grid::default();
        assert_eq!(grid, Grid::new(300.0, 800.0, 2.0).unwrap());
        assert_eq!(grid.len(), 251);
        assert_eq!(grid.wavelength(0), 300.0);
        assert_eq!(grid.wavelength(250), 800.0);
        assert_eq!(grid.wavelengths().nth(50), Some(400.0));
    }

    #[test]
    fn test_grid_rejects_bad_parameters() {
        assert!(matches!(Grid::new(300.0, 800.0, 0.0), Err(SpectrumError::InvalidGrid(_))));
        assert!(matches!(Grid::new(800.0, 300.0, 2.0), Err(SpectrumError::InvalidGrid(_))));
        assert!(matches!(Grid::new(300.0, 801.0, 2.0), Err(SpectrumError::InvalidGrid(_))));
        assert!(matches!(
            Grid::new(f64::NAN, 800.0, 2.0),
            Err(SpectrumError::InvalidGrid(_))
        ));
        assert!(matches!(Grid::new(0.0, 1.0, 1e-300), Err(SpectrumError::InvalidGrid(_))));
        assert!(matches!(Grid::new(300.0, 800.0, 1e-9), Err(SpectrumError::InvalidGrid(_))));
    }

    #[test]
    fn test_grid_point_cap_is_inclusive() {
        let grid = Grid::new(0.0, 999_999.0, 1.0).unwrap();
        assert_eq!(grid.len(), Grid::MAX_POINTS);
        assert!(matches!(
            Grid::new(0.0, 1_000_000.0, 1.0),
            Err(SpectrumError::InvalidGrid(_))
        ));
    }

    #[test]
    fn test_fractional_step_hits_endpoint() {
        let grid = Grid::new(400.0, 401.0, 0.1).unwrap();
        assert_eq!(grid.len(), 11);
        assert_eq!(grid.wavelengths().last(), Some(401.0));
    }

    #[test]
    fn test_raw_spectrum_validation() {
        assert!(RawSpectrum::new(vec![300.0, 400.0], vec![0.0, 1.0]).is_ok());
        assert!(matches!(
            RawSpectrum::new(vec![300.0, 400.0], vec![0.0]),
            Err(SpectrumError::MalformedInput(_))
        ));
        assert!(matches!(
            RawSpectrum::new(vec![300.0], vec![0.0]),
            Err(SpectrumError::MalformedInput(_))
        ));
        assert!(matches!(
            RawSpectrum::new(vec![300.0, 300.0, 400.0], vec![0.0, 0.5, 1.0]),
            Err(SpectrumError::MalformedInput(_))
        ));
        assert!(matches!(
            RawSpectrum::new(vec![400.0, 300.0], vec![0.0, 1.0]),
            Err(SpectrumError::MalformedInput(_))
        ));
        assert!(matches!(
            RawSpectrum::new(vec![300.0, 400.0], vec![0.0, f64::INFINITY]),
            Err(SpectrumError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_from_pairs_keeps_order() {
        let raw = RawSpectrum::from_pairs([(300.0, 0.1), (350.0, 0.2), (410.0, 0.3)]).unwrap();
        assert_eq!(raw.wavelengths(), &[300.0, 350.0, 410.0]);
        assert_eq!(raw.values(), &[0.1, 0.2, 0.3]);
        assert_eq!(raw.domain(), (300.0, 410.0));
    }

    #[test]
    fn test_from_samples_checks_length() {
        let grid = Grid::new(300.0, 310.0, 2.0).unwrap();
        assert!(Spectrum::from_samples("ok", grid, vec![0.0; 6]).is_ok());
        assert!(matches!(
            Spectrum::from_samples("short", grid, vec![0.0; 5]),
            Err(SpectrumError::GridMismatch { .. })
        ));
    }

    #[test]
    fn test_at_looks_up_nearest_grid_point() {
        let grid = Grid::new(300.0, 306.0, 2.0).unwrap();
        let sp = Spectrum::from_samples("s", grid, vec![0.0, 0.1, 0.2, 0.3]).unwrap();
        assert_eq!(sp.at(302.0), Some(0.1));
        assert_eq!(sp.at(305.9), Some(0.3));
        assert_eq!(sp.at(299.0), None);
        assert_eq!(sp.at(307.0), None);
    }
}
