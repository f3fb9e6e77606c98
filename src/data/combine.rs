use super::model::Spectrum;
use crate::error::{Result, SpectrumError};

// ---------------------------------------------------------------------------
// Operand – anything a spectrum can be multiplied by
// ---------------------------------------------------------------------------

/// Right-hand side of [`Spectrum::multiply`].
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    /// Another spectrum on the same grid.
    Spectrum(&'a Spectrum),
    /// Per-sample factors, one per grid point.
    Sequence(&'a [f64]),
    /// A single factor applied everywhere.
    Scalar(f64),
}

impl<'a> From<&'a Spectrum> for Operand<'a> {
    fn from(s: &'a Spectrum) -> Self {
        Operand::Spectrum(s)
    }
}

impl<'a> From<&'a [f64]> for Operand<'a> {
    fn from(s: &'a [f64]) -> Self {
        Operand::Sequence(s)
    }
}

impl<'a> From<&'a Vec<f64>> for Operand<'a> {
    fn from(s: &'a Vec<f64>) -> Self {
        Operand::Sequence(s)
    }
}

impl From<f64> for Operand<'_> {
    fn from(k: f64) -> Self {
        Operand::Scalar(k)
    }
}

// ---------------------------------------------------------------------------
// Combination
// ---------------------------------------------------------------------------

impl Spectrum {
    /// Multiply the samples in place by `operand`.
    ///
    /// A spectrum operand must share this spectrum's grid and a sequence must
    /// have one factor per sample; anything else is a
    /// [`SpectrumError::GridMismatch`] and leaves the samples untouched.
    pub fn multiply<'a>(&mut self, operand: impl Into<Operand<'a>>) -> Result<()> {
        match operand.into() {
            Operand::Spectrum(other) => {
                if other.grid != self.grid {
                    return Err(SpectrumError::GridMismatch {
                        expected: self.grid.to_string(),
                        found: format!("'{}' on {}", other.name, other.grid),
                    });
                }
                self.scale_by(&other.samples);
            }
            Operand::Sequence(factors) => {
                if factors.len() != self.samples.len() {
                    return Err(SpectrumError::GridMismatch {
                        expected: self.grid.to_string(),
                        found: format!("sequence of {} factors", factors.len()),
                    });
                }
                self.scale_by(factors);
            }
            Operand::Scalar(k) => {
                for s in &mut self.samples {
                    *s *= k;
                }
            }
        }
        Ok(())
    }

    fn scale_by(&mut self, factors: &[f64]) {
        for (s, f) in self.samples.iter_mut().zip(factors) {
            *s *= f;
        }
    }

    /// Reflectance view `1 - v` of the samples, as a new sequence.
    pub fn reflectance(&self) -> Vec<f64> {
        self.samples.iter().map(|v| 1.0 - v).collect()
    }

    /// Deep copy under a new name, sharing the grid.
    pub fn copy(&self, name: impl Into<String>) -> Spectrum {
        Spectrum {
            name: name.into(),
            grid: self.grid,
            samples: self.samples.clone(),
        }
    }
}
