use serde::Serialize;

use super::model::Spectrum;
use crate::error::{Result, SpectrumError};

/// One `(wavelength, intensity)` pair of a spectrum's point series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub wavelength: f64,
    pub intensity: f64,
}

impl Spectrum {
    /// Index of the first maximal sample. NaN samples never win; an all-NaN
    /// spectrum peaks at index 0.
    fn argmax(&self) -> Result<usize> {
        if self.samples.is_empty() {
            return Err(SpectrumError::EmptySpectrum);
        }
        let mut best: Option<(usize, f64)> = None;
        for (i, &v) in self.samples.iter().enumerate() {
            if v.is_nan() {
                continue;
            }
            match best {
                // Strict comparison keeps the lowest wavelength on ties.
                Some((_, b)) if v <= b => {}
                _ => best = Some((i, v)),
            }
        }
        Ok(best.map_or(0, |(i, _)| i))
    }

    /// Grid wavelength of the maximum sample; the lowest one on ties.
    pub fn peak_wavelength(&self) -> Result<f64> {
        Ok(self.grid.wavelength(self.argmax()?))
    }

    /// Maximum sample value.
    pub fn peak_value(&self) -> Result<f64> {
        Ok(self.samples[self.argmax()?])
    }

    /// Fresh point series zipping the grid with the samples.
    pub fn points(&self) -> Result<Vec<Point>> {
        if self.samples.is_empty() {
            return Err(SpectrumError::EmptySpectrum);
        }
        Ok(self
            .grid
            .wavelengths()
            .zip(&self.samples)
            .map(|(wavelength, &intensity)| Point {
                wavelength,
                intensity,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Grid;

    fn grid() -> Grid {
        Grid::new(400.0, 410.0, 2.0).unwrap()
    }

    #[test]
    fn test_peak_is_maximum() {
        let sp = Spectrum::from_samples("s", grid(), vec![0.1, 0.4, 0.9, 0.3, 0.2, 0.0]).unwrap();
        let peak = sp.peak_wavelength().unwrap();
        assert_eq!(peak, 404.0);
        let peak_value = sp.at(peak).unwrap();
        assert!(sp.samples().iter().all(|&v| peak_value >= v));
        assert_eq!(sp.peak_value().unwrap(), 0.9);
    }

    #[test]
    fn test_peak_ties_pick_lowest_wavelength() {
        let sp = Spectrum::from_samples("s", grid(), vec![0.2, 0.7, 0.1, 0.7, 0.7, 0.0]).unwrap();
        assert_eq!(sp.peak_wavelength().unwrap(), 402.0);

        let flat = Spectrum::zeros("flat", grid());
        assert_eq!(flat.peak_wavelength().unwrap(), 400.0);
    }

    #[test]
    fn test_nan_samples_do_not_win_peak() {
        let mut sp =
            Spectrum::from_samples("s", grid(), vec![0.9, 0.1, 0.2, 0.3, 0.4, 0.5]).unwrap();
        sp.multiply(&vec![1.0, 1.0, f64::NAN, 1.0, 1.0, f64::NAN]).unwrap();
        assert_eq!(sp.peak_wavelength().unwrap(), 400.0);
        assert_eq!(sp.peak_value().unwrap(), 0.9);

        let all_nan = Spectrum::filled("nan", grid(), f64::NAN);
        assert_eq!(all_nan.peak_wavelength().unwrap(), 400.0);
    }

    #[test]
    fn test_empty_spectrum_is_an_error() {
        let sp = Spectrum {
            name: "empty".into(),
            grid: grid(),
            samples: Vec::new(),
        };
        assert_eq!(sp.peak_wavelength(), Err(SpectrumError::EmptySpectrum));
        assert_eq!(sp.peak_value(), Err(SpectrumError::EmptySpectrum));
        assert_eq!(sp.points(), Err(SpectrumError::EmptySpectrum));
    }

    #[test]
    fn test_points_do_not_alias_samples() {
        let sp = Spectrum::from_samples("s", grid(), vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5]).unwrap();
        let mut points = sp.points().unwrap();
        assert_eq!(points.len(), 6);
        assert_eq!(
            points[5],
            Point {
                wavelength: 410.0,
                intensity: 0.5
            }
        );

        points[0].intensity = 99.0;
        assert_eq!(sp.samples()[0], 0.0);
        assert_eq!(sp.points().unwrap()[0].intensity, 0.0);
    }
}
