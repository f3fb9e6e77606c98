/// Data layer: spectra, loading, resampling and combination.
///
/// Architecture:
/// ```text
///  dyes/*.csv   filters/*.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  text → (wavelength, value) pairs → RawSpectrum
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ resample  │  RawSpectrum → Spectrum on the shared Grid
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  fold dye × filters (transmission / reflectance)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ analysis  │  peak wavelength, point series
///   └──────────┘
/// ```

pub mod analysis;
pub mod combine;
pub mod filter;
pub mod loader;
pub mod model;
pub mod resample;
