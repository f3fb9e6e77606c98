//! Net transmission of a fluorescent dye's emission through a chain of
//! optical filters, computed on a shared wavelength grid.

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod report;
pub mod session;

pub use config::GridConfig;
pub use data::analysis::Point;
pub use data::combine::Operand;
pub use data::filter::{FilterEntry, FilterMode, TRANSMITTED};
pub use data::model::{Grid, RawSpectrum, Spectrum};
pub use data::resample::resample;
pub use error::SpectrumError;
pub use report::Report;
pub use session::Session;
