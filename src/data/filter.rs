use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use super::model::Spectrum;
use crate::error::{Result, SpectrumError};

/// Key under which the combined result is stored and displayed.
pub const TRANSMITTED: &str = "transmitted";

// ---------------------------------------------------------------------------
// FilterMode – how a filter acts on the light passing through
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Light passes through: multiply by the filter's values.
    #[default]
    Transmission,
    /// Light is reflected off the filter: multiply by `1 - value`.
    Reflectance,
}

impl FilterMode {
    /// The other mode, as flipped by the per-filter mode button.
    pub fn toggle(self) -> Self {
        match self {
            FilterMode::Transmission => FilterMode::Reflectance,
            FilterMode::Reflectance => FilterMode::Transmission,
        }
    }

    /// Fold `filter` into `target` according to this mode. The stored filter
    /// is never modified; reflectance works on a derived copy.
    pub fn apply(self, target: &mut Spectrum, filter: &Spectrum) -> Result<()> {
        match self {
            FilterMode::Transmission => target.multiply(filter),
            FilterMode::Reflectance => {
                if filter.grid() != target.grid() {
                    return Err(SpectrumError::GridMismatch {
                        expected: target.grid().to_string(),
                        found: format!("'{}' on {}", filter.name(), filter.grid()),
                    });
                }
                let reflected = filter.reflectance();
                target.multiply(&reflected)
            }
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::Transmission => write!(f, "transmission"),
            FilterMode::Reflectance => write!(f, "reflectance"),
        }
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "t" | "transmission" => Ok(FilterMode::Transmission),
            "r" | "reflectance" | "reflection" => Ok(FilterMode::Reflectance),
            other => Err(format!("unknown filter mode '{other}' (expected t or r)")),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterEntry – one slot of the active filter chain
// ---------------------------------------------------------------------------

/// A filter in the chain: which spectrum, and in which mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterEntry {
    pub spectrum_key: String,
    #[serde(default)]
    pub mode: FilterMode,
}

impl FilterEntry {
    pub fn new(spectrum_key: impl Into<String>, mode: FilterMode) -> Self {
        FilterEntry {
            spectrum_key: spectrum_key.into(),
            mode,
        }
    }
}

/// Parses `name` or `name:mode`. A suffix that is not a mode stays part of
/// the name, so keys containing `:` still work.
impl FromStr for FilterEntry {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((name, suffix)) = s.rsplit_once(':') {
            if let Ok(mode) = suffix.parse::<FilterMode>() {
                if name.is_empty() {
                    return Err(format!("missing filter name in '{s}'"));
                }
                return Ok(FilterEntry::new(name, mode));
            }
        }
        if s.is_empty() {
            return Err("empty filter name".to_string());
        }
        Ok(FilterEntry::new(s, FilterMode::Transmission))
    }
}

// ---------------------------------------------------------------------------
// Chain folding
// ---------------------------------------------------------------------------

/// Combine an optional dye with a chain of filters, in the order given.
///
/// The accumulator starts as a copy of the dye. Without a dye it starts at
/// unity on the first filter's grid, so the first filter's mode is honoured.
/// Returns `None` when there is nothing to combine.
pub fn transmitted<'a, I>(dye: Option<&Spectrum>, filters: I) -> Result<Option<Spectrum>>
where
    I: IntoIterator<Item = (&'a Spectrum, FilterMode)>,
{
    let mut acc = dye.map(|d| d.copy(TRANSMITTED));

    for (filter, mode) in filters {
        let target = acc.get_or_insert_with(|| Spectrum::filled(TRANSMITTED, filter.grid(), 1.0));
        debug!("applying '{}' in {mode} mode", filter.name());
        mode.apply(target, filter)?;
    }
    Ok(acc)
}
