use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use log::info;

use crate::data::filter::{self, FilterEntry, FilterMode, TRANSMITTED};
use crate::data::loader::{self, SpectrumSource};
use crate::data::model::{Grid, Spectrum};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Everything needed to compute a transmission: the loaded spectra, the
/// selected dye and the ordered filter chain.
///
/// Any selection change drops the previous result; call
/// [`Session::recompute`] to rebuild it.
#[derive(Debug, Clone)]
pub struct Session {
    grid: Grid,
    /// Loaded spectra by key.
    spectra: BTreeMap<String, Spectrum>,
    dye: Option<String>,
    filters: Vec<FilterEntry>,
    transmitted: Option<Spectrum>,
}

impl Session {
    pub fn new(grid: Grid) -> Self {
        Session {
            grid,
            spectra: BTreeMap::new(),
            dye: None,
            filters: Vec::new(),
            transmitted: None,
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Register a spectrum under its own name, replacing any previous one.
    pub fn insert(&mut self, spectrum: Spectrum) -> Result<()> {
        if spectrum.grid() != self.grid {
            bail!(
                "'{}' is sampled on {}, session grid is {}",
                spectrum.name(),
                spectrum.grid(),
                self.grid
            );
        }
        if spectrum.name() == TRANSMITTED {
            bail!("'{TRANSMITTED}' is reserved for the combined result");
        }
        self.transmitted = None;
        self.spectra.insert(spectrum.name().to_string(), spectrum);
        Ok(())
    }

    /// Load `key` from `source` unless it is already present.
    pub fn ensure_loaded(&mut self, source: &dyn SpectrumSource, key: &str) -> Result<()> {
        if self.spectra.contains_key(key) {
            return Ok(());
        }
        let spectrum = loader::load_spectrum(source, key, self.grid)
            .with_context(|| format!("loading '{key}'"))?;
        self.insert(spectrum)
    }

    /// Load the selected dye and every filter in the chain.
    pub fn load_active(
        &mut self,
        dyes: &dyn SpectrumSource,
        filters: &dyn SpectrumSource,
    ) -> Result<()> {
        if let Some(dye) = self.dye.clone() {
            self.ensure_loaded(dyes, &dye)?;
        }
        let keys: Vec<String> = self.filters.iter().map(|f| f.spectrum_key.clone()).collect();
        for key in keys {
            self.ensure_loaded(filters, &key)?;
        }
        Ok(())
    }

    pub fn spectrum(&self, key: &str) -> Option<&Spectrum> {
        if key == TRANSMITTED {
            return self.transmitted.as_ref();
        }
        self.spectra.get(key)
    }

    pub fn dye(&self) -> Option<&str> {
        self.dye.as_deref()
    }

    pub fn filters(&self) -> &[FilterEntry] {
        &self.filters
    }

    pub fn select_dye(&mut self, key: Option<String>) {
        self.dye = key;
        self.transmitted = None;
    }

    /// Append a filter at the end of the light path.
    pub fn add_filter(&mut self, entry: FilterEntry) {
        self.filters.push(entry);
        self.transmitted = None;
    }

    pub fn remove_filter(&mut self, index: usize) -> Option<FilterEntry> {
        if index >= self.filters.len() {
            return None;
        }
        self.transmitted = None;
        Some(self.filters.remove(index))
    }

    /// Flip a filter between transmission and reflectance, returning the new mode.
    pub fn toggle_filter_mode(&mut self, index: usize) -> Option<FilterMode> {
        let entry = self.filters.get_mut(index)?;
        entry.mode = entry.mode.toggle();
        self.transmitted = None;
        Some(entry.mode)
    }

    /// Keys of the selected dye and filters, dye first, without repeats.
    pub fn active_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        let chain = self.filters.iter().map(|f| f.spectrum_key.as_str());
        for key in self.dye.as_deref().into_iter().chain(chain) {
            if !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
        keys
    }

    /// Rebuild the combined spectrum from the current selection.
    pub fn recompute(&mut self) -> Result<Option<&Spectrum>> {
        let result = {
            let dye = match &self.dye {
                Some(key) => Some(self.lookup(key)?),
                None => None,
            };
            let chain = self
                .filters
                .iter()
                .map(|f| Ok((self.lookup(&f.spectrum_key)?, f.mode)))
                .collect::<Result<Vec<_>>>()?;
            filter::transmitted(dye, chain)?
        };

        if let Some(t) = &result {
            info!(
                "recomputed transmission through {} filter(s), peak at {} nm",
                self.filters.len(),
                t.peak_wavelength()?
            );
        }
        self.transmitted = result;
        Ok(self.transmitted.as_ref())
    }

    /// Result of the last [`Session::recompute`], if still current.
    pub fn transmitted(&self) -> Option<&Spectrum> {
        self.transmitted.as_ref()
    }

    fn lookup(&self, key: &str) -> Result<&Spectrum> {
        self.spectra
            .get(key)
            .with_context(|| format!("spectrum '{key}' is not loaded"))
    }
}

// ---------------------------------------------------------------------------
// Trace reconciliation
// ---------------------------------------------------------------------------

/// Compare the keys currently displayed with the active ones.
///
/// Returns `(to_add, to_remove)` in input order. The transmitted trace is
/// permanent and never listed for removal.
pub fn diff_keys(displayed: &[String], active: &[String]) -> (Vec<String>, Vec<String>) {
    let to_add = active
        .iter()
        .filter(|k| !displayed.contains(k))
        .cloned()
        .collect();
    let to_remove = displayed
        .iter()
        .filter(|k| k.as_str() != TRANSMITTED && !active.contains(k))
        .cloned()
        .collect();
    (to_add, to_remove)
}
