use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info, warn};

use super::model::{Grid, RawSpectrum, Spectrum};

/// Substrings removed from file names to form a source key.
const KEY_STRIP: [&str; 4] = [".csv", ".Csv", "CSV", "index.html"];

/// Maximum above which a source is assumed to be in percent.
const PERCENT_THRESHOLD: f64 = 10.0;

// ---------------------------------------------------------------------------
// Source capability
// ---------------------------------------------------------------------------

/// Somewhere named spectra can be fetched from as raw text.
pub trait SpectrumSource {
    /// Available spectra: key → source-specific location.
    fn keys(&self) -> Result<BTreeMap<String, String>>;

    /// Raw delimited text for `key`.
    fn fetch(&self, key: &str) -> Result<String>;
}

/// A directory of delimited text files, one spectrum per file.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySource { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SpectrumSource for DirectorySource {
    fn keys(&self) -> Result<BTreeMap<String, String>> {
        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("listing {}", self.dir.display()))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("reading entry in {}", self.dir.display()))?;
            if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(parse_sources(&names.join("\n")))
    }

    fn fetch(&self, key: &str) -> Result<String> {
        let keys = self.keys()?;
        let file = keys
            .get(key)
            .with_context(|| format!("no spectrum '{key}' in {}", self.dir.display()))?;
        let path = self.dir.join(file);
        std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// Source listings
// ---------------------------------------------------------------------------

/// Turn a newline-separated list of file names into a key → file map.
///
/// Keys are the file names with data extensions (and `index.html`) removed;
/// names that shrink to a single character or less are dropped.
pub fn parse_sources(listing: &str) -> BTreeMap<String, String> {
    let mut sources = BTreeMap::new();
    for file in listing.lines() {
        let file = file.trim_end_matches('\r');
        let mut name = file.to_string();
        for excl in KEY_STRIP {
            name = name.replace(excl, "");
        }
        if name.len() > 1 {
            sources.insert(name, file.to_string());
        }
    }
    sources
}

// ---------------------------------------------------------------------------
// Text parsing
// ---------------------------------------------------------------------------

fn is_separator(c: char) -> bool {
    matches!(c, ',' | ';' | ':') || c.is_ascii_whitespace()
}

/// Signed decimal with optional fraction and exponent, e.g. `-1.5e-3`, `.5`.
fn parse_number(token: &str) -> Option<f64> {
    let unsigned = token.strip_prefix(['+', '-']).unwrap_or(token);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(i) => (&unsigned[..i], Some(&unsigned[i + 1..])),
        None => (unsigned, None),
    };

    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !digits(int) || !digits(frac) || (int.is_empty() && frac.is_empty()) {
        return None;
    }
    if mantissa.ends_with('.') && !int.is_empty() && frac.is_empty() {
        // "12." is not accepted, the fraction needs digits.
        return None;
    }
    if let Some(exp) = exponent {
        let exp = exp.strip_prefix(['+', '-']).unwrap_or(exp);
        if exp.is_empty() || !digits(exp) {
            return None;
        }
    }
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse one line as `wavelength <sep> value`. Anything after the second
/// field is ignored; `None` means the line is not data.
pub fn parse_line(line: &str) -> Option<(f64, f64)> {
    let line = line.trim();
    let split = line.find(is_separator)?;
    let wl = parse_number(&line[..split])?;

    let rest = line[split + 1..].trim_start();
    let end = rest.find(is_separator).unwrap_or(rest.len());
    let value = parse_number(&rest[..end])?;
    Some((wl, value))
}

/// Parse delimited text into `(wavelength, value)` pairs, skipping lines
/// that are not two numbers (headers, comments, blanks).
pub fn parse_text(text: &str) -> Vec<(f64, f64)> {
    let mut pairs = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        match parse_line(line) {
            Some(pair) => pairs.push(pair),
            None if line.trim().is_empty() => {}
            None => debug!("skipping line {}: {:?}", line_no + 1, line),
        }
    }
    pairs
}

/// Heuristic unit fix: a source whose maximum exceeds 10 is taken to be in
/// percent and divided by 100. Returns whether the values were rescaled.
///
/// This guesses units from content and will misfire on fractional data with
/// outliers above 10.
pub fn normalize(values: &mut [f64]) -> bool {
    let peak = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if peak > PERCENT_THRESHOLD {
        for v in values.iter_mut() {
            *v /= 100.0;
        }
        true
    } else {
        false
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse and normalise text into a [`RawSpectrum`]; `Ok(None)` when fewer
/// than two data lines were found.
pub fn raw_from_text(text: &str) -> Result<Option<RawSpectrum>> {
    let pairs = parse_text(text);
    if pairs.len() < 2 {
        return Ok(None);
    }
    let (wavelengths, mut values): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
    if normalize(&mut values) {
        debug!("values exceed {PERCENT_THRESHOLD}, treating as percent");
    }
    Ok(Some(RawSpectrum::new(wavelengths, values)?))
}

/// Fetch `key` from `source` and resample it onto `grid`.
///
/// A source without usable data becomes an all-zero spectrum; genuinely
/// malformed data (duplicate or descending wavelengths) is an error.
pub fn load_spectrum(source: &dyn SpectrumSource, key: &str, grid: Grid) -> Result<Spectrum> {
    let text = source.fetch(key)?;
    let raw = raw_from_text(&text).with_context(|| format!("parsing spectrum '{key}'"))?;

    match raw {
        Some(raw) => {
            info!("loaded '{key}': {} points", raw.len());
            Ok(raw.resample(key, grid)?)
        }
        None => {
            warn!("'{key}' has no usable data, using an all-zero spectrum");
            Ok(Spectrum::zeros(key, grid))
        }
    }
}
