use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::color::{self, DashCycle, Rgba};
use crate::config::GridConfig;
use crate::data::analysis::Point;
use crate::data::filter::FilterMode;
use crate::data::model::Spectrum;
use crate::session::Session;

// ---------------------------------------------------------------------------
// Report model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceRole {
    Dye,
    Filter,
    Transmitted,
}

/// One plotted line with its display hints.
#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    pub name: String,
    pub role: TraceRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<FilterMode>,
    pub peak_wavelength: f64,
    pub hue: f64,
    pub fill: Rgba,
    pub line: Rgba,
    pub line_width: f32,
    pub dash: Vec<u32>,
    pub points: Vec<Point>,
}

impl Trace {
    fn new(spectrum: &Spectrum, role: TraceRole) -> Result<Self> {
        let peak_wavelength = spectrum.peak_wavelength()?;
        let hue = color::hue(peak_wavelength);
        let (fill, line, line_width) = match role {
            TraceRole::Transmitted => (
                color::hue_to_rgba(hue, color::TRANSMITTED_FILL_ALPHA),
                Rgba::TRANSMITTED_LINE,
                4.0,
            ),
            _ => (
                color::hue_to_rgba(hue, color::FILL_ALPHA),
                color::hue_to_rgba(hue, color::LINE_ALPHA),
                1.5,
            ),
        };
        Ok(Trace {
            name: spectrum.name().to_string(),
            role,
            mode: None,
            peak_wavelength,
            hue,
            fill,
            line,
            line_width,
            dash: Vec::new(),
            points: spectrum.points()?,
        })
    }
}

/// Everything a renderer needs for one recomputation.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub grid: GridConfig,
    pub traces: Vec<Trace>,
}

impl Report {
    /// Collect traces for the active dye and filters plus the transmitted
    /// result of the last [`Session::recompute`].
    pub fn build(session: &Session) -> Result<Self> {
        let grid = session.grid();
        let mut dashes = DashCycle::new();
        let mut traces = Vec::new();

        for key in session.active_keys() {
            let spectrum = session
                .spectrum(&key)
                .with_context(|| format!("spectrum '{key}' is not loaded"))?;
            let filter = session.filters().iter().find(|f| f.spectrum_key == key);

            let trace = match filter {
                Some(entry) => {
                    let mut trace = Trace::new(spectrum, TraceRole::Filter)?;
                    trace.mode = Some(entry.mode);
                    trace.dash = dashes.next().unwrap_or_default().to_vec();
                    trace
                }
                _ => Trace::new(spectrum, TraceRole::Dye)?,
            };
            traces.push(trace);
        }

        if let Some(t) = session.transmitted() {
            traces.push(Trace::new(t, TraceRole::Transmitted)?);
        }

        Ok(Report {
            grid: GridConfig {
                wl_min: grid.min(),
                wl_max: grid.max(),
                wl_step: grid.step(),
            },
            traces,
        })
    }

    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.name == name)
    }

    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self).context("writing JSON report")
    }

    /// Wide table: a `wavelength` column then one intensity column per trace.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header = vec!["wavelength".to_string()];
        header.extend(self.traces.iter().map(|t| t.name.clone()));
        wtr.write_record(&header).context("writing CSV header")?;

        let rows = self.traces.first().map_or(0, |t| t.points.len());
        for i in 0..rows {
            let mut record = Vec::with_capacity(self.traces.len() + 1);
            record.push(self.traces[0].points[i].wavelength.to_string());
            for trace in &self.traces {
                record.push(trace.points[i].intensity.to_string());
            }
            wtr.write_record(&record)
                .with_context(|| format!("writing CSV row {i}"))?;
        }
        wtr.flush().context("flushing CSV output")?;
        Ok(())
    }
}
