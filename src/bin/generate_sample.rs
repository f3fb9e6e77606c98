use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Smooth step from 0 to 1 centred on `edge`.
fn sigmoid(x: f64, edge: f64, width: f64) -> f64 {
    1.0 / (1.0 + (-(x - edge) / width).exp())
}

/// Emission with a short-wavelength shoulder, in the 0–1 range.
fn emission(wavelengths: &[f64], peak: f64, sigma: f64) -> Vec<f64> {
    wavelengths
        .iter()
        .map(|&wl| gaussian(wl, peak, sigma, 1.0) + gaussian(wl, peak + 2.5 * sigma, 1.5 * sigma, 0.3))
        .collect()
}

/// Bandpass transmission in percent, as most vendors publish it.
fn bandpass_percent(wavelengths: &[f64], centre: f64, width: f64) -> Vec<f64> {
    let half = width / 2.0;
    wavelengths
        .iter()
        .map(|&wl| 95.0 * sigmoid(wl, centre - half, 1.5) * (1.0 - sigmoid(wl, centre + half, 1.5)))
        .collect()
}

/// Long-pass edge; `flip` gives the short-pass complement.
fn edge(wavelengths: &[f64], cut_on: f64, flip: bool) -> Vec<f64> {
    wavelengths
        .iter()
        .map(|&wl| {
            let t = 0.98 * sigmoid(wl, cut_on, 2.0);
            if flip { 0.98 - t } else { t }
        })
        .collect()
}

fn write_spectrum(path: &Path, wavelengths: &[f64], values: &[f64]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record(["wavelength", "value"])?;
    for (wl, v) in wavelengths.iter().zip(values) {
        wtr.write_record([format!("{wl:.1}"), format!("{v:.5}")])?;
    }
    wtr.flush()?;
    info!("wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));
    let dyes_dir = root.join("dyes");
    let filters_dir = root.join("filters");
    std::fs::create_dir_all(&dyes_dir).context("creating dyes directory")?;
    std::fs::create_dir_all(&filters_dir).context("creating filters directory")?;

    // Measured spectra are rarely on a round grid: 350 → 849.5, step 0.5 nm.
    let wavelengths: Vec<f64> = (0..1000).map(|i| 350.0 + i as f64 * 0.5).collect();

    let dyes: [(&str, f64, f64); 3] = [
        ("EGFP", 507.0, 14.0),
        ("mCherry", 610.0, 20.0),
        ("Alexa Fluor 647", 665.0, 16.0),
    ];
    for (name, peak, sigma) in dyes {
        write_spectrum(
            &dyes_dir.join(format!("{name}.csv")),
            &wavelengths,
            &emission(&wavelengths, peak, sigma),
        )?;
    }

    let bandpasses: [(&str, f64, f64); 3] = [
        ("FF01-525_45", 525.0, 45.0),
        ("FF01-617_73", 617.0, 73.0),
        ("FF01-692_40", 692.0, 40.0),
    ];
    for (name, centre, width) in bandpasses {
        write_spectrum(
            &filters_dir.join(format!("{name}.csv")),
            &wavelengths,
            &bandpass_percent(&wavelengths, centre, width),
        )?;
    }

    write_spectrum(
        &filters_dir.join("Di03-R561.csv"),
        &wavelengths,
        &edge(&wavelengths, 570.0, false),
    )?;
    write_spectrum(
        &filters_dir.join("SP 650.csv"),
        &wavelengths,
        &edge(&wavelengths, 650.0, true),
    )?;

    println!(
        "Wrote {} dyes and {} filters ({} wavelengths each) to {}",
        dyes.len(),
        bandpasses.len() + 2,
        wavelengths.len(),
        root.display()
    );
    Ok(())
}
