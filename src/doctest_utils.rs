// Internal utilities for documentation tests
// This file contains helper functions to generate BIDMC-style CSV files for doctests

use std::fs;
use std::path::Path;

use crate::{PatientId, Result};

/// BIDMC 采样率（Hz）
pub const BIDMC_SAMPLE_RATE: f64 = 125.0;

/// Writes one `*Signals.csv` file with BIDMC column layout
///
/// Header names carry the leading space found in the real dataset.
pub fn write_signals_csv<P: AsRef<Path>>(path: P, ecg: &[f64], resp: &[f64]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Time [s]", " RESP", " PLETH", " V", " AVR", " II"])?;

    let rows = ecg.len().max(resp.len());
    for i in 0..rows {
        let cell = |signal: &[f64]| signal.get(i).map(|v| format!("{:.6}", v)).unwrap_or_default();
        writer.write_record([
            format!("{:.3}", i as f64 / BIDMC_SAMPLE_RATE),
            cell(resp),
            "0.5".to_string(),
            "0.0".to_string(),
            "0.0".to_string(),
            cell(ecg),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Synthetic ECG/respiration pair with `samples` points
///
/// A 1.2 Hz pulse train on top of a 0.25 Hz breathing wave.
pub fn synthetic_signals(samples: usize, patient: PatientId) -> (Vec<f64>, Vec<f64>) {
    let phase = patient as f64 * 0.1;
    let mut ecg = Vec::with_capacity(samples);
    let mut resp = Vec::with_capacity(samples);

    for i in 0..samples {
        let t = i as f64 / BIDMC_SAMPLE_RATE;
        let beat = (2.0 * std::f64::consts::PI * 1.2 * t + phase).sin();
        ecg.push(0.2 * beat + 0.8 * beat.max(0.0).powi(8));
        resp.push(0.4 + 0.3 * (2.0 * std::f64::consts::PI * 0.25 * t + phase).sin());
    }

    (ecg, resp)
}

/// Creates `<root>/bidmc_csv/bidmc_<id>_Signals.csv` for every patient
pub fn create_bidmc_test_dataset<P: AsRef<Path>>(
    root: P,
    patients: &[PatientId],
    samples: usize,
) -> Result<()> {
    let dir = root.as_ref().join("bidmc_csv");
    fs::create_dir_all(&dir)?;

    for &patient in patients {
        let (ecg, resp) = synthetic_signals(samples, patient);
        let path = dir.join(format!("bidmc_{:02}_Signals.csv", patient));
        write_signals_csv(path, &ecg, &resp)?;
    }
    Ok(())
}
