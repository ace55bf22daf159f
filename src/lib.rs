//! # Biosignal windowing for ECG/respiration datasets
//!
//! Prepares paired ECG and respiration recordings for model training. The
//! crate has two parts:
//!
//! * [`DataLoader`] scans a dataset directory (BIDMC layout by default) and
//!   parses each `*Signals.csv` file into a [`PatientRecording`].
//! * [`WindowBuilder`] cuts every recording of the train, validation and test
//!   partitions into fixed-size windows, drops flat windows, normalizes each
//!   window and resamples it to a common length with an FFT.
//!
//! ## Quick Start
//!
//! ```rust
//! use biosignal_windows::{DataLoader, DatasetConfig, PatientSplit, WindowBuilder, WindowParams};
//!
//! # // Generate test dataset (hidden from docs)
//! # let dir = std::env::temp_dir().join("biosignal_windows_quick_start");
//! # biosignal_windows::doctest_utils::create_bidmc_test_dataset(&dir, &[1, 2, 3, 4], 2000)?;
//! #
//! // Load every patient below the dataset root
//! let loaded = DataLoader::new(DatasetConfig::default().with_root(&dir)).load()?;
//! println!("Loaded {} patients", loaded.patients.len());
//!
//! // 500-sample windows with 50% overlap, resampled to 128 points
//! let builder = WindowBuilder::new(WindowParams::new(500, 128, 0.5)?);
//! let split = PatientSplit::new(vec![1, 2], vec![3], vec![4])?;
//! let dataset = builder.build(&loaded.data, &split)?;
//!
//! // 7 windows per patient, two patients in the training set
//! assert_eq!(dataset.train.ecg.shape(), &[14, 128, 1]);
//! assert_eq!(dataset.train.resp.shape(), &[14, 128, 1]);
//! assert_eq!(dataset.validation.len(), 7);
//!
//! # // Cleanup (hidden from docs)
//! # std::fs::remove_dir_all(&dir).ok();
//! # Ok::<(), biosignal_windows::SignalsError>(())
//! ```
//!
//! ## Normalization
//!
//! Each surviving window is rescaled on its own before resampling:
//!
//! * ECG to `[-0.5, 0.5]`
//! * respiration to `[0, 1]`
//!
//! The FFT resampler keeps the band-limited content of the window, so the
//! resampled values may overshoot these ranges slightly.
//!
//! ```rust
//! use biosignal_windows::utils::{normalize_ecg, normalize_resp};
//!
//! let ecg = normalize_ecg(&[3.0, 5.0, 4.0]).unwrap();
//! assert_eq!(ecg, vec![-0.5, 0.5, 0.0]);
//!
//! let resp = normalize_resp(&[3.0, 5.0, 4.0]).unwrap();
//! assert_eq!(resp, vec![0.0, 1.0, 0.5]);
//!
//! // Flat windows cannot be normalized and are dropped
//! assert!(normalize_ecg(&[2.0, 2.0, 2.0]).is_none());
//! ```

pub mod error;
pub mod types;
pub mod utils;
pub mod resample;
pub mod window;
pub mod loader;

#[doc(hidden)]
pub mod doctest_utils; // For internal doctest support

// Re-export main types for convenience
pub use error::{SignalsError, Result};
pub use types::{Partition, PatientData, PatientId, PatientRecording, PatientSplit};
pub use resample::{resample, Resampler};
pub use window::{sliding_window, PartitionWindows, WindowBuilder, WindowParams, WindowedDataset};
pub use loader::{load_bidmc_data, DataLoader, DatasetConfig, LoadReport, LoadedDataset};

/// Library version
///
/// # Examples
///
/// ```rust
/// let version = biosignal_windows::version();
/// assert!(version.contains('.'));
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
