use log::{debug, trace};
use ndarray::Array3;

use crate::error::{Result, SignalsError};
use crate::resample::Resampler;
use crate::types::{Partition, PatientData, PatientId, PatientRecording, PatientSplit};
use crate::utils::{is_degenerate, normalize_ecg, normalize_resp};

/// Window geometry shared by all partitions
///
/// * `window_size` - raw samples per window
/// * `downsampled_window_size` - samples per window after resampling
/// * `overlap` - step between windows as a fraction of `window_size`.
///   Below 1 windows overlap, above 1 they leave gaps, 1 gives contiguous windows.
///
/// # Examples
///
/// ```rust
/// use biosignal_windows::WindowParams;
///
/// let params = WindowParams::new(200, 64, 0.5)?;
/// assert_eq!(params.step(), 100);
/// assert_eq!(params.max_steps(1000), 10);
///
/// // Step would round down to zero samples
/// assert!(WindowParams::new(4, 64, 0.1).is_err());
/// # Ok::<(), biosignal_windows::SignalsError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowParams {
    window_size: usize,
    downsampled_window_size: usize,
    overlap: f64,
}

impl WindowParams {
    pub fn new(window_size: usize, downsampled_window_size: usize, overlap: f64) -> Result<Self> {
        if window_size == 0 {
            return Err(SignalsError::InvalidParameter(
                "window_size must be positive".to_string(),
            ));
        }
        if downsampled_window_size == 0 {
            return Err(SignalsError::InvalidParameter(
                "downsampled_window_size must be positive".to_string(),
            ));
        }
        if !overlap.is_finite() || overlap <= 0.0 {
            return Err(SignalsError::InvalidParameter(format!(
                "overlap must be a positive finite number, got {}",
                overlap
            )));
        }

        let params = Self {
            window_size,
            downsampled_window_size,
            overlap,
        };
        if params.step() == 0 {
            return Err(SignalsError::InvalidParameter(format!(
                "window_size * overlap ({} * {}) is less than one sample",
                window_size, overlap
            )));
        }

        Ok(params)
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn downsampled_window_size(&self) -> usize {
        self.downsampled_window_size
    }

    pub fn overlap(&self) -> f64 {
        self.overlap
    }

    /// 相邻窗口起点之间的样本数
    pub fn step(&self) -> usize {
        (self.window_size as f64 * self.overlap).floor() as usize
    }

    /// 长度为 `n` 的信号上的步数 `floor(n / (window_size * overlap))`
    pub fn max_steps(&self, n: usize) -> usize {
        (n as f64 / (self.window_size as f64 * self.overlap)).floor() as usize
    }

    /// Start offsets of every full window inside a signal of `n` samples
    ///
    /// A window that would run past `n` is never produced, so when
    /// `overlap < 1` the last few steps may be dropped.
    pub fn window_starts(&self, n: usize) -> impl Iterator<Item = usize> {
        let step = self.step();
        let window_size = self.window_size;
        (0..self.max_steps(n))
            .map(move |k| k * step)
            .take_while(move |&start| start + window_size <= n)
    }
}

/// ECG/respiration window arrays of one partition
///
/// Both arrays have shape `(count, downsampled_window_size, 1)` and row `i`
/// of `ecg` was cut from the same place as row `i` of `resp`.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionWindows {
    pub ecg: Array3<f32>,
    pub resp: Array3<f32>,
}

impl PartitionWindows {
    /// 窗口数量
    pub fn len(&self) -> usize {
        self.ecg.shape()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Windowed train/validation/test dataset
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedDataset {
    pub train: PartitionWindows,
    pub validation: PartitionWindows,
    pub test: PartitionWindows,
}

impl WindowedDataset {
    pub fn partition(&self, partition: Partition) -> &PartitionWindows {
        match partition {
            Partition::Train => &self.train,
            Partition::Validation => &self.validation,
            Partition::Test => &self.test,
        }
    }

    /// Splits into `(train_ecg, train_resp, validation_ecg, validation_resp, test_ecg, test_resp)`
    pub fn into_arrays(self) -> SixArrays {
        (
            self.train.ecg,
            self.train.resp,
            self.validation.ecg,
            self.validation.resp,
            self.test.ecg,
            self.test.resp,
        )
    }
}

pub type SixArrays = (
    Array3<f32>,
    Array3<f32>,
    Array3<f32>,
    Array3<f32>,
    Array3<f32>,
    Array3<f32>,
);

/// Cuts paired recordings into normalized, resampled windows
///
/// Each partition is processed the same way and independently:
///
/// 1. Windows of `window_size` samples start every `step` samples.
/// 2. A pair is dropped if the ECG window is constant, then if the
///    respiration window is constant. Windows with non-finite samples are
///    dropped too.
/// 3. ECG is rescaled to `[-0.5, 0.5]`, respiration to `[0, 1]`.
/// 4. Both are resampled to `downsampled_window_size` with an FFT and
///    stored as `f32`.
///
/// Rows follow the patient order of the partition list, then window order.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// use biosignal_windows::{PatientRecording, PatientSplit, WindowBuilder, WindowParams};
///
/// let ramp: Vec<f64> = (0..1000).map(|i| i as f64).collect();
/// let mut data = HashMap::new();
/// for id in [1, 2, 3] {
///     data.insert(id, PatientRecording::new(ramp.clone(), ramp.clone()));
/// }
///
/// let builder = WindowBuilder::new(WindowParams::new(200, 64, 1.0)?);
/// let split = PatientSplit::new(vec![1], vec![2], vec![3])?;
/// let dataset = builder.build(&data, &split)?;
///
/// assert_eq!(dataset.train.ecg.shape(), &[5, 64, 1]);
/// assert_eq!(dataset.test.resp.shape(), &[5, 64, 1]);
/// # Ok::<(), biosignal_windows::SignalsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct WindowBuilder {
    params: WindowParams,
}

impl WindowBuilder {
    pub fn new(params: WindowParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &WindowParams {
        &self.params
    }

    /// Builds all three partitions
    ///
    /// # Errors
    ///
    /// * `SignalsError::PatientNotFound` - a listed patient has no recording
    /// * `SignalsError::EmptyPartition` - no window survived in a partition
    pub fn build(&self, data: &PatientData, split: &PatientSplit) -> Result<WindowedDataset> {
        Ok(WindowedDataset {
            train: self.build_partition(data, split.ids(Partition::Train), Partition::Train)?,
            validation: self.build_partition(
                data,
                split.ids(Partition::Validation),
                Partition::Validation,
            )?,
            test: self.build_partition(data, split.ids(Partition::Test), Partition::Test)?,
        })
    }

    /// Builds the windows of a single partition
    pub fn build_partition(
        &self,
        data: &PatientData,
        patients: &[PatientId],
        partition: Partition,
    ) -> Result<PartitionWindows> {
        let out_len = self.params.downsampled_window_size;
        let mut resampler = Resampler::new();
        let mut ecg_rows: Vec<f32> = Vec::new();
        let mut resp_rows: Vec<f32> = Vec::new();
        let mut count = 0usize;
        let mut filtered = 0usize;

        for &patient in patients {
            let recording = data
                .get(&patient)
                .ok_or(SignalsError::PatientNotFound { patient, partition })?;

            if !recording.is_aligned() {
                debug!(
                    "patient {}: ecg has {} samples, resp has {}; using first {}",
                    patient,
                    recording.ecg.len(),
                    recording.resp.len(),
                    recording.usable_len()
                );
            }

            for (step_index, (ecg, resp)) in self.patient_windows(recording).enumerate() {
                // 先检查 ECG，再检查呼吸；任一路为常数则整对丢弃
                let ecg_norm = match normalize_ecg(ecg) {
                    Some(v) => v,
                    None => {
                        trace!("patient {}: ecg window {} is flat", patient, step_index);
                        filtered += 1;
                        continue;
                    }
                };
                let resp_norm = match normalize_resp(resp) {
                    Some(v) => v,
                    None => {
                        trace!("patient {}: resp window {} is flat", patient, step_index);
                        filtered += 1;
                        continue;
                    }
                };

                ecg_rows.extend(resampler.resample(&ecg_norm, out_len).iter().map(|&v| v as f32));
                resp_rows.extend(resampler.resample(&resp_norm, out_len).iter().map(|&v| v as f32));
                count += 1;
            }
        }

        debug!(
            "{} partition: {} patients, {} windows kept, {} degenerate",
            partition,
            patients.len(),
            count,
            filtered
        );

        if count == 0 {
            return Err(SignalsError::EmptyPartition(partition));
        }

        // 堆叠为 (count, out_len, 1)，末维为单通道
        Ok(PartitionWindows {
            ecg: Array3::from_shape_vec((count, out_len, 1), ecg_rows)?,
            resp: Array3::from_shape_vec((count, out_len, 1), resp_rows)?,
        })
    }

    /// Raw (ECG, respiration) window pairs of one recording in step order
    ///
    /// Degenerate pairs are included; use [`is_degenerate`] to tell them apart.
    pub fn patient_windows<'a>(
        &self,
        recording: &'a PatientRecording,
    ) -> impl Iterator<Item = (&'a [f64], &'a [f64])> + 'a {
        let window_size = self.params.window_size;
        // 长度不一致时截断到较短的一路
        let n = recording.usable_len();
        self.params.window_starts(n).map(move |start| {
            let end = start + window_size;
            (&recording.ecg[start..end], &recording.resp[start..end])
        })
    }

    /// Number of windows of `recording` that pass the degenerate filter
    pub fn surviving_windows(&self, recording: &PatientRecording) -> usize {
        self.patient_windows(recording)
            .filter(|(ecg, resp)| !is_degenerate(ecg) && !is_degenerate(resp))
            .count()
    }
}

/// Windows, normalizes and resamples the train/validation/test partitions
///
/// Returns `(train_ecg, train_resp, validation_ecg, validation_resp, test_ecg, test_resp)`,
/// each of shape `(count, downsampled_window_size, 1)`.
///
/// # Errors
///
/// * `SignalsError::InvalidParameter` - invalid window geometry
/// * `SignalsError::OverlappingPartitions` - a patient is in two partitions
/// * `SignalsError::PatientNotFound` - a listed patient is missing from `data`
/// * `SignalsError::EmptyPartition` - a partition produced no windows
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// use biosignal_windows::{sliding_window, PatientRecording, SignalsError};
///
/// let wave: Vec<f64> = (0..600).map(|i| (i as f64 * 0.1).sin()).collect();
/// let mut data = HashMap::new();
/// for id in [7, 8, 9] {
///     data.insert(id, PatientRecording::new(wave.clone(), wave.clone()));
/// }
///
/// let (train_ecg, train_resp, val_ecg, _, test_ecg, _) =
///     sliding_window(&data, 100, 32, 0.5, &[7], &[8], &[9])?;
/// assert_eq!(train_ecg.shape(), &[11, 32, 1]);
/// assert_eq!(train_resp.shape(), train_ecg.shape());
/// assert_eq!(val_ecg.shape()[0], test_ecg.shape()[0]);
///
/// // A flat ECG leaves the test partition without windows
/// data.insert(9, PatientRecording::new(vec![1.0; 600], wave.clone()));
/// let err = sliding_window(&data, 100, 32, 0.5, &[7], &[8], &[9]).unwrap_err();
/// assert!(matches!(err, SignalsError::EmptyPartition(_)));
/// # Ok::<(), SignalsError>(())
/// ```
pub fn sliding_window(
    data: &PatientData,
    window_size: usize,
    downsampled_window_size: usize,
    overlap: f64,
    train_patients: &[PatientId],
    validation_patients: &[PatientId],
    test_patients: &[PatientId],
) -> Result<SixArrays> {
    let params = WindowParams::new(window_size, downsampled_window_size, overlap)?;
    let split = PatientSplit::new(
        train_patients.to_vec(),
        validation_patients.to_vec(),
        test_patients.to_vec(),
    )?;

    WindowBuilder::new(params)
        .build(data, &split)
        .map(WindowedDataset::into_arrays)
}
