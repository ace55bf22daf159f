use std::collections::hash_map::Entry;
use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use log::{info, warn};

use crate::error::{Result, SignalsError};
use crate::types::{PatientData, PatientId, PatientRecording};
use crate::utils::parse_sample;

/// Default BIDMC dataset location
pub const BIDMC_DATA_ROOT: &str = "data/bidmc-ppg-and-respiration-dataset-1.0.0";
/// Default signal file pattern
pub const BIDMC_FILE_PATTERN: &str = "*Signals.csv";

/// Where and how to read per-patient signal files
///
/// The defaults match the BIDMC PPG and Respiration dataset, whose
/// `bidmc_<id>_Signals.csv` files carry lead II ECG in column ` II` and
/// respiration in column ` RESP`. Header names are compared after trimming.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetConfig {
    pub root: PathBuf,
    pub file_pattern: String,
    pub ecg_column: String,
    pub resp_column: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(BIDMC_DATA_ROOT),
            file_pattern: BIDMC_FILE_PATTERN.to_string(),
            ecg_column: "II".to_string(),
            resp_column: "RESP".to_string(),
        }
    }
}

impl DatasetConfig {
    pub fn with_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_file_pattern(mut self, pattern: &str) -> Self {
        self.file_pattern = pattern.to_string();
        self
    }

    pub fn with_columns(mut self, ecg_column: &str, resp_column: &str) -> Self {
        self.ecg_column = ecg_column.to_string();
        self.resp_column = resp_column.to_string();
        self
    }
}

/// 加载统计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// 匹配到的文件数
    pub files_found: usize,
    /// 成功解析的文件数
    pub loaded: usize,
    /// 解析失败的文件及原因
    pub errors: Vec<(PathBuf, String)>,
}

impl LoadReport {
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

/// Result of scanning a dataset directory
#[derive(Debug, Clone, Default)]
pub struct LoadedDataset {
    /// Recordings keyed by patient id
    pub data: PatientData,
    /// Patient ids in discovery order, each listed once
    pub patients: Vec<PatientId>,
    pub report: LoadReport,
}

/// Scans a dataset root for per-patient CSV recordings
///
/// Files are matched recursively below `root` and visited in sorted path
/// order. A file that fails to parse is logged, counted in the
/// [`LoadReport`] and skipped; it never aborts the scan.
///
/// # Examples
///
/// ```rust
/// use biosignal_windows::{DataLoader, DatasetConfig};
///
/// # // Generate test dataset (hidden from docs)
/// # let dir = std::env::temp_dir().join("biosignal_windows_loader_doc");
/// # biosignal_windows::doctest_utils::create_bidmc_test_dataset(&dir, &[3, 12], 1200)?;
/// #
/// let config = DatasetConfig::default().with_root(&dir);
/// let loaded = DataLoader::new(config).load()?;
///
/// assert_eq!(loaded.patients, vec![3, 12]);
/// assert_eq!(loaded.data[&3].ecg.len(), 1200);
/// assert_eq!(loaded.report.error_count(), 0);
///
/// # // Cleanup (hidden from docs)
/// # std::fs::remove_dir_all(&dir).ok();
/// # Ok::<(), biosignal_windows::SignalsError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    config: DatasetConfig,
}

impl DataLoader {
    pub fn new(config: DatasetConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// Lists matching files below the dataset root, sorted by path
    ///
    /// # Errors
    ///
    /// * `SignalsError::DirectoryNotFound` - root does not exist
    /// * `SignalsError::Pattern` - file pattern is not a valid glob
    pub fn discover_files(&self) -> Result<Vec<PathBuf>> {
        let root = &self.config.root;
        if !root.is_dir() {
            return Err(SignalsError::DirectoryNotFound(root.display().to_string()));
        }

        // 根目录本身按字面匹配
        let pattern = Path::new(&glob::Pattern::escape(&root.to_string_lossy()))
            .join("**")
            .join(&self.config.file_pattern);
        let mut files = Vec::new();
        for entry in glob::glob(&pattern.to_string_lossy())? {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => warn!("skipping unreadable path {}: {}", e.path().display(), e),
            }
        }
        files.sort();
        Ok(files)
    }

    /// Loads every recognized recording under the dataset root
    ///
    /// A missing root or a root without matching files yields an empty
    /// dataset and a warning. If two files map to the same patient id the
    /// later one replaces the earlier.
    pub fn load(&self) -> Result<LoadedDataset> {
        let files = match self.discover_files() {
            Ok(files) => files,
            Err(SignalsError::DirectoryNotFound(root)) => {
                warn!("dataset root '{}' does not exist", root);
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let mut loaded = LoadedDataset::default();
        loaded.report.files_found = files.len();
        info!("found {} signal files", files.len());

        if files.is_empty() {
            warn!(
                "no files matching '{}' under '{}'",
                self.config.file_pattern,
                self.config.root.display()
            );
            return Ok(loaded);
        }

        for path in files {
            match self.load_patient(&path) {
                Ok((patient, recording)) => {
                    match loaded.data.entry(patient) {
                        Entry::Occupied(mut slot) => {
                            warn!(
                                "patient {} loaded again from {}, replacing earlier recording",
                                patient,
                                path.display()
                            );
                            slot.insert(recording);
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(recording);
                            loaded.patients.push(patient);
                        }
                    }
                    loaded.report.loaded += 1;
                }
                Err(e) => {
                    warn!("failed to load {}: {}", path.display(), e);
                    loaded.report.errors.push((path, e.to_string()));
                }
            }
        }

        info!(
            "loaded {} patients ({} errors)",
            loaded.patients.len(),
            loaded.report.error_count()
        );
        Ok(loaded)
    }

    fn load_patient(&self, path: &Path) -> Result<(PatientId, PatientRecording)> {
        let patient = patient_id_from_path(path)?;
        Ok((patient, self.load_file(path)?))
    }

    /// Parses one CSV file into an ECG/respiration recording
    ///
    /// Blank or non-numeric cells become `NaN`; windows containing them are
    /// later discarded by the window builder.
    ///
    /// # Errors
    ///
    /// * `SignalsError::Io` - file cannot be opened
    /// * `SignalsError::Csv` - malformed CSV
    /// * `SignalsError::MissingColumn` - ECG or respiration column absent
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<PatientRecording> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(file);

        let headers = reader.headers()?.clone();
        let ecg_idx = column_index(&headers, &self.config.ecg_column, path)?;
        let resp_idx = column_index(&headers, &self.config.resp_column, path)?;

        let mut ecg = Vec::new();
        let mut resp = Vec::new();
        for record in reader.records() {
            let record = record?;
            ecg.push(record.get(ecg_idx).map_or(f64::NAN, parse_sample));
            resp.push(record.get(resp_idx).map_or(f64::NAN, parse_sample));
        }

        Ok(PatientRecording::new(ecg, resp))
    }
}

/// Loads the BIDMC dataset from its default location
///
/// Returns the patient-to-recording map and the loaded patient ids.
pub fn load_bidmc_data() -> Result<(PatientData, Vec<PatientId>)> {
    let loaded = DataLoader::new(DatasetConfig::default()).load()?;
    Ok((loaded.data, loaded.patients))
}

/// 从文件名提取患者编号，例如 `bidmc_45_Signals.csv` -> 45
pub fn patient_id_from_path(path: &Path) -> Result<PatientId> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| SignalsError::InvalidFileName(path.display().to_string()))?;

    // 去掉第一个 '.' 之后的所有扩展名
    let stem = name.split('.').next().unwrap_or(name);

    stem.split('_')
        .nth(1)
        .and_then(|field| field.trim().parse::<PatientId>().ok())
        .ok_or_else(|| SignalsError::InvalidFileName(name.to_string()))
}

fn column_index(headers: &csv::StringRecord, column: &str, path: &Path) -> Result<usize> {
    let wanted = column.trim();
    headers
        .iter()
        .position(|h| h.trim() == wanted)
        .ok_or_else(|| SignalsError::MissingColumn {
            column: wanted.to_string(),
            path: path.display().to_string(),
        })
}
