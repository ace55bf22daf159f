use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, SignalsError};

/// 患者编号（正整数）
pub type PatientId = u32;

/// 患者编号到录音的查找表
pub type PatientData = HashMap<PatientId, PatientRecording>;

/// 单个患者的成对信号记录
///
/// `ecg` 为信号 A（II 导联心电），`resp` 为信号 B（呼吸）。
/// 两路信号采样率相同，长度可能不一致。
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecording {
    pub ecg: Vec<f64>,
    pub resp: Vec<f64>,
}

impl PatientRecording {
    pub fn new(ecg: Vec<f64>, resp: Vec<f64>) -> Self {
        Self { ecg, resp }
    }

    /// 可用于切窗的样本数
    ///
    /// 两路长度不一致时取较短者，超出部分不参与切窗。
    pub fn usable_len(&self) -> usize {
        self.ecg.len().min(self.resp.len())
    }

    /// 两路信号长度是否一致
    pub fn is_aligned(&self) -> bool {
        self.ecg.len() == self.resp.len()
    }
}

/// 数据集划分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Train,
    Validation,
    Test,
}

impl Partition {
    /// 固定的处理顺序
    pub const ALL: [Partition; 3] = [Partition::Train, Partition::Validation, Partition::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Train => "train",
            Partition::Validation => "validation",
            Partition::Test => "test",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Patient membership of the train/validation/test partitions
///
/// The three lists must be disjoint. Order inside each list is kept and
/// determines the row order of the windowed output.
///
/// # Examples
///
/// ```rust
/// use biosignal_windows::{Partition, PatientSplit};
///
/// let split = PatientSplit::new(vec![1, 2, 3], vec![4], vec![5])?;
/// assert_eq!(split.ids(Partition::Train), &[1, 2, 3]);
///
/// // A patient may not appear in two partitions
/// assert!(PatientSplit::new(vec![1, 2], vec![2], vec![5]).is_err());
/// # Ok::<(), biosignal_windows::SignalsError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PatientSplit {
    train: Vec<PatientId>,
    validation: Vec<PatientId>,
    test: Vec<PatientId>,
}

impl PatientSplit {
    pub fn new(
        train: Vec<PatientId>,
        validation: Vec<PatientId>,
        test: Vec<PatientId>,
    ) -> Result<Self> {
        let split = Self { train, validation, test };

        let mut owner: HashMap<PatientId, Partition> = HashMap::new();
        for partition in Partition::ALL {
            for &patient in split.ids(partition) {
                match owner.get(&patient) {
                    Some(&first) if first != partition => {
                        return Err(SignalsError::OverlappingPartitions {
                            patient,
                            first,
                            second: partition,
                        });
                    }
                    Some(_) => {}
                    None => {
                        owner.insert(patient, partition);
                    }
                }
            }
        }

        Ok(split)
    }

    /// 指定划分中的患者列表
    pub fn ids(&self, partition: Partition) -> &[PatientId] {
        match partition {
            Partition::Train => &self.train,
            Partition::Validation => &self.validation,
            Partition::Test => &self.test,
        }
    }
}
