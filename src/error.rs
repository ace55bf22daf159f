use std::io;
use thiserror::Error;

use crate::types::{Partition, PatientId};

#[derive(Debug, Error)]
pub enum SignalsError {
    #[error("Patient {patient} listed in {partition} partition has no recording")]
    PatientNotFound {
        patient: PatientId,
        partition: Partition,
    },

    #[error("No windows survived in {0} partition")]
    EmptyPartition(Partition),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Patient {patient} is listed in both {first} and {second} partitions")]
    OverlappingPartitions {
        patient: PatientId,
        first: Partition,
        second: Partition,
    },

    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Column '{column}' not found in {path}")]
    MissingColumn { column: String, path: String },

    #[error("Cannot derive patient id from file name: {0}")]
    InvalidFileName(String),

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, SignalsError>;
