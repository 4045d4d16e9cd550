//! Error taxonomy shared by every pipeline stage (spec §7).
//!
//! Recovery semantics are encoded in the variant, not left to callers to
//! infer: `MissingConfigField`/`CorruptInput`/`Io`/`EpochIndependence` abort
//! the stage; `RecordMalformed`/`TaskFailed` are counted and logged while the
//! batch continues; `SanityCheckFailed` means the stage completed but its
//! validator must fail the snapshot.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("missing required configuration field `{field}` (SOURCE: {source_citation})")]
    MissingConfigField {
        field: String,
        source_citation: String,
    },

    #[error("corrupt or unparseable input: {0}")]
    CorruptInput(String),

    #[error("record malformed: {0}")]
    RecordMalformed(String),

    #[error("per-satellite task failed for {satellite_id}: {reason}")]
    TaskFailed { satellite_id: String, reason: String },

    #[error("sanity check failed: {0}")]
    SanityCheckFailed(String),

    #[error("epoch independence validation failed: {0}")]
    EpochIndependence(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("no previous-stage output found in {0}")]
    NoPreviousOutput(String),

    #[error("stage failed: {0}")]
    StageFailed(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
