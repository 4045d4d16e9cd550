//! Stage 6: Event Detection & Dataset (spec §4.7).
//!
//! Median-RSRP serving-satellite selection, 3GPP TS 38.331 A3/A4/A5/D2
//! handover-event detection, dynamic-pool verification, and
//! satellite-keyed training-episode generation.

pub mod config;
pub mod dataset;
pub mod events;
pub mod ground_projection;
pub mod processor;
pub mod serving;
pub mod types;
pub mod validator;

pub use processor::{Stage6Core, Stage6Processor};
pub use types::{
    DatasetSplit, DynamicPoolVerification, Event, EventRecord, PoolStatusPoint, Stage6Metadata, Stage6Output,
    TrainingEpisode, TriggerContext,
};
pub use validator::Stage6Validator;
