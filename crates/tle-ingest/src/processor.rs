//! Stage 1 core processor and `StageProcessor` wiring.

use crate::config::Stage1Config;
use crate::epoch_analysis::analyze;
use crate::filter::{apply_epoch_filter, apply_sampling};
use crate::loader::load_directory;
use crate::types::Stage1Output;
use orbit_core::stage::StageProcessor;
use orbit_core::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub struct Stage1Core {
    config: Stage1Config,
}

impl Stage1Core {
    pub fn run(&self) -> Result<Stage1Output> {
        let (satellites, mut stats) = load_directory(&self.config.tle_input_dir)?;

        let (satellites, filtered_out) =
            apply_epoch_filter(satellites, &self.config.epoch_filter);
        stats.filtered_by_epoch = filtered_out;

        let (satellites, sampled_out) = apply_sampling(satellites, &self.config.sampling);
        stats.sampled_out = sampled_out;

        if satellites.is_empty() {
            return Err(orbit_core::PipelineError::CorruptInput(
                "no satellites remain after filtering/sampling".to_string(),
            ));
        }

        let epoch_analysis = analyze(&satellites);

        // spec §6: epoch_analysis.json is cross-stage metadata Stage 4 reads
        // independently of the main stage1 output file.
        std::fs::create_dir_all(&self.config.output_dir)?;
        let epoch_path = self.config.output_dir.join("epoch_analysis.json");
        let file = std::fs::File::create(epoch_path)?;
        serde_json::to_writer_pretty(file, &epoch_analysis)?;

        Ok(Stage1Output {
            satellites,
            stats,
            epoch_analysis,
        })
    }
}

pub struct Stage1Processor {
    pub config_path: PathBuf,
    pub output_dir: PathBuf,
}

impl StageProcessor for Stage1Processor {
    type Config = Stage1Config;
    type CoreProcessor = Stage1Core;
    type Output = Stage1Output;

    const STAGE_ID: u8 = 1;
    const STAGE_NAME: &'static str = "TLE Loading";

    fn config_path(&self) -> PathBuf {
        self.config_path.clone()
    }

    fn output_dir(&self) -> PathBuf {
        self.output_dir.clone()
    }

    fn load_config(&self, path: &Path) -> Result<Self::Config> {
        orbit_core::config::load_yaml_config(path)
    }

    fn create_processor(&self, config: Self::Config) -> Result<Self::CoreProcessor> {
        Ok(Stage1Core { config })
    }

    fn run_core(
        &self,
        processor: &Self::CoreProcessor,
        _previous_output: Option<Value>,
    ) -> Result<Self::Output> {
        processor.run()
    }
}
