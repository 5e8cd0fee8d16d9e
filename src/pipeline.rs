use image::DynamicImage;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::AnalysisError;

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

impl DebugConfig {
    /// The directory must be empty or non-existent; it is created if needed.
    pub fn new(output_dir: PathBuf) -> Result<Self, AnalysisError> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(AnalysisError::Config(format!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                )));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        Ok(Self { output_dir })
    }
}

/// Context available to every stage of one analysis call
#[derive(Clone, Debug, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

impl PipelineContext {
    pub fn is_debug(&self) -> bool {
        self.debug.is_some()
    }

    /// Context whose dumps land in `<output_dir>/<label>/`, so calls
    /// running side by side never write the same files.
    pub fn scoped(&self, label: &str) -> PipelineContext {
        let Some(debug_config) = &self.debug else {
            return self.clone();
        };

        let output_dir = debug_config.output_dir.join(label);
        if let Err(e) = std::fs::create_dir_all(&output_dir) {
            warn!(dir = %output_dir.display(), error = %e, "failed to create debug directory");
        }
        PipelineContext {
            debug: Some(DebugConfig { output_dir }),
        }
    }

    /// Save an intermediate raster as `NN_step_name.png`.
    ///
    /// Failures are logged only; dumps never change an analysis.
    pub fn save_debug_image(&self, step_index: usize, step_name: &str, image: &DynamicImage) {
        let Some(debug_config) = &self.debug else {
            return;
        };

        let filename = format!(
            "{:02}_{}.png",
            step_index,
            step_name.to_lowercase().replace(' ', "_")
        );
        let output_path = debug_config.output_dir.join(&filename);

        match image.save(&output_path) {
            Ok(()) => debug!(file = %filename, "debug image saved"),
            Err(e) => warn!(file = %filename, error = %e, "failed to save debug image"),
        }
    }
}
