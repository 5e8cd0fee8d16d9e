pub mod annotation;
pub mod classification;
pub mod contours;
pub mod infection;
pub mod measurement;
pub mod preprocessing;
pub mod quality;
pub mod segmentation;

use image::{DynamicImage, RgbImage};
use serde_json::Value;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::codec;
use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::pipeline::{DebugConfig, PipelineContext};
use crate::report::{
    AnalysisOutcome, AnalysisRequest, AnalysisResponse, AnalysisResult, INVALID_JSON_MESSAGE,
    WoundAssessment,
};
use crate::triage::{self, PreviousRecord};
use annotation::LabelFont;

/// Main analysis pipeline orchestrator.
///
/// Stateless between calls: every call owns its image, masks and regions,
/// so one analyzer can serve concurrent callers.
pub struct WoundAnalyzer {
    config: AnalyzerConfig,
    context: PipelineContext,
    font: LabelFont,
}

impl WoundAnalyzer {
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        let font = LabelFont::load(&config.annotation);
        Self {
            config,
            context: PipelineContext::default(),
            font,
        }
    }

    /// Enable debug mode with output directory.
    /// The directory must be empty or non-existent.
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self, AnalysisError> {
        self.context.debug = Some(DebugConfig::new(output_dir)?);
        Ok(self)
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Run the full pipeline on a decoded photo.
    pub fn analyze_image(&self, img: &RgbImage, previous: Option<&Value>) -> AnalysisResult {
        AnalysisResult::new(self.run(&self.context, img, previous))
    }

    /// Decode a transport-encoded photo, then analyze it.
    pub fn analyze_payload(
        &self,
        payload: &str,
        previous: Option<&Value>,
    ) -> Result<AnalysisResult, AnalysisError> {
        self.analyze_payload_in(&self.context, payload, previous)
    }

    fn analyze_payload_in(
        &self,
        context: &PipelineContext,
        payload: &str,
        previous: Option<&Value>,
    ) -> Result<AnalysisResult, AnalysisError> {
        if payload.trim().is_empty() {
            return Err(AnalysisError::EmptyPayload);
        }
        let img = codec::decode_image(payload)?;
        info!(width = img.width(), height = img.height(), "image decoded");
        Ok(AnalysisResult::new(self.run(context, &img, previous)))
    }

    /// Answer one request. Never fails: decode errors and unexpected
    /// faults, panics included, become an error record.
    pub fn respond(&self, request: &AnalysisRequest) -> AnalysisResponse {
        self.respond_in(&self.context, request)
    }

    fn respond_in(&self, context: &PipelineContext, request: &AnalysisRequest) -> AnalysisResponse {
        guarded(|| {
            self.analyze_payload_in(context, &request.image, request.previous_wound_data.as_ref())
        })
    }

    /// Answer for an already decoded photo, behind the same fault
    /// boundary as [`respond`](Self::respond).
    pub fn respond_to_image(&self, img: &RgbImage, previous: Option<&Value>) -> AnalysisResponse {
        guarded(|| Ok(self.analyze_image(img, previous)))
    }

    /// Parse a JSON request and answer it
    pub fn respond_to_json(&self, text: &str) -> AnalysisResponse {
        self.respond_to_json_in(&self.context, text)
    }

    /// [`respond_to_json`](Self::respond_to_json) with debug dumps kept
    /// under a `label` subdirectory of the debug root.
    pub fn respond_to_json_as(&self, label: &str, text: &str) -> AnalysisResponse {
        let context = self.context.scoped(label);
        self.respond_to_json_in(&context, text)
    }

    fn respond_to_json_in(&self, context: &PipelineContext, text: &str) -> AnalysisResponse {
        match serde_json::from_str::<AnalysisRequest>(text) {
            Ok(request) => self.respond_in(context, &request),
            Err(e) => {
                warn!(error = %e, "request is not valid JSON");
                AnalysisResponse::failed(INVALID_JSON_MESSAGE)
            }
        }
    }

    fn run(
        &self,
        context: &PipelineContext,
        img: &RgbImage,
        previous: Option<&Value>,
    ) -> AnalysisOutcome {
        if context.is_debug() {
            context
                .save_debug_image(0, "input", &DynamicImage::ImageRgb8(img.clone()));
        }

        // Step 1: photo quality gate
        let quality = quality::check_quality(img, &self.config.quality);
        if !quality.acceptable {
            info!(score = quality.score, issues = ?quality.issues, "photo rejected");
            return AnalysisOutcome::QualityRejected { quality };
        }

        // Step 2: isolate candidate wound regions. The HSV view is shared
        // with the infection screen.
        let hsv = preprocessing::to_hsv(img);
        let segmentation = segmentation::segment_hsv(&hsv, &self.config.segmentation);
        if context.is_debug() {
            context.save_debug_image(
                1,
                "wound mask",
                &DynamicImage::ImageLuma8(segmentation.mask.clone()),
            );
        }

        let Some(wound) = segmentation.largest() else {
            info!("no wound region detected");
            return AnalysisOutcome::NoWound { quality };
        };
        info!(
            regions = segmentation.regions.len(),
            area = wound.area,
            "wound region selected"
        );

        // Step 3: size
        let measurement = measurement::measure(wound, &self.config.measurement);

        // Step 4: wound type
        let wound_types = classification::classify(img, wound, &self.config.classification);

        // Step 5: infection signs
        let (infection, masks) =
            infection::screen_with_masks(img, &hsv, &segmentation.mask, &self.config.infection);
        if context.is_debug() {
            for (index, name, mask) in [
                (2, "discharge mask", &masks.discharge),
                (3, "necrosis mask", &masks.necrosis),
                (4, "inflammation ring", &masks.ring),
            ] {
                context
                    .save_debug_image(index, name, &DynamicImage::ImageLuma8(mask.clone()));
            }
        }

        // Step 6: overall risk
        let risk = triage::aggregate(&measurement, &wound_types, &infection, &self.config.risk);

        // Step 7: care instructions
        let treatment = triage::plan(
            &risk,
            &wound_types,
            &infection,
            &measurement,
            &self.config.treatment,
        );

        // Step 8: healing trend, best effort
        let comparison = previous
            .and_then(PreviousRecord::from_value)
            .and_then(|p| triage::compare(&measurement, &p, &self.config.comparison));

        // Step 9: overlay, cosmetic only
        let annotated = annotation::annotate(
            img,
            &segmentation.regions,
            &self.font,
            &self.config.annotation,
        );
        let visual_overlay =
            match codec::encode_jpeg_data_url(&annotated, self.config.annotation.jpeg_quality) {
                Ok(overlay) => Some(overlay),
                Err(e) => {
                    warn!(error = %e, "annotated overlay dropped");
                    None
                }
            };
        if context.is_debug() {
            context
                .save_debug_image(5, "annotated", &DynamicImage::ImageRgb8(annotated));
        }

        let message = triage::summary_message(risk.level, &wound_types);
        info!(risk = risk.level.as_str(), confidence = risk.confidence, "analysis complete");

        AnalysisOutcome::Assessed(Box::new(WoundAssessment {
            risk,
            message,
            wound_types,
            infection,
            measurement,
            treatment,
            quality,
            comparison,
            visual_overlay,
        }))
    }
}

impl Default for WoundAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn guarded(
    attempt: impl FnOnce() -> Result<AnalysisResult, AnalysisError>,
) -> AnalysisResponse {
    match panic::catch_unwind(AssertUnwindSafe(attempt)) {
        Ok(Ok(result)) => AnalysisResponse::Completed(result),
        Ok(Err(e)) => {
            warn!(error = %e, "analysis failed");
            AnalysisResponse::failed(e.public_message())
        }
        Err(payload) => {
            let reason = panic_reason(payload.as_ref());
            error!(reason = %reason, "analysis aborted unexpectedly");
            AnalysisResponse::failed(AnalysisError::Internal(reason).to_string())
        }
    }
}

fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown fault".to_string()
    }
}
