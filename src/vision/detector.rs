use crate::config::DetectorConfig;
use crate::error::PipelineError;
use image::GrayImage;
use rustface::{Detector as _, ImageData};
use tracing::info;

/// Axis-aligned face region in source-image pixel coordinates.
///
/// Ephemeral: used only to annotate a kept artifact, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Face-region detection over a grayscale raster.
///
/// The detector is a black box to the pipeline: it proposes zero or more
/// rectangular regions, in its own enumeration order, with no dedup or
/// overlap merging applied downstream.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, image: &GrayImage) -> Result<Vec<FaceRegion>, PipelineError>;
}

/// SeetaFace cascade detector.
///
/// The underlying detector object is not `Send`, so only the model path and
/// parameters are stored and a detector is built per detection call.
pub struct CascadeDetector {
    config: DetectorConfig,
}

impl CascadeDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }
}

impl FaceDetector for CascadeDetector {
    fn detect(&self, image: &GrayImage) -> Result<Vec<FaceRegion>, PipelineError> {
        let mut detector = rustface::create_detector(&self.config.model_path)
            .map_err(|e| PipelineError::ClassifierUnavailable(e.to_string()))?;

        detector.set_min_face_size(self.config.min_size);
        // The cascade's score threshold plays the role of the neighbor-count
        // vote; pyramid scaling is the inverse of the scan scale factor.
        detector.set_score_thresh(self.config.min_neighbors as f64);
        detector.set_pyramid_scale_factor((1.0 / self.config.scale_factor) as f32);
        detector.set_slide_window_step(4, 4);

        let mut data = ImageData::new(image.as_raw(), image.width(), image.height());
        let faces = detector.detect(&mut data);

        info!(
            "Detector found {} face region(s) in {}x{} image",
            faces.len(),
            image.width(),
            image.height()
        );

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceRegion {
                    x: bbox.x(),
                    y: bbox.y(),
                    width: bbox.width(),
                    height: bbox.height(),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_is_classifier_unavailable() {
        let detector = CascadeDetector::new(DetectorConfig {
            model_path: "/nonexistent/model.bin".to_string(),
            scale_factor: 1.1,
            min_neighbors: 5,
            min_size: 30,
        });

        let image = GrayImage::new(64, 64);
        let err = detector.detect(&image).unwrap_err();
        assert!(
            matches!(err, PipelineError::ClassifierUnavailable(_)),
            "got {:?}",
            err
        );
    }
}
