// THEORY:
// The `pipeline` module composes the perception stack into a single call.
// It encapsulates the segment-then-locate sequence behind `locate_target`,
// so the control loop (and any other consumer) works with one clean
// operation: frame in, optional target point out.
//
// The pipeline is deliberately stateless between frames. Clustering is refit
// against every frame's own color distribution, so there is no model to
// carry over and nothing to reset when the tracker stops and restarts.

use crate::capture::Frame;
use crate::core_modules::region::region::{self, MIN_REGION_AREA, TargetPoint};
use crate::core_modules::segmenter::segmenter::{self, TargetColor};

/// Tunable parameters for the detection pipeline, fixed at construction.
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    /// Number of k-means clusters per frame. Small and fixed: the partition
    /// only has to pull the target color away from the background.
    pub cluster_count: usize,
    /// Frames whose longest side exceeds this are downsampled before
    /// clustering. The mask is always scaled back to native coordinates.
    pub max_cluster_dim: u32,
    /// Minimum connected-region area, in native pixels, for a detection to
    /// count as a target.
    pub min_region_area: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            cluster_count: 3,
            max_cluster_dim: 160,
            min_region_area: MIN_REGION_AREA,
        }
    }
}

/// The full per-frame detection stack: segmentation, then region geometry.
pub struct DetectionPipeline {
    config: DetectionConfig,
}

impl DetectionPipeline {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Runs one frame through the stack and returns the target centroid,
    /// or `None` when no qualifying region exists.
    pub fn locate_target(&self, frame: &Frame, target: TargetColor) -> Option<TargetPoint> {
        // Stage 1: Color segmentation
        let mask = segmenter::segment(frame, target, &self.config);

        // Stage 2: Region extraction
        region::locate_largest(&mask, self.config.min_region_area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn locates_the_centroid_of_a_solid_blob() {
        let frame = RgbaImage::from_fn(64, 64, |x, y| {
            let inside = (24..40).contains(&x) && (24..40).contains(&y);
            if inside {
                Rgba([201, 0, 141, 255])
            } else {
                Rgba([10, 40, 200, 255])
            }
        });
        let pipeline = DetectionPipeline::new(DetectionConfig {
            max_cluster_dim: 10_000,
            ..DetectionConfig::default()
        });

        let point = pipeline
            .locate_target(&frame, TargetColor::new([201, 0, 141], 30))
            .unwrap();
        assert_eq!((point.x, point.y), (31, 31));
    }

    #[test]
    fn frame_without_target_color_reports_absent() {
        let frame = RgbaImage::from_pixel(64, 64, Rgba([10, 40, 200, 255]));
        let pipeline = DetectionPipeline::new(DetectionConfig::default());
        assert_eq!(
            pipeline.locate_target(&frame, TargetColor::new([201, 0, 141], 30)),
            None
        );
    }
}
