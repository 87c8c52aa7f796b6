// THEORY:
// The `segmenter` is the perception engine of the pipeline. It separates the
// target-colored pixels of a frame from the background without any trained
// model, using unsupervised k-means clustering over the multi-color-space
// feature vectors from the `feature` module.
//
// Key architectural principles & algorithm steps:
// 1.  **Refit every frame**: the clustering is refit from scratch on every
//     frame, never updated incrementally. Frame content changes completely
//     between iterations, so cluster assignments are only meaningful against
//     the current frame's own color distribution.
// 2.  **Spread seeding**: centroids are seeded by picking the first pixel and
//     then repeatedly the pixel farthest from all chosen centroids. This
//     avoids the classic failure of random seeding collapsing two centroids
//     onto the dominant background color.
// 3.  **Target selection on base RGB only**: after clustering, the populated
//     cluster whose centroid is nearest to the target color - measured in
//     Euclidean distance on the RGB dimensions only - is chosen, provided
//     that distance passes the tolerance gate. The extra color spaces shape
//     the partition; they do not shape the selection. The gate rejects
//     frames whose nearest cluster is still nowhere near the target color,
//     which otherwise would mask an arbitrary background cluster.
// 4.  **Bounded cost**: clustering a full frame is the dominant per-iteration
//     cost, so the frame may be downsampled before clustering. The output
//     mask is always scaled back to frame-native coordinates, so downstream
//     geometry never knows downsampling happened.
// 5.  **Degeneracy is not an error**: a uniform frame cannot be partitioned.
//     The segmenter returns an all-false mask and lets the region extractor
//     report "no target."

use crate::core_modules::feature::feature::{FEATURE_DIM, FeatureVec, feature_vector};
use crate::pipeline::DetectionConfig;

pub mod segmenter {
    use super::*;
    use image::RgbaImage;
    use image::imageops::{self, FilterType};

    /// Fixed number of Lloyd iterations per frame. The partition only has to
    /// separate target from background, not converge to optimality.
    const KMEANS_ITERATIONS: usize = 10;

    /// A boolean mask over the frame, flagging pixels assigned to the
    /// target-colored cluster. Always frame-native dimensions, row-major.
    pub struct SegmentationMask {
        pub width: u32,
        pub height: u32,
        pub mask: Vec<bool>,
    }

    impl SegmentationMask {
        /// An all-false mask, the "nothing found" result.
        pub fn empty(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                mask: vec![false; (width * height) as usize],
            }
        }

        pub fn is_set(&self, x: u32, y: u32) -> bool {
            self.mask[(y * self.width + x) as usize]
        }
    }

    /// The color the segmenter hunts for, with its acceptance gate.
    #[derive(Debug, Clone, Copy)]
    pub struct TargetColor {
        pub rgb: [u8; 3],
        /// Maximum RGB-space distance between the selected cluster's
        /// centroid and `rgb` for the cluster to count as the target.
        pub max_rgb_distance: f32,
    }

    impl TargetColor {
        /// Builds a target from the control surface's fields: an RGB triple
        /// and a 0-100 tolerance, scaled onto the 0-255 channel range.
        pub fn new(rgb: [u8; 3], tolerance: u8) -> Self {
            Self {
                rgb,
                max_rgb_distance: tolerance.min(100) as f32 * 2.55,
            }
        }
    }

    /// The main function of the segmentation layer.
    /// Clusters the frame's pixels and returns the mask of the cluster
    /// nearest the target color.
    pub fn segment(
        frame: &RgbaImage,
        target: TargetColor,
        config: &DetectionConfig,
    ) -> SegmentationMask {
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return SegmentationMask::empty(width, height);
        }

        // --- 1. Optional downsampling ---
        // Clustering cost is linear in pixel count, so large frames are
        // reduced before feature extraction. Nearest-neighbor keeps the
        // palette intact; smoothing filters would invent in-between colors.
        let resized;
        let source: &RgbaImage = if width.max(height) > config.max_cluster_dim {
            let scale = config.max_cluster_dim as f64 / width.max(height) as f64;
            let reduced_w = ((width as f64 * scale) as u32).max(1);
            let reduced_h = ((height as f64 * scale) as u32).max(1);
            resized = imageops::resize(frame, reduced_w, reduced_h, FilterType::Nearest);
            &resized
        } else {
            frame
        };
        let (reduced_w, reduced_h) = source.dimensions();

        // --- 2. Feature extraction ---
        let features: Vec<FeatureVec> = source
            .pixels()
            .map(|p| feature_vector([p[0], p[1], p[2]]))
            .collect();

        // --- 3. Clustering, refit against this frame alone ---
        let Some(clustering) = kmeans(&features, config.cluster_count) else {
            return SegmentationMask::empty(width, height);
        };

        // --- 4. Target cluster selection (base RGB dimensions only) ---
        let Some(chosen) = nearest_populated_cluster(&clustering, target) else {
            return SegmentationMask::empty(width, height);
        };

        // --- 5. Mask construction at frame-native coordinates ---
        // Each native pixel maps back onto its reduced-grid cell, so the
        // mask the region extractor sees is always in screen coordinates.
        let mut mask = vec![false; (width * height) as usize];
        for y in 0..height {
            let sy = y * reduced_h / height;
            for x in 0..width {
                let sx = x * reduced_w / width;
                mask[(y * width + x) as usize] =
                    clustering.assignments[(sy * reduced_w + sx) as usize] == chosen;
            }
        }

        SegmentationMask {
            width,
            height,
            mask,
        }
    }

    struct Clustering {
        centroids: Vec<FeatureVec>,
        assignments: Vec<usize>,
        counts: Vec<usize>,
    }

    /// Runs k-means over the feature vectors. Returns `None` when the input
    /// is degenerate (empty, or uniform enough that no second centroid can
    /// be seeded apart from the first).
    fn kmeans(features: &[FeatureVec], k: usize) -> Option<Clustering> {
        if features.is_empty() || k == 0 {
            return None;
        }
        let k = k.min(features.len());

        // Seed: first pixel, then repeatedly the pixel farthest from every
        // centroid chosen so far, sampled for speed on large frames.
        let mut centroids: Vec<FeatureVec> = Vec::with_capacity(k);
        centroids.push(features[0]);
        let stride = features.len() / 100 + 1;
        for seed_index in 1..k {
            let mut max_dist = 0.0f32;
            let mut best = features[0];
            for candidate in features.iter().step_by(stride) {
                let min_dist = centroids
                    .iter()
                    .map(|c| squared_distance(candidate, c))
                    .fold(f32::INFINITY, f32::min);
                if min_dist > max_dist {
                    max_dist = min_dist;
                    best = *candidate;
                }
            }
            // If even the farthest pixel coincides with the first centroid,
            // the frame is uniform and cannot be partitioned.
            if seed_index == 1 && max_dist < f32::EPSILON {
                return None;
            }
            centroids.push(best);
        }

        // Lloyd iterations: assign, then recompute centroids.
        for _ in 0..KMEANS_ITERATIONS {
            let mut sums = vec![[0.0f64; FEATURE_DIM]; k];
            let mut counts = vec![0usize; k];
            for feature in features {
                let nearest = nearest_centroid(&centroids, feature);
                for (dim, value) in feature.iter().enumerate() {
                    sums[nearest][dim] += *value as f64;
                }
                counts[nearest] += 1;
            }
            for (cluster, centroid) in centroids.iter_mut().enumerate() {
                // An empty cluster keeps its previous centroid.
                if counts[cluster] > 0 {
                    for dim in 0..FEATURE_DIM {
                        centroid[dim] = (sums[cluster][dim] / counts[cluster] as f64) as f32;
                    }
                }
            }
        }

        // Final assignment pass against the settled centroids.
        let mut counts = vec![0usize; k];
        let assignments: Vec<usize> = features
            .iter()
            .map(|feature| {
                let nearest = nearest_centroid(&centroids, feature);
                counts[nearest] += 1;
                nearest
            })
            .collect();

        Some(Clustering {
            centroids,
            assignments,
            counts,
        })
    }

    fn nearest_centroid(centroids: &[FeatureVec], feature: &FeatureVec) -> usize {
        let mut best = 0;
        let mut best_dist = f32::INFINITY;
        for (index, centroid) in centroids.iter().enumerate() {
            let dist = squared_distance(feature, centroid);
            if dist < best_dist {
                best_dist = dist;
                best = index;
            }
        }
        best
    }

    /// Picks the cluster whose centroid's RGB components are nearest the
    /// target color, subject to the tolerance gate. Empty clusters (possible
    /// when seeding duplicated a centroid) are skipped so the mask can never
    /// silently come from a cluster that owns no pixels.
    fn nearest_populated_cluster(clustering: &Clustering, target: TargetColor) -> Option<usize> {
        let mut best: Option<usize> = None;
        let mut best_dist = f32::INFINITY;
        for (index, centroid) in clustering.centroids.iter().enumerate() {
            if clustering.counts[index] == 0 {
                continue;
            }
            let dist = (centroid[0] - target.rgb[0] as f32).powi(2)
                + (centroid[1] - target.rgb[1] as f32).powi(2)
                + (centroid[2] - target.rgb[2] as f32).powi(2);
            if dist < best_dist {
                best_dist = dist;
                best = Some(index);
            }
        }
        // A small epsilon keeps a tolerance of zero usable on exact-color
        // clusters despite floating-point averaging.
        if best_dist.sqrt() > target.max_rgb_distance + 1e-3 {
            return None;
        }
        best
    }

    fn squared_distance(a: &FeatureVec, b: &FeatureVec) -> f32 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::segmenter::*;
    use crate::pipeline::DetectionConfig;
    use image::{Rgba, RgbaImage};

    fn config_without_downsampling() -> DetectionConfig {
        DetectionConfig {
            max_cluster_dim: 10_000,
            ..DetectionConfig::default()
        }
    }

    fn frame_with_blob(
        width: u32,
        height: u32,
        background: [u8; 3],
        blob: [u8; 3],
        blob_rect: (u32, u32, u32, u32),
    ) -> RgbaImage {
        let (bx, by, bw, bh) = blob_rect;
        RgbaImage::from_fn(width, height, |x, y| {
            let inside = x >= bx && x < bx + bw && y >= by && y < by + bh;
            let rgb = if inside { blob } else { background };
            Rgba([rgb[0], rgb[1], rgb[2], 255])
        })
    }

    fn pink_target() -> TargetColor {
        TargetColor::new([201, 0, 141], 30)
    }

    #[test]
    fn uniform_frame_yields_empty_mask() {
        let frame = RgbaImage::from_pixel(32, 32, Rgba([90, 90, 90, 255]));
        let mask = segment(&frame, pink_target(), &config_without_downsampling());
        assert!(mask.mask.iter().all(|set| !set));
    }

    #[test]
    fn blob_pixels_are_assigned_to_target_cluster() {
        let frame = frame_with_blob(40, 40, [10, 40, 200], [201, 0, 141], (16, 16, 8, 8));
        let mask = segment(&frame, pink_target(), &config_without_downsampling());

        for y in 16..24 {
            for x in 16..24 {
                assert!(mask.is_set(x, y), "blob pixel ({x}, {y}) not in mask");
            }
        }
        assert!(!mask.is_set(0, 0));
        assert!(!mask.is_set(39, 39));
    }

    #[test]
    fn mask_is_frame_native_after_downsampling() {
        let frame = frame_with_blob(200, 120, [10, 40, 200], [201, 0, 141], (80, 40, 40, 40));
        let config = DetectionConfig {
            max_cluster_dim: 50,
            ..DetectionConfig::default()
        };
        let mask = segment(&frame, pink_target(), &config);

        assert_eq!(mask.width, 200);
        assert_eq!(mask.height, 120);
        // The interior of the blob survives downsampling; edges may wobble.
        assert!(mask.is_set(100, 60));
        assert!(!mask.is_set(10, 10));
    }

    #[test]
    fn out_of_tolerance_clusters_are_rejected() {
        // A green blob on blue: well-formed clusters, but neither is
        // anywhere near the pink target, so the gate empties the mask.
        let frame = frame_with_blob(40, 40, [10, 40, 200], [20, 220, 40], (16, 16, 8, 8));
        let mask = segment(&frame, pink_target(), &config_without_downsampling());
        assert!(mask.mask.iter().all(|set| !set));
    }

    #[test]
    fn zero_tolerance_still_accepts_an_exact_match() {
        let frame = frame_with_blob(40, 40, [10, 40, 200], [201, 0, 141], (16, 16, 8, 8));
        let target = TargetColor::new([201, 0, 141], 0);
        let mask = segment(&frame, target, &config_without_downsampling());
        assert!(mask.is_set(20, 20));
    }

    #[test]
    fn zero_sized_frame_is_not_a_panic() {
        let frame = RgbaImage::new(0, 0);
        let mask = segment(&frame, pink_target(), &config_without_downsampling());
        assert!(mask.mask.is_empty());
    }
}
