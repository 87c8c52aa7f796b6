// THEORY:
// The `region` module is the geometry layer of the pipeline. It takes the
// boolean mask produced by the segmenter and reduces it to a single answer:
// where is the target, if anywhere?
//
// Key architectural principles & algorithm steps:
// 1.  **Connected components**: mask-true pixels are grouped into maximal
//     4-connected regions with a breadth-first flood fill over a visited
//     grid, so each contiguous blob is measured exactly once.
// 2.  **Largest region wins**: the tracker follows one target, so among all
//     regions only the one with the greatest pixel area is considered.
//     There is no multi-target disambiguation beyond that.
// 3.  **Minimum-area gate**: a winning region smaller than the area
//     threshold is noise (stray pixels the clusterer happened to group with
//     the target color) and is reported as "absent."
// 4.  **Centroid as first-order moment**: the reported point is the region's
//     area-weighted average coordinate. A zero-count region reports absent
//     rather than dividing by zero.
// 5.  **Absence is a value, not an error**: the result is
//     `Option<TargetPoint>`. Error signaling is reserved for the device
//     boundary; an empty frame is an ordinary outcome.

use crate::core_modules::segmenter::segmenter::SegmentationMask;

pub mod region {
    use super::*;

    /// Default minimum region area in pixels. Anything smaller is treated
    /// as noise rather than a target.
    pub const MIN_REGION_AREA: usize = 20;

    /// The located target, in frame-native (screen) coordinates.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TargetPoint {
        pub x: i32,
        pub y: i32,
    }

    /// Finds the largest connected region in the mask and returns its
    /// centroid, or `None` when no region reaches `min_area`.
    pub fn locate_largest(mask: &SegmentationMask, min_area: usize) -> Option<TargetPoint> {
        let width = mask.width as usize;
        let height = mask.height as usize;
        if width == 0 || height == 0 {
            return None;
        }

        let mut visited = vec![false; width * height];
        let mut best_area = 0usize;
        let mut best_sum = (0u64, 0u64);

        for start in 0..width * height {
            if !mask.mask[start] || visited[start] {
                continue;
            }

            // Flood-fill one region, accumulating its area and coordinate
            // sums as it grows.
            let mut area = 0usize;
            let mut sum_x = 0u64;
            let mut sum_y = 0u64;
            let mut queue = vec![start];
            visited[start] = true;

            while let Some(index) = queue.pop() {
                let x = index % width;
                let y = index / width;
                area += 1;
                sum_x += x as u64;
                sum_y += y as u64;

                for (dx, dy) in &[(0i64, 1i64), (0, -1), (1, 0), (-1, 0)] {
                    let nx = x as i64 + dx;
                    let ny = y as i64 + dy;
                    if nx < 0 || nx >= width as i64 || ny < 0 || ny >= height as i64 {
                        continue;
                    }
                    let neighbor = ny as usize * width + nx as usize;
                    if mask.mask[neighbor] && !visited[neighbor] {
                        visited[neighbor] = true;
                        queue.push(neighbor);
                    }
                }
            }

            if area > best_area {
                best_area = area;
                best_sum = (sum_x, sum_y);
            }
        }

        if best_area < min_area || best_area == 0 {
            return None;
        }

        Some(TargetPoint {
            x: (best_sum.0 as f64 / best_area as f64) as i32,
            y: (best_sum.1 as f64 / best_area as f64) as i32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::region::*;
    use crate::core_modules::segmenter::segmenter::SegmentationMask;

    fn mask_from_rects(width: u32, height: u32, rects: &[(u32, u32, u32, u32)]) -> SegmentationMask {
        let mut mask = SegmentationMask::empty(width, height);
        for &(rx, ry, rw, rh) in rects {
            for y in ry..ry + rh {
                for x in rx..rx + rw {
                    mask.mask[(y * width + x) as usize] = true;
                }
            }
        }
        mask
    }

    #[test]
    fn empty_mask_reports_absent() {
        let mask = SegmentationMask::empty(30, 30);
        assert_eq!(locate_largest(&mask, MIN_REGION_AREA), None);
    }

    #[test]
    fn solid_blob_centroid_matches_true_centroid() {
        // 8x8 blob with top-left corner at (16, 16): true centroid (19.5, 19.5).
        let mask = mask_from_rects(40, 40, &[(16, 16, 8, 8)]);
        let point = locate_largest(&mask, MIN_REGION_AREA).unwrap();
        assert_eq!(point, TargetPoint { x: 19, y: 19 });
    }

    #[test]
    fn area_just_below_threshold_is_absent() {
        // 19 pixels in an L shape: one 4x4 block plus a 3-pixel tail.
        let mask = mask_from_rects(30, 30, &[(5, 5, 4, 4), (9, 5, 3, 1)]);
        assert_eq!(mask.mask.iter().filter(|set| **set).count(), 19);
        assert_eq!(locate_largest(&mask, MIN_REGION_AREA), None);
    }

    #[test]
    fn area_at_threshold_is_present() {
        let mask = mask_from_rects(30, 30, &[(5, 5, 4, 5)]);
        assert_eq!(mask.mask.iter().filter(|set| **set).count(), 20);
        assert!(locate_largest(&mask, MIN_REGION_AREA).is_some());
    }

    #[test]
    fn largest_of_several_regions_wins() {
        // A small qualifying region and a larger one, well separated.
        let mask = mask_from_rects(60, 60, &[(2, 2, 5, 5), (30, 30, 10, 10)]);
        let point = locate_largest(&mask, MIN_REGION_AREA).unwrap();
        assert_eq!(point, TargetPoint { x: 34, y: 34 });
    }

    #[test]
    fn diagonal_touch_does_not_merge_regions() {
        // Two 4x4 blocks meeting only at a corner: 4-connectivity keeps them
        // separate, and each alone is below the threshold of 20.
        let mask = mask_from_rects(30, 30, &[(5, 5, 4, 4), (9, 9, 4, 4)]);
        assert_eq!(locate_largest(&mask, MIN_REGION_AREA), None);
    }
}
