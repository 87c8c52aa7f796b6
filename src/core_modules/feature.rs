// THEORY:
// The `feature` module turns a raw RGB pixel into the feature vector the
// segmenter clusters on. A single color space is a poor basis for separating
// a target from its background under real screen conditions: RGB entangles
// brightness with chroma, HSV isolates hue but collapses near gray, and
// CIELAB is perceptually uniform but expensive to reason about alone.
// Concatenating all three gives the clusterer multiple "lenses" on the same
// pixel, which increases separability without any learned model.
//
// Key architectural principles:
// 1.  **Comparable magnitudes**: every channel is scaled into a 0-255 range
//     (hue halved to 0-180, Lab offset and scaled) so that plain Euclidean
//     distance weighs the spaces evenly instead of letting one dominate.
// 2.  **RGB first**: the first three dimensions are the raw RGB channels.
//     Cluster selection measures distance to the target color on these
//     dimensions only, so their position in the vector is part of the
//     module's contract.
// 3.  **Stateless utility**: pure functions of a single pixel; no frame
//     context, no caching.

pub mod feature {
    /// Number of dimensions in a pixel feature vector: RGB + HSV + Lab.
    pub const FEATURE_DIM: usize = 9;

    /// A single pixel's combined color-space representation.
    pub type FeatureVec = [f32; FEATURE_DIM];

    /// Builds the clustering feature vector for one RGB pixel.
    /// Layout: [r, g, b, h, s, v, l, a*, b*], all channels in 0-255 scale.
    pub fn feature_vector(rgb: [u8; 3]) -> FeatureVec {
        let [h, s, v] = rgb_to_hsv(rgb);
        let [l, a, b] = rgb_to_lab(rgb);
        [
            rgb[0] as f32,
            rgb[1] as f32,
            rgb[2] as f32,
            h,
            s,
            v,
            l,
            a,
            b,
        ]
    }

    /// Converts an RGB pixel to HSV with byte-scaled channels:
    /// hue in 0-180 (degrees halved), saturation and value in 0-255.
    pub fn rgb_to_hsv(rgb: [u8; 3]) -> [f32; 3] {
        let r = rgb[0] as f32 / 255.0;
        let g = rgb[1] as f32 / 255.0;
        let b = rgb[2] as f32 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let hue = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * (((g - b) / delta).rem_euclid(6.0))
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let saturation = if max == 0.0 { 0.0 } else { delta / max };

        [hue / 2.0, saturation * 255.0, max * 255.0]
    }

    /// Converts an RGB pixel to CIELAB (D65 white point) with byte-scaled
    /// channels: L in 0-255, a* and b* offset by 128.
    pub fn rgb_to_lab(rgb: [u8; 3]) -> [f32; 3] {
        let r = srgb_to_linear(rgb[0] as f32 / 255.0);
        let g = srgb_to_linear(rgb[1] as f32 / 255.0);
        let b = srgb_to_linear(rgb[2] as f32 / 255.0);

        // Linear RGB to XYZ, normalized against the D65 reference white.
        let x = (0.4124 * r + 0.3576 * g + 0.1805 * b) / 0.95047;
        let y = 0.2126 * r + 0.7152 * g + 0.0722 * b;
        let z = (0.0193 * r + 0.1192 * g + 0.9505 * b) / 1.08883;

        let fx = lab_f(x);
        let fy = lab_f(y);
        let fz = lab_f(z);

        let l = 116.0 * fy - 16.0;
        let a = 500.0 * (fx - fy);
        let b_star = 200.0 * (fy - fz);

        [l * 2.55, a + 128.0, b_star + 128.0]
    }

    fn srgb_to_linear(channel: f32) -> f32 {
        if channel <= 0.04045 {
            channel / 12.92
        } else {
            ((channel + 0.055) / 1.055).powf(2.4)
        }
    }

    fn lab_f(t: f32) -> f32 {
        if t > 0.008856 {
            t.cbrt()
        } else {
            7.787 * t + 16.0 / 116.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::feature::*;

    #[test]
    fn hsv_of_pure_red() {
        let [h, s, v] = rgb_to_hsv([255, 0, 0]);
        assert_eq!(h, 0.0);
        assert_eq!(s, 255.0);
        assert_eq!(v, 255.0);
    }

    #[test]
    fn hsv_of_pure_green_sits_at_half_scale_hue() {
        let [h, s, v] = rgb_to_hsv([0, 255, 0]);
        // 120 degrees, halved into the 0-180 byte scale.
        assert_eq!(h, 60.0);
        assert_eq!(s, 255.0);
        assert_eq!(v, 255.0);
    }

    #[test]
    fn hsv_of_gray_has_no_hue_or_saturation() {
        let [h, s, v] = rgb_to_hsv([128, 128, 128]);
        assert_eq!(h, 0.0);
        assert_eq!(s, 0.0);
        assert!((v - 128.0).abs() < 1.0);
    }

    #[test]
    fn lab_of_white_is_full_lightness_neutral_chroma() {
        let [l, a, b] = rgb_to_lab([255, 255, 255]);
        assert!((l - 255.0).abs() < 1.5, "l = {l}");
        assert!((a - 128.0).abs() < 1.5, "a = {a}");
        assert!((b - 128.0).abs() < 1.5, "b = {b}");
    }

    #[test]
    fn lab_of_black_is_zero_lightness() {
        let [l, a, b] = rgb_to_lab([0, 0, 0]);
        assert!(l.abs() < 0.5);
        assert!((a - 128.0).abs() < 0.5);
        assert!((b - 128.0).abs() < 0.5);
    }

    #[test]
    fn feature_vector_leads_with_raw_rgb() {
        let vector = feature_vector([201, 0, 141]);
        assert_eq!(&vector[..3], &[201.0, 0.0, 141.0]);
    }
}
