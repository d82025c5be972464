//! Sub-pixel intensity lookup.

use circulant_core::GrayImage;
use serde::{Deserialize, Serialize};

/// Reads image intensity at a real-valued coordinate.
///
/// `get_fast` may only be called where `is_in_fast_bounds` holds. `get` is
/// valid anywhere the truncated coordinate lies inside the image.
pub trait InterpolatePixel: Send + Sync {
    fn is_in_fast_bounds(&self, image: &GrayImage, x: f32, y: f32) -> bool;

    fn get_fast(&self, image: &GrayImage, x: f32, y: f32) -> f32;

    fn get(&self, image: &GrayImage, x: f32, y: f32) -> f32;
}

/// Which interpolator the tracker samples with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interpolation {
    #[default]
    Bilinear,
    NearestNeighbor,
}

impl Interpolation {
    pub fn build(self) -> Box<dyn InterpolatePixel> {
        match self {
            Self::Bilinear => Box::new(Bilinear),
            Self::NearestNeighbor => Box::new(NearestNeighbor),
        }
    }
}

/// Bilinear interpolation over the four surrounding pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bilinear;

impl InterpolatePixel for Bilinear {
    #[inline]
    fn is_in_fast_bounds(&self, image: &GrayImage, x: f32, y: f32) -> bool {
        x >= 0.0 && y >= 0.0 && x < (image.width - 1) as f32 && y < (image.height - 1) as f32
    }

    #[inline]
    fn get_fast(&self, image: &GrayImage, x: f32, y: f32) -> f32 {
        let xt = x as u32;
        let yt = y as u32;
        let ax = x - xt as f32;
        let ay = y - yt as f32;

        let p00 = image.get_unchecked(xt, yt);
        let p10 = image.get_unchecked(xt + 1, yt);
        let p01 = image.get_unchecked(xt, yt + 1);
        let p11 = image.get_unchecked(xt + 1, yt + 1);

        (1.0 - ax) * (1.0 - ay) * p00 + ax * (1.0 - ay) * p10 + (1.0 - ax) * ay * p01 + ax * ay * p11
    }

    fn get(&self, image: &GrayImage, x: f32, y: f32) -> f32 {
        let xf = x.floor();
        let yf = y.floor();
        let ax = x - xf;
        let ay = y - yf;
        let (xt, yt) = (xf as i32, yf as i32);

        // Neighbours past the edge repeat the border pixel.
        let p00 = image.get(xt, yt);
        let p10 = image.get(xt + 1, yt);
        let p01 = image.get(xt, yt + 1);
        let p11 = image.get(xt + 1, yt + 1);

        (1.0 - ax) * (1.0 - ay) * p00 + ax * (1.0 - ay) * p10 + (1.0 - ax) * ay * p01 + ax * ay * p11
    }
}

/// Nearest pixel lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighbor;

impl InterpolatePixel for NearestNeighbor {
    #[inline]
    fn is_in_fast_bounds(&self, image: &GrayImage, x: f32, y: f32) -> bool {
        x >= 0.0 && y >= 0.0 && x + 0.5 < image.width as f32 && y + 0.5 < image.height as f32
    }

    #[inline]
    fn get_fast(&self, image: &GrayImage, x: f32, y: f32) -> f32 {
        image.get_unchecked((x + 0.5) as u32, (y + 0.5) as u32)
    }

    fn get(&self, image: &GrayImage, x: f32, y: f32) -> f32 {
        image.get(x.round() as i32, y.round() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: u32, height: u32) -> GrayImage {
        let mut img = GrayImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                img.set(x, y, (x * 10 + y) as f32);
            }
        }
        img
    }

    #[test]
    fn test_bilinear_exact_at_integers() {
        let img = ramp(5, 4);
        let interp = Bilinear;
        for y in 0..3u32 {
            for x in 0..4u32 {
                assert!(interp.is_in_fast_bounds(&img, x as f32, y as f32));
                assert_eq!(interp.get_fast(&img, x as f32, y as f32), img.get_unchecked(x, y));
            }
        }
        // Last row and column fall back to the safe path.
        assert!(!interp.is_in_fast_bounds(&img, 4.0, 1.0));
        assert_eq!(interp.get(&img, 4.0, 3.0), img.get_unchecked(4, 3));
    }

    #[test]
    fn test_bilinear_midpoint() {
        let img = ramp(5, 4);
        let v = Bilinear.get_fast(&img, 1.5, 2.5);
        // Linear ramp, so the interpolated value is exact.
        assert!((v - (15.0 + 2.5)).abs() < 1e-4);
        assert!((Bilinear.get(&img, 1.5, 2.5) - v).abs() < 1e-4);
    }

    #[test]
    fn test_bilinear_safe_path_clamps() {
        let img = ramp(5, 4);
        let v = Bilinear.get(&img, 4.5, 0.0);
        assert_eq!(v, img.get_unchecked(4, 0));
    }

    #[test]
    fn test_nearest_neighbor() {
        let img = ramp(5, 4);
        let nn = Interpolation::NearestNeighbor.build();
        assert!(nn.is_in_fast_bounds(&img, 1.4, 2.6));
        assert_eq!(nn.get_fast(&img, 1.4, 2.6), img.get_unchecked(1, 3));
        assert!(!nn.is_in_fast_bounds(&img, 4.6, 0.0));
        assert_eq!(nn.get(&img, 4.6, 0.0), img.get_unchecked(4, 0));
    }
}
