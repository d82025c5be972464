//! Single channel image buffers.
//!
//! [`GrayImage`] holds input frames as `f32` intensities in their native range
//! (typically `0..=255`). [`Plane`] is the `f64` working buffer the tracker
//! samples into and runs its numerics on. Both are tightly packed in raster
//! order with no row padding.

use crate::error::{Result, TrackError};

/// A grayscale frame stored as f32 values.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayImage {
    pub data: Vec<f32>,
    pub width: u32,
    pub height: u32,
}

impl GrayImage {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0.0; (width * height) as usize],
            width,
            height,
        }
    }

    /// Wrap existing pixel data, checking its length against the dimensions.
    pub fn from_vec(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        let expected = (width * height) as usize;
        if data.len() != expected {
            return Err(TrackError::DimensionMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Convert 8-bit luma samples.
    pub fn from_luma8(width: u32, height: u32, luma: &[u8]) -> Result<Self> {
        Self::from_vec(width, height, luma.iter().map(|&v| v as f32).collect())
    }

    #[inline]
    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Read a pixel, clamping the coordinate to the nearest edge.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> f32 {
        let x = x.clamp(0, self.width as i32 - 1) as u32;
        let y = y.clamp(0, self.height as i32 - 1) as u32;
        self.data[(y * self.width + x) as usize]
    }

    /// Read a pixel known to be in bounds.
    #[inline]
    pub fn get_unchecked(&self, x: u32, y: u32) -> f32 {
        self.data[(y * self.width + x) as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, val: f32) {
        if x < self.width && y < self.height {
            self.data[(y * self.width + x) as usize] = val;
        }
    }

    pub fn fill(&mut self, val: f32) {
        self.data.fill(val);
    }
}

/// A real-valued planar buffer used for templates, windows and responses.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub data: Vec<f64>,
    pub width: usize,
    pub height: usize,
}

impl Plane {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![0.0; width * height],
            width,
            height,
        }
    }

    /// Change the dimensions, reusing the allocation where possible.
    ///
    /// Contents are zeroed when the size actually changes.
    pub fn reshape(&mut self, width: usize, height: usize) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(width * height, 0.0);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn same_shape(&self, other: &Plane) -> bool {
        self.width == other.width && self.height == other.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, val: f64) {
        self.data[y * self.width + x] = val;
    }

    pub fn fill(&mut self, val: f64) {
        self.data.fill(val);
    }

    /// `self /= denominator`, element-wise.
    pub fn divide_scalar(&mut self, denominator: f64) {
        for v in &mut self.data {
            *v /= denominator;
        }
    }

    /// `self += value`, element-wise.
    pub fn add_scalar(&mut self, value: f64) {
        for v in &mut self.data {
            *v += value;
        }
    }

    /// `self *= other`, element-wise.
    pub fn multiply_elementwise(&mut self, other: &Plane) {
        debug_assert!(self.same_shape(other));
        for (v, w) in self.data.iter_mut().zip(&other.data) {
            *v *= w;
        }
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_image() {
        let mut img = GrayImage::new(4, 4);
        img.set(2, 3, 0.75);
        assert!((img.get(2, 3) - 0.75).abs() < 0.001);
        assert_eq!(img.get(-1, -1), img.get(0, 0));
        assert_eq!(img.get(100, 100), img.get(3, 3));
        assert!(img.is_in_bounds(3, 3));
        assert!(!img.is_in_bounds(4, 0));
        assert!(!img.is_in_bounds(0, -1));
    }

    #[test]
    fn test_from_vec_checks_length() {
        assert!(GrayImage::from_vec(3, 2, vec![0.0; 6]).is_ok());
        match GrayImage::from_vec(3, 2, vec![0.0; 5]) {
            Err(TrackError::DimensionMismatch { expected, got }) => {
                assert_eq!(expected, 6);
                assert_eq!(got, 5);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_from_luma8() {
        let img = GrayImage::from_luma8(2, 1, &[0, 255]).unwrap();
        assert_eq!(img.data, vec![0.0, 255.0]);
    }

    #[test]
    fn test_plane_pixel_math() {
        let mut a = Plane::new(2, 2);
        a.data.copy_from_slice(&[0.0, 63.75, 127.5, 255.0]);
        a.divide_scalar(255.0);
        a.add_scalar(-0.5);
        assert_eq!(a.data, vec![-0.5, -0.25, 0.0, 0.5]);

        let mut w = Plane::new(2, 2);
        w.fill(2.0);
        a.multiply_elementwise(&w);
        assert_eq!(a.data, vec![-1.0, -0.5, 0.0, 1.0]);
    }

    #[test]
    fn test_plane_reshape() {
        let mut p = Plane::new(2, 2);
        p.fill(1.0);
        p.reshape(2, 2);
        assert_eq!(p.sum(), 4.0);
        p.reshape(3, 5);
        assert_eq!(p.len(), 15);
        assert_eq!(p.sum(), 0.0);
        assert!(!p.is_empty());
        p.reshape(0, 4);
        assert!(p.is_empty());
    }
}
