//! Two dimensional discrete Fourier transform over planar buffers.
//!
//! Rows are transformed in a single batched call, columns are gathered into a
//! reusable buffer one at a time. Plans and scratch space are created when the
//! transform is sized and reused on every call afterwards.

use std::sync::Arc;

use circulant_core::Plane;
use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

/// A complex-valued planar buffer holding a frequency-domain image.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexPlane {
    pub data: Vec<Complex64>,
    pub width: usize,
    pub height: usize,
}

impl ComplexPlane {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![Complex64::new(0.0, 0.0); width * height],
            width,
            height,
        }
    }

    /// Change the dimensions. Contents are zeroed when the size changes.
    pub fn reshape(&mut self, width: usize, height: usize) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(width * height, Complex64::new(0.0, 0.0));
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Complex64 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn same_shape(&self, other: &ComplexPlane) -> bool {
        self.width == other.width && self.height == other.height
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Forward,
    Inverse,
}

struct Plans {
    width: usize,
    height: usize,
    row_forward: Arc<dyn Fft<f64>>,
    row_inverse: Arc<dyn Fft<f64>>,
    col_forward: Arc<dyn Fft<f64>>,
    col_inverse: Arc<dyn Fft<f64>>,
}

impl Plans {
    fn new(width: usize, height: usize) -> Self {
        // One planner so equal row and column lengths share a plan.
        let mut planner = FftPlanner::new();
        Self {
            width,
            height,
            row_forward: planner.plan_fft_forward(width),
            row_inverse: planner.plan_fft_inverse(width),
            col_forward: planner.plan_fft_forward(height),
            col_inverse: planner.plan_fft_inverse(height),
        }
    }

    fn scratch_len(&self) -> usize {
        [
            &self.row_forward,
            &self.row_inverse,
            &self.col_forward,
            &self.col_inverse,
        ]
        .iter()
        .map(|fft| fft.get_inplace_scratch_len())
        .max()
        .unwrap_or(0)
    }
}

/// Forward and inverse 2D DFT for a fixed `width x height` shape.
///
/// # Panics
///
/// Every transform panics if its input is not the planned shape.
pub struct Dft2d {
    plans: Plans,
    column: Vec<Complex64>,
    scratch: Vec<Complex64>,
    work: Vec<Complex64>,
}

impl Dft2d {
    pub fn new(width: usize, height: usize) -> Self {
        let plans = Plans::new(width, height);
        let zero = Complex64::new(0.0, 0.0);
        Self {
            column: vec![zero; height],
            scratch: vec![zero; plans.scratch_len()],
            work: vec![zero; width * height],
            plans,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.plans.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.plans.height
    }

    /// Re-plan for a new shape. A no-op if the shape is unchanged.
    pub fn reshape(&mut self, width: usize, height: usize) {
        if self.plans.width != width || self.plans.height != height {
            *self = Self::new(width, height);
        }
    }

    /// Transform a real image into the frequency domain.
    pub fn forward_real(&mut self, input: &Plane, output: &mut ComplexPlane) {
        self.check_shape(input.width, input.height);
        debug_assert!(output.width == input.width && output.height == input.height);

        for (o, &v) in output.data.iter_mut().zip(&input.data) {
            *o = Complex64::new(v, 0.0);
        }
        Self::transform(
            &self.plans,
            &mut self.column,
            &mut self.scratch,
            &mut output.data,
            Direction::Forward,
        );
    }

    /// Transform a complex image into the frequency domain.
    pub fn forward_complex(&mut self, input: &ComplexPlane, output: &mut ComplexPlane) {
        self.check_shape(input.width, input.height);
        debug_assert!(input.same_shape(output));

        output.data.copy_from_slice(&input.data);
        Self::transform(
            &self.plans,
            &mut self.column,
            &mut self.scratch,
            &mut output.data,
            Direction::Forward,
        );
    }

    /// Inverse transform, keeping only the real part of the result.
    pub fn inverse_real(&mut self, input: &ComplexPlane, output: &mut Plane) {
        self.check_shape(input.width, input.height);
        debug_assert!(output.width == input.width && output.height == input.height);

        self.work.copy_from_slice(&input.data);
        Self::transform(
            &self.plans,
            &mut self.column,
            &mut self.scratch,
            &mut self.work,
            Direction::Inverse,
        );
        let scale = 1.0 / (self.plans.width * self.plans.height) as f64;
        for (o, c) in output.data.iter_mut().zip(&self.work) {
            *o = c.re * scale;
        }
    }

    /// Inverse transform of a complex image.
    pub fn inverse_complex(&mut self, input: &ComplexPlane, output: &mut ComplexPlane) {
        self.check_shape(input.width, input.height);
        debug_assert!(input.same_shape(output));

        output.data.copy_from_slice(&input.data);
        Self::transform(
            &self.plans,
            &mut self.column,
            &mut self.scratch,
            &mut output.data,
            Direction::Inverse,
        );
        let scale = 1.0 / (self.plans.width * self.plans.height) as f64;
        for c in &mut output.data {
            *c *= scale;
        }
    }

    #[inline]
    fn check_shape(&self, width: usize, height: usize) {
        assert!(
            width == self.plans.width && height == self.plans.height,
            "DFT planned for {}x{}, got {}x{}",
            self.plans.width,
            self.plans.height,
            width,
            height
        );
    }

    fn transform(
        plans: &Plans,
        column: &mut [Complex64],
        scratch: &mut [Complex64],
        buf: &mut [Complex64],
        direction: Direction,
    ) {
        let (row_fft, col_fft) = match direction {
            Direction::Forward => (&plans.row_forward, &plans.col_forward),
            Direction::Inverse => (&plans.row_inverse, &plans.col_inverse),
        };
        let (width, height) = (plans.width, plans.height);

        // Processes every row of the buffer in one call.
        row_fft.process_with_scratch(buf, scratch);

        for x in 0..width {
            for y in 0..height {
                column[y] = buf[y * width + x];
            }
            col_fft.process_with_scratch(column, scratch);
            for y in 0..height {
                buf[y * width + x] = column[y];
            }
        }
    }
}

/// Element-wise complex multiplication, `output = a .* b`.
pub fn multiply_complex(a: &ComplexPlane, b: &ComplexPlane, output: &mut ComplexPlane) {
    debug_assert!(a.same_shape(b) && a.same_shape(output));
    for ((o, x), y) in output.data.iter_mut().zip(&a.data).zip(&b.data) {
        *o = x * y;
    }
}

/// Element-wise multiplication of `a` with the complex conjugate of `b`.
pub fn mult_conj_b(a: &ComplexPlane, b: &ComplexPlane, output: &mut ComplexPlane) {
    debug_assert!(a.same_shape(b) && a.same_shape(output));
    for ((o, x), y) in output.data.iter_mut().zip(&a.data).zip(&b.data) {
        *o = Complex64::new(x.re * y.re + x.im * y.im, -x.re * y.im + x.im * y.re);
    }
}
