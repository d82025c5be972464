//! Dense Gaussian kernel correlation.
//!
//! Evaluates a Gaussian kernel between two patches for every circular shift at
//! once. Both patches must already be windowed so they can be treated as
//! periodic signals.

use circulant_core::Plane;

use crate::dft::{mult_conj_b, ComplexPlane, Dft2d};

/// Pre-sized temporaries shared by the kernel and regression steps.
///
/// Every buffer matches the working grid, so no call allocates.
pub struct Workspace {
    pub(crate) dft: Dft2d,
    pub(crate) xf: ComplexPlane,
    pub(crate) yf: ComplexPlane,
    pub(crate) xyf: ComplexPlane,
    pub(crate) xy: Plane,
    pub(crate) xy_shifted: Plane,
    /// Spectrum of the most recent kernel response.
    pub(crate) kf: ComplexPlane,
    /// `alphaf .* kf` ahead of the inverse transform.
    pub(crate) product: ComplexPlane,
}

impl Workspace {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            dft: Dft2d::new(width, height),
            xf: ComplexPlane::new(width, height),
            yf: ComplexPlane::new(width, height),
            xyf: ComplexPlane::new(width, height),
            xy: Plane::new(width, height),
            xy_shifted: Plane::new(width, height),
            kf: ComplexPlane::new(width, height),
            product: ComplexPlane::new(width, height),
        }
    }

    pub fn reshape(&mut self, width: usize, height: usize) {
        self.dft.reshape(width, height);
        self.xf.reshape(width, height);
        self.yf.reshape(width, height);
        self.xyf.reshape(width, height);
        self.xy.reshape(width, height);
        self.xy_shifted.reshape(width, height);
        self.kf.reshape(width, height);
        self.product.reshape(width, height);
    }
}

/// Gaussian kernel with dense sampling.
///
/// Writes into `k` the kernel value between `x` and `y` for every circular
/// displacement, with zero displacement at `(width/2, height/2)`. When
/// `self_correlation` is set, `y` is taken to be `x` and its transform and
/// energy are reused instead of recomputed.
pub fn dense_gauss_kernel(
    ws: &mut Workspace,
    sigma: f64,
    x: &Plane,
    y: &Plane,
    self_correlation: bool,
    k: &mut Plane,
) {
    ws.dft.forward_real(x, &mut ws.xf);
    let xx = image_dot_product(x);

    let yy = if self_correlation {
        xx
    } else {
        ws.dft.forward_real(y, &mut ws.yf);
        image_dot_product(y)
    };
    let yf = if self_correlation { &ws.xf } else { &ws.yf };

    // cross-correlation term in the Fourier domain
    mult_conj_b(&ws.xf, yf, &mut ws.xyf);
    ws.dft.inverse_real(&ws.xyf, &mut ws.xy);
    circshift(&ws.xy, &mut ws.xy_shifted);

    gaussian_kernel(xx, yy, &ws.xy_shifted, sigma, k);
}

/// Circularly shift `a` by half its size into `b`, moving the origin to the center.
pub fn circshift(a: &Plane, b: &mut Plane) {
    debug_assert!(a.same_shape(b));
    let w2 = a.width / 2;
    let h2 = a.height / 2;

    for y in 0..a.height {
        let yy = (y + h2) % a.height;
        for x in 0..a.width {
            let xx = (x + w2) % a.width;
            b.set(xx, yy, a.get(x, y));
        }
    }
}

/// Dot product of the image with itself.
pub fn image_dot_product(a: &Plane) -> f64 {
    a.data.iter().map(|v| v * v).sum()
}

/// `k = exp(-max(0, (xx + yy - 2*xy) / N) / sigma^2)` for every element of `xy`.
///
/// The clamp absorbs round-off that can push the squared distance slightly
/// below zero.
pub fn gaussian_kernel(xx: f64, yy: f64, xy: &Plane, sigma: f64, output: &mut Plane) {
    debug_assert!(xy.same_shape(output));
    let sigma2 = sigma * sigma;
    let n = (xy.width * xy.height) as f64;

    for (o, &v) in output.data.iter_mut().zip(&xy.data) {
        let distance = (xx + yy - 2.0 * v) / n;
        *o = (-distance.max(0.0) / sigma2).exp();
    }
}
