//! Kernel ridge regression in the Fourier domain and online model adaptation.

use circulant_core::Plane;
use rustfft::num_complex::Complex64;

use crate::dft::ComplexPlane;

/// `alphaf = yf ./ (kf + lambda)`, bin by bin.
///
/// `lambda` is added to the real part of `kf` only. A bin whose divisor
/// underflows to zero gets a zero weight rather than a NaN.
pub fn compute_alphas(yf: &ComplexPlane, kf: &ComplexPlane, lambda: f64, alphaf: &mut ComplexPlane) {
    debug_assert!(yf.same_shape(kf) && yf.same_shape(alphaf));

    for ((out, y), k) in alphaf.data.iter_mut().zip(&yf.data).zip(&kf.data) {
        let (a, b) = (y.re, y.im);
        let c = k.re + lambda;
        let d = k.im;

        let bottom = c * c + d * d;
        *out = if bottom > 0.0 {
            Complex64::new((a * c + b * d) / bottom, (b * c - a * d) / bottom)
        } else {
            Complex64::new(0.0, 0.0)
        };
    }
}

/// `model = (1 - rate) * model + rate * observation` over every real and
/// imaginary component. A zero rate leaves the model untouched.
pub fn interpolate_spectrum(model: &mut ComplexPlane, observation: &ComplexPlane, rate: f64) {
    debug_assert!(model.same_shape(observation));
    if rate == 0.0 {
        return;
    }
    let keep = 1.0 - rate;
    for (m, o) in model.data.iter_mut().zip(&observation.data) {
        m.re = keep * m.re + rate * o.re;
        m.im = keep * m.im + rate * o.im;
    }
}

/// `template = (1 - rate) * template + rate * observation`. A zero rate
/// leaves the template untouched.
pub fn interpolate_template(template: &mut Plane, observation: &Plane, rate: f64) {
    debug_assert!(template.same_shape(observation));
    if rate == 0.0 {
        return;
    }
    let keep = 1.0 - rate;
    for (t, &o) in template.data.iter_mut().zip(&observation.data) {
        *t = keep * *t + rate * o;
    }
}
