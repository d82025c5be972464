//! Precomputed weighting masks: the cosine (Hann) window applied to every
//! sample and the Gaussian shaped regression target.

use std::f64::consts::PI;

use circulant_core::Plane;

/// Fill `cosine` with a separable Hann window.
///
/// The window tapers every patch to zero at its borders so the periodic
/// extension assumed by the DFT has no discontinuities.
pub fn compute_cosine_window(cosine: &mut Plane) {
    let cos_x: Vec<f64> = (0..cosine.width).map(|x| hann(x, cosine.width)).collect();

    for y in 0..cosine.height {
        let cos_y = hann(y, cosine.height);
        let row = &mut cosine.data[y * cosine.width..(y + 1) * cosine.width];
        for (v, cx) in row.iter_mut().zip(&cos_x) {
            *v = cx * cos_y;
        }
    }
}

#[inline]
fn hann(i: usize, len: usize) -> f64 {
    if len < 2 {
        return 1.0;
    }
    0.5 * (1.0 - (2.0 * PI * i as f64 / (len - 1) as f64).cos())
}

/// Fill `weights` with the desired correlation output: a Gaussian peaked at
/// `(width/2, height/2)`.
///
/// The bandwidth is proportional to the grid, `sqrt(width*height) * output_sigma_factor`.
pub fn compute_gaussian_weights(output_sigma_factor: f64, weights: &mut Plane) {
    let output_sigma = ((weights.width * weights.height) as f64).sqrt() * output_sigma_factor;
    let left = -0.5 / (output_sigma * output_sigma);

    let radius_x = (weights.width / 2) as f64;
    let radius_y = (weights.height / 2) as f64;

    for y in 0..weights.height {
        let ry = y as f64 - radius_y;
        for x in 0..weights.width {
            let rx = x as f64 - radius_x;
            weights.data[y * weights.width + x] = (left * (ry * ry + rx * rx)).exp();
        }
    }
}
