//! Circulant Tracking - Kernelized correlation tracking of a single target.

pub mod config;
pub mod dft;
pub mod interpolate;
pub mod kernel;
pub mod regression;
pub mod sampler;
pub mod tracker;
pub mod window;

pub use config::{CirculantConfig, Coordinates};
pub use dft::{mult_conj_b, multiply_complex, ComplexPlane, Dft2d};
pub use interpolate::{Bilinear, InterpolatePixel, Interpolation, NearestNeighbor};
pub use kernel::{circshift, dense_gauss_kernel, gaussian_kernel, image_dot_product, Workspace};
pub use regression::{compute_alphas, interpolate_spectrum, interpolate_template};
pub use sampler::get_subwindow;
pub use tracker::{find_peak, CirculantTracker, Peak, TrackerState};
pub use window::{compute_cosine_window, compute_gaussian_weights};
