//! Extraction of the windowed, normalized working patch.

use circulant_core::{GrayImage, Plane, Rect, Result, TrackError, Vec2};

use crate::interpolate::InterpolatePixel;

/// Sample `region` of `image` onto the grid of `output`.
///
/// Destination cell `(x, y)` reads the source at `region.min() + (x, y) * step`.
/// Cells whose source falls outside the image read as zero. The patch is then
/// scaled by `max_pixel_value` into `[-0.5, 0.5]` and multiplied by `cosine`.
pub fn get_subwindow(
    image: &GrayImage,
    interp: &dyn InterpolatePixel,
    region: &Rect,
    step: Vec2,
    max_pixel_value: f64,
    cosine: &Plane,
    output: &mut Plane,
) -> Result<()> {
    if region.width <= 0.0 || region.height <= 0.0 {
        return Err(TrackError::InvalidArgument(format!(
            "sample region must have a positive size, got {}x{}",
            region.width, region.height
        )));
    }
    debug_assert!(output.same_shape(cosine));

    for y in 0..output.height {
        let yy = region.y + y as f32 * step.y;
        let row = &mut output.data[y * output.width..(y + 1) * output.width];

        for (x, cell) in row.iter_mut().enumerate() {
            let xx = region.x + x as f32 * step.x;

            let value = if interp.is_in_fast_bounds(image, xx, yy) {
                interp.get_fast(image, xx, yy)
            } else if image.is_in_bounds(xx as i32, yy as i32) {
                interp.get(image, xx, yy)
            } else {
                0.0
            };
            *cell = value as f64;
        }
    }

    // normalize values to be from -0.5 to 0.5
    output.divide_scalar(max_pixel_value);
    output.add_scalar(-0.5);
    output.multiply_elementwise(cosine);

    Ok(())
}
