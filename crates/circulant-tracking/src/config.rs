//! Tracker tuning parameters.

use circulant_core::{Result, TrackError};
use serde::{Deserialize, Serialize};

use crate::interpolate::Interpolation;

/// How the padded track region maps onto the working grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Coordinates {
    /// Resample the region onto a fixed `work_region_size` square grid with
    /// fractional steps. Positions are tracked with sub-pixel precision.
    #[default]
    SubPixel,
    /// Copy the region pixel for pixel. The grid takes the padded region's
    /// size and positions stay on whole pixels.
    Integer,
}

/// Configuration for [`CirculantTracker`](crate::CirculantTracker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CirculantConfig {
    /// Spatial bandwidth of the regression target, relative to the grid size (default: 1/16).
    pub output_sigma_factor: f64,
    /// Gaussian kernel bandwidth (default: 0.2).
    pub sigma: f64,
    /// Ridge regularization (default: 1e-2).
    pub lambda: f64,
    /// Learning rate of the appearance model, 0 freezes it (default: 0.075).
    pub interp_factor: f64,
    /// Extra context around the target as a fraction of its size (default: 1.0).
    pub padding: f64,
    /// Side of the square working grid in sub-pixel mode (default: 64).
    pub work_region_size: usize,
    /// Largest intensity an input frame can hold (default: 255).
    pub max_pixel_value: f64,
    pub coordinates: Coordinates,
    pub interpolation: Interpolation,
}

impl Default for CirculantConfig {
    fn default() -> Self {
        Self {
            output_sigma_factor: 1.0 / 16.0,
            sigma: 0.2,
            lambda: 1e-2,
            interp_factor: 0.075,
            padding: 1.0,
            work_region_size: 64,
            max_pixel_value: 255.0,
            coordinates: Coordinates::SubPixel,
            interpolation: Interpolation::Bilinear,
        }
    }
}

impl CirculantConfig {
    /// Check every parameter is usable.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("output_sigma_factor", self.output_sigma_factor),
            ("sigma", self.sigma),
            ("lambda", self.lambda),
            ("interp_factor", self.interp_factor),
            ("padding", self.padding),
            ("max_pixel_value", self.max_pixel_value),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{name} must be finite, got {value}")));
        }

        if self.output_sigma_factor <= 0.0 {
            return Err(invalid(format!(
                "output_sigma_factor must be positive, got {}",
                self.output_sigma_factor
            )));
        }
        if self.sigma <= 0.0 {
            return Err(invalid(format!("sigma must be positive, got {}", self.sigma)));
        }
        if self.lambda <= 0.0 {
            return Err(invalid(format!("lambda must be positive, got {}", self.lambda)));
        }
        if !(0.0..=1.0).contains(&self.interp_factor) {
            return Err(invalid(format!(
                "interp_factor must be within [0, 1], got {}",
                self.interp_factor
            )));
        }
        if self.padding < 0.0 {
            return Err(invalid(format!("padding must not be negative, got {}", self.padding)));
        }
        if self.coordinates == Coordinates::SubPixel && self.work_region_size < 2 {
            return Err(invalid(format!(
                "work_region_size must be at least 2, got {}",
                self.work_region_size
            )));
        }
        if self.max_pixel_value <= 0.0 {
            return Err(invalid(format!(
                "max_pixel_value must be positive, got {}",
                self.max_pixel_value
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| TrackError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| TrackError::Serialization(e.to_string()))
    }
}

fn invalid(msg: String) -> TrackError {
    TrackError::InvalidConfig(msg)
}
