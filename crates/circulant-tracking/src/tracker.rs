//! Circulant matrix tracker.
//!
//! Tracks a rectangular target by learning a kernelized linear classifier
//! over every circular shift of a padded window around it. The circulant
//! structure of the shifted samples makes training and dense detection cheap
//! in the Fourier domain (Henriques et al., "Exploiting the circulant
//! structure of tracking-by-detection with kernels", ECCV 2012).
//!
//! The target is assumed to keep a fixed size. Only one appearance template is
//! kept, so long sequences can drift; distinctive edges inside the track
//! region help.

use circulant_core::{GrayImage, Plane, Rect, RectI, Result, TrackError, Vec2};
use tracing::{debug, trace, warn};

use crate::config::{CirculantConfig, Coordinates};
use crate::dft::{multiply_complex, ComplexPlane};
use crate::interpolate::InterpolatePixel;
use crate::kernel::{dense_gauss_kernel, Workspace};
use crate::regression::{compute_alphas, interpolate_spectrum, interpolate_template};
use crate::sampler::get_subwindow;
use crate::window::{compute_cosine_window, compute_gaussian_weights};

/// Lifecycle of a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerState {
    #[default]
    Uninitialized,
    Tracking,
}

/// Location and strength of the strongest detector response.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Peak {
    pub x: usize,
    pub y: usize,
    pub value: f64,
}

/// Single target tracker built on kernel ridge regression over circulant samples.
pub struct CirculantTracker {
    config: CirculantConfig,
    interp: Box<dyn InterpolatePixel>,
    state: TrackerState,

    grid_width: usize,
    grid_height: usize,

    // sample from the current frame
    template_new: Plane,
    // appearance model
    template: Plane,
    cosine: Plane,
    k: Plane,
    response: Plane,

    gaussian_weight: Plane,
    gaussian_weight_dft: ComplexPlane,

    alphaf: ComplexPlane,
    new_alphaf: ComplexPlane,

    workspace: Workspace,

    region_track: Rect,
    region_out: Rect,
    step: Vec2,
    frame_size: (u32, u32),
    peak: Peak,
}

impl CirculantTracker {
    pub fn new(config: CirculantConfig) -> Result<Self> {
        config.validate()?;

        // Integer grids are sized by the first region handed to `initialize`.
        let (width, height) = match config.coordinates {
            Coordinates::SubPixel => (config.work_region_size, config.work_region_size),
            Coordinates::Integer => (1, 1),
        };

        let mut tracker = Self {
            interp: config.interpolation.build(),
            config,
            state: TrackerState::Uninitialized,
            grid_width: width,
            grid_height: height,
            template_new: Plane::new(width, height),
            template: Plane::new(width, height),
            cosine: Plane::new(width, height),
            k: Plane::new(width, height),
            response: Plane::new(width, height),
            gaussian_weight: Plane::new(width, height),
            gaussian_weight_dft: ComplexPlane::new(width, height),
            alphaf: ComplexPlane::new(width, height),
            new_alphaf: ComplexPlane::new(width, height),
            workspace: Workspace::new(width, height),
            region_track: Rect::default(),
            region_out: Rect::default(),
            step: Vec2::ONE,
            frame_size: (0, 0),
            peak: Peak::default(),
        };
        tracker.compute_windows();
        Ok(tracker)
    }

    /// Start tracking the `width x height` rectangle with top-left corner `(x0, y0)`.
    ///
    /// Any previous state is discarded. On error the tracker is left
    /// uninitialized.
    pub fn initialize(
        &mut self,
        image: &GrayImage,
        x0: i32,
        y0: i32,
        width: i32,
        height: i32,
    ) -> Result<()> {
        self.state = TrackerState::Uninitialized;

        if width <= 0 || height <= 0 {
            return Err(TrackError::InvalidArgument(format!(
                "track region must have a positive size, got {width}x{height}"
            )));
        }

        // adjust for padding
        let w = (width as f64 * (1.0 + self.config.padding)) as i32;
        let h = (height as f64 * (1.0 + self.config.padding)) as i32;
        if w > image.width as i32 || h > image.height as i32 {
            return Err(TrackError::RegionTooLarge {
                region_width: w,
                region_height: h,
                image_width: image.width,
                image_height: image.height,
            });
        }

        let cx = x0 + width / 2;
        let cy = y0 + height / 2;
        let mut track = RectI::new(cx - w / 2, cy - h / 2, w, h);
        track.ensure_in_bounds(image.width, image.height);

        self.region_track = Rect::from(track);
        self.region_out = Rect::new(0.0, 0.0, width as f32, height as f32);

        match self.config.coordinates {
            Coordinates::SubPixel => {
                let cells = (self.config.work_region_size - 1) as f32;
                self.step = Vec2::new((w - 1) as f32 / cells, (h - 1) as f32 / cells);
            }
            Coordinates::Integer => {
                self.resize_grid(w as usize, h as usize);
                self.step = Vec2::ONE;
            }
        }

        self.update_region_out();
        self.initial_learning(image)?;

        self.frame_size = (image.width, image.height);
        self.peak = Peak::default();
        self.state = TrackerState::Tracking;

        debug!(
            x0,
            y0,
            width,
            height,
            track = ?self.region_track,
            grid_width = self.grid_width,
            grid_height = self.grid_height,
            "Circulant tracker initialized"
        );
        Ok(())
    }

    /// Locate the target in the next frame, then update the appearance model
    /// unless learning is disabled.
    pub fn perform_tracking(&mut self, image: &GrayImage) -> Result<()> {
        self.check_frame(image)?;
        self.locate(image)?;
        if self.config.interp_factor != 0.0 {
            self.learn(image)?;
        }
        Ok(())
    }

    /// Search around the last known location and move the track region to the
    /// strongest response.
    pub fn update_track_location(&mut self, image: &GrayImage) -> Result<()> {
        self.check_frame(image)?;
        self.locate(image)
    }

    /// Blend the appearance at the current track location into the model.
    pub fn perform_learning(&mut self, image: &GrayImage) -> Result<()> {
        self.check_frame(image)?;
        self.learn(image)
    }

    /// Current estimate of the target, at the size given to `initialize`.
    pub fn target_location(&self) -> Rect {
        self.region_out
    }

    /// [`target_location`](Self::target_location) rounded to whole pixels.
    pub fn target_location_i32(&self) -> RectI {
        self.region_out.round()
    }

    /// The padded search region.
    pub fn track_region(&self) -> Rect {
        self.region_track
    }

    /// Visual appearance of the target.
    pub fn target_template(&self) -> &Plane {
        &self.template
    }

    /// Detector response from the most recent localization.
    pub fn response(&self) -> &Plane {
        &self.response
    }

    pub fn alphaf(&self) -> &ComplexPlane {
        &self.alphaf
    }

    pub fn cosine_window(&self) -> &Plane {
        &self.cosine
    }

    pub fn gaussian_weights(&self) -> &Plane {
        &self.gaussian_weight
    }

    pub fn peak(&self) -> Peak {
        self.peak
    }

    pub fn grid_size(&self) -> (usize, usize) {
        (self.grid_width, self.grid_height)
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == TrackerState::Tracking
    }

    pub fn config(&self) -> &CirculantConfig {
        &self.config
    }

    fn check_frame(&mut self, image: &GrayImage) -> Result<()> {
        if self.state != TrackerState::Tracking {
            return Err(TrackError::NotInitialized);
        }
        let (w, h) = (self.region_track.width as i32, self.region_track.height as i32);
        if w > image.width as i32 || h > image.height as i32 {
            return Err(TrackError::RegionTooLarge {
                region_width: w,
                region_height: h,
                image_width: image.width,
                image_height: image.height,
            });
        }
        if self.frame_size != (image.width, image.height) {
            warn!(
                expected = ?self.frame_size,
                got = ?(image.width, image.height),
                "Frame size changed while tracking"
            );
            self.frame_size = (image.width, image.height);
        }
        Ok(())
    }

    fn initial_learning(&mut self, image: &GrayImage) -> Result<()> {
        self.sample(image, false)?;

        dense_gauss_kernel(
            &mut self.workspace,
            self.config.sigma,
            &self.template,
            &self.template,
            true,
            &mut self.k,
        );
        self.workspace.dft.forward_real(&self.k, &mut self.workspace.kf);

        compute_alphas(
            &self.gaussian_weight_dft,
            &self.workspace.kf,
            self.config.lambda,
            &mut self.alphaf,
        );
        Ok(())
    }

    fn locate(&mut self, image: &GrayImage) -> Result<()> {
        self.sample(image, true)?;

        // response of the classifier at every shift
        dense_gauss_kernel(
            &mut self.workspace,
            self.config.sigma,
            &self.template_new,
            &self.template,
            false,
            &mut self.k,
        );
        let ws = &mut self.workspace;
        ws.dft.forward_real(&self.k, &mut ws.kf);
        multiply_complex(&self.alphaf, &ws.kf, &mut ws.product);
        ws.dft.inverse_real(&ws.product, &mut self.response);

        self.peak = find_peak(&self.response);

        // peak in the grid's coordinate system
        let delta = Vec2::new(
            self.peak.x as f32 - (self.grid_width / 2) as f32,
            self.peak.y as f32 - (self.grid_height / 2) as f32,
        );
        self.region_track.translate(delta * self.step);

        if self.region_track.ensure_in_bounds(image.width, image.height) {
            debug!(track = ?self.region_track, "Track region clamped to image bounds");
        }
        self.update_region_out();

        trace!(
            peak_x = self.peak.x,
            peak_y = self.peak.y,
            peak_value = self.peak.value,
            dx = delta.x,
            dy = delta.y,
            "Target located"
        );
        Ok(())
    }

    fn learn(&mut self, image: &GrayImage) -> Result<()> {
        self.sample(image, true)?;

        dense_gauss_kernel(
            &mut self.workspace,
            self.config.sigma,
            &self.template_new,
            &self.template_new,
            true,
            &mut self.k,
        );
        self.workspace.dft.forward_real(&self.k, &mut self.workspace.kf);

        compute_alphas(
            &self.gaussian_weight_dft,
            &self.workspace.kf,
            self.config.lambda,
            &mut self.new_alphaf,
        );

        let rate = self.config.interp_factor;
        interpolate_spectrum(&mut self.alphaf, &self.new_alphaf, rate);
        interpolate_template(&mut self.template, &self.template_new, rate);
        Ok(())
    }

    /// Sample the track region into the new-observation buffer, or straight
    /// into the template when seeding the model.
    fn sample(&mut self, image: &GrayImage, into_new: bool) -> Result<()> {
        let output = if into_new {
            &mut self.template_new
        } else {
            &mut self.template
        };
        get_subwindow(
            image,
            self.interp.as_ref(),
            &self.region_track,
            self.step,
            self.config.max_pixel_value,
            &self.cosine,
            output,
        )
    }

    fn update_region_out(&mut self) {
        let half_track = Vec2::new(
            (self.region_track.width as i32 / 2) as f32,
            (self.region_track.height as i32 / 2) as f32,
        );
        let half_out = Vec2::new(
            (self.region_out.width as i32 / 2) as f32,
            (self.region_out.height as i32 / 2) as f32,
        );
        let tl = self.region_track.min() + half_track - half_out;
        self.region_out.x = tl.x;
        self.region_out.y = tl.y;
    }

    fn resize_grid(&mut self, width: usize, height: usize) {
        if self.grid_width == width && self.grid_height == height {
            return;
        }
        self.grid_width = width;
        self.grid_height = height;

        self.template_new.reshape(width, height);
        self.template.reshape(width, height);
        self.cosine.reshape(width, height);
        self.k.reshape(width, height);
        self.response.reshape(width, height);
        self.gaussian_weight.reshape(width, height);
        self.gaussian_weight_dft.reshape(width, height);
        self.alphaf.reshape(width, height);
        self.new_alphaf.reshape(width, height);
        self.workspace.reshape(width, height);

        self.compute_windows();
    }

    fn compute_windows(&mut self) {
        compute_cosine_window(&mut self.cosine);
        compute_gaussian_weights(self.config.output_sigma_factor, &mut self.gaussian_weight);
        self.workspace
            .dft
            .forward_real(&self.gaussian_weight, &mut self.gaussian_weight_dft);
    }
}

/// Index of the largest value in raster order. Ties go to the first one.
pub fn find_peak(response: &Plane) -> Peak {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (i, &v) in response.data.iter().enumerate() {
        if v > best_value {
            best_value = v;
            best = i;
        }
    }
    Peak {
        x: best % response.width,
        y: best / response.width,
        value: best_value,
    }
}
