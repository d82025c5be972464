//! Circulant Core - Foundation types for the circulant tracker
//!
//! This crate provides the fundamental types used by the tracker:
//! - Single channel input frames and real-valued working planes
//! - Axis-aligned track regions and bounds clamping
//! - The shared error type

pub mod error;
pub mod geometry;
pub mod image;

pub use error::{Result, TrackError};
pub use geometry::{Rect, RectI, Vec2};
pub use image::{GrayImage, Plane};
