//! Image processing module
//!
//! Bounded resize, re-encoding and EXIF stripping for raster images.

pub mod processor;
pub mod resize;

pub use processor::ImageTransformer;
pub use resize::{ImageResize, ResizeDimensions};
