// src/lib.rs

//! Renders the harmonic field around a two-staple glyph into a grayscale PNG.
//!
//! A signed distance function describes the glyph, the domain is trimmed
//! against it, and a Laplace problem with a linear boundary ramp is solved
//! over both the trimmed region and a lightly weighted complement. The
//! solution is sampled at cell centers, quantized to bytes and encoded.

pub mod config;
pub mod error;
pub mod field;
pub mod glyph;
pub mod pipeline;
pub mod raster;

pub use config::Config;
pub use error::GlyphFieldError;
pub use pipeline::{render, run};
