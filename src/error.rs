// src/error.rs

//! Error types for every stage of the glyph field pipeline.
//!
//! Each stage owns a small enum; `GlyphFieldError` wraps them for callers
//! that drive the whole pipeline. None of these conditions are transient, so
//! nothing here is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Rejected or unreadable configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("stroke width must be positive")]
    ZeroStrokeWidth,
    #[error("grid resolution must be a positive even integer, got {0}")]
    BadResolution(u32),
    #[error("basis degree must be at least 1")]
    ZeroDegree,
    #[error("refinement depth {0} exceeds the limit of {limit}", limit = crate::config::MAX_REFINE_LIMIT)]
    RefineTooDeep(u32),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures while building or solving the field problem.
#[derive(Error, Debug)]
pub enum FieldError {
    #[error("system is singular: pivot {pivot:e} at unknown {index} of {size}")]
    Singular { index: usize, pivot: f64, size: usize },
    #[error("boundary fit constrained no degrees of freedom")]
    NoConstraints,
    #[error("solution coefficient {index} is not finite")]
    NonFinite { index: usize },
}

/// Failures while mapping sampled values to bytes.
#[derive(Error, Debug)]
pub enum QuantizeError {
    #[error("field has zero dynamic range: every sample equals {value}")]
    Degenerate { value: f64 },
    #[error("sample ({i}, {j}) is not finite")]
    NonFinite { i: usize, j: usize },
    #[error("sampled grid is empty")]
    Empty,
}

/// Failures while building the raster container.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("invalid raster dimensions {width}x{height}")]
    BadDimensions { width: u32, height: u32 },
    #[error("{len} pixels do not fit a {width}x{height} raster")]
    TooManyPixels { len: usize, width: u32, height: u32 },
    #[error("{tag} chunk payload of {len} bytes is too large for a {width}x{height} raster")]
    ChunkTooLarge {
        tag: &'static str,
        len: usize,
        width: u32,
        height: u32,
    },
    #[error("compression failed for {width}x{height} raster: {source}")]
    Compress {
        width: u32,
        height: u32,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level error for a full pipeline run.
#[derive(Error, Debug)]
pub enum GlyphFieldError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Quantize(#[from] QuantizeError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
