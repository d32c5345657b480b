// src/pipeline.rs

//! Drives one render from configuration to encoded bytes.
//!
//! ```text
//! glyph distance → trim → harmonic solve → sample → quantize → encode
//! ```
//!
//! Every stage consumes its predecessor's output and returns a new owned
//! value; nothing is shared between stages.

use std::io::Write;
use std::path::Path;

use log::{info, warn};
use tempfile::NamedTempFile;

use crate::config::Config;
use crate::error::GlyphFieldError;
use crate::field::{self, FieldSetup, SampledGrid};
use crate::glyph::GlyphFrame;
use crate::raster::{self, QuantizedGrid};

/// Intermediate artifacts of a render, kept for inspection.
#[derive(Debug, Clone)]
pub struct Render {
    pub samples: SampledGrid,
    pub image: QuantizedGrid,
    pub encoded: Vec<u8>,
}

/// Runs the whole pipeline and returns the encoded PNG bytes.
pub fn render(config: &Config) -> Result<Vec<u8>, GlyphFieldError> {
    render_stages(config).map(|r| r.encoded)
}

/// Runs the whole pipeline, keeping every intermediate grid.
pub fn render_stages(config: &Config) -> Result<Render, GlyphFieldError> {
    config.validate()?;
    if let Some(advisory) = config.parity_advisory() {
        warn!("{}", advisory);
    }

    let resolution = config.field.resolution;
    let frame = GlyphFrame::new(resolution, config.glyph.stroke_width);
    let setup = FieldSetup {
        resolution: resolution as usize,
        degree: config.field.degree as usize,
        max_refine: config.field.max_refine,
    };
    info!(
        "rendering {}x{} field, stroke width {}, degree {}",
        resolution, resolution, config.glyph.stroke_width, config.field.degree
    );

    let (domain, solution) = field::solve(&setup, |x, y| frame.distance_at(x, y))?;
    let samples = field::sample(&solution, &domain);
    let image = raster::quantize(&samples)?;
    let encoded = raster::encode_grid(&image)?;
    info!("encoded {} bytes", encoded.len());

    Ok(Render {
        samples,
        image,
        encoded,
    })
}

/// Writes `bytes` to `path` through a temporary file in the same directory,
/// so the destination is either untouched or complete.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), GlyphFieldError> {
    let output_error = |source| GlyphFieldError::Output {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(output_error)?;
    tmp.write_all(bytes).map_err(output_error)?;
    tmp.as_file().sync_all().map_err(output_error)?;
    tmp.persist(path).map_err(|e| output_error(e.error))?;
    info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

/// Renders with `config` and writes the result to `config.output.path`.
pub fn run(config: &Config) -> Result<(), GlyphFieldError> {
    let bytes = render(config)?;
    write_atomically(&config.output.path, &bytes)
}
