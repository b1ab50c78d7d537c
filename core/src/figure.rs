//! In-memory raster and PNG export.
//!
//! The renderer returns a `Figure` by value and `export_png` consumes it.
//! There is no shared "current figure": once exported, a figure is gone.

use crate::error::{ChartError, ChartResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest deviation from a whole pixel accepted in `dpi × inches`.
const PIXEL_TOLERANCE: f64 = 1e-6;

/// Output size expressed the way plotting tools do: dots per inch and
/// figure size in inches. Pixel size is the product, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub dpi: f64,
    pub width_in: f64,
    pub height_in: f64,
}

impl Default for Resolution {
    fn default() -> Self {
        Self::standard()
    }
}

impl Resolution {
    /// 100 dpi × 5.12 in = 512 px.
    pub fn standard() -> Self {
        Self {
            dpi: 100.0,
            width_in: 5.12,
            height_in: 5.12,
        }
    }

    /// 64 dpi × 8 in = 512 px.
    pub fn wide_dpi() -> Self {
        Self {
            dpi: 64.0,
            width_in: 8.0,
            height_in: 8.0,
        }
    }

    /// Exact pixel target at the given dpi.
    pub fn from_pixels(width: u32, height: u32, dpi: f64) -> Self {
        Self {
            dpi,
            width_in: width as f64 / dpi,
            height_in: height as f64 / dpi,
        }
    }

    /// Pixel width and height. Fails unless both products are whole,
    /// positive pixel counts.
    pub fn pixel_dims(&self) -> ChartResult<(u32, u32)> {
        let invalid = || ChartError::InvalidResolution {
            dpi: self.dpi,
            width_in: self.width_in,
            height_in: self.height_in,
        };
        let to_px = |inches: f64| -> Option<u32> {
            let px = self.dpi * inches;
            let rounded = px.round();
            let whole = px.is_finite() && (px - rounded).abs() <= PIXEL_TOLERANCE;
            (whole && rounded >= 1.0 && rounded <= u32::MAX as f64).then_some(rounded as u32)
        };
        let w = to_px(self.width_in).ok_or_else(invalid)?;
        let h = to_px(self.height_in).ok_or_else(invalid)?;
        Ok((w, h))
    }

    /// Convert a font size in points to pixels at this resolution.
    pub fn points_to_px(&self, points: f64) -> f64 {
        points * self.dpi / 72.0
    }
}

/// An RGB raster, 3 bytes per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Figure {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Figure {
    pub fn blank(width: u32, height: u32, background: (u8, u8, u8)) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
        for _ in 0..(width as usize * height as usize) {
            pixels.extend_from_slice(&[background.0, background.1, background.2]);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dims(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some((self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]))
    }

    /// Mutable access to the raw buffer for drawing backends.
    pub(crate) fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub bytes: u64,
}

/// Write the figure as a PNG, replacing any existing file, and release it.
/// The PNG has exactly the figure's dimensions; nothing is cropped.
pub fn export_png(figure: Figure, path: impl AsRef<Path>) -> ChartResult<ExportReport> {
    let path = path.as_ref();
    let (width, height) = figure.dims();
    let image = image::RgbImage::from_raw(width, height, figure.into_raw()).ok_or_else(|| {
        ChartError::Draw(format!("raster buffer does not match {width}x{height}"))
    })?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    let bytes = std::fs::metadata(path)?.len();
    log::info!("export: wrote {} ({width}x{height}, {bytes} bytes)", path.display());
    Ok(ExportReport {
        path: path.to_path_buf(),
        width,
        height,
        bytes,
    })
}
