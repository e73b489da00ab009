//! PNG waveform plots of trimmed recordings.
//!
//! Each column shows the min/max envelope of the samples it covers. The
//! front boundary is drawn in blue and the tail boundary in green, matching
//! the markers reviewers expect when comparing captures by eye.

use crate::result::{SyncError, SyncResult};
use crate::trim::TrimPlotSink;
use crate::types::TrimBoundaries;
use image::{Rgba, RgbaImage};
use std::path::PathBuf;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const WAVEFORM: Rgba<u8> = Rgba([31, 119, 180, 255]);
const AXIS: Rgba<u8> = Rgba([200, 200, 200, 255]);
const TRIM_FROM_MARKER: Rgba<u8> = Rgba([0, 0, 255, 255]);
const TRIM_TO_MARKER: Rgba<u8> = Rgba([0, 160, 0, 255]);

/// Writes `<prefix>subject_data_<index>.png` for every trim.
///
/// The prefix is prepended verbatim, so `"out/run1_"` yields
/// `out/run1_subject_data_0.png`.
#[derive(Debug, Clone)]
pub struct PngTrimPlot {
    prefix: String,
    width: u32,
    height: u32,
}

impl PngTrimPlot {
    /// Create a plot sink writing files under `prefix`
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            width: 1600,
            height: 400,
        }
    }

    /// Set the image size in pixels.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(2);
        self
    }

    /// Output file for the reference segment at `index`.
    #[must_use]
    pub fn path_for(&self, index: usize) -> PathBuf {
        PathBuf::from(format!("{}subject_data_{index}.png", self.prefix))
    }

    /// Render the waveform with boundary markers.
    #[must_use]
    pub fn render(&self, subject: &[f32], boundaries: TrimBoundaries) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(self.width, self.height, BACKGROUND);
        let mid = self.height / 2;
        for x in 0..self.width {
            img.put_pixel(x, mid, AXIS);
        }

        let peak = subject
            .iter()
            .fold(0.0f32, |acc, s| acc.max(s.abs()))
            .max(f32::EPSILON);

        for x in 0..self.width {
            let Some((lo, hi)) = column_envelope(subject, x, self.width) else {
                continue;
            };
            let y_top = self.sample_to_y(hi / peak);
            let y_bottom = self.sample_to_y(lo / peak);
            for y in y_top..=y_bottom {
                img.put_pixel(x, y, WAVEFORM);
            }
        }

        self.draw_marker(&mut img, boundaries.trim_from, subject.len(), TRIM_FROM_MARKER);
        self.draw_marker(&mut img, boundaries.trim_to, subject.len(), TRIM_TO_MARKER);
        img
    }

    /// Encode a rendered plot as PNG bytes.
    pub fn encode(img: &RgbaImage) -> SyncResult<Vec<u8>> {
        let mut output = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut output, img.width(), img.height());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            let mut writer = encoder
                .write_header()
                .map_err(|e| SyncError::plot(format!("Failed to write PNG header: {e}")))?;
            writer
                .write_image_data(img.as_raw())
                .map_err(|e| SyncError::plot(format!("Failed to write PNG data: {e}")))?;
        }
        Ok(output)
    }

    /// Normalised amplitude in [-1, 1] to a pixel row, top is +1.
    fn sample_to_y(&self, value: f32) -> u32 {
        let max_y = (self.height - 1) as f32;
        let y = (1.0 - value.clamp(-1.0, 1.0)) * 0.5 * max_y;
        (y.round() as u32).min(self.height - 1)
    }

    fn draw_marker(&self, img: &mut RgbaImage, position: usize, len: usize, color: Rgba<u8>) {
        if len == 0 {
            return;
        }
        let x = (position as f64 / len as f64 * f64::from(self.width)) as u32;
        let x = x.min(self.width - 1);
        for y in 0..self.height {
            img.put_pixel(x, y, color);
        }
    }
}

impl TrimPlotSink for PngTrimPlot {
    fn export(&self, index: usize, subject: &[f32], boundaries: TrimBoundaries) -> SyncResult<()> {
        let data = Self::encode(&self.render(subject, boundaries))?;
        std::fs::write(self.path_for(index), data)?;
        Ok(())
    }
}

/// Min and max of the samples mapped to column `x`, `None` if it covers none.
fn column_envelope(subject: &[f32], x: u32, width: u32) -> Option<(f32, f32)> {
    let len = subject.len();
    let start = len * x as usize / width as usize;
    let end = (len * (x as usize + 1) / width as usize).max(start + 1).min(len);
    let column = subject.get(start..end)?;
    if column.is_empty() {
        return None;
    }
    let lo = column.iter().copied().fold(f32::INFINITY, f32::min);
    let hi = column.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    Some((lo, hi))
}
