//! Image export: rasterise a surface and write it out as a PNG file.
//!
//! Surfaces paint simple blocks in logical pixels onto a [`Canvas`]; the
//! export scale multiplies every coordinate.

use chrono::NaiveDateTime;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while exporting an image
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("surface has no area ({0}x{1})")]
    EmptySurface(u32, u32),

    #[error("scale must be at least 1")]
    ZeroScale,

    #[error("image of {0}x{1} pixels is too large")]
    TooLarge(u32, u32),

    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode png: {0}")]
    Encoding(#[from] png::EncodingError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const WHITE: Rgba = Rgba([0xff, 0xff, 0xff, 0xff]);
    pub const GROUPED_BG: Rgba = Rgba([0xf2, 0xf2, 0xf7, 0xff]);
    pub const SEPARATOR: Rgba = Rgba([0xc6, 0xc6, 0xc8, 0xff]);
    pub const GREEN: Rgba = Rgba([0x34, 0xc7, 0x59, 0xff]);
    pub const RED: Rgba = Rgba([0xff, 0x3b, 0x30, 0xff]);
    pub const LINK: Rgba = Rgba([0x00, 0x7a, 0xff, 0xff]);

    /// `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` or `white`.
    pub fn parse(value: &str) -> Option<Rgba> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("white") {
            return Some(Rgba::WHITE);
        }
        if let Some(hex) = value.strip_prefix('#') {
            let nibble = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
            let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
            return match hex.len() {
                3 => Some(Rgba([nibble(0)? * 17, nibble(1)? * 17, nibble(2)? * 17, 0xff])),
                6 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, 0xff])),
                8 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
                _ => None,
            };
        }
        let inner = value.strip_prefix("rgb(")?.strip_suffix(')')?;
        let channels: Vec<u8> = inner
            .split(',')
            .map(|c| c.trim().parse().ok())
            .collect::<Option<_>>()?;
        match channels.as_slice() {
            [r, g, b] => Some(Rgba([*r, *g, *b, 0xff])),
            _ => None,
        }
    }
}

/// Background fill actually used for `requested`.
///
/// Theme variables (`var(--...)`) cannot be resolved here, nor can anything
/// unparsable; both fall back to white.
pub fn resolve_background(requested: Option<&str>) -> Rgba {
    match requested {
        None => Rgba::WHITE,
        Some(value) if value.trim_start().starts_with("var(") => Rgba::WHITE,
        Some(value) => Rgba::parse(value).unwrap_or_else(|| {
            warn!(value, "unrecognised background colour, using white");
            Rgba::WHITE
        }),
    }
}

/// Keep `[A-Za-z0-9._-]`, replace everything else with `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `<prefix>_<YYYYMMDD>_<HHMMSS>.png`
pub fn timestamped_filename(prefix: &str, at: NaiveDateTime) -> String {
    format!("{prefix}_{}.png", at.format("%Y%m%d_%H%M%S"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub filename: String,
    pub scale: u32,
    /// Any CSS-like colour; see [`resolve_background`].
    pub background: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            filename: "image.png".to_string(),
            scale: 2,
            background: Some("#ffffff".to_string()),
        }
    }
}

/// Something that can be painted in logical pixels.
pub trait Surface {
    /// Logical width and height.
    fn size(&self) -> (u32, u32);

    fn paint(&self, canvas: &mut Canvas);
}

/// RGBA raster addressed in logical pixels.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    scale: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Physical size is the logical size times `scale`.
    pub fn new(width: u32, height: u32, scale: u32, background: Rgba) -> Result<Self, ExportError> {
        if scale == 0 {
            return Err(ExportError::ZeroScale);
        }
        if width == 0 || height == 0 {
            return Err(ExportError::EmptySurface(width, height));
        }
        let too_large =
            || ExportError::TooLarge(width.saturating_mul(scale), height.saturating_mul(scale));
        let physical_w = width.checked_mul(scale).ok_or_else(too_large)?;
        let physical_h = height.checked_mul(scale).ok_or_else(too_large)?;
        let len = (physical_w as usize)
            .checked_mul(physical_h as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(too_large)?;

        let mut pixels = Vec::with_capacity(len);
        for _ in 0..len / 4 {
            pixels.extend_from_slice(&background.0);
        }
        Ok(Self {
            width: physical_w,
            height: physical_h,
            scale,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let mut px = [0; 4];
        px.copy_from_slice(&self.pixels[i..i + 4]);
        Some(Rgba(px))
    }

    /// Fill a logical rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba) {
        let x0 = x.saturating_mul(self.scale).min(self.width);
        let y0 = y.saturating_mul(self.scale).min(self.height);
        let x1 = x.saturating_add(w).saturating_mul(self.scale).min(self.width);
        let y1 = y.saturating_add(h).saturating_mul(self.scale).min(self.height);
        for py in y0..y1 {
            for px in x0..x1 {
                self.put(px, py, color);
            }
        }
    }

    /// Fill a logical circle, clipped to the canvas.
    pub fn fill_circle(&mut self, cx: u32, cy: u32, radius: u32, color: Rgba) {
        let s = i64::from(self.scale);
        let (cx, cy, r) = (i64::from(cx) * s, i64::from(cy) * s, i64::from(radius) * s);
        let y0 = (cy - r).max(0);
        let y1 = (cy + r).min(i64::from(self.height));
        let x0 = (cx - r).max(0);
        let x1 = (cx + r).min(i64::from(self.width));
        for py in y0..y1 {
            for px in x0..x1 {
                let (dx, dy) = (px - cx, py - cy);
                if dx * dx + dy * dy <= r * r {
                    self.put(px as u32, py as u32, color);
                }
            }
        }
    }

    fn put(&mut self, x: u32, y: u32, color: Rgba) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[i..i + 4].copy_from_slice(&color.0);
    }

    fn write_png(&self, path: &Path) -> Result<(), ExportError> {
        let writer = BufWriter::new(File::create(path)?);
        let mut encoder = png::Encoder::new(writer, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.pixels)?;
        writer.finish()?;
        Ok(())
    }
}

/// Render `surface` and write it into `dir` under the sanitised filename.
///
/// Returns the written path.
pub fn export_png(
    surface: &dyn Surface,
    options: &ExportOptions,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let (width, height) = surface.size();
    let background = resolve_background(options.background.as_deref());
    let mut canvas = Canvas::new(width, height, options.scale, background)?;
    surface.paint(&mut canvas);

    let path = dir.join(sanitize_filename(&options.filename));
    canvas.write_png(&path)?;
    info!(
        path = %path.display(),
        width = canvas.width(),
        height = canvas.height(),
        "image exported"
    );
    Ok(path)
}

/// Block rendering of a screen: optional nav bar, optional status badge,
/// then grouped rows separated by hairlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub width: u32,
    pub nav_bar: bool,
    pub badge: Option<Rgba>,
    pub rows: u32,
    pub buttons: u32,
}

impl Snapshot {
    pub const WIDTH: u32 = 390;
    const NAV_HEIGHT: u32 = 44;
    const BADGE_BLOCK: u32 = 96;
    const ROW_HEIGHT: u32 = 44;
    const BUTTON_HEIGHT: u32 = 60;
    const PADDING: u32 = 16;

    fn top(&self) -> u32 {
        let nav = if self.nav_bar { Self::NAV_HEIGHT } else { 0 };
        let badge = if self.badge.is_some() { Self::BADGE_BLOCK } else { 0 };
        nav + badge + Self::PADDING
    }
}

impl Surface for Snapshot {
    fn size(&self) -> (u32, u32) {
        let height = self.top()
            + self.rows * Self::ROW_HEIGHT
            + self.buttons * Self::BUTTON_HEIGHT
            + Self::PADDING;
        (self.width, height)
    }

    fn paint(&self, canvas: &mut Canvas) {
        let mut y = 0;
        if self.nav_bar {
            canvas.fill_rect(0, 0, self.width, Self::NAV_HEIGHT, Rgba::GROUPED_BG);
            canvas.fill_rect(0, Self::NAV_HEIGHT - 1, self.width, 1, Rgba::SEPARATOR);
            y += Self::NAV_HEIGHT;
        }
        if let Some(color) = self.badge {
            canvas.fill_circle(self.width / 2, y + 20 + 28, 28, color);
            y += Self::BADGE_BLOCK;
        }
        y += Self::PADDING;

        let inner = self.width.saturating_sub(2 * Self::PADDING);
        for row in 0..self.rows {
            let top = y + row * Self::ROW_HEIGHT;
            canvas.fill_rect(Self::PADDING, top, inner, Self::ROW_HEIGHT, Rgba::WHITE);
            if row + 1 < self.rows {
                let hairline = top + Self::ROW_HEIGHT - 1;
                canvas.fill_rect(Self::PADDING, hairline, inner, 1, Rgba::SEPARATOR);
            }
        }
        y += self.rows * Self::ROW_HEIGHT;

        for button in 0..self.buttons {
            let top = y + button * Self::BUTTON_HEIGHT + 12;
            canvas.fill_rect(Self::PADDING, top, inner, Self::BUTTON_HEIGHT - 12, Rgba::LINK);
        }
    }
}
