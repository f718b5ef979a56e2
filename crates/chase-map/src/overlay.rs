use crate::theme::{MarkerColor, MarkerTheme};
use chase_core::game::belief::Belief;
use chase_core::model::coords::{CoordIndex, MapPoint};
use chase_core::model::station::Station;
use core::fmt;
use image::{Rgba, RgbaImage};
use std::path::Path;

/// Printable board failure. Rendering only ever borrows the belief, so a
/// failed render leaves the pursuit state exactly as it was.
#[derive(Debug)]
pub enum RenderError {
    Image { path: String, detail: String },
    EmptyCanvas { width: u32, height: u32 },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Image { path, detail } => {
                write!(f, "image error at {path}: {detail}")
            }
            RenderError::EmptyCanvas { width, height } => {
                write!(f, "canvas of {width}x{height} pixels has nothing to draw on")
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// The board artwork as an opaque RGBA pixel buffer.
#[derive(Debug, Clone)]
pub struct MapCanvas {
    pixels: RgbaImage,
}

impl MapCanvas {
    /// Loads artwork from disk; JPEG and PNG both end up as RGBA.
    pub fn open(path: &Path) -> Result<Self, RenderError> {
        let decoded = image::open(path).map_err(|err| RenderError::Image {
            path: path.display().to_string(),
            detail: err.to_string(),
        })?;
        Ok(MapCanvas {
            pixels: decoded.to_rgba8(),
        })
    }

    /// A plain white canvas for data sets that ship without artwork.
    pub fn blank(width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyCanvas { width, height });
        }
        Ok(MapCanvas {
            pixels: RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.pixels.get_pixel(x, y)
    }

    pub fn save_png(&self, path: &Path) -> Result<(), RenderError> {
        self.pixels.save(path).map_err(|err| RenderError::Image {
            path: path.display().to_string(),
            detail: err.to_string(),
        })
    }
}

/// How many markers made it onto the canvas. Stations missing from the
/// coordinate index are skipped, not fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderReport {
    pub drawn: usize,
    pub skipped: usize,
}

/// Stamps every position marker onto a copy of `base`: detectives first,
/// then barrages, then the possibility set on top.
pub fn render_overlay(
    base: &MapCanvas,
    coords: &CoordIndex,
    belief: &Belief,
    theme: &MarkerTheme,
) -> (MapCanvas, RenderReport) {
    let mut canvas = base.clone();
    let mut report = RenderReport::default();

    stamp_family(
        &mut canvas,
        &mut report,
        coords,
        belief.detectives().iter().copied(),
        theme.detective,
        theme,
    );
    stamp_family(
        &mut canvas,
        &mut report,
        coords,
        belief.barrages().iter().copied(),
        theme.barrage,
        theme,
    );
    stamp_family(
        &mut canvas,
        &mut report,
        coords,
        belief.candidates().iter().copied(),
        theme.candidate,
        theme,
    );

    (canvas, report)
}

fn stamp_family<I>(
    canvas: &mut MapCanvas,
    report: &mut RenderReport,
    coords: &CoordIndex,
    stations: I,
    color: MarkerColor,
    theme: &MarkerTheme,
) where
    I: IntoIterator<Item = Station>,
{
    for station in stations {
        match coords.get(station) {
            Some(point) => {
                stamp_disc(&mut canvas.pixels, point, theme.radius, color, theme.alpha);
                report.drawn += 1;
            }
            None => report.skipped += 1,
        }
    }
}

/// Renders and writes the PNG in one go.
pub fn render_to_file(
    base: &MapCanvas,
    coords: &CoordIndex,
    belief: &Belief,
    theme: &MarkerTheme,
    out: &Path,
) -> Result<RenderReport, RenderError> {
    let (canvas, report) = render_overlay(base, coords, belief, theme);
    canvas.save_png(out)?;
    Ok(report)
}

fn stamp_disc(pixels: &mut RgbaImage, center: MapPoint, radius: u32, color: MarkerColor, alpha: u8) {
    let (width, height) = pixels.dimensions();
    let r = i64::from(radius);
    let cx = i64::from(center.x);
    let cy = i64::from(center.y);
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy > r * r {
                continue;
            }
            let x = cx + dx;
            let y = cy + dy;
            if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
                continue;
            }
            let pixel = pixels.get_pixel_mut(x as u32, y as u32);
            *pixel = blend(*pixel, color, alpha);
        }
    }
}

// Constant-alpha source-over; the canvas stays opaque.
fn blend(under: Rgba<u8>, over: MarkerColor, alpha: u8) -> Rgba<u8> {
    let a = u32::from(alpha);
    let inv = 255 - a;
    let channel = |o: u8, u: u8| (((u32::from(o)) * a + (u32::from(u)) * inv + 127) / 255) as u8;
    Rgba([
        channel(over.red, under[0]),
        channel(over.green, under[1]),
        channel(over.blue, under[2]),
        255,
    ])
}
