//! Static line charts of sampled curves, rasterized on the CPU.

use std::path::Path;

use anyhow::Context as _;

use kurbo::{Affine, BezPath, Point, Rect, Shape as _};

use crate::foundation::{
    domain::Sample,
    error::{FourierError, FourierResult},
};

/// Default chart width in pixels.
pub const DEFAULT_WIDTH: u32 = 1000;
/// Default chart height in pixels.
pub const DEFAULT_HEIGHT: u32 = 500;

/// Stroke colors handed out to curves in order.
pub const CURVE_COLORS: [[u8; 4]; 3] = [
    [230, 57, 70, 255],
    [69, 170, 242, 255],
    [120, 128, 150, 255],
];

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
    pub margin_px: f64,
    /// Straight (non-premultiplied) RGBA; drawn opaque.
    pub background: [u8; 4],
    pub axis_color: [u8; 4],
    pub stroke_width: f64,
    /// Fixed y range; the padded data bounds are used when absent.
    pub y_range: Option<(f64, f64)>,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            margin_px: 24.0,
            background: [18, 20, 28, 255],
            axis_color: [90, 104, 130, 255],
            stroke_width: 2.0,
            y_range: None,
        }
    }
}

impl ChartSettings {
    pub fn validate(&self) -> FourierResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FourierError::validation("chart width/height must be > 0"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(FourierError::validation("chart width/height exceed u16"));
        }
        if !self.margin_px.is_finite()
            || self.margin_px < 0.0
            || 2.0 * self.margin_px >= f64::from(self.width.min(self.height))
        {
            return Err(FourierError::validation(
                "chart margin must leave a drawable area",
            ));
        }
        if !(self.stroke_width.is_finite() && self.stroke_width > 0.0) {
            return Err(FourierError::validation("stroke_width must be > 0"));
        }
        if let Some((lo, hi)) = self.y_range
            && !(lo.is_finite() && hi.is_finite() && lo < hi)
        {
            return Err(FourierError::validation(
                "y_range must be finite with lo < hi",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    pub samples: Vec<Sample>,
    pub color: [u8; 4],
}

impl Curve {
    pub fn new(samples: Vec<Sample>, color: [u8; 4]) -> Self {
        Self { samples, color }
    }
}

/// Rendered chart pixels, premultiplied RGBA8, row-major.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameRGBA {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}

/// Data-space extent of a chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartBounds {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl ChartBounds {
    /// Union of the finite samples of all curves, with `y_range` overriding the y extent.
    pub fn from_curves(curves: &[Curve], y_range: Option<(f64, f64)>) -> FourierResult<Self> {
        let finite = curves
            .iter()
            .flat_map(|c| c.samples.iter())
            .filter(|s| s.x.is_finite() && s.y.is_finite());

        let mut x0 = f64::INFINITY;
        let mut x1 = f64::NEG_INFINITY;
        let mut y0 = f64::INFINITY;
        let mut y1 = f64::NEG_INFINITY;
        for s in finite {
            x0 = x0.min(s.x);
            x1 = x1.max(s.x);
            y0 = y0.min(s.y);
            y1 = y1.max(s.y);
        }
        if x0 >= x1 {
            return Err(FourierError::render(
                "curves must span a non-empty x range",
            ));
        }

        let (y0, y1) = match y_range {
            Some(r) => r,
            None => padded(y0, y1),
        };
        Ok(Self { x0, x1, y0, y1 })
    }

    /// Map data coordinates into the plot area of `settings` (y grows upwards).
    pub fn to_pixels(&self, settings: &ChartSettings) -> Affine {
        let m = settings.margin_px;
        let w = f64::from(settings.width);
        let h = f64::from(settings.height);
        let sx = (w - 2.0 * m) / (self.x1 - self.x0);
        let sy = -(h - 2.0 * m) / (self.y1 - self.y0);
        Affine::new([sx, 0.0, 0.0, sy, m - self.x0 * sx, (h - m) - self.y0 * sy])
    }
}

fn padded(lo: f64, hi: f64) -> (f64, f64) {
    if lo > hi {
        return (-1.0, 1.0);
    }
    let span = hi - lo;
    if span == 0.0 {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = 0.05 * span;
    (lo - pad, hi + pad)
}

/// Polyline through the samples in pixel space; non-finite samples break the line.
pub fn curve_path(samples: &[Sample], to_pixels: Affine) -> BezPath {
    let mut path = BezPath::new();
    let mut pen_down = false;
    for s in samples {
        if !(s.x.is_finite() && s.y.is_finite()) {
            pen_down = false;
            continue;
        }
        let p = to_pixels * Point::from(*s);
        if pen_down {
            path.line_to(p);
        } else {
            path.move_to(p);
            pen_down = true;
        }
    }
    path
}

/// Rasterize `curves` over an axis frame; the `y = 0` line is drawn when in range.
#[tracing::instrument(skip(curves, settings), fields(curves = curves.len()))]
pub fn render_chart(curves: &[Curve], settings: &ChartSettings) -> FourierResult<FrameRGBA> {
    settings.validate()?;
    if curves.is_empty() || curves.iter().all(|c| c.samples.len() < 2) {
        return Err(FourierError::render(
            "chart needs at least one curve with two or more samples",
        ));
    }

    let bounds = ChartBounds::from_curves(curves, settings.y_range)?;
    let to_pixels = bounds.to_pixels(settings);

    let width: u16 = settings
        .width
        .try_into()
        .map_err(|_| FourierError::render("chart width exceeds u16"))?;
    let height: u16 = settings
        .height
        .try_into()
        .map_err(|_| FourierError::render("chart height exceeds u16"))?;

    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    let [r, g, b, _] = settings.background;
    clear_pixmap(&mut pixmap, [r, g, b, 255]);

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

    let m = settings.margin_px;
    let (w, h) = (f64::from(settings.width), f64::from(settings.height));
    set_solid_paint(&mut ctx, [r, g, b, 255]);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));

    set_solid_paint(&mut ctx, settings.axis_color);
    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(1.0));
    ctx.stroke_path(&bezpath_to_cpu(&Rect::new(m, m, w - m, h - m).to_path(0.1)));

    if bounds.y0 < 0.0 && 0.0 < bounds.y1 {
        let mut zero = BezPath::new();
        zero.move_to(to_pixels * Point::new(bounds.x0, 0.0));
        zero.line_to(to_pixels * Point::new(bounds.x1, 0.0));
        ctx.stroke_path(&bezpath_to_cpu(&zero));
    }

    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(settings.stroke_width));
    for curve in curves {
        if curve.samples.len() < 2 {
            continue;
        }
        set_solid_paint(&mut ctx, curve.color);
        ctx.stroke_path(&bezpath_to_cpu(&curve_path(&curve.samples, to_pixels)));
    }

    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    Ok(FrameRGBA {
        width: settings.width,
        height: settings.height,
        data: pixmap.data_as_u8_slice().to_vec(),
    })
}

/// Write `frame` as a PNG, creating parent directories as needed.
pub fn write_png(frame: &FrameRGBA, path: &Path) -> FourierResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| FourierError::render(format!("write png '{}': {e}", path.display())))
}

fn set_solid_paint(ctx: &mut vello_cpu::RenderContext, [r, g, b, a]: [u8; 4]) {
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let cpu = |p: Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(cpu(p)),
            PathEl::LineTo(p) => out.line_to(cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(cpu(p1), cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(cpu(p1), cpu(p2), cpu(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/chart.rs"]
mod tests;
