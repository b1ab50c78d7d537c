//! Annotated correlation heatmap.
//!
//! Layout, left to right: row labels | square grid | colour bar, ticks, label.
//! Top to bottom: title | grid | column labels. Everything is sized in
//! pixels from the target resolution; fonts are given in points.
//!
//! Drawing goes into a `Figure` owned by the caller. Nothing here touches
//! process-wide plotting state apart from the one-time font registration.

use crate::{
    colormap::{luminance, ColorScale, Colormap},
    correlation::CorrelationMatrix,
    error::{ChartError, ChartResult},
    figure::{Figure, Resolution},
    fonts,
};
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle, FontTransform, TextStyle};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_TITLE: &str = "Customer Engagement Correlation Matrix";

/// Annotation text on cells darker than this luminance is drawn light.
const LIGHT_TEXT_BELOW: f64 = 0.408;
const DARK_TEXT: RGBColor = RGBColor(38, 38, 38);
const LIGHT_TEXT: RGBColor = RGBColor(255, 255, 255);
const COLORBAR_TICKS: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickRotation {
    Horizontal,
    /// Column labels read bottom to top.
    #[default]
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapOptions {
    pub colormap: Colormap,
    pub scale: ColorScale,
    /// Hide cells above the diagonal.
    pub mask_upper: bool,
    /// Draw row and column labels.
    pub show_axis: bool,
    pub title: String,
    pub title_pt: f64,
    pub title_pad_pt: f64,
    pub annotation_pt: f64,
    pub tick_pt: f64,
    pub tick_rotation: TickRotation,
    pub colorbar_label: Option<String>,
    /// Colour bar height as a fraction of the grid height.
    pub colorbar_shrink: f64,
    /// Gap between cells, in pixels.
    pub line_width: u32,
    pub background: (u8, u8, u8),
    pub font_path: Option<PathBuf>,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self {
            colormap: Colormap::RdYlGn,
            scale: ColorScale::Auto,
            mask_upper: false,
            show_axis: true,
            title: DEFAULT_TITLE.into(),
            title_pt: 14.0,
            title_pad_pt: 8.0,
            annotation_pt: 9.0,
            tick_pt: 8.0,
            tick_rotation: TickRotation::Vertical,
            colorbar_label: None,
            colorbar_shrink: 0.8,
            line_width: 1,
            background: (255, 255, 255),
            font_path: None,
        }
    }
}

/// Where the grid and colour bar ended up, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    pub n: usize,
    pub x0: i32,
    pub y0: i32,
    pub cell: i32,
    /// Colour bar corners, inclusive: (x0, y0, x1, y1).
    pub colorbar: (i32, i32, i32, i32),
}

impl GridGeometry {
    /// Top-left pixel of cell (row, col).
    pub fn cell_origin(&self, row: usize, col: usize) -> (i32, i32) {
        (
            self.x0 + col as i32 * self.cell,
            self.y0 + row as i32 * self.cell,
        )
    }

    pub fn side(&self) -> i32 {
        self.cell * self.n as i32
    }
}

/// Render the matrix into a new figure of the resolution's pixel size.
pub fn render(
    matrix: &CorrelationMatrix,
    options: &HeatmapOptions,
    resolution: Resolution,
) -> ChartResult<Figure> {
    render_with_geometry(matrix, options, resolution).map(|(figure, _)| figure)
}

pub fn render_with_geometry(
    matrix: &CorrelationMatrix,
    options: &HeatmapOptions,
    resolution: Resolution,
) -> ChartResult<(Figure, GridGeometry)> {
    let n = matrix.size();
    if n == 0 {
        return Err(ChartError::EmptyMatrix);
    }
    if matrix.values().len() != n * n {
        return Err(ChartError::NonSquare {
            rows: n,
            cols: matrix.values().len() / n,
        });
    }
    if !(options.colorbar_shrink > 0.0 && options.colorbar_shrink <= 1.0) {
        return Err(ChartError::InvalidConfig(format!(
            "colorbar_shrink must be in (0, 1], got {}",
            options.colorbar_shrink
        )));
    }

    let (width, height) = resolution.pixel_dims()?;
    let font = fonts::ensure_sans_font(options.font_path.as_deref())?;
    let sizes = FontSizes::new(options, resolution);

    let (lo, hi) = data_range(matrix, options.mask_upper);
    let (scale_lo, scale_hi) = options.scale.bounds(lo, hi);
    let ticks = colorbar_ticks(&options.scale, scale_lo, scale_hi);

    let mut figure = Figure::blank(width, height, options.background);
    let geometry = {
        let root = BitMapBackend::with_buffer(figure.buffer_mut(), (width, height))
            .into_drawing_area();
        let bg = rgb(options.background);
        root.fill(&bg).map_err(ChartError::draw)?;

        let canvas = Canvas {
            root: &root,
            fonts: sizes,
        };
        let layout = canvas.layout(matrix, options, &ticks, (width as i32, height as i32))?;

        canvas.draw_title(options, &layout)?;
        canvas.draw_cells(matrix, options, &layout, (lo, hi))?;
        if options.show_axis {
            canvas.draw_axis_labels(matrix, options, &layout)?;
        }
        canvas.draw_colorbar(options, &layout, &ticks, (lo, hi))?;

        root.present().map_err(ChartError::draw)?;
        layout.geometry
    };

    log::debug!(
        "heatmap: {n}x{n} grid, cell={}px, canvas={width}x{height}, font={font}",
        geometry.cell
    );
    Ok((figure, geometry))
}

struct FontSizes {
    title: f64,
    title_pad: i32,
    annotation: f64,
    tick: f64,
}

impl FontSizes {
    fn new(options: &HeatmapOptions, res: Resolution) -> Self {
        Self {
            title: res.points_to_px(options.title_pt),
            title_pad: res.points_to_px(options.title_pad_pt).round() as i32,
            annotation: res.points_to_px(options.annotation_pt),
            tick: res.points_to_px(options.tick_pt),
        }
    }
}

struct Layout {
    geometry: GridGeometry,
    title_y: i32,
    label_gap: i32,
    tick_label_x: i32,
    colorbar_label_x: i32,
}

struct Canvas<'a, 'b> {
    root: &'a DrawingArea<BitMapBackend<'b>, plotters::coord::Shift>,
    fonts: FontSizes,
}

impl Canvas<'_, '_> {
    fn font(&self, size: f64) -> FontDesc<'static> {
        FontDesc::new(FontFamily::SansSerif, size, FontStyle::Normal)
    }

    /// Pixel size of `s` when drawn unrotated.
    fn measure(&self, s: &str, size: f64) -> ChartResult<(i32, i32)> {
        if s.is_empty() {
            return Ok((0, 0));
        }
        let style = self.font(size).color(&BLACK);
        let (w, h) = self
            .root
            .estimate_text_size(s, &style)
            .map_err(ChartError::draw)?;
        Ok((w as i32, h as i32))
    }

    fn layout(
        &self,
        matrix: &CorrelationMatrix,
        options: &HeatmapOptions,
        ticks: &[(f64, String)],
        (width, height): (i32, i32),
    ) -> ChartResult<Layout> {
        let n = matrix.size() as i32;
        let pad = (width.min(height) / 50).max(4);
        let label_gap = (self.fonts.tick / 2.0).round().max(2.0) as i32;

        let title_h = self.measure(&options.title, self.fonts.title)?.1;
        let title_band = if title_h > 0 {
            title_h + self.fonts.title_pad
        } else {
            0
        };

        let mut longest = 0;
        let mut tallest = 0;
        if options.show_axis {
            for label in matrix.labels() {
                let (w, h) = self.measure(label, self.fonts.tick)?;
                longest = longest.max(w);
                tallest = tallest.max(h);
            }
        }
        let row_label_w = if longest > 0 { longest + label_gap } else { 0 };
        let col_label_h = match options.tick_rotation {
            _ if longest == 0 => 0,
            TickRotation::Horizontal => tallest + label_gap,
            TickRotation::Vertical => longest + label_gap,
        };

        let bar_w = (width / 40).max(8);
        let bar_gap = (width / 40).max(6);
        let mut tick_w = 0;
        for (_, label) in ticks {
            tick_w = tick_w.max(self.measure(label, self.fonts.tick)?.0);
        }
        let tick_len = (bar_w / 3).max(2);
        let tick_area = if tick_w > 0 { tick_len + label_gap + tick_w } else { tick_len };
        let cb_label_w = match &options.colorbar_label {
            Some(label) => {
                let h = self.measure(label, self.fonts.tick)?.1;
                if h > 0 { h + label_gap } else { 0 }
            }
            None => 0,
        };
        let colorbar_w = bar_gap + bar_w + tick_area + cb_label_w;

        let avail_w = width - 2 * pad - row_label_w - colorbar_w;
        let avail_h = height - 2 * pad - title_band - col_label_h;
        let cell = avail_w.min(avail_h) / n;
        if cell < 2 {
            return Err(ChartError::InvalidConfig(format!(
                "{width}x{height} canvas is too small for a {n}x{n} grid"
            )));
        }
        let side = cell * n;

        // Centre the whole block on the canvas.
        let block_w = row_label_w + side + colorbar_w;
        let block_h = title_band + side + col_label_h;
        let left = (width - block_w) / 2;
        let top = (height - block_h) / 2;

        let x0 = left + row_label_w;
        let y0 = top + title_band;

        let bar_h = ((side as f64) * options.colorbar_shrink).round().max(2.0) as i32;
        let bar_x0 = x0 + side + bar_gap;
        let bar_y0 = y0 + (side - bar_h) / 2;
        let colorbar = (bar_x0, bar_y0, bar_x0 + bar_w - 1, bar_y0 + bar_h - 1);

        Ok(Layout {
            geometry: GridGeometry {
                n: n as usize,
                x0,
                y0,
                cell,
                colorbar,
            },
            title_y: top,
            label_gap,
            tick_label_x: colorbar.2 + 1 + tick_len + label_gap,
            colorbar_label_x: colorbar.2 + 1 + tick_area + label_gap,
        })
    }

    fn draw_text(&self, s: &str, style: &TextStyle, pos: (i32, i32)) -> ChartResult<()> {
        self.root.draw_text(s, style, pos).map_err(ChartError::draw)
    }

    fn draw_title(&self, options: &HeatmapOptions, layout: &Layout) -> ChartResult<()> {
        let g = &layout.geometry;
        let style = self
            .font(self.fonts.title)
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top));
        self.draw_text(&options.title, &style, (g.x0 + g.side() / 2, layout.title_y))
    }

    fn draw_cells(
        &self,
        matrix: &CorrelationMatrix,
        options: &HeatmapOptions,
        layout: &Layout,
        (lo, hi): (f64, f64),
    ) -> ChartResult<()> {
        let g = &layout.geometry;
        let lw = options.line_width as i32;
        // Keep at least one pixel of fill.
        let (inset_a, inset_b) = if lw < g.cell - 1 { (lw / 2, lw - lw / 2) } else { (0, 0) };

        for row in 0..g.n {
            for col in 0..g.n {
                if options.mask_upper && col > row {
                    continue;
                }
                let value = matrix.get(row, col);
                if value.is_nan() {
                    continue;
                }
                let color = options.colormap.sample(options.scale.normalize(value, lo, hi));
                let (x, y) = g.cell_origin(row, col);
                let rect = Rectangle::new(
                    [
                        (x + inset_a, y + inset_a),
                        (x + g.cell - inset_b, y + g.cell - inset_b),
                    ],
                    color.filled(),
                );
                self.root.draw(&rect).map_err(ChartError::draw)?;

                let ink = if luminance(&color) > LIGHT_TEXT_BELOW {
                    DARK_TEXT
                } else {
                    LIGHT_TEXT
                };
                let style = self
                    .font(self.fonts.annotation)
                    .color(&ink)
                    .pos(Pos::new(HPos::Center, VPos::Center));
                self.draw_text(
                    &format!("{value:.2}"),
                    &style,
                    (x + g.cell / 2, y + g.cell / 2),
                )?;
            }
        }
        Ok(())
    }

    fn draw_axis_labels(
        &self,
        matrix: &CorrelationMatrix,
        options: &HeatmapOptions,
        layout: &Layout,
    ) -> ChartResult<()> {
        let g = &layout.geometry;
        let row_style = self
            .font(self.fonts.tick)
            .color(&BLACK)
            .pos(Pos::new(HPos::Right, VPos::Center));
        let col_style = match options.tick_rotation {
            TickRotation::Horizontal => self
                .font(self.fonts.tick)
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Top)),
            // Right-anchored then rotated: the text hangs below the anchor.
            TickRotation::Vertical => self
                .font(self.fonts.tick)
                .transform(FontTransform::Rotate270)
                .color(&BLACK)
                .pos(Pos::new(HPos::Right, VPos::Center)),
        };

        let bottom = g.y0 + g.side() + layout.label_gap;
        for (i, label) in matrix.labels().iter().enumerate() {
            let (cx, cy) = g.cell_origin(i, i);
            let mid = g.cell / 2;
            self.draw_text(label, &row_style, (g.x0 - layout.label_gap, cy + mid))?;
            self.draw_text(label, &col_style, (cx + mid, bottom))?;
        }
        Ok(())
    }

    fn draw_colorbar(
        &self,
        options: &HeatmapOptions,
        layout: &Layout,
        ticks: &[(f64, String)],
        (lo, hi): (f64, f64),
    ) -> ChartResult<()> {
        let (x0, y0, x1, y1) = layout.geometry.colorbar;
        let span = (y1 - y0).max(1) as f64;

        // One row per pixel, bottom = low end of the scale. Filled
        // rectangles exclude their lower-right corner.
        for y in y0..=y1 {
            let t = (y1 - y) as f64 / span;
            let color = options.colormap.sample(t);
            self.root
                .draw(&Rectangle::new([(x0, y), (x1 + 1, y + 1)], color.filled()))
                .map_err(ChartError::draw)?;
        }
        self.root
            .draw(&Rectangle::new([(x0, y0), (x1, y1)], BLACK.stroke_width(1)))
            .map_err(ChartError::draw)?;

        let tick_style = self
            .font(self.fonts.tick)
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));
        let tick_end = layout.tick_label_x - layout.label_gap;
        for (value, label) in ticks {
            let t = options.scale.normalize(*value, lo, hi);
            let y = y1 - (t * span).round() as i32;
            self.root
                .draw(&PathElement::new(vec![(x1, y), (tick_end, y)], &BLACK))
                .map_err(ChartError::draw)?;
            self.draw_text(label, &tick_style, (layout.tick_label_x, y))?;
        }

        if let Some(label) = &options.colorbar_label {
            let style = self
                .font(self.fonts.tick)
                .transform(FontTransform::Rotate270)
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Top));
            self.draw_text(label, &style, (layout.colorbar_label_x, (y0 + y1) / 2))?;
        }
        Ok(())
    }
}

fn rgb(c: (u8, u8, u8)) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

/// Finite min/max over the cells that will be drawn.
fn data_range(matrix: &CorrelationMatrix, mask_upper: bool) -> (f64, f64) {
    let n = matrix.size();
    let mut range: Option<(f64, f64)> = None;
    for row in 0..n {
        for col in 0..n {
            if mask_upper && col > row {
                continue;
            }
            let v = matrix.get(row, col);
            if !v.is_finite() {
                continue;
            }
            range = Some(match range {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            });
        }
    }
    range.unwrap_or((0.0, 0.0))
}

/// Evenly spaced colour bar ticks. A fixed scale with a centre gets ticks
/// at the bounds, the centre and halfway on each side.
fn colorbar_ticks(scale: &ColorScale, lo: f64, hi: f64) -> Vec<(f64, String)> {
    let values: Vec<f64> = match *scale {
        ColorScale::Fixed { min, max, center } if min < center && center < max => vec![
            min,
            (min + center) / 2.0,
            center,
            (center + max) / 2.0,
            max,
        ],
        _ if hi > lo => (0..COLORBAR_TICKS)
            .map(|i| lo + (hi - lo) * i as f64 / (COLORBAR_TICKS - 1) as f64)
            .collect(),
        _ => vec![lo],
    };
    values.into_iter().map(|v| (v, format!("{v:.2}"))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix_2x2(r: f64) -> CorrelationMatrix {
        CorrelationMatrix::from_parts(
            vec!["a".into(), "b".into()],
            vec![1.0, r, r, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn data_range_respects_mask() {
        let m = CorrelationMatrix::from_parts(
            vec!["a".into(), "b".into()],
            vec![1.0, -0.9, 0.3, 1.0],
        )
        .unwrap();
        assert_eq!(data_range(&m, false), (-0.9, 1.0));
        assert_eq!(data_range(&m, true), (0.3, 1.0));
    }

    #[test]
    fn fixed_ticks_include_centre() {
        let ticks = colorbar_ticks(&ColorScale::symmetric_unit(), -1.0, 1.0);
        let labels: Vec<&str> = ticks.iter().map(|(_, l)| l.as_str()).collect();
        assert_eq!(labels, vec!["-1.00", "-0.50", "0.00", "0.50", "1.00"]);
    }

    #[test]
    fn auto_ticks_span_data() {
        let ticks = colorbar_ticks(&ColorScale::Auto, 0.0, 1.0);
        assert_eq!(ticks.len(), COLORBAR_TICKS);
        assert_eq!(ticks[0].0, 0.0);
        assert_eq!(ticks[COLORBAR_TICKS - 1].0, 1.0);
        assert_eq!(colorbar_ticks(&ColorScale::Auto, 1.0, 1.0).len(), 1);
    }

    #[test]
    fn renders_exact_size() {
        let fig = render(&matrix_2x2(0.25), &HeatmapOptions::default(), Resolution::standard())
            .unwrap();
        assert_eq!(fig.dims(), (512, 512));
    }

    #[test]
    fn rejects_bad_shrink() {
        let options = HeatmapOptions {
            colorbar_shrink: 0.0,
            ..HeatmapOptions::default()
        };
        assert!(render(&matrix_2x2(0.1), &options, Resolution::standard()).is_err());
    }

    #[test]
    fn tiny_canvas_is_rejected() {
        let res = Resolution::from_pixels(16, 16, 100.0);
        assert!(matches!(
            render(&matrix_2x2(0.1), &HeatmapOptions::default(), res),
            Err(ChartError::InvalidConfig(_))
        ));
    }
}
