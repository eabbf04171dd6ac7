//! PNG chart rendering for aggregated sample data.
//!
//! Charts are plain raster plots (bars, slices, polylines) with axes and no
//! text. Labels belong in the CSV next to each chart.

use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};

use crate::types::{PipelineError, PipelineResult};

/// Default canvas width in pixels.
pub const CHART_WIDTH: u32 = 800;

/// Default canvas height in pixels.
pub const CHART_HEIGHT: u32 = 480;

const MARGIN: u32 = 40;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([64, 64, 64]);
const BAR_FILL: Rgb<u8> = Rgb([70, 130, 180]);
const BAR_EDGE: Rgb<u8> = Rgb([0, 0, 128]);
const HIST_FILL: Rgb<u8> = Rgb([135, 206, 235]);
const HIST_EDGE: Rgb<u8> = Rgb([0, 0, 0]);

/// Slice and series colors, cycled.
pub const PALETTE: [Rgb<u8>; 8] = [
    Rgb([31, 119, 180]),
    Rgb([255, 127, 14]),
    Rgb([44, 160, 44]),
    Rgb([214, 39, 40]),
    Rgb([148, 103, 189]),
    Rgb([140, 86, 75]),
    Rgb([227, 119, 194]),
    Rgb([127, 127, 127]),
];

/// Renders charts as `.png` files into a single output directory.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    output_dir: PathBuf,
    width: u32,
    height: u32,
}

impl ChartRenderer {
    /// Create a renderer, creating `output_dir` if needed.
    pub fn new(output_dir: impl AsRef<Path>) -> PipelineResult<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        if !output_dir.exists() {
            std::fs::create_dir_all(&output_dir)?;
            tracing::info!("Created output directory: {}", output_dir.display());
        }
        Ok(Self {
            output_dir,
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
        })
    }

    /// Override the canvas size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(2 * MARGIN + 10);
        self.height = height.max(2 * MARGIN + 10);
        self
    }

    pub fn chart_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}.png"))
    }

    /// One bar per `(label, count)` pair, in the given order.
    pub fn bar_chart(&self, data: &[(String, u64)], name: &str) -> PipelineResult<Option<PathBuf>> {
        let max = data.iter().map(|(_, v)| *v).max().unwrap_or(0);
        if data.is_empty() || max == 0 {
            tracing::warn!("No data to chart for {name}");
            return Ok(None);
        }

        let mut img = self.canvas();
        let plot = self.plot_area();
        let slot = plot.width() as f64 / data.len() as f64;

        for (i, (_, value)) in data.iter().enumerate() {
            let bar_h = (*value as f64 / max as f64 * plot.height() as f64).round() as u32;
            let x0 = plot.left + (i as f64 * slot + slot * 0.15) as u32;
            let x1 = plot.left + ((i as f64 + 1.0) * slot - slot * 0.15) as u32;
            let y0 = plot.bottom.saturating_sub(bar_h);
            fill_rect(&mut img, x0, y0, x1, plot.bottom, BAR_FILL);
            stroke_rect(&mut img, x0, y0, x1, plot.bottom, BAR_EDGE);
        }
        draw_axes(&mut img, &plot);

        self.save(img, name, "bar chart")
    }

    /// Slices proportional to each count, starting at twelve o'clock, clockwise.
    pub fn pie_chart(&self, data: &[(String, u64)], name: &str) -> PipelineResult<Option<PathBuf>> {
        let total: u64 = data.iter().map(|(_, v)| *v).sum();
        if total == 0 {
            tracing::warn!("No data to chart for {name}");
            return Ok(None);
        }

        let mut img = self.canvas();
        let cx = self.width as f64 / 2.0;
        let cy = self.height as f64 / 2.0;
        let radius = (self.width.min(self.height) / 2 - MARGIN) as f64;

        // Cumulative fraction at the end of each slice.
        let mut bounds = Vec::with_capacity(data.len());
        let mut acc = 0u64;
        for (_, value) in data {
            acc += value;
            bounds.push(acc as f64 / total as f64);
        }

        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let dx = x as f64 + 0.5 - cx;
            let dy = cy - (y as f64 + 0.5);
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            let mut theta = dx.atan2(dy);
            if theta < 0.0 {
                theta += std::f64::consts::TAU;
            }
            let fraction = theta / std::f64::consts::TAU;
            let slice = bounds
                .iter()
                .position(|b| fraction < *b)
                .unwrap_or(bounds.len() - 1);
            *pixel = PALETTE[slice % PALETTE.len()];
        }

        self.save(img, name, "pie chart")
    }

    /// One polyline per named series; x is the sample index.
    pub fn line_chart(
        &self,
        series: &[(String, Vec<f64>)],
        name: &str,
    ) -> PipelineResult<Option<PathBuf>> {
        let all: Vec<f64> = series.iter().flat_map(|(_, v)| v.iter().copied()).collect();
        if all.is_empty() {
            tracing::warn!("No data to chart for {name}");
            return Ok(None);
        }

        let min = all.iter().copied().fold(f64::INFINITY, f64::min);
        let max = all.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let longest = series.iter().map(|(_, v)| v.len()).max().unwrap_or(1);

        let mut img = self.canvas();
        let plot = self.plot_area();
        draw_axes(&mut img, &plot);

        let to_point = |i: usize, v: f64| -> (i64, i64) {
            let x = if longest > 1 {
                plot.left as f64 + i as f64 / (longest - 1) as f64 * plot.width() as f64
            } else {
                plot.left as f64 + plot.width() as f64 / 2.0
            };
            let t = if max > min { (v - min) / (max - min) } else { 0.5 };
            let y = plot.bottom as f64 - t * plot.height() as f64;
            (x.round() as i64, y.round() as i64)
        };

        for (s, (_, values)) in series.iter().enumerate() {
            let color = PALETTE[s % PALETTE.len()];
            let points: Vec<(i64, i64)> = values
                .iter()
                .enumerate()
                .map(|(i, v)| to_point(i, *v))
                .collect();
            for pair in points.windows(2) {
                draw_line(&mut img, pair[0], pair[1], color);
            }
            for &(x, y) in &points {
                fill_rect(
                    &mut img,
                    (x - 3).max(0) as u32,
                    (y - 3).max(0) as u32,
                    (x + 3).max(0) as u32,
                    (y + 3).max(0) as u32,
                    color,
                );
            }
        }

        self.save(img, name, "line chart")
    }

    /// Frequency of `values` across `bins` equal-width intervals.
    pub fn histogram(
        &self,
        values: &[f64],
        bins: usize,
        name: &str,
    ) -> PipelineResult<Option<PathBuf>> {
        if bins == 0 {
            return Err(PipelineError::InvalidInput(
                "histogram needs at least one bin".to_string(),
            ));
        }
        if values.is_empty() {
            tracing::warn!("No data to chart for {name}");
            return Ok(None);
        }

        let counts = bin_counts(values, bins);
        let max = counts.iter().copied().max().unwrap_or(0).max(1);

        let mut img = self.canvas();
        let plot = self.plot_area();
        let slot = plot.width() as f64 / bins as f64;

        for (i, count) in counts.iter().enumerate() {
            if *count == 0 {
                continue;
            }
            let bar_h = (*count as f64 / max as f64 * plot.height() as f64).round() as u32;
            let x0 = plot.left + (i as f64 * slot) as u32;
            let x1 = plot.left + ((i as f64 + 1.0) * slot) as u32;
            let y0 = plot.bottom.saturating_sub(bar_h);
            fill_rect(&mut img, x0, y0, x1, plot.bottom, HIST_FILL);
            stroke_rect(&mut img, x0, y0, x1, plot.bottom, HIST_EDGE);
        }
        draw_axes(&mut img, &plot);

        self.save(img, name, "histogram")
    }

    fn canvas(&self) -> RgbImage {
        RgbImage::from_pixel(self.width, self.height, BACKGROUND)
    }

    fn plot_area(&self) -> PlotArea {
        PlotArea {
            left: MARGIN,
            right: self.width - MARGIN,
            top: MARGIN,
            bottom: self.height - MARGIN,
        }
    }

    fn save(&self, img: RgbImage, name: &str, kind: &str) -> PipelineResult<Option<PathBuf>> {
        let path = self.chart_path(name);
        img.save_with_format(&path, ImageFormat::Png)?;
        tracing::info!("Successfully created {kind}: {}", path.display());
        Ok(Some(path))
    }
}

/// Count values into `bins` equal-width intervals over `[min, max]`.
/// The last interval is closed so the maximum lands in it.
pub fn bin_counts(values: &[f64], bins: usize) -> Vec<u64> {
    let mut counts = vec![0u64; bins];
    if bins == 0 || values.is_empty() {
        return counts;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = if max > min { (max - min) / bins as f64 } else { 1.0 };

    for v in values {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
}

struct PlotArea {
    left: u32,
    right: u32,
    top: u32,
    bottom: u32,
}

impl PlotArea {
    fn width(&self) -> u32 {
        self.right - self.left
    }

    fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    let x1 = x1.min(img.width().saturating_sub(1));
    let y1 = y1.min(img.height().saturating_sub(1));
    for y in y0..=y1 {
        for x in x0..=x1 {
            img.put_pixel(x, y, color);
        }
    }
}

fn stroke_rect(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    let (a, b) = ((x0 as i64, y0 as i64), (x1 as i64, y1 as i64));
    draw_line(img, a, (b.0, a.1), color);
    draw_line(img, (b.0, a.1), b, color);
    draw_line(img, b, (a.0, b.1), color);
    draw_line(img, (a.0, b.1), a, color);
}

fn draw_axes(img: &mut RgbImage, plot: &PlotArea) {
    let (l, r, t, b) = (
        plot.left as i64,
        plot.right as i64,
        plot.top as i64,
        plot.bottom as i64,
    );
    draw_line(img, (l, b), (r, b), AXIS);
    draw_line(img, (l, t), (l, b), AXIS);
}

/// Bresenham line; pixels off the canvas are skipped.
fn draw_line(img: &mut RgbImage, from: (i64, i64), to: (i64, i64), color: Rgb<u8>) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
            img.put_pixel(x as u32, y as u32, color);
        }
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    fn counts(pairs: &[(&str, u64)]) -> Vec<(String, u64)> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_bar_chart_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ChartRenderer::new(dir.path()).unwrap();
        let path = renderer
            .bar_chart(&counts(&[("1", 10), ("2", 5)]), "posts_by_user")
            .unwrap()
            .unwrap();
        assert_eq!(path, dir.path().join("posts_by_user.png"));

        let img = image::open(&path).unwrap();
        assert_eq!(img.dimensions(), (CHART_WIDTH, CHART_HEIGHT));

        // Middle of the first (tallest) bar, just above the axis.
        let plot_w = CHART_WIDTH - 2 * MARGIN;
        let x = MARGIN + plot_w / 4;
        let y = CHART_HEIGHT - MARGIN - 20;
        assert_eq!(img.to_rgb8().get_pixel(x, y), &BAR_FILL);
    }

    #[test]
    fn test_pie_chart_colors_slices() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ChartRenderer::new(dir.path()).unwrap().with_size(200, 200);
        let path = renderer
            .pie_chart(&counts(&[("a", 1), ("b", 1)]), "split")
            .unwrap()
            .unwrap();
        let img = image::open(path).unwrap().to_rgb8();

        // Right half is the first slice, left half the second.
        assert_eq!(img.get_pixel(130, 100), &PALETTE[0]);
        assert_eq!(img.get_pixel(70, 100), &PALETTE[1]);
        // Corners are outside the circle.
        assert_eq!(img.get_pixel(1, 1), &BACKGROUND);
    }

    #[test]
    fn test_empty_inputs_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ChartRenderer::new(dir.path()).unwrap();
        assert!(renderer.bar_chart(&[], "a").unwrap().is_none());
        assert!(renderer.pie_chart(&counts(&[("x", 0)]), "b").unwrap().is_none());
        assert!(renderer.line_chart(&[], "c").unwrap().is_none());
        assert!(renderer.histogram(&[], 5, "d").unwrap().is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_line_chart_and_histogram() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ChartRenderer::new(dir.path()).unwrap();
        let series = vec![
            ("up".to_string(), vec![1.0, 2.0, 3.0]),
            ("flat".to_string(), vec![2.0, 2.0]),
        ];
        assert!(renderer.line_chart(&series, "trend").unwrap().is_some());
        assert!(renderer
            .histogram(&[1.0, 2.0, 2.5, 9.0], 4, "spread")
            .unwrap()
            .is_some());
        assert!(matches!(
            renderer.histogram(&[1.0], 0, "bad"),
            Err(PipelineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bin_counts() {
        assert_eq!(bin_counts(&[0.0, 1.0, 2.0, 3.0, 4.0], 2), vec![2, 3]);
        assert_eq!(bin_counts(&[5.0, 5.0, 5.0], 3), vec![3, 0, 0]);
        assert_eq!(bin_counts(&[], 3), vec![0, 0, 0]);
        assert!(bin_counts(&[1.0], 0).is_empty());
    }
}
