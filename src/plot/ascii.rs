//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks of a trend in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - each series: a line drawn with its own glyph (first series wins overlaps)
//! - anchor points: `o`
//! - selected year: `*` on every series

use crate::domain::{TrendCurve, TrendSpec};

/// One line on the plot.
#[derive(Debug, Clone)]
pub struct PlotSeries {
    pub label: String,
    pub glyph: char,
    pub points: Vec<(f64, f64)>,
}

/// Plot a reference trend: the curve, its remainder if any, anchors and an
/// optional highlighted year.
pub fn render_trend_plot(
    spec: &TrendSpec,
    curve: &TrendCurve,
    highlight: Option<i32>,
    width: usize,
    height: usize,
) -> String {
    let mut series = vec![PlotSeries {
        label: spec.label.clone(),
        glyph: '-',
        points: curve.series(),
    }];
    if let Some(rem) = curve.remainder() {
        series.push(PlotSeries {
            label: spec.remainder_label.clone().unwrap_or_else(|| "Remainder".to_string()),
            glyph: '.',
            points: rem.series(),
        });
    }

    let anchors: Vec<(f64, f64)> = spec
        .anchors
        .points()
        .iter()
        .filter(|p| curve.range.contains(p.year))
        .map(|p| (f64::from(p.year), p.value))
        .collect();

    let mut markers = Vec::new();
    if let Some(year) = highlight {
        for s in &series {
            if let Some(&(x, y)) = s.points.iter().find(|(x, _)| *x == f64::from(year)) {
                markers.push((x, y));
            }
        }
    }

    let x_range = (f64::from(curve.range.start()), f64::from(curve.range.end()));
    render_plot(&series, &anchors, &markers, x_range, width, height)
}

/// Plot arbitrary series over `x_range`.
pub fn render_plot(
    series: &[PlotSeries],
    anchors: &[(f64, f64)],
    markers: &[(f64, f64)],
    x_range: (f64, f64),
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let (x_min, x_max) = if x_range.1 > x_range.0 {
        x_range
    } else {
        (x_range.0 - 0.5, x_range.0 + 0.5)
    };

    let (y_min, y_max) = y_range(series, anchors).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Curves first so anchors and markers overlay them.
    for s in series {
        draw_curve(&mut grid, &s.points, s.glyph, x_min, x_max, y_min, y_max);
    }
    for &(x, y) in anchors {
        let gx = map_x(x, x_min, x_max, width);
        let gy = map_y(y, y_min, y_max, height);
        grid[gy][gx] = 'o';
    }
    for &(x, y) in markers {
        let gx = map_x(x, x_min, x_max, width);
        let gy = map_y(y, y_min, y_max, height);
        grid[gy][gx] = '*';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: year=[{x_min:.0}, {x_max:.0}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    let legend: Vec<String> = series.iter().map(|s| format!("{} {}", s.glyph, s.label)).collect();
    if !legend.is_empty() {
        out.push_str(&format!("Legend: {}\n", legend.join("  ")));
    }

    out
}

fn y_range(series: &[PlotSeries], anchors: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for &(_, y) in series.iter().flat_map(|s| s.points.iter()).chain(anchors.iter()) {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() && max_y.is_finite() {
        // Flat series: center it.
        Some((min_y - 0.5, max_y + 0.5))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(
    grid: &mut [Vec<char>],
    curve: &[(f64, f64)],
    glyph: char,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
) {
    if curve.is_empty() {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let gx = map_x(x, x_min, x_max, width);
        let gy = map_y(y, y_min, y_max, height);
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, gx, gy, glyph),
            None => {
                if grid[gy][gx] == ' ' {
                    grid[gy][gx] = glyph;
                }
            }
        }
        prev = Some((gx, gy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
