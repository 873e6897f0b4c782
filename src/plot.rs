//! Fixed-grid ASCII chart of a usage series for terminal output.
//!
//! Plot elements:
//! - capacity: `-` line
//! - usage: `o`
//! - non-zero denial counts: `x`

use crate::series::types::SeriesPoint;

/// Renders `points` into a `width` x `height` character grid with a one-line
/// header giving the date and value ranges.
pub fn render_ascii_chart(points: &[SeriesPoint], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let mut out = String::new();
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        out.push_str("Plot: (empty series)\n");
        return out;
    };

    let capacity = f64::from(first.capacity);
    let y_max = points
        .iter()
        .map(|p| f64::from(p.usage.max(p.capacity)))
        .fold(capacity, f64::max)
        .max(1.0);
    let x_max = points.len().saturating_sub(1).max(1) as f64;

    let mut grid = vec![vec![' '; width]; height];

    let cap_row = map_y(capacity, y_max, height);
    for cell in &mut grid[cap_row] {
        *cell = '-';
    }

    for (i, p) in points.iter().enumerate() {
        if p.denial_count > 0 {
            let x = map_x(i as f64, x_max, width);
            let y = map_y(f64::from(p.denial_count), y_max, height);
            grid[y][x] = 'x';
        }
    }
    for (i, p) in points.iter().enumerate() {
        let x = map_x(i as f64, x_max, width);
        let y = map_y(f64::from(p.usage), y_max, height);
        grid[y][x] = 'o';
    }

    out.push_str(&format!(
        "Plot: {} .. {} | y=[0, {y_max:.0}] | - capacity  o usage  x denial\n",
        first.date.format("%Y-%m-%d"),
        last.date.format("%Y-%m-%d"),
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn map_x(i: f64, x_max: f64, width: usize) -> usize {
    let u = (i / x_max).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_max: f64, height: usize) -> usize {
    let u = (y / y_max).clamp(0.0, 1.0);
    // Top row is y_max.
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}
