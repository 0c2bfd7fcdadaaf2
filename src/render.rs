//! Terminal rendering of a heat report.

use crate::{
    color::{heat_to_color, Rgb},
    grid::{Cell, Grid},
    heat::HeatReport,
};

const RESET: &str = "\x1b[0m";

fn glyph(cell: Cell) -> &'static str {
    match cell {
        Cell::Building => "▓▓",
        Cell::Tree => "♣ ",
        Cell::Empty => "  ",
    }
}

/// One line per grid row, each cell two characters wide on a 24-bit
/// background of its heat color, under a header with the UHI intensity.
pub fn render_ansi(grid: &Grid, report: &HeatReport) -> String {
    let mut out = String::with_capacity(grid.len() * 24 + 64);
    out.push_str(&format!("UHI intensity (ΔT): {:.2} °C\n", report.delta_t));
    for (y, cells) in grid.cells().chunks(grid.size().max(1)).enumerate() {
        for (x, &cell) in cells.iter().enumerate() {
            let heat = report.heat[y * grid.size() + x];
            let Rgb { r, g, b } = heat_to_color(heat);
            out.push_str(&format!("\x1b[48;2;{r};{g};{b}m\x1b[38;2;20;20;20m"));
            out.push_str(glyph(cell));
        }
        out.push_str(RESET);
        out.push('\n');
    }
    out
}

/// Tooltip text for one cell, e.g. `(3, 2) building: 3.21 °C`.
pub fn describe_cell(grid: &Grid, report: &HeatReport, index: usize) -> Option<String> {
    let cell = grid.get(index)?;
    let temperature = report.temperature.get(index)?;
    let (x, y) = grid.coords(index);
    Some(format!("({x}, {y}) {}: {temperature:.2} °C", cell.label()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{heat, params::EnvironmentParams, params::HeatModel};

    #[test]
    fn one_line_per_row_plus_header() {
        let grid = Grid::new(4);
        let report = heat::evaluate(&grid, &EnvironmentParams::default(), &HeatModel::default());
        let text = render_ansi(&grid, &report);
        assert_eq!(text.lines().count(), 5);
        assert!(text.starts_with("UHI intensity (ΔT): 7.50 °C"));
        // flat field renders orange everywhere
        assert!(text.contains("\x1b[48;2;245;166;35m"));
    }

    #[test]
    fn cells_draw_their_glyph() {
        let mut grid = Grid::new(2);
        grid.set(0, Cell::Building).unwrap();
        grid.set(3, Cell::Tree).unwrap();
        let report = heat::evaluate(&grid, &EnvironmentParams::default(), &HeatModel::default());
        let rows: Vec<_> = render_ansi(&grid, &report).lines().skip(1).map(str::to_owned).collect();
        assert!(rows[0].contains("m▓▓\x1b"));
        assert!(rows[1].ends_with(&format!("m♣ {RESET}")));
    }

    #[test]
    fn describes_cell_with_two_decimals() {
        let mut grid = Grid::new(4);
        grid.set(6, Cell::Building).unwrap();
        let report = heat::evaluate(&grid, &EnvironmentParams::default(), &HeatModel::default());
        let text = describe_cell(&grid, &report, 6).unwrap();
        assert!(text.starts_with("(2, 1) building: "));
        assert!(text.ends_with(" °C"));
        assert!(describe_cell(&grid, &report, 16).is_none());
    }
}
