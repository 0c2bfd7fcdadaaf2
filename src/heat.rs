//! Heat field engine: spatial falloff, min-max normalization and the
//! derived temperature field.

use serde::Serialize;

use crate::grid::Grid;
use crate::params::{EnvironmentParams, HeatModel};

/// Spreads narrower than this collapse to a constant field.
pub const DEGENERATE_RANGE: f64 = 1e-6;

/// Value every cell takes when the field has no spread.
pub const FLAT_HEAT: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatReport {
    pub delta_t: f64,
    pub normalized_delta_t: f64,
    /// Normalized heat per cell, row-major, in [0, 1].
    pub heat: Vec<f64>,
    /// Temperature per cell, row-major.
    pub temperature: Vec<f64>,
}

impl HeatReport {
    pub fn temperature_range(&self) -> (f64, f64) {
        self.temperature
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &t| {
                (lo.min(t), hi.max(t))
            })
    }

    pub fn mean_temperature(&self) -> f64 {
        if self.temperature.is_empty() {
            return 0.0;
        }
        self.temperature.iter().sum::<f64>() / self.temperature.len() as f64
    }
}

/// Evaluates the whole model: delta, normalized delta, heat and temperature.
pub fn evaluate(grid: &Grid, params: &EnvironmentParams, model: &HeatModel) -> HeatReport {
    let delta_t = model.delta_t(params);
    let normalized_delta_t = model.normalized_delta_t(params, delta_t);
    let (heat, temperature) = compute_heat_field(grid, params, model, delta_t);
    HeatReport {
        delta_t,
        normalized_delta_t,
        heat,
        temperature,
    }
}

/// Normalized heat and temperature fields for `grid` at the given delta.
/// Never mutates its inputs.
pub fn compute_heat_field(
    grid: &Grid,
    params: &EnvironmentParams,
    model: &HeatModel,
    delta_t: f64,
) -> (Vec<f64>, Vec<f64>) {
    let normalized_delta_t = model.normalized_delta_t(params, delta_t);
    let raw = raw_heat_field(grid, params, model, normalized_delta_t);
    let heat = normalize(&raw);
    let c = params.base_constant;
    let temperature = heat.iter().map(|h| c + (delta_t - c) * h).collect();
    (heat, temperature)
}

/// Uniform baseline plus the accumulated falloff of every building and tree.
pub fn raw_heat_field(
    grid: &Grid,
    params: &EnvironmentParams,
    model: &HeatModel,
    normalized_delta_t: f64,
) -> Vec<f64> {
    let base_heat = params.impervious_surface * model.impervious_weight
        + normalized_delta_t * model.delta_weight;
    let mut raw = vec![base_heat; grid.len()];

    for (index, &cell) in grid.cells().iter().enumerate() {
        let modifier = model.modifier(cell);
        if modifier == 0.0 {
            continue;
        }
        for (neighbour, dx, dy) in grid.window(index, model.radius) {
            let distance = ((dx * dx + dy * dy) as f64).sqrt();
            raw[neighbour] += modifier * (-distance * model.decay_rate).exp();
        }
    }
    raw
}

/// Min-max scaling with bounds widened to at least [0, 1]. A field without
/// spread maps to `FLAT_HEAT` everywhere.
pub fn normalize(raw: &[f64]) -> Vec<f64> {
    let (raw_min, raw_max) = raw
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &h| {
            (lo.min(h), hi.max(h))
        });
    let min = raw_min.min(0.0);
    let max = raw_max.max(1.0);
    let range = max - min;

    if raw_max - raw_min < DEGENERATE_RANGE || range < DEGENERATE_RANGE {
        return vec![FLAT_HEAT; raw.len()];
    }
    raw.iter()
        .map(|h| ((h - min) / range).clamp(0.0, 1.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    #[test]
    fn normalize_widens_to_unit_bounds() {
        let out = normalize(&[0.2, 0.4]);
        assert!((out[0] - 0.2).abs() < 1e-12);
        assert!((out[1] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn normalize_scales_wide_fields() {
        let out = normalize(&[-1.0, 0.5, 2.0]);
        assert_eq!(out[0], 0.0);
        assert!((out[1] - 0.5).abs() < 1e-12);
        assert_eq!(out[2], 1.0);
    }

    #[test]
    fn normalize_flat_field() {
        assert_eq!(normalize(&[0.3; 4]), vec![FLAT_HEAT; 4]);
    }

    #[test]
    fn temperature_interpolates_between_base_and_delta() {
        let mut grid = Grid::new(5);
        grid.set_at(2, 2, Cell::Building);
        let params = EnvironmentParams {
            base_constant: 20.0,
            ..EnvironmentParams::default()
        };
        let model = HeatModel::default();
        let report = evaluate(&grid, &params, &model);
        for (h, t) in report.heat.iter().zip(&report.temperature) {
            let expected = 20.0 + (report.delta_t - 20.0) * h;
            assert!((t - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn empty_cells_emit_nothing() {
        let grid = Grid::new(5);
        let params = EnvironmentParams::default();
        let raw = raw_heat_field(&grid, &params, &HeatModel::default(), 0.0);
        assert!(raw.iter().all(|&h| (h - 0.2).abs() < 1e-12));
    }
}
