use anyhow::{Context, Result};
use serde::Serialize;

use crate::{
    color::heat_to_color,
    engine::Engine,
    grid::Cell,
    params::EnvironmentParams,
};

#[derive(Debug, Serialize)]
pub struct CellReport {
    pub index: usize,
    pub x: usize,
    pub y: usize,
    pub cell: Cell,
    pub heat: f64,
    pub temperature: f64,
    pub color: [u8; 3],
}

#[derive(Debug, Serialize)]
pub struct TemperatureSummary {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

#[derive(Debug, Serialize)]
pub struct FieldReport {
    pub scenario: String,
    pub grid_size: usize,
    pub params: EnvironmentParams,
    pub buildings: usize,
    pub trees: usize,
    pub delta_t: f64,
    pub normalized_delta_t: f64,
    pub temperature: TemperatureSummary,
    pub cells: Vec<CellReport>,
}

impl FieldReport {
    /// Evaluates the engine's current state into a serializable report.
    pub fn from_engine(engine: &Engine) -> Self {
        let grid = engine.grid();
        let heat = engine.evaluate();
        let (min, max) = heat.temperature_range();
        let cells = grid
            .cells()
            .iter()
            .enumerate()
            .map(|(index, &cell)| {
                let (x, y) = grid.coords(index);
                CellReport {
                    index,
                    x,
                    y,
                    cell,
                    heat: heat.heat[index],
                    temperature: heat.temperature[index],
                    color: heat_to_color(heat.heat[index]).to_array(),
                }
            })
            .collect();

        Self {
            scenario: engine.scenario_name().to_string(),
            grid_size: grid.size(),
            params: engine.display_params(),
            buildings: grid.count(Cell::Building),
            trees: grid.count(Cell::Tree),
            delta_t: heat.delta_t,
            normalized_delta_t: heat.normalized_delta_t,
            temperature: TemperatureSummary {
                min,
                mean: heat.mean_temperature(),
                max,
            },
            cells,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize field report")
    }
}
