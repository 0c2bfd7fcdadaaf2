use tracing::{debug, info};

use crate::{
    generate::{generate_grid, occupancy_params},
    grid::{Cell, Grid, GridError},
    heat::{self, HeatReport},
    params::{EnvironmentParams, HeatModel},
    rng::RngManager,
};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub grid_size: usize,
    pub model: HeatModel,
}

pub struct EngineBuilder {
    settings: EngineSettings,
    params: EnvironmentParams,
    grid: Option<Grid>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            params: EnvironmentParams::default(),
            grid: None,
        }
    }

    pub fn with_params(mut self, params: EnvironmentParams) -> Self {
        self.params = params;
        self
    }

    /// Starts from a fixed layout instead of a generated one. The grid's
    /// size replaces `EngineSettings::grid_size`.
    pub fn with_grid(mut self, grid: Grid) -> Self {
        self.grid = Some(grid);
        self
    }

    pub fn build(self) -> Engine {
        let mut engine = Engine {
            rng: RngManager::new(self.settings.seed),
            control: self.params.clamped(),
            grid: Grid::new(self.settings.grid_size),
            settings: self.settings,
        };
        match self.grid {
            Some(grid) => {
                engine.settings.grid_size = grid.size();
                engine.grid = grid;
            }
            None => engine.regenerate(),
        }
        engine
    }
}

/// Interactive session state: the user's control parameters and the grid
/// they produced. Derived fields are recomputed on every `evaluate`.
pub struct Engine {
    rng: RngManager,
    control: EnvironmentParams,
    grid: Grid,
    settings: EngineSettings,
}

impl Engine {
    /// Stores new control parameters (S, P, G clamped) and lays out a new grid.
    pub fn set_params(&mut self, params: EnvironmentParams) {
        self.control = params.clamped();
        self.regenerate();
    }

    /// Advances one cell through Empty -> Building -> Tree -> Empty.
    pub fn cycle_cell(&mut self, index: usize) -> Result<Cell, GridError> {
        let cell = self.grid.cycle(index)?;
        debug!(index, cell = cell.label(), "cell edited");
        Ok(cell)
    }

    pub fn control_params(&self) -> EnvironmentParams {
        self.control
    }

    /// Parameters as shown to the user, re-derived from grid occupancy.
    pub fn display_params(&self) -> EnvironmentParams {
        occupancy_params(&self.grid, &self.control)
    }

    pub fn evaluate(&self) -> HeatReport {
        heat::evaluate(&self.grid, &self.display_params(), &self.settings.model)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn model(&self) -> &HeatModel {
        &self.settings.model
    }

    pub fn scenario_name(&self) -> &str {
        &self.settings.scenario_name
    }

    fn regenerate(&mut self) {
        let size = self.settings.grid_size;
        self.grid = generate_grid(size, &self.control, &mut self.rng);
        info!(
            scenario = %self.settings.scenario_name,
            size,
            buildings = self.grid.count(Cell::Building),
            trees = self.grid.count(Cell::Tree),
            "grid regenerated"
        );
    }
}
