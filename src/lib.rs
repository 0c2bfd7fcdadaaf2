pub mod color;
pub mod engine;
pub mod generate;
pub mod grid;
pub mod heat;
pub mod params;
pub mod render;
pub mod report;
pub mod rng;
pub mod scenario;

pub use color::{heat_to_color, Rgb};
pub use engine::{Engine, EngineBuilder, EngineSettings};
pub use grid::{Cell, Grid, GridError};
pub use heat::{compute_heat_field, HeatReport};
pub use params::{EnvironmentParams, HeatModel};
pub use scenario::{ConfigError, Scenario, ScenarioLoader};
