use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    engine::{Engine, EngineBuilder, EngineSettings},
    grid::DEFAULT_GRID_SIZE,
    params::{EnvironmentParams, HeatModel},
};

pub const MAX_GRID_SIZE: usize = 256;
pub const MAX_RADIUS: u32 = MAX_GRID_SIZE as u32;

fn default_name() -> String {
    "default".to_string()
}

fn default_seed() -> u64 {
    905
}

fn default_grid_size() -> usize {
    DEFAULT_GRID_SIZE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_name")]
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,
    #[serde(default)]
    pub params: EnvironmentParams,
    #[serde(default)]
    pub model: HeatModel,
    /// Cell indices cycled once each, in order, after the grid is generated.
    #[serde(default)]
    pub edits: Vec<usize>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: default_name(),
            description: None,
            seed: default_seed(),
            grid_size: default_grid_size(),
            params: EnvironmentParams::default(),
            model: HeatModel::default(),
            edits: Vec::new(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("scenario name must not be empty")]
    EmptyName,
    #[error("grid size {0} must be between 1 and 256")]
    GridSize(usize),
    #[error("parameter {name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("parameter {name} must lie in [0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f64 },
    #[error("model green_floor must be positive, got {0}")]
    GreenFloor(f64),
    #[error("model decay_rate must not be negative, got {0}")]
    DecayRate(f64),
    #[error("model radius {0} exceeds the limit of 256")]
    Radius(u32),
    #[error("edit index {index} is outside a {size}x{size} grid")]
    EditOutOfRange { index: usize, size: usize },
}

impl Scenario {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let scenario: Scenario =
            serde_yaml::from_str(text).context("Failed to parse scenario YAML")?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize scenario")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.grid_size == 0 || self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridSize(self.grid_size));
        }

        let fractions = [
            ("impervious_surface", self.params.impervious_surface),
            ("population_density", self.params.population_density),
            ("green_coverage", self.params.green_coverage),
        ];
        for (name, value) in fractions {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfUnitRange { name, value });
            }
        }

        let reals = [
            ("base_constant", self.params.base_constant),
            ("proportionality", self.model.proportionality),
            ("building_modifier", self.model.building_modifier),
            ("tree_modifier", self.model.tree_modifier),
            ("impervious_weight", self.model.impervious_weight),
            ("delta_weight", self.model.delta_weight),
        ];
        for (name, value) in reals {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }

        if !(self.model.green_floor.is_finite() && self.model.green_floor > 0.0) {
            return Err(ConfigError::GreenFloor(self.model.green_floor));
        }
        if !(self.model.decay_rate.is_finite() && self.model.decay_rate >= 0.0) {
            return Err(ConfigError::DecayRate(self.model.decay_rate));
        }
        if self.model.radius > MAX_RADIUS {
            return Err(ConfigError::Radius(self.model.radius));
        }

        let cells = self.grid_size * self.grid_size;
        if let Some(&index) = self.edits.iter().find(|&&index| index >= cells) {
            return Err(ConfigError::EditOutOfRange {
                index,
                size: self.grid_size,
            });
        }
        Ok(())
    }

    /// Engine seeded and laid out from this scenario, with `edits` applied.
    pub fn build_engine(&self) -> Result<Engine> {
        let settings = EngineSettings {
            scenario_name: self.name.clone(),
            seed: self.seed,
            grid_size: self.grid_size,
            model: self.model,
        };
        let mut engine = EngineBuilder::new(settings)
            .with_params(self.params)
            .build();
        for &index in &self.edits {
            engine
                .cycle_cell(index)
                .with_context(|| format!("Failed to apply edit to cell {index}"))?;
        }
        Ok(engine)
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        Scenario::from_yaml(&data).with_context(|| format!("Invalid scenario {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_yaml_uses_defaults() {
        let scenario = Scenario::from_yaml("name: bare\n").unwrap();
        assert_eq!(scenario.name, "bare");
        assert_eq!(scenario.grid_size, 25);
        assert_eq!(scenario.params, EnvironmentParams::default());
        assert_eq!(scenario.model, HeatModel::default());
        assert!(scenario.edits.is_empty());
    }

    #[test]
    fn partial_model_keeps_other_constants() {
        let yaml = "name: tuned\nmodel:\n  decay_rate: 1.2\n";
        let scenario = Scenario::from_yaml(yaml).unwrap();
        assert_eq!(scenario.model.decay_rate, 1.2);
        assert_eq!(scenario.model.proportionality, 15.0);
        assert_eq!(scenario.model.radius, 2);
    }

    #[test]
    fn rejects_fraction_above_one() {
        let mut scenario = Scenario::default();
        scenario.params.green_coverage = 1.5;
        assert_eq!(
            scenario.validate(),
            Err(ConfigError::OutOfUnitRange {
                name: "green_coverage",
                value: 1.5
            })
        );
    }

    #[test]
    fn rejects_zero_grid_and_bad_floor() {
        let mut scenario = Scenario::default();
        scenario.grid_size = 0;
        assert_eq!(scenario.validate(), Err(ConfigError::GridSize(0)));

        let mut scenario = Scenario::default();
        scenario.model.green_floor = 0.0;
        assert_eq!(scenario.validate(), Err(ConfigError::GreenFloor(0.0)));
    }

    #[test]
    fn rejects_oversized_radius() {
        let yaml = "name: r\ngrid_size: 5\nmodel:\n  radius: 3000\nedits: [12]\n";
        let err = Scenario::from_yaml(yaml).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::Radius(3000))
        );

        let mut scenario = Scenario::default();
        scenario.model.radius = MAX_RADIUS;
        assert_eq!(scenario.validate(), Ok(()));
    }

    #[test]
    fn rejects_edit_outside_grid() {
        let mut scenario = Scenario::default();
        scenario.grid_size = 4;
        scenario.edits = vec![3, 16];
        assert_eq!(
            scenario.validate(),
            Err(ConfigError::EditOutOfRange { index: 16, size: 4 })
        );
    }

    #[test]
    fn yaml_round_trip() {
        let mut scenario = Scenario::default();
        scenario.name = "plaza".into();
        scenario.edits = vec![0, 0, 12];
        let text = scenario.to_yaml().unwrap();
        assert_eq!(Scenario::from_yaml(&text).unwrap(), scenario);
    }
}
