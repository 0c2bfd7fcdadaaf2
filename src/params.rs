//! Environmental inputs and the fixed constants of the heat model.

use serde::{Deserialize, Serialize};

use crate::grid::Cell;

/// Smallest value S, P and G are clamped to.
pub const MIN_FRACTION: f64 = 0.01;

fn default_impervious_surface() -> f64 {
    0.5
}

fn default_population_density() -> f64 {
    0.5
}

fn default_green_coverage() -> f64 {
    0.5
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentParams {
    /// S
    #[serde(default = "default_impervious_surface")]
    pub impervious_surface: f64,
    /// P
    #[serde(default = "default_population_density")]
    pub population_density: f64,
    /// G
    #[serde(default = "default_green_coverage")]
    pub green_coverage: f64,
    /// C, unconstrained.
    #[serde(default)]
    pub base_constant: f64,
}

impl Default for EnvironmentParams {
    fn default() -> Self {
        Self {
            impervious_surface: default_impervious_surface(),
            population_density: default_population_density(),
            green_coverage: default_green_coverage(),
            base_constant: 0.0,
        }
    }
}

impl EnvironmentParams {
    /// Copy with S, P and G clamped to `[MIN_FRACTION, 1]`.
    pub fn clamped(self) -> Self {
        Self {
            impervious_surface: clamp_fraction(self.impervious_surface),
            population_density: clamp_fraction(self.population_density),
            green_coverage: clamp_fraction(self.green_coverage),
            base_constant: self.base_constant,
        }
    }
}

pub(crate) fn clamp_fraction(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_FRACTION;
    }
    value.clamp(MIN_FRACTION, 1.0)
}

fn default_proportionality() -> f64 {
    15.0
}

fn default_green_floor() -> f64 {
    0.01
}

fn default_decay_rate() -> f64 {
    0.8
}

fn default_radius() -> u32 {
    2
}

fn default_building_modifier() -> f64 {
    0.5
}

fn default_tree_modifier() -> f64 {
    -0.4
}

fn default_impervious_weight() -> f64 {
    0.4
}

fn default_delta_weight() -> f64 {
    0.5
}

/// Constants of the heat model. The defaults are the reference values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatModel {
    /// K
    #[serde(default = "default_proportionality")]
    pub proportionality: f64,
    /// Floor applied to G before dividing (epsilon).
    #[serde(default = "default_green_floor")]
    pub green_floor: f64,
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f64,
    /// Chebyshev radius of the falloff kernel.
    #[serde(default = "default_radius")]
    pub radius: u32,
    #[serde(default = "default_building_modifier")]
    pub building_modifier: f64,
    #[serde(default = "default_tree_modifier")]
    pub tree_modifier: f64,
    /// Weight of S in the uniform baseline heat.
    #[serde(default = "default_impervious_weight")]
    pub impervious_weight: f64,
    /// Weight of the normalized delta in the uniform baseline heat.
    #[serde(default = "default_delta_weight")]
    pub delta_weight: f64,
}

impl Default for HeatModel {
    fn default() -> Self {
        Self {
            proportionality: default_proportionality(),
            green_floor: default_green_floor(),
            decay_rate: default_decay_rate(),
            radius: default_radius(),
            building_modifier: default_building_modifier(),
            tree_modifier: default_tree_modifier(),
            impervious_weight: default_impervious_weight(),
            delta_weight: default_delta_weight(),
        }
    }
}

impl HeatModel {
    pub fn modifier(&self, cell: Cell) -> f64 {
        match cell {
            Cell::Building => self.building_modifier,
            Cell::Tree => self.tree_modifier,
            Cell::Empty => 0.0,
        }
    }

    /// UHI intensity: `C + K*S*P / max(G, eps)`.
    pub fn delta_t(&self, params: &EnvironmentParams) -> f64 {
        params.base_constant
            + (self.proportionality * params.impervious_surface * params.population_density)
                / params.green_coverage.max(self.green_floor)
    }

    /// Delta at worst-case inputs (S = P = 1, G = eps).
    pub fn visual_max(&self, base_constant: f64) -> f64 {
        base_constant + self.proportionality * (1.0 / self.green_floor)
    }

    /// `delta_t / visual_max`, kept inside [0, 1].
    pub fn normalized_delta_t(&self, params: &EnvironmentParams, delta_t: f64) -> f64 {
        let visual_max = self.visual_max(params.base_constant);
        if visual_max.is_nan() || visual_max <= f64::EPSILON {
            return if delta_t > 0.0 { 1.0 } else { 0.0 };
        }
        let ratio = delta_t / visual_max;
        if ratio.is_nan() {
            return 0.0;
        }
        ratio.clamp(0.0, 1.0)
    }
}
