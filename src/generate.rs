//! Random grid layout from density parameters, and the inverse: densities
//! measured from a grid's actual occupancy.

use rand::{Rng, RngCore};

use crate::grid::{Cell, Grid};
use crate::params::{clamp_fraction, EnvironmentParams};
use crate::rng::RngManager;

pub const BUILDINGS_STREAM: &str = "buildings";
pub const TREES_STREAM: &str = "trees";

/// Share of the grid that full population density fills with buildings.
pub const BUILDING_CAPACITY: f64 = 0.7;
/// Share of the grid that full green coverage fills with trees.
pub const TREE_CAPACITY: f64 = 0.6;
/// Random draws per cell allowed for each placement phase.
const ATTEMPTS_PER_CELL: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementTargets {
    pub buildings: usize,
    pub trees: usize,
}

impl PlacementTargets {
    pub fn for_params(size: usize, params: &EnvironmentParams) -> Self {
        let total = (size * size) as f64;
        Self {
            buildings: target(params.population_density, total * BUILDING_CAPACITY),
            trees: target(params.green_coverage, total * TREE_CAPACITY),
        }
    }
}

fn target(fraction: f64, capacity: f64) -> usize {
    (fraction.max(0.0) * capacity).floor() as usize
}

/// Lays out a fresh grid: buildings first, then trees, never overlapping.
/// Each phase stops after `3 * size^2` draws even if its target is unmet.
pub fn generate_grid(size: usize, params: &EnvironmentParams, rng: &mut RngManager) -> Grid {
    let mut grid = Grid::new(size);
    if grid.is_empty() {
        return grid;
    }
    let targets = PlacementTargets::for_params(size, params);
    scatter(&mut grid, Cell::Building, targets.buildings, rng.stream(BUILDINGS_STREAM));
    scatter(&mut grid, Cell::Tree, targets.trees, rng.stream(TREES_STREAM));
    grid
}

fn scatter(grid: &mut Grid, kind: Cell, target: usize, rng: &mut impl RngCore) -> usize {
    let len = grid.len();
    let mut placed = 0;
    for _ in 0..len * ATTEMPTS_PER_CELL {
        if placed >= target {
            break;
        }
        let index = rng.gen_range(0..len);
        if grid.get(index) == Some(Cell::Empty) {
            let (x, y) = grid.coords(index);
            grid.set_at(x, y, kind);
            placed += 1;
        }
    }
    placed
}

/// Parameters as the grid actually shows them: P and G are re-derived from
/// building and tree counts, S and C pass through from `control`.
pub fn occupancy_params(grid: &Grid, control: &EnvironmentParams) -> EnvironmentParams {
    if grid.is_empty() {
        return *control;
    }
    let total = grid.len() as f64;
    let buildings = grid.count(Cell::Building) as f64;
    let trees = grid.count(Cell::Tree) as f64;
    EnvironmentParams {
        impervious_surface: control.impervious_surface,
        population_density: clamp_fraction(buildings / (total * BUILDING_CAPACITY)),
        green_coverage: clamp_fraction(trees / (total * TREE_CAPACITY)),
        base_constant: control.base_constant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_use_floor() {
        let params = EnvironmentParams::default();
        let targets = PlacementTargets::for_params(25, &params);
        // 0.5 * 625 * 0.7 = 218.75, 0.5 * 625 * 0.6 = 187.5
        assert_eq!(targets.buildings, 218);
        assert_eq!(targets.trees, 187);
    }

    #[test]
    fn generated_counts_meet_targets() {
        let params = EnvironmentParams::default();
        let grid = generate_grid(25, &params, &mut RngManager::new(7));
        assert_eq!(grid.count(Cell::Building), 218);
        assert_eq!(grid.count(Cell::Tree), 187);
        assert_eq!(grid.count(Cell::Empty), 625 - 218 - 187);
    }

    #[test]
    fn same_seed_same_layout() {
        let params = EnvironmentParams::default();
        assert_eq!(
            generate_grid(25, &params, &mut RngManager::new(11)),
            generate_grid(25, &params, &mut RngManager::new(11))
        );
    }

    #[test]
    fn full_densities_underfill_rather_than_overlap() {
        let params = EnvironmentParams {
            population_density: 1.0,
            green_coverage: 1.0,
            ..EnvironmentParams::default()
        };
        let grid = generate_grid(25, &params, &mut RngManager::new(3));
        let buildings = grid.count(Cell::Building);
        let trees = grid.count(Cell::Tree);
        assert!(buildings <= 437);
        assert!(trees <= 375);
        assert_eq!(buildings + trees + grid.count(Cell::Empty), 625);
    }

    #[test]
    fn occupancy_floors_at_min_fraction() {
        let control = EnvironmentParams {
            impervious_surface: 0.9,
            base_constant: 1.5,
            ..EnvironmentParams::default()
        };
        let shown = occupancy_params(&Grid::new(25), &control);
        assert_eq!(shown.population_density, 0.01);
        assert_eq!(shown.green_coverage, 0.01);
        assert_eq!(shown.impervious_surface, 0.9);
        assert_eq!(shown.base_constant, 1.5);
    }

    #[test]
    fn occupancy_tracks_counts() {
        let mut grid = Grid::new(10);
        for i in 0..35 {
            grid.set(i, Cell::Building).unwrap();
        }
        for i in 35..65 {
            grid.set(i, Cell::Tree).unwrap();
        }
        let shown = occupancy_params(&grid, &EnvironmentParams::default());
        assert!((shown.population_density - 0.5).abs() < 1e-12);
        assert!((shown.green_coverage - 0.5).abs() < 1e-12);
    }
}
