use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use heat_island::{
    render::{describe_cell, render_ansi},
    report::FieldReport,
    scenario::{Scenario, ScenarioLoader},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Urban heat island heatmap")]
struct Cli {
    /// Path to a scenario YAML file (built-in defaults when omitted)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the grid side length
    #[arg(long)]
    grid_size: Option<usize>,

    /// Impervious surface fraction (S)
    #[arg(long)]
    impervious: Option<f64>,

    /// Population density fraction (P)
    #[arg(long)]
    population: Option<f64>,

    /// Green coverage fraction (G)
    #[arg(long)]
    green: Option<f64>,

    /// Base temperature constant (C)
    #[arg(long, allow_hyphen_values = true)]
    base: Option<f64>,

    /// Cycle a cell Empty -> Building -> Tree after generation (repeatable)
    #[arg(long = "cycle")]
    cycles: Vec<usize>,

    /// Print the temperature of these cells after the heatmap (repeatable,
    /// text format only; the JSON report already lists every cell)
    #[arg(long = "inspect")]
    inspect: Vec<usize>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn check(&self) -> Result<()> {
        ensure!(
            self.inspect.is_empty() || self.format == Format::Text,
            "--inspect only applies to --format text"
        );
        Ok(())
    }

    fn scenario(&self) -> Result<Scenario> {
        let mut scenario = match &self.scenario {
            Some(path) => ScenarioLoader::new(".").load(path)?,
            None => Scenario::default(),
        };
        if let Some(seed) = self.seed {
            scenario.seed = seed;
        }
        if let Some(size) = self.grid_size {
            scenario.grid_size = size;
        }
        if let Some(s) = self.impervious {
            scenario.params.impervious_surface = s;
        }
        if let Some(p) = self.population {
            scenario.params.population_density = p;
        }
        if let Some(g) = self.green {
            scenario.params.green_coverage = g;
        }
        if let Some(c) = self.base {
            scenario.params.base_constant = c;
        }
        scenario.edits.extend(&self.cycles);
        scenario
            .validate()
            .context("Invalid scenario after command-line overrides")?;
        Ok(scenario)
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.check()?;
    init_tracing(&cli.log_level);

    let scenario = cli.scenario()?;
    let engine = scenario.build_engine()?;
    let report = engine.evaluate();
    info!(
        scenario = %scenario.name,
        delta_t = report.delta_t,
        normalized_delta_t = report.normalized_delta_t,
        "heat field evaluated"
    );

    match cli.format {
        Format::Json => println!("{}", FieldReport::from_engine(&engine).to_json()?),
        Format::Text => {
            print!("{}", render_ansi(engine.grid(), &report));
            for &index in &cli.inspect {
                let line = describe_cell(engine.grid(), &report, index)
                    .with_context(|| format!("No cell at index {index}"))?;
                println!("{line}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspect_requires_text_format() {
        let json = Cli::try_parse_from(["heat-island", "--format", "json", "--inspect", "3"]).unwrap();
        assert!(json.check().is_err());

        let text = Cli::try_parse_from(["heat-island", "--inspect", "3"]).unwrap();
        assert!(text.check().is_ok());

        let plain = Cli::try_parse_from(["heat-island", "--format", "json"]).unwrap();
        assert!(plain.check().is_ok());
    }
}
