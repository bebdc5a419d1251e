//! GDF5–NOG Screen: Digit Joint Patterning
//!
//! Usage:
//!
//! ```text
//!   gdf5_nog_screen [PARAMS.json] [OPTIONS.json]
//! ```
//!
//! Without arguments the built-in screening space is used with two values
//! per free parameter. Pattern-forming records are written as JSON to
//! stdout after the summary.

use std::{env, fs, process};

use log::{error, info};
use turing_screen::{
    Gdf5Nog, ParameterSet, ParameterSweep, ReferenceSystem, SweepOptions, TuringError, TuringResult,
};

fn read(path: &str) -> TuringResult<String> {
    fs::read_to_string(path).map_err(|e| TuringError::config(format!("cannot read {}: {}", path, e)))
}

fn run() -> TuringResult<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    let params = match args.first() {
        Some(path) => {
            info!("Loading parameter set from {}", path);
            ParameterSet::from_json(&read(path)?)?
        }
        None => Gdf5Nog::screening_parameters(2)?,
    };
    let options = match args.get(1) {
        Some(path) => {
            info!("Loading sweep options from {}", path);
            SweepOptions::from_json(&read(path)?)?
        }
        None => SweepOptions::default(),
    };

    println!("═══════════════════════════════════════════════════════════════");
    println!("  Turing Screen: GDF5–NOG Digit Joint Network");
    println!("═══════════════════════════════════════════════════════════════\n");

    let model = Gdf5Nog::default().model()?;
    let sweep = ParameterSweep::new(&model, &params, options)?;

    println!("Species:    {}", model.species().join(", "));
    println!("Parameters: {}", model.parameters().join(", "));
    println!("Axes:       {:?}", sweep.space().axis_sizes());
    println!("Combinations = {}\n", sweep.space().len());

    let result = sweep.run()?;
    let summary = &result.summary;

    println!("  Pattern-forming:       {:6}", summary.pattern_forming);
    println!("  Not pattern-forming:   {:6}", summary.non_pattern_forming);
    println!("  Convergence failures:  {:6}", summary.convergence_failures);
    println!("  Degenerate:            {:6}", summary.degenerate);
    println!("  Skipped:               {:6}", summary.skipped());
    println!("  Turing fraction:       {:.3}%\n", 100.0 * summary.pattern_fraction());

    if !result.is_empty() {
        let shortest = result.iter().map(|r| r.wavelength).fold(f64::INFINITY, f64::min);
        let longest = result.iter().map(|r| r.wavelength).fold(0.0, f64::max);
        println!("  Wavelengths ∈ [{:.4}, {:.4}]\n", shortest, longest);
    }

    println!("{}", serde_json::to_string_pretty(&result.records)?);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = run() {
        error!("{}", e);
        process::exit(1);
    }
}
