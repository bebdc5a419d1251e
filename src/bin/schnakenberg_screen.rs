//! Schnakenberg Screen: Turing Window of the Substrate-Depletion Model
//!
//! Screens a grid of (a, b) production rates at two diffusion ratios,
//! reports the pattern-forming fraction, then simulates the first
//! Turing-unstable combination on a domain of three dominant wavelengths.
//!
//! ## Key Insight
//!
//! With equal diffusion no combination forms patterns. At Dv/Du = 40 a
//! band of (a, b) opens up around a = 0.1, b = 0.9, where the activator u
//! and the substrate v peak out of phase.

use std::process;

use log::error;
use turing_screen::{
    get_params, screen_values, ParameterSet, ParameterSweep, PdeSimulator, ReferenceSystem, Sampling,
    Schnakenberg, ScreenMode, SimulationConfig, SimulationOptions, SweepOptions, TuringResult,
};

fn run() -> TuringResult<()> {
    println!("═══════════════════════════════════════════════════════════════");
    println!("  Turing Screen: Schnakenberg Substrate-Depletion Model");
    println!("═══════════════════════════════════════════════════════════════\n");

    let model = Schnakenberg::default().model()?;

    let a_values = screen_values(0.02, 0.3, 15, ScreenMode::Linear)?;
    let b_values = screen_values(0.3, 2.0, 18, ScreenMode::Linear)?;
    let params = ParameterSet::new()
        .with_reaction("a", a_values.clone())
        .with_reaction("b", b_values.clone())
        .with_diffusion("u", [1.0])
        .with_diffusion("v", [1.0, 40.0])
        .with_seed(2024);

    println!("Screening Space:");
    println!("  a ∈ [{:.3}, {:.3}] ({} values)", a_values[0], a_values[a_values.len() - 1], a_values.len());
    println!("  b ∈ [{:.3}, {:.3}] ({} values)", b_values[0], b_values[b_values.len() - 1], b_values.len());
    println!("  Du = 1, Dv ∈ {{1, 40}}");

    let sweep = ParameterSweep::new(&model, &params, SweepOptions::default())?;
    println!("  Combinations = {}", sweep.space().len());

    let result = sweep.run()?;
    let summary = &result.summary;

    println!("\n══════════════════════════════════════════════════════════════");
    println!("  Screen Results");
    println!("══════════════════════════════════════════════════════════════\n");
    println!("  Pattern-forming:       {:5}", summary.pattern_forming);
    println!("  Not pattern-forming:   {:5}", summary.non_pattern_forming);
    println!("  Convergence failures:  {:5}", summary.convergence_failures);
    println!("  Degenerate:            {:5}", summary.degenerate);
    println!("  Turing fraction:       {:.2}%", 100.0 * summary.pattern_fraction());

    println!("\n  {:>8} {:>8} {:>6} {:>10} {:>10} {:>8}", "a", "b", "Dv", "λ_max", "wavelength", "phase");
    for record in result.iter().take(10) {
        println!(
            "  {:8.4} {:8.4} {:6.1} {:10.4} {:10.4} {:>8}",
            record.reaction_params[0],
            record.reaction_params[1],
            record.diffusion_constants[1],
            record.max_real_eigenvalue,
            record.wavelength,
            format!("{:?}", record.pattern_phase)
        );
    }
    if result.len() > 10 {
        println!("  ... ({} more)", result.len() - 10);
    }

    let Some(first) = result.record(0) else {
        println!("\nNo Turing-unstable combination found; nothing to simulate.");
        return Ok(());
    };

    println!("\n══════════════════════════════════════════════════════════════");
    println!("  PDE Simulation of Combination #{}", first.combination_index);
    println!("══════════════════════════════════════════════════════════════\n");

    let options = SimulationOptions {
        final_time: 200.0,
        sampling: Sampling::Times(vec![0.0, 50.0, 100.0, 200.0]),
        ..SimulationOptions::default()
    };
    let config = SimulationConfig::from_parameter_set(&model, &get_params(&model, first)?, options)?;
    let trajectory = PdeSimulator::new().simulate(&model, &config)?;

    println!("  Domain size = {:.4} (3 × {:.4})", trajectory.domain_size, first.wavelength);
    println!("  Seed        = {}", trajectory.seed);
    println!("  Status      = {:?}", trajectory.status);

    for (i, t) in trajectory.times.iter().enumerate() {
        if let Some(u) = trajectory.profile("u", i) {
            let min = u.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = u.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            println!("  t = {:6.1}: u ∈ [{:.4}, {:.4}], amplitude = {:.4}", t, min, max, max - min);
        }
    }

    println!("\nDone.");
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = run() {
        error!("{}", e);
        process::exit(1);
    }
}
