//! End-to-end screening of reference systems.

use approx::assert_relative_eq;
use turing_screen::{
    get_param, get_params, Bifurcating, Brusselator, Classification, GiererMeinhardt, ParamKind, ParameterSet,
    ParameterSweep, ReferenceSystem, Schnakenberg, StabilityAnalyzer, SweepOptions, SweepResult,
};

/// Largest real eigenvalue of the 2×2 matrix J − q²D in closed form
fn growth_rate_2x2(j: [f64; 4], du: f64, dv: f64, q: f64) -> f64 {
    let s = q * q;
    let (a, b, c, d) = (j[0] - s * du, j[1], j[2], j[3] - s * dv);
    let trace = a + d;
    let disc = trace * trace - 4.0 * (a * d - b * c);
    if disc >= 0.0 {
        0.5 * (trace + disc.sqrt())
    } else {
        0.5 * trace
    }
}

fn schnakenberg_grid() -> ParameterSet {
    ParameterSet::new()
        .with_reaction("a", [0.05, 0.1, 0.2])
        .with_reaction("b", [0.5, 0.9, 1.5])
        .with_diffusion("u", [1.0])
        .with_diffusion("v", [1.0, 40.0])
}

fn run(params: &ParameterSet, options: SweepOptions) -> SweepResult {
    let model = Schnakenberg::default().model().unwrap();
    ParameterSweep::new(&model, params, options).unwrap().run().unwrap()
}

#[test]
fn schnakenberg_wavelength_matches_closed_form() {
    let system = Schnakenberg::default();
    let model = system.model().unwrap();
    let result = ParameterSweep::new(&model, &system.parameter_set().unwrap(), SweepOptions::default())
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(result.len(), 1);
    let record = &result.records[0];

    let j = system.jacobian_at_steady_state();
    let (q_star, _) = (1..=200_000)
        .map(|i| i as f64 * 1e-5)
        .map(|q| (q, growth_rate_2x2(j, system.du, system.dv, q)))
        .fold((0.0, f64::NEG_INFINITY), |best, cur| if cur.1 > best.1 { cur } else { best });

    assert_relative_eq!(record.wavelength, 2.0 * std::f64::consts::PI / q_star, max_relative = 0.05);
    assert_relative_eq!(
        record.max_real_eigenvalue,
        growth_rate_2x2(j, system.du, system.dv, q_star),
        max_relative = 0.01
    );
    // activator and substrate peak out of phase
    assert_eq!(record.pattern_phase, vec![1, -1]);
    assert!(record.non_oscillatory);
}

#[test]
fn equal_diffusion_never_forms_patterns() {
    let params = schnakenberg_grid().with_diffusion("v", [1.0]);
    let result = run(&params, SweepOptions::default());
    assert!(result.is_empty());
    assert_eq!(result.summary.total, 9);
    assert_eq!(result.summary.pattern_forming, 0);
}

#[test]
fn results_independent_of_batching_and_threads() {
    let params = schnakenberg_grid();
    let reference = run(&params, SweepOptions { batch_size: 1, threads: Some(1), ..SweepOptions::default() });
    assert!(!reference.is_empty());

    for (batch_size, threads) in [(4, Some(2)), (7, Some(3)), (10_000, None)] {
        let other = run(&params, SweepOptions { batch_size, threads, ..SweepOptions::default() });
        assert_eq!(other, reference, "batch_size = {}, threads = {:?}", batch_size, threads);
    }
}

#[test]
fn records_are_ordered_by_combination() {
    let result = run(&schnakenberg_grid(), SweepOptions::default());
    let indices: Vec<usize> = result.iter().map(|r| r.combination_index).collect();
    let mut sorted = indices.clone();
    sorted.sort_unstable();
    assert_eq!(indices, sorted);

    let s = result.summary;
    assert_eq!(s.total, 18);
    assert_eq!(s.pattern_forming + s.skipped(), s.total);
    assert_eq!(s.pattern_forming, result.len());
}

#[test]
fn records_round_trip_through_parameter_sets() {
    let model = Schnakenberg::default().model().unwrap();
    let result = run(&schnakenberg_grid(), SweepOptions::default());

    let dv = get_param(&model, &result.records, "v", ParamKind::Diffusion).unwrap();
    assert!(dv.iter().all(|&d| d == 40.0));

    // every record re-screens to the same outcome on its own
    for record in result.iter() {
        let single = get_params(&model, record).unwrap();
        let again = ParameterSweep::new(&model, &single, SweepOptions::default()).unwrap().run().unwrap();
        assert_eq!(again.len(), 1);
        assert_relative_eq!(again.records[0].wavelength, record.wavelength, max_relative = 1e-6);
        assert_eq!(again.records[0].pattern_phase, record.pattern_phase);
    }
}

#[test]
fn brusselator_turing_threshold() {
    let system = Brusselator::default();
    let b_t = system.turing_b_critical();
    assert_relative_eq!(system.critical_parameter().unwrap(), b_t);
    assert!(b_t < system.theoretical_b_critical());
    let model = system.model().unwrap();

    let screen = |b: f64| {
        let params = system.with_b(b).parameter_set().unwrap();
        ParameterSweep::new(&model, &params, SweepOptions::default()).unwrap().run().unwrap()
    };
    assert!(screen(0.95 * b_t).is_empty());

    let above = screen(1.05 * b_t);
    assert_eq!(above.len(), 1);
    let expected = 2.0 * std::f64::consts::PI / system.critical_wavenumber();
    assert_relative_eq!(above.records[0].wavelength, expected, max_relative = 0.1);
}

#[test]
fn gierer_meinhardt_is_in_phase() {
    let system = GiererMeinhardt::default();
    let model = system.model().unwrap();
    let ss = system.steady_state().unwrap();
    let report = StabilityAnalyzer::default()
        .analyze(&model, &ss, &system.reaction_params(), &system.diffusion())
        .unwrap();
    assert_eq!(report.classification, Classification::TuringUnstable);
    assert_eq!(report.pattern_phase, vec![1, 1]);
}
