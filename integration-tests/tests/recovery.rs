//! Simulate incidence under a known reproduction number, then infer it back.

use approx::assert_relative_eq;
use integration_tests::{incidence, prior, serial_interval};
use renewal_infer::{InferenceResult, PosteriorEngine};
use renewal_sim::ForwardSimulator;

fn means_by_time(result: &InferenceResult) -> impl Iterator<Item = (i64, f64)> + '_ {
    result.times().iter().copied().zip(result.means())
}

#[test]
fn constant_reproduction_number_is_recovered() {
    let mut simulator = ForwardSimulator::new(1.2, serial_interval())
        .unwrap()
        .with_seed(7);
    let times: Vec<i64> = (0..=40).collect();
    let counts = simulator.simulate(100, &times).unwrap();

    let mut engine = PosteriorEngine::new(incidence(&counts), serial_interval(), prior());
    let result = engine.run_inference(6).unwrap();

    assert_eq!(result.times().first(), Some(&8));
    assert_eq!(result.times().last(), Some(&40));

    for (time, mean) in means_by_time(result).filter(|&(time, _)| time > 30) {
        assert!((mean - 1.2).abs() < 0.25, "R at {time} inferred as {mean}");
    }
}

#[test]
fn change_in_reproduction_number_is_tracked() {
    let mut simulator = ForwardSimulator::new(2.0, serial_interval())
        .unwrap()
        .with_seed(11);
    simulator.set_r_profile(&[2.0, 0.8], &[0, 20]).unwrap();
    let times: Vec<i64> = (0..=50).collect();
    let counts = simulator.simulate(100, &times).unwrap();

    let truth = simulator.r_trajectory(50);
    assert_relative_eq!(truth[18], 2.0);
    assert_relative_eq!(truth[19], 0.8);

    let mut engine = PosteriorEngine::new(incidence(&counts), serial_interval(), prior());
    let result = engine.run_inference(6).unwrap();

    for (time, mean) in means_by_time(result) {
        if (12..20).contains(&time) {
            assert!((mean - 2.0).abs() < 0.3, "R at {time} inferred as {mean}");
        } else if time >= 35 {
            assert!((mean - 0.8).abs() < 0.2, "R at {time} inferred as {mean}");
        }
    }
}

#[test]
fn credible_intervals_cover_the_truth() {
    let mut simulator = ForwardSimulator::new(1.5, serial_interval())
        .unwrap()
        .with_seed(3);
    let times: Vec<i64> = (0..=30).collect();
    let counts = simulator.simulate(50, &times).unwrap();

    let mut engine = PosteriorEngine::new(incidence(&counts), serial_interval(), prior());
    engine.run_inference(6).unwrap();
    let rows = engine.get_intervals(0.99).unwrap();

    let late: Vec<_> = rows.iter().filter(|row| row.time >= 20).collect();
    let covered = late
        .iter()
        .filter(|row| row.lower < 1.5 && 1.5 < row.upper)
        .count();

    assert_eq!(late.len(), 11);
    assert!(
        covered * 10 >= late.len() * 8,
        "{covered} of {} rows cover R",
        late.len()
    );
}
