mod common;

use common::evolve;
use lifelab::core::grid::Grid;
use lifelab::core::measure;
use lifelab::core::pattern::Pattern;

fn board(patterns: &[Pattern]) -> Grid {
    Grid::from_patterns(patterns, 20, 20).unwrap()
}

#[test]
fn block_is_a_still_life() {
    let traj = evolve(&board(&[Pattern::block(5, 5)]), 8);
    assert!(measure::is_still_life(&traj));
    // A state repeated consecutively is also a recurrence.
    assert!(measure::is_oscillator(&traj));
    assert_eq!(measure::stability_fraction(&traj).unwrap(), 1.0);
}

#[test]
fn blinker_oscillates_with_period_two() {
    let traj = evolve(&board(&[Pattern::blinker(5, 6)]), 4);
    assert!(measure::is_oscillator(&traj));
    assert!(!measure::is_still_life(&traj));
    // Even generation count: first and last frame coincide.
    assert_eq!(measure::stability_fraction(&traj).unwrap(), 1.0);
    assert_eq!(traj.frame(0).unwrap(), traj.frame(2).unwrap());
    assert_ne!(traj.frame(0).unwrap(), traj.frame(1).unwrap());
}

#[test]
fn glider_translates_without_exact_recurrence() {
    let traj = evolve(&board(&[Pattern::glider(1, 1)]), 12);
    // Periodic only up to translation, so the exact-state detector
    // must not flag it.
    assert!(!measure::is_oscillator(&traj));
    assert!(!measure::is_still_life(&traj));
}

#[test]
fn glider_bounding_box_and_velocity() {
    let traj = evolve(&board(&[Pattern::glider(1, 1)]), 12);
    // Every phase of the glider fits a 3x3 box.
    for bounds in measure::bounding_boxes(&traj, traj.len()) {
        assert_eq!(bounds.height(), 2);
        assert_eq!(bounds.width(), 2);
    }
    // One cell down and right every four generations: displacement over
    // twelve generations is 3 * sqrt(2).
    let expected = 3.0 * std::f64::consts::SQRT_2;
    let total = measure::long_time_velocity(&traj, traj.len());
    assert!(
        (total - expected).abs() < 1e-9,
        "expected displacement {expected}, got {total}"
    );
    let steps = measure::per_step_velocity(&traj, traj.len());
    assert_eq!(steps.len(), traj.len() - 1);
}

#[test]
fn empty_board_stays_empty_with_degenerate_bounds() {
    let traj = evolve(&Grid::new(10, 10), 3);
    for frame in &traj {
        assert_eq!(frame.live_cells(), 0);
    }
    for bounds in measure::bounding_boxes(&traj, traj.len()) {
        assert_eq!(bounds, measure::Bounds::default());
    }
}
