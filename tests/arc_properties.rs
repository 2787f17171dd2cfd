//! Behavioural tests for `compute_arc`.
//!
//! The randomized checks draw their inputs from a seeded generator so any
//! failure reproduces.

use circular_coordinates::{compute_arc, ArcError, ArcParams, ArcResult, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EPS: f64 = 1e-6;

fn sample_angle(arc: &ArcResult, sample: usize) -> f64 {
    sample as f64 * 360.0 / arc.len() as f64
}

/// First sample of each new segment, in order.
fn transitions(arc: &ArcResult) -> Vec<usize> {
    arc.segment_of
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0] != pair[1])
        .map(|(i, _)| i + 1)
        .collect()
}

fn random_params(rng: &mut StdRng) -> ArcParams {
    let segments = rng.random_range(1..8);
    ArcParams::builder()
        .center(Point::new(
            rng.random_range(-500.0..500.0),
            rng.random_range(-500.0..500.0),
        ))
        .radius(rng.random_range(0.5..400.0))
        .sample_count(rng.random_range(1..2000))
        .weights((0..segments).map(|_| rng.random_range(0.01..2.0)).collect())
        .total(rng.random_range(0.5..8.0))
        .margin(if rng.random_bool(0.3) {
            0.0
        } else {
            rng.random_range(0.0..5.0)
        })
        .build()
}

#[test]
fn proportional_segments_end_where_weights_run_out() {
    let arc = ArcParams::builder()
        .center(Point::new(320.0, 320.0))
        .radius(250.0)
        .sample_count(1000)
        .weights(vec![0.3, 0.6, 0.5, 0.8])
        .total(4.0)
        .margin(0.5)
        .build()
        .compute()
        .unwrap();

    let step = 360.0 / 1000.0;
    let changes = transitions(&arc);
    assert_eq!(changes.len(), 3);
    for (&sample, expected) in changes.iter().zip([27.0, 81.0, 126.0]) {
        let angle = sample_angle(&arc, sample);
        assert!(angle > expected + 0.5, "sample {sample} at {angle}°");
        assert!(angle <= expected + 0.5 + step, "sample {sample} at {angle}°");
    }
    assert_eq!(changes, vec![77, 227, 352]);
    assert_eq!(*arc.segment_of.last().unwrap(), 3);

    let boundary_angles: Vec<f64> = arc.boundary_points.iter().map(|b| b.angle_deg).collect();
    for (got, want) in boundary_angles.iter().zip([27.0, 81.0, 126.0]) {
        assert!((got - want).abs() < EPS);
    }

    // 27° itself sits in the transition zone of the first boundary, which
    // spans 26.5° to 27.5°.
    assert!(arc.in_transition[75]);
    assert!(arc.in_transition[74]);
    assert!(!arc.in_transition[73]);
    assert!(!arc.in_transition[50]);
}

#[test]
fn equal_weights_split_into_quadrants() {
    let arc = compute_arc(Point::new(0.0, 0.0), 10.0, 1000, &[1.0; 4], 4.0, 0.0).unwrap();

    assert_eq!(arc.segment_of[250], 0);
    assert_eq!(arc.segment_of[251], 1);
    assert_eq!(transitions(&arc), vec![251, 501, 751]);

    assert_eq!(arc.quadrant_points.len(), 4);
    assert_eq!(arc.quadrant_points[0], arc.points[0]);
    for (boundary, quadrant) in arc.boundary_points.iter().zip(&arc.quadrant_points[1..]) {
        assert!(boundary.position.distance(*quadrant) < EPS);
    }
}

#[test]
fn quadrant_points_follow_the_parametrization() {
    let arc = compute_arc(Point::new(1.0, 2.0), 3.0, 8, &[4.0], 4.0, 0.0).unwrap();
    let expected = [
        Point::new(1.0, 5.0),
        Point::new(-2.0, 2.0),
        Point::new(1.0, -1.0),
        Point::new(4.0, 2.0),
    ];
    assert_eq!(arc.quadrant_points.len(), 4);
    for (got, want) in arc.quadrant_points.iter().zip(expected) {
        assert!(got.distance(want) < EPS, "{got:?} != {want:?}");
    }
}

#[test]
fn quadrants_need_exact_multiples_of_ninety_degrees() {
    let arc = compute_arc(Point::default(), 1.0, 6, &[1.0], 4.0, 0.0).unwrap();
    // Samples sit at 0, 60, 120, 180, 240, 300 degrees.
    assert_eq!(arc.quadrant_points, vec![arc.points[0], arc.points[3]]);
}

#[test]
fn single_sample_has_no_boundaries() {
    let weights = [0.3, 0.6, 0.5, 0.8];
    let arc = compute_arc(Point::new(5.0, 5.0), 2.0, 1, &weights, 4.0, 0.5).unwrap();
    assert_eq!(arc.points, vec![Point::new(5.0, 7.0)]);
    assert_eq!(arc.segment_of, vec![0]);
    assert!(arc.boundary_points.is_empty());
}

#[test]
fn invalid_inputs_fail() {
    let center = Point::default();
    let zero_samples = compute_arc(center, 1.0, 0, &[1.0], 4.0, 0.0);
    let no_weights = compute_arc(center, 1.0, 10, &[], 4.0, 0.0);
    let negative_weight = compute_arc(center, 1.0, 10, &[-1.0], 4.0, 0.0);
    let zero_radius = compute_arc(center, 0.0, 10, &[1.0], 4.0, 0.0);
    for result in [zero_samples, no_weights, negative_weight, zero_radius] {
        assert!(matches!(result, Err(ArcError::InvalidArgument { .. })));
    }
}

#[test]
fn randomized_invariants_hold() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..300 {
        let params = random_params(&mut rng);
        let arc = params.compute().unwrap();
        let n = params.sample_count;

        assert_eq!(arc.points.len(), n);
        assert_eq!(arc.segment_of.len(), n);
        assert_eq!(arc.in_transition.len(), n);

        assert!(arc.segment_of.windows(2).all(|w| w[0] <= w[1]));
        assert!(arc.segment_of.iter().all(|&s| s < params.weights.len()));
        assert_eq!(arc.segment_of[0], 0);

        if params.margin == 0.0 {
            assert!(arc.in_transition.iter().all(|t| !t));
        }

        assert!(arc.boundary_points.len() <= params.weights.len());
        let segments: Vec<usize> = arc.boundary_points.iter().map(|b| b.segment).collect();
        let expected: Vec<usize> = (0..segments.len()).collect();
        assert_eq!(segments, expected);
        for boundary in &arc.boundary_points {
            assert!(arc.segment_of[boundary.sample] > boundary.segment);
            assert!(arc.segment_of[boundary.sample - 1] <= boundary.segment);
            let r = boundary.position.distance(params.center);
            assert!((r - params.radius).abs() < EPS * params.radius.max(1.0));
        }

        for p in &arc.points {
            let r = p.distance(params.center);
            assert!((r - params.radius).abs() < EPS * params.radius.max(1.0));
        }
        assert!(arc.quadrant_points.len() <= 4);
        assert_eq!(arc.quadrant_points.first(), Some(&arc.points[0]));

        // Pure: a second call gives the same answer.
        assert_eq!(params.compute().unwrap(), arc);
    }
}
