//! Proportional arc geometry.
//!
//! A circle is sampled at `sample_count` equally spaced angles and every
//! sample is tagged with the weight segment it falls under. Segments follow
//! each other in the order the weights are given; segment `k` covers the
//! angles up to `360 * (w_0 + .. + w_k) / total` degrees.
//!
//! All positions use one parametrization, see [`point_on_circle`]: angle 0
//! points "up" in a y-up frame and angles grow counter-clockwise.

use std::f64::consts::TAU;

use bon::Builder;

use crate::error::ArcError;

// ============================================================================
// CORE DATA TYPES
// ============================================================================

/// A 2D position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Position on the circle for an angle in radians: `center + radius * (-sin a, cos a)`.
pub fn point_on_circle(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(
        center.x - radius * angle.sin(),
        center.y + radius * angle.cos(),
    )
}

/// Angle in degrees at which an accumulated weight ends.
fn threshold_deg(accumulated: f64, total: f64) -> f64 {
    360.0 * accumulated / total
}

/// Where one weight segment hands over to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    /// Index of the segment that ends here.
    pub segment: usize,
    /// First sample that belongs to the following segment.
    pub sample: usize,
    /// Exact boundary angle in degrees.
    pub angle_deg: f64,
    /// Exact boundary position on the circle.
    pub position: Point,
}

/// One sample of an [`ArcResult`], as yielded by [`ArcResult::samples`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub index: usize,
    /// Angle in radians.
    pub angle: f64,
    pub position: Point,
    pub segment: usize,
    pub in_transition: bool,
}

/// Output of [`compute_arc`].
#[derive(Debug, Clone, PartialEq)]
pub struct ArcResult {
    pub center: Point,
    pub radius: f64,
    pub total: f64,
    /// `sample_count` positions, point `i` at angle `i * 2π / sample_count`.
    pub points: Vec<Point>,
    /// Active weight segment for every sample.
    pub segment_of: Vec<usize>,
    /// Samples lying within `margin` degrees of the next segment boundary.
    pub in_transition: Vec<bool>,
    /// Segment changes in crossing order.
    pub boundary_points: Vec<Boundary>,
    /// Samples whose angle is an exact multiple of 90°, in crossing order.
    pub quadrant_points: Vec<Point>,
    /// Running weight total at the end of each segment.
    pub cumulative: Vec<f64>,
}

impl ArcResult {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        let n = self.points.len() as f64;
        self.points
            .iter()
            .zip(&self.segment_of)
            .zip(&self.in_transition)
            .enumerate()
            .map(move |(index, ((&position, &segment), &in_transition))| Sample {
                index,
                angle: index as f64 * TAU / n,
                position,
                segment,
                in_transition,
            })
    }

    /// Position where the accumulated weight of `segment` runs out, or `None`
    /// when that happens at or beyond the full circle.
    pub fn segment_end(&self, segment: usize) -> Option<Point> {
        let accumulated = *self.cumulative.get(segment)?;
        let angle_deg = threshold_deg(accumulated, self.total);
        (angle_deg < 360.0)
            .then(|| point_on_circle(self.center, self.radius, angle_deg.to_radians()))
    }
}

// ============================================================================
// PARAMETERS
// ============================================================================

/// Inputs of [`compute_arc`] with the values the plot uses by default.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct ArcParams {
    #[builder(default = Point::new(320.0, 320.0), into)]
    pub center: Point,
    #[builder(default = 250.0)]
    pub radius: f64,
    #[builder(default = 1000)]
    pub sample_count: usize,
    #[builder(default = vec![0.3, 0.6, 0.5, 0.8])]
    pub weights: Vec<f64>,
    #[builder(default = 4.0)]
    pub total: f64,
    /// Transition width in degrees around each boundary.
    #[builder(default = 0.5)]
    pub margin: f64,
}

impl Default for ArcParams {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ArcParams {
    pub fn compute(&self) -> Result<ArcResult, ArcError> {
        compute_arc(
            self.center,
            self.radius,
            self.sample_count,
            &self.weights,
            self.total,
            self.margin,
        )
    }

    pub fn validate(&self) -> Result<(), ArcError> {
        validate(
            self.center,
            self.radius,
            self.sample_count,
            &self.weights,
            self.total,
            self.margin,
        )
    }
}

fn validate(
    center: Point,
    radius: f64,
    sample_count: usize,
    weights: &[f64],
    total: f64,
    margin: f64,
) -> Result<(), ArcError> {
    if !center.is_finite() {
        return Err(ArcError::invalid("center", format!("{center:?} is not finite")));
    }
    if !(radius.is_finite() && radius > 0.0) {
        return Err(ArcError::invalid("radius", format!("{radius} must be positive")));
    }
    if sample_count == 0 {
        return Err(ArcError::invalid("sample_count", "must be at least 1"));
    }
    if weights.is_empty() {
        return Err(ArcError::invalid("weights", "at least one weight is required"));
    }
    if let Some((i, w)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !(w.is_finite() && **w > 0.0))
    {
        return Err(ArcError::invalid(
            "weights",
            format!("weight {i} is {w}, weights must be positive"),
        ));
    }
    if !(total.is_finite() && total > 0.0) {
        return Err(ArcError::invalid("total", format!("{total} must be positive")));
    }
    if !(margin.is_finite() && margin >= 0.0) {
        return Err(ArcError::invalid("margin", format!("{margin} must not be negative")));
    }
    Ok(())
}

// ============================================================================
// COMPUTATION
// ============================================================================

/// Sample a circle and split it into segments proportional to `weights`.
///
/// `total` is the weight of the full circle and `margin` the transition width
/// in degrees. A sample moves on to the next segment once its angle exceeds
/// the current boundary by more than `margin`; the last segment never
/// advances, so weights summing to less than `total` leave it running to the
/// end of the circle. Samples within `margin` of any segment's end, the last
/// one included, are flagged as in transition.
pub fn compute_arc(
    center: Point,
    radius: f64,
    sample_count: usize,
    weights: &[f64],
    total: f64,
    margin: f64,
) -> Result<ArcResult, ArcError> {
    validate(center, radius, sample_count, weights, total, margin)?;

    let cumulative: Vec<f64> = weights
        .iter()
        .scan(0.0, |acc, w| {
            *acc += w;
            Some(*acc)
        })
        .collect();
    let last = weights.len() - 1;
    let threshold = |segment: usize| threshold_deg(cumulative[segment], total);

    let mut points = Vec::with_capacity(sample_count);
    let mut segment_of = Vec::with_capacity(sample_count);
    let mut in_transition = Vec::with_capacity(sample_count);
    let mut boundary_points = Vec::new();
    let mut quadrant_points = Vec::with_capacity(4);
    let mut segment = 0;

    for i in 0..sample_count {
        let angle_deg = i as f64 * 360.0 / sample_count as f64;
        let position = point_on_circle(center, radius, i as f64 * TAU / sample_count as f64);

        // Segments narrower than one step are crossed within a single sample.
        while segment < last && angle_deg > threshold(segment) + margin {
            let boundary_deg = threshold(segment);
            boundary_points.push(Boundary {
                segment,
                sample: i,
                angle_deg: boundary_deg,
                position: point_on_circle(center, radius, boundary_deg.to_radians()),
            });
            segment += 1;
        }

        let transition = margin > 0.0 && (angle_deg - threshold(segment)).abs() <= margin;

        if (4 * i as u128) % sample_count as u128 == 0 {
            quadrant_points.push(position);
        }

        points.push(position);
        segment_of.push(segment);
        in_transition.push(transition);
    }

    Ok(ArcResult {
        center,
        radius,
        total,
        points,
        segment_of,
        in_transition,
        boundary_points,
        quadrant_points,
        cumulative,
    })
}
