use glam::{DVec2, FloatExt};
use std::f64::consts::TAU;

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
	a.lerp(b, t)
}

/// Clockwise angle needed to rotate `from` onto `to`, in `(0, TAU]`.
///
/// A zero rotation maps to a full turn so that the exact reverse of an incoming edge is the last choice of a face walk.
pub fn clockwise_angle(from: DVec2, to: DVec2) -> f64 {
	let angle = (from.to_angle() - to.to_angle()).rem_euclid(TAU);
	if angle <= 0. { TAU } else { angle }
}

/// Shoelace area of a closed polygon, positive when counter-clockwise in a y-up frame.
#[cfg(test)]
pub fn polygon_area(points: &[DVec2]) -> f64 {
	if points.len() < 3 {
		return 0.;
	}
	let mut area = 0.;
	for (i, &point) in points.iter().enumerate() {
		let next = points[(i + 1) % points.len()];
		area += point.perp_dot(next);
	}
	area * 0.5
}

/// Contribution of the directed segment `a`-`b` to the winding number of `point`, counted along a ray towards negative x.
///
/// Uses the half-open rule on `y` so that a ray through a shared vertex counts exactly one of its two edges.
pub fn winding_contribution(a: DVec2, b: DVec2, point: DVec2) -> i32 {
	let upward = a.y <= point.y && b.y > point.y;
	let downward = a.y > point.y && b.y <= point.y;
	if !upward && !downward {
		return 0;
	}
	let x_cross = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
	if x_cross >= point.x {
		return 0;
	}
	if upward { -1 } else { 1 }
}

/// Winding number of `point` relative to a closed polygon.
pub fn polygon_winding(points: &[DVec2], point: DVec2) -> i32 {
	(0..points.len()).map(|i| winding_contribution(points[i], points[(i + 1) % points.len()], point)).sum()
}

/// Distance from `point` to the segment `a`-`b`.
pub fn distance_to_segment(point: DVec2, a: DVec2, b: DVec2) -> f64 {
	let direction = b - a;
	let length_squared = direction.length_squared();
	if length_squared == 0. {
		return point.distance(a);
	}
	let t = ((point - a).dot(direction) / length_squared).clamp(0., 1.);
	point.distance(a + direction * t)
}
