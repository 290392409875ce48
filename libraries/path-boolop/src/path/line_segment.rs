use glam::DVec2;

pub type LineSegment = [DVec2; 2];

const COLLINEAR_EPS: f64 = f64::EPSILON * 64.;

/// Parameters `(s, t)` on both segments of their crossing point, with `eps` slack on the `[0, 1]` ranges.
///
/// Returns `None` for parallel segments; overlaps of collinear segments are found with [`project_onto_segment`] instead.
#[inline(never)]
pub fn line_segment_intersection([p1, p2]: LineSegment, [p3, p4]: LineSegment, eps: f64) -> Option<(f64, f64)> {
	// https://en.wikipedia.org/wiki/Intersection_(geometry)#Two_line_segments

	let a = p2 - p1;
	let b = p3 - p4;
	let c = p3 - p1;

	let denom = a.x * b.y - a.y * b.x;

	if denom.abs() < COLLINEAR_EPS * a.length() * b.length() {
		return None;
	}

	let s = (c.x * b.y - c.y * b.x) / denom;
	let t = (a.x * c.y - a.y * c.x) / denom;

	if (-eps..=1. + eps).contains(&s) && (-eps..=1. + eps).contains(&t) { Some((s, t)) } else { None }
}

pub fn line_segments_intersect(seg1: LineSegment, seg2: LineSegment, eps: f64) -> bool {
	line_segment_intersection(seg1, seg2, eps).is_some()
}

/// Parameter of `point` along the segment if it lies within `tolerance` of the segment's interior.
pub fn project_onto_segment(point: DVec2, [a, b]: LineSegment, tolerance: f64) -> Option<f64> {
	let direction = b - a;
	let length_squared = direction.length_squared();
	if length_squared == 0. {
		return None;
	}
	let t = (point - a).dot(direction) / length_squared;
	if !(0. ..=1.).contains(&t) {
		return None;
	}
	(point.distance(a + direction * t) <= tolerance).then_some(t)
}
