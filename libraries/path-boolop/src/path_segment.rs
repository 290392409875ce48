use crate::util::aabb::Aabb;
use crate::util::math::lerp;
use glam::{DAffine2, DVec2};
use kurbo::{ParamCurve, ParamCurveArea};

/// A single curve of a subpath. Quadratics and arcs are raised to cubics when parsed, so the core only deals with these two.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSegment {
	Line(DVec2, DVec2),
	Cubic(DVec2, DVec2, DVec2, DVec2),
}

impl PathSegment {
	pub fn start(&self) -> DVec2 {
		match *self {
			PathSegment::Line(start, _) => start,
			PathSegment::Cubic(start, _, _, _) => start,
		}
	}

	pub fn end(&self) -> DVec2 {
		match *self {
			PathSegment::Line(_, end) => end,
			PathSegment::Cubic(_, _, _, end) => end,
		}
	}

	pub fn is_line(&self) -> bool {
		matches!(self, PathSegment::Line(..))
	}

	pub fn reverse(&self) -> PathSegment {
		match *self {
			PathSegment::Line(start, end) => PathSegment::Line(end, start),
			PathSegment::Cubic(p0, p1, p2, p3) => PathSegment::Cubic(p3, p2, p1, p0),
		}
	}

	pub fn to_cubic(&self) -> [DVec2; 4] {
		match *self {
			PathSegment::Line(start, end) => [start, start, end, end],
			PathSegment::Cubic(p0, p1, p2, p3) => [p0, p1, p2, p3],
		}
	}

	/// Length of the control polygon, an upper bound of the arc length.
	pub fn control_polygon_length(&self) -> f64 {
		match *self {
			PathSegment::Line(start, end) => start.distance(end),
			PathSegment::Cubic(p0, p1, p2, p3) => p0.distance(p1) + p1.distance(p2) + p2.distance(p3),
		}
	}

	/// Whether every control point lies within `eps` of the start point.
	pub fn is_degenerate(&self, eps: f64) -> bool {
		let start = self.start();
		self.to_cubic().iter().all(|point| point.abs_diff_eq(start, eps))
	}

	pub fn sample_at(&self, t: f64) -> DVec2 {
		match *self {
			PathSegment::Line(start, end) => start.lerp(end, t),
			PathSegment::Cubic(p0, p1, p2, p3) => {
				let p01 = p0.lerp(p1, t);
				let p12 = p1.lerp(p2, t);
				let p23 = p2.lerp(p3, t);
				let p012 = p01.lerp(p12, t);
				let p123 = p12.lerp(p23, t);
				p012.lerp(p123, t)
			}
		}
	}

	/// De Casteljau split. Both halves share the exact split point.
	pub fn split_at(&self, t: f64) -> (PathSegment, PathSegment) {
		match *self {
			PathSegment::Line(start, end) => {
				let p = start.lerp(end, t);
				(PathSegment::Line(start, p), PathSegment::Line(p, end))
			}
			PathSegment::Cubic(p0, p1, p2, p3) => {
				let p01 = p0.lerp(p1, t);
				let p12 = p1.lerp(p2, t);
				let p23 = p2.lerp(p3, t);
				let p012 = p01.lerp(p12, t);
				let p123 = p12.lerp(p23, t);
				let p = p012.lerp(p123, t);

				(PathSegment::Cubic(p0, p01, p012, p), PathSegment::Cubic(p, p123, p23, p3))
			}
		}
	}

	/// The part of the segment between `t0` and `t1`. Runs backwards when `t0 > t1`.
	pub fn subsegment(&self, t0: f64, t1: f64) -> PathSegment {
		if t0 > t1 {
			return self.subsegment(t1, t0).reverse();
		}
		PathSegment::from_kurbo(self.to_kurbo().subsegment(t0..t1))
	}

	pub fn bounding_box(&self) -> Aabb {
		match *self {
			PathSegment::Line(start, end) => Aabb::from_points(start, end),
			PathSegment::Cubic(p0, p1, p2, p3) => {
				let (left, right) = cubic_bounding_interval(p0.x, p1.x, p2.x, p3.x);
				let (bottom, top) = cubic_bounding_interval(p0.y, p1.y, p2.y, p3.y);
				Aabb::from_points(DVec2::new(left, bottom), DVec2::new(right, top))
			}
		}
	}

	/// Signed area between the segment and the origin, positive for counter-clockwise travel.
	///
	/// Summed over a closed subpath this is the enclosed area.
	pub fn signed_area(&self) -> f64 {
		self.to_kurbo().signed_area()
	}

	pub fn apply_transform(&self, transform: DAffine2) -> PathSegment {
		match *self {
			PathSegment::Line(start, end) => PathSegment::Line(transform.transform_point2(start), transform.transform_point2(end)),
			PathSegment::Cubic(p0, p1, p2, p3) => PathSegment::Cubic(
				transform.transform_point2(p0),
				transform.transform_point2(p1),
				transform.transform_point2(p2),
				transform.transform_point2(p3),
			),
		}
	}

	/// Replaces the end points, keeping the handles of a cubic.
	pub(crate) fn with_end_points(&self, start: DVec2, end: DVec2) -> PathSegment {
		match *self {
			PathSegment::Line(_, _) => PathSegment::Line(start, end),
			PathSegment::Cubic(_, p1, p2, _) => PathSegment::Cubic(start, p1, p2, end),
		}
	}

	pub fn to_kurbo(&self) -> kurbo::PathSeg {
		match *self {
			PathSegment::Line(start, end) => kurbo::PathSeg::Line(kurbo::Line::new(to_point(start), to_point(end))),
			PathSegment::Cubic(p0, p1, p2, p3) => kurbo::PathSeg::Cubic(kurbo::CubicBez::new(to_point(p0), to_point(p1), to_point(p2), to_point(p3))),
		}
	}

	pub fn from_kurbo(segment: kurbo::PathSeg) -> PathSegment {
		match segment {
			kurbo::PathSeg::Line(line) => PathSegment::Line(to_dvec(line.p0), to_dvec(line.p1)),
			kurbo::PathSeg::Quad(quad) => {
				let [p0, p1, p2] = [to_dvec(quad.p0), to_dvec(quad.p1), to_dvec(quad.p2)];
				let [p0, p1, p2, p3] = quadratic_to_cubic(p0, p1, p2);
				PathSegment::Cubic(p0, p1, p2, p3)
			}
			kurbo::PathSeg::Cubic(cubic) => PathSegment::Cubic(to_dvec(cubic.p0), to_dvec(cubic.p1), to_dvec(cubic.p2), to_dvec(cubic.p3)),
		}
	}
}

pub(crate) fn to_point(point: DVec2) -> kurbo::Point {
	kurbo::Point::new(point.x, point.y)
}

pub(crate) fn to_dvec(point: kurbo::Point) -> DVec2 {
	DVec2::new(point.x, point.y)
}

pub(crate) fn quadratic_to_cubic(start: DVec2, control: DVec2, end: DVec2) -> [DVec2; 4] {
	// C0 = Q0
	// C1 = Q0 + (2/3) (Q1 - Q0)
	// C2 = Q2 + (2/3) (Q1 - Q2)
	// C3 = Q2
	let d1 = control - start;
	let d2 = control - end;
	[start, start + (2. / 3.) * d1, end + (2. / 3.) * d2, end]
}

fn eval_cubic_1d(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
	let p01 = lerp(p0, p1, t);
	let p12 = lerp(p1, p2, t);
	let p23 = lerp(p2, p3, t);
	let p012 = lerp(p01, p12, t);
	let p123 = lerp(p12, p23, t);
	lerp(p012, p123, t)
}

fn cubic_bounding_interval(p0: f64, p1: f64, p2: f64, p3: f64) -> (f64, f64) {
	let mut min = p0.min(p3);
	let mut max = p0.max(p3);

	let a = 3. * (-p0 + 3. * p1 - 3. * p2 + p3);
	let b = 6. * (p0 - 2. * p1 + p2);
	let c = 3. * (p1 - p0);

	let mut extend = |t: f64| {
		if 0. < t && t < 1. {
			let x = eval_cubic_1d(p0, p1, p2, p3, t);
			min = min.min(x);
			max = max.max(x);
		}
	};

	if a == 0. {
		if b != 0. {
			extend(-c / b);
		}
		return (min, max);
	}

	let d = b * b - 4. * a * c;
	if d < 0. {
		return (min, max);
	}

	let sqrt_d = d.sqrt();
	extend((-b - sqrt_d) / (2. * a));
	extend((-b + sqrt_d) / (2. * a));

	(min, max)
}
