use crate::epsilons::Epsilons;
use crate::path::line_segment::{line_segment_intersection, line_segments_intersect};
use crate::path_segment::PathSegment;
use crate::util::aabb::{Aabb, bounding_box_max_extent, bounding_boxes_overlap, line_segment_aabb_intersect};
use crate::util::math::lerp;

/// Upper bound on the candidate pairs kept per subdivision round, reached only by curves that overlap along a stretch.
const MAX_PAIRS: usize = 1 << 14;

#[derive(Clone)]
struct IntersectionSegment {
	seg: PathSegment,
	start_param: f64,
	end_param: f64,
	bounding_box: Aabb,
}

impl IntersectionSegment {
	fn new(seg: PathSegment) -> Self {
		Self {
			seg,
			start_param: 0.,
			end_param: 1.,
			bounding_box: seg.bounding_box(),
		}
	}
}

fn subdivide_intersection_segment(int_seg: &IntersectionSegment) -> [IntersectionSegment; 2] {
	let (seg0, seg1) = int_seg.seg.split_at(0.5);
	let mid_param = (int_seg.start_param + int_seg.end_param) / 2.;
	[
		IntersectionSegment {
			seg: seg0,
			start_param: int_seg.start_param,
			end_param: mid_param,
			bounding_box: seg0.bounding_box(),
		},
		IntersectionSegment {
			seg: seg1,
			start_param: mid_param,
			end_param: int_seg.end_param,
			bounding_box: seg1.bounding_box(),
		},
	]
}

fn intersection_segments_overlap(seg0: &IntersectionSegment, seg1: &IntersectionSegment, eps: &Epsilons) -> bool {
	match (&seg0.seg, &seg1.seg) {
		(PathSegment::Line(start0, end0), PathSegment::Line(start1, end1)) => line_segments_intersect([*start0, *end0], [*start1, *end1], eps.param),
		(PathSegment::Line(start, end), _) => line_segment_aabb_intersect([*start, *end], &seg1.bounding_box),
		(_, PathSegment::Line(start, end)) => line_segment_aabb_intersect([*start, *end], &seg0.bounding_box),
		_ => bounding_boxes_overlap(&seg0.bounding_box, &seg1.bounding_box),
	}
}

pub fn segments_equal(seg0: &PathSegment, seg1: &PathSegment, point_epsilon: f64) -> bool {
	match (seg0, seg1) {
		(PathSegment::Line(start0, end0), PathSegment::Line(start1, end1)) => start0.abs_diff_eq(*start1, point_epsilon) && end0.abs_diff_eq(*end1, point_epsilon),
		(PathSegment::Cubic(..), PathSegment::Cubic(..)) => {
			let (points0, points1) = (seg0.to_cubic(), seg1.to_cubic());
			points0.iter().zip(points1.iter()).all(|(p0, p1)| p0.abs_diff_eq(*p1, point_epsilon))
		}
		_ => false,
	}
}

/// Parameter pairs `[t0, t1]` at which the two segments cross.
///
/// Curves are subdivided until both pieces are smaller than `eps.linear`, then intersected as chords.
/// Unless `endpoints` is set, crossings at the end points of both segments are left out.
pub fn path_segment_intersection(seg0: &PathSegment, seg1: &PathSegment, endpoints: bool, eps: &Epsilons) -> Vec<[f64; 2]> {
	if let (PathSegment::Line(start0, end0), PathSegment::Line(start1, end1)) = (seg0, seg1) {
		if let Some(st) = line_segment_intersection([*start0, *end0], [*start1, *end1], eps.param) {
			if !endpoints && (st.0 < eps.param || st.0 > 1. - eps.param) && (st.1 < eps.param || st.1 > 1. - eps.param) {
				return vec![];
			}
			return vec![st.into()];
		}
		return vec![];
	}

	// https://math.stackexchange.com/questions/20321/how-can-i-tell-when-two-cubic-b%C3%A9zier-curves-intersect

	let mut pairs = vec![(IntersectionSegment::new(*seg0), IntersectionSegment::new(*seg1))];
	let mut params = Vec::new();

	while !pairs.is_empty() {
		let mut next_pairs = Vec::new();

		for (seg0, seg1) in pairs {
			if segments_equal(&seg0.seg, &seg1.seg, eps.point) {
				continue;
			}

			let is_linear0 = bounding_box_max_extent(&seg0.bounding_box) <= eps.linear;
			let is_linear1 = bounding_box_max_extent(&seg1.bounding_box) <= eps.linear;

			if is_linear0 && is_linear1 {
				let line_segment0 = [seg0.seg.start(), seg0.seg.end()];
				let line_segment1 = [seg1.seg.start(), seg1.seg.end()];
				if let Some(st) = line_segment_intersection(line_segment0, line_segment1, eps.param) {
					params.push([lerp(seg0.start_param, seg0.end_param, st.0), lerp(seg1.start_param, seg1.end_param, st.1)]);
				}
			} else {
				let subdivided0 = if is_linear0 { vec![seg0] } else { subdivide_intersection_segment(&seg0).to_vec() };
				let subdivided1 = if is_linear1 { vec![seg1] } else { subdivide_intersection_segment(&seg1).to_vec() };

				for seg0 in &subdivided0 {
					for seg1 in &subdivided1 {
						if intersection_segments_overlap(seg0, seg1, eps) {
							next_pairs.push((seg0.clone(), seg1.clone()));
						}
					}
				}
			}
		}

		if next_pairs.len() > MAX_PAIRS {
			log::warn!("Segments overlap along a stretch, giving up after {} candidate pairs", next_pairs.len());
			break;
		}
		pairs = next_pairs;
	}

	if !endpoints {
		params.retain(|[s, t]| (*s > eps.param && *s < 1. - eps.param) || (*t > eps.param && *t < 1. - eps.param));
	}

	params
}

/// Parameters `[t0, t1]` with `t0 < t1` at which a cubic crosses itself.
pub fn path_cubic_segment_self_intersection(seg: &PathSegment) -> Option<[f64; 2]> {
	// https://math.stackexchange.com/questions/3931865/self-intersection-of-a-cubic-bezier-interpretation-of-the-solution

	let PathSegment::Cubic(p0, p1, p2, p3) = *seg else { return None };

	let a = -p0 + 3. * p1 - 3. * p2 + p3;
	let b = 3. * p0 - 6. * p1 + 3. * p2;
	let c = -3. * p0 + 3. * p1;

	let denominator = a.y * b.x - a.x * b.y;
	if denominator == 0. {
		return None;
	}
	let sigma = (a.x * c.y - a.y * c.x) / denominator;

	let pi = if a.x.abs() >= a.y.abs() {
		if a.x == 0. {
			return None;
		}
		sigma * sigma + (b.x * sigma + c.x) / a.x
	} else {
		sigma * sigma + (b.y * sigma + c.y) / a.y
	};

	let roots = roots::find_roots_quadratic(1., -sigma, pi);
	match roots.as_ref() {
		[s, t] if (0. ..=1.).contains(s) && (0. ..=1.).contains(t) && s != t => Some([s.min(*t), s.max(*t)]),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::epsilons::EPS;
	use glam::DVec2;

	#[test]
	fn line_crosses_cubic_twice() {
		let arch = PathSegment::Cubic(DVec2::new(0., 0.), DVec2::new(0., 10.), DVec2::new(10., 10.), DVec2::new(10., 0.));
		let line = PathSegment::Line(DVec2::new(-1., 5.), DVec2::new(11., 5.));
		let params = path_segment_intersection(&arch, &line, true, &EPS);

		let mut points: Vec<DVec2> = params.iter().map(|[t, _]| arch.sample_at(*t)).collect();
		points.sort_by(|a, b| a.x.total_cmp(&b.x));
		points.dedup_by(|a, b| a.abs_diff_eq(*b, 1e-3));
		assert_eq!(points.len(), 2);
		for [t0, t1] in &params {
			assert!(arch.sample_at(*t0).abs_diff_eq(line.sample_at(*t1), 1e-3));
		}
	}

	#[test]
	fn shared_end_point_is_skipped_without_endpoints() {
		let first = PathSegment::Line(DVec2::new(0., 0.), DVec2::new(1., 0.));
		let second = PathSegment::Line(DVec2::new(1., 0.), DVec2::new(1., 1.));
		assert!(path_segment_intersection(&first, &second, false, &EPS).is_empty());
		assert_eq!(path_segment_intersection(&first, &second, true, &EPS).len(), 1);
	}

	#[test]
	fn identical_cubics_report_nothing() {
		let cubic = PathSegment::Cubic(DVec2::new(0., 0.), DVec2::new(1., 2.), DVec2::new(3., 2.), DVec2::new(4., 0.));
		assert!(path_segment_intersection(&cubic, &cubic, false, &EPS).is_empty());
	}

	#[test]
	fn looping_cubic_crosses_itself() {
		let looping = PathSegment::Cubic(DVec2::new(0., 0.), DVec2::new(10., 10.), DVec2::new(-5., 10.), DVec2::new(5., 0.));
		let [t0, t1] = path_cubic_segment_self_intersection(&looping).unwrap();
		assert!(t0 < t1);
		assert!(looping.sample_at(t0).abs_diff_eq(looping.sample_at(t1), 1e-9));
	}

	#[test]
	fn simple_cubic_does_not_cross_itself() {
		let arch = PathSegment::Cubic(DVec2::new(0., 0.), DVec2::new(0., 10.), DVec2::new(10., 10.), DVec2::new(10., 0.));
		assert_eq!(path_cubic_segment_self_intersection(&arch), None);
		assert_eq!(path_cubic_segment_self_intersection(&PathSegment::Line(DVec2::ZERO, DVec2::ONE)), None);
	}
}
