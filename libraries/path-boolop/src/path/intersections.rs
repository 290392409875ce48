use super::PathVector;
use crate::epsilons::Epsilons;
use crate::intersection_path_segment::{path_cubic_segment_self_intersection, path_segment_intersection};
use crate::path_segment::PathSegment;
use crate::util::aabb::{Aabb, bounding_boxes_overlap, expand_bounding_box};

/// A position on a path vector: subpath, segment within it, and curve parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathVectorTime {
	pub path_index: usize,
	pub curve_index: usize,
	pub t: f64,
}

impl PathVectorTime {
	pub fn new(path_index: usize, curve_index: usize, t: f64) -> Self {
		Self { path_index, curve_index, t }
	}
}

/// Split times per subpath, per segment.
pub(crate) type SplitTimes = Vec<Vec<Vec<f64>>>;

struct IndexedSegment {
	path_index: usize,
	curve_index: usize,
	segment: PathSegment,
	bounding_box: Aabb,
}

fn indexed_segments(path: &PathVector, eps: &Epsilons) -> Vec<IndexedSegment> {
	path.iter()
		.enumerate()
		.flat_map(|(path_index, subpath)| {
			subpath.closed_segments().into_iter().enumerate().map(move |(curve_index, segment)| IndexedSegment {
				path_index,
				curve_index,
				segment,
				bounding_box: expand_bounding_box(&segment.bounding_box(), eps.point),
			})
		})
		.collect()
}

/// Crossings between two different path vectors.
pub fn pathvector_intersections(a: &PathVector, b: &PathVector, eps: &Epsilons) -> Vec<(PathVectorTime, PathVectorTime)> {
	let segments_a = indexed_segments(a, eps);
	let segments_b = indexed_segments(b, eps);

	let mut crossings = Vec::new();
	for seg_a in &segments_a {
		for seg_b in &segments_b {
			if !bounding_boxes_overlap(&seg_a.bounding_box, &seg_b.bounding_box) {
				continue;
			}
			for [t_a, t_b] in path_segment_intersection(&seg_a.segment, &seg_b.segment, false, eps) {
				crossings.push((
					PathVectorTime::new(seg_a.path_index, seg_a.curve_index, t_a),
					PathVectorTime::new(seg_b.path_index, seg_b.curve_index, t_b),
				));
			}
		}
	}
	crossings
}

/// Crossings of a path vector with itself, including loops inside single cubics.
///
/// Neighbouring segments of a subpath always meet at their shared end point; hits close to that point are dropped.
pub fn pathvector_self_intersections(path: &PathVector, eps: &Epsilons) -> Vec<(PathVectorTime, PathVectorTime)> {
	let segments = indexed_segments(path, eps);
	let neighbourhood = eps.linear * 10.;

	let mut crossings = Vec::new();
	for (i, seg_a) in segments.iter().enumerate() {
		if let Some([t0, t1]) = path_cubic_segment_self_intersection(&seg_a.segment) {
			crossings.push((
				PathVectorTime::new(seg_a.path_index, seg_a.curve_index, t0),
				PathVectorTime::new(seg_a.path_index, seg_a.curve_index, t1),
			));
		}

		for seg_b in &segments[i + 1..] {
			if !bounding_boxes_overlap(&seg_a.bounding_box, &seg_b.bounding_box) {
				continue;
			}
			let shared_point = shared_end_point(seg_a, seg_b, path);
			for [t_a, t_b] in path_segment_intersection(&seg_a.segment, &seg_b.segment, false, eps) {
				if let Some(point) = shared_point {
					if seg_a.segment.sample_at(t_a).distance(point) < neighbourhood {
						continue;
					}
				}
				crossings.push((
					PathVectorTime::new(seg_a.path_index, seg_a.curve_index, t_a),
					PathVectorTime::new(seg_b.path_index, seg_b.curve_index, t_b),
				));
			}
		}
	}
	crossings
}

fn shared_end_point(seg_a: &IndexedSegment, seg_b: &IndexedSegment, path: &PathVector) -> Option<glam::DVec2> {
	if seg_a.path_index != seg_b.path_index {
		return None;
	}
	let count = path[seg_a.path_index].closed_segments().len();
	let closed = path[seg_a.path_index].closed;
	if seg_b.curve_index == seg_a.curve_index + 1 {
		Some(seg_a.segment.end())
	} else if closed && seg_a.curve_index == 0 && seg_b.curve_index + 1 == count {
		Some(seg_a.segment.start())
	} else {
		None
	}
}

pub(crate) fn empty_split_times(path: &PathVector) -> SplitTimes {
	path.iter().map(|subpath| vec![Vec::new(); subpath.closed_segments().len()]).collect()
}

/// Records the interior times of `positions`, leaving out those within `eps.param` of either end of their segment.
pub(crate) fn distribute_intersection_times(times: &mut SplitTimes, positions: impl IntoIterator<Item = PathVectorTime>, eps: &Epsilons) {
	for position in positions {
		if position.t > eps.param && position.t < 1. - eps.param {
			if let Some(segment_times) = times.get_mut(position.path_index).and_then(|subpath| subpath.get_mut(position.curve_index)) {
				segment_times.push(position.t);
			}
		}
	}
}

/// Sorts every segment's times and drops each one that follows the previous kept time too closely.
pub(crate) fn sort_and_clean_intersection_times(times: &mut SplitTimes, eps: &Epsilons) {
	for segment_times in times.iter_mut().flatten() {
		segment_times.sort_by(f64::total_cmp);
		let mut last_kept: Option<f64> = None;
		segment_times.retain(|&t| {
			let keep = last_kept.is_none_or(|last| t - last >= eps.param);
			if keep {
				last_kept = Some(t);
			}
			keep
		});
	}
}

/// Split times of each path from crossings with itself and with every other path in the set.
pub(crate) fn split_times_for(paths: &[&PathVector], eps: &Epsilons) -> Vec<SplitTimes> {
	let mut times: Vec<SplitTimes> = paths.iter().map(|path| empty_split_times(path)).collect();

	for (index, path) in paths.iter().enumerate() {
		let crossings = pathvector_self_intersections(path, eps);
		distribute_intersection_times(&mut times[index], crossings.iter().flat_map(|(a, b)| [*a, *b]), eps);
	}
	for i in 0..paths.len() {
		for j in i + 1..paths.len() {
			let crossings = pathvector_intersections(paths[i], paths[j], eps);
			distribute_intersection_times(&mut times[i], crossings.iter().map(|(a, _)| *a), eps);
			distribute_intersection_times(&mut times[j], crossings.iter().map(|(_, b)| *b), eps);
		}
	}

	for path_times in &mut times {
		sort_and_clean_intersection_times(path_times, eps);
	}
	times
}
