use crate::arrangement::{ArrangementBuilder, Slot};
use crate::discretize::{Discretized, discretize};
use crate::epsilons::{BooleanOptions, Epsilons};
use crate::path::intersections::split_times_for;
use crate::path::{PathVector, Subpath};
use crate::path_segment::PathSegment;
use smallvec::SmallVec;

const SOURCE: usize = 0;
const CUTTER: usize = 1;

/// A cut location on the source: subpath, segment within it, and curve parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
struct CutPosition {
	subpath: usize,
	curve: usize,
	t: f64,
}

/// Splits the subpaths of `source` wherever `cutter` crosses or touches them. Returns one path vector per resulting subpath.
pub(crate) fn slice(source: &PathVector, cutter: &PathVector, options: &BooleanOptions) -> Vec<PathVector> {
	let eps = &options.epsilons;
	let times = split_times_for(&[source, cutter], eps);
	let source_discretized = discretize(source, SOURCE, &times[SOURCE], false, options);
	let cutter_discretized = discretize(cutter, CUTTER, &times[CUTTER], false, options);

	let positions = cut_positions(&source_discretized, &cutter_discretized, eps);
	log::debug!("Slicing at {} positions", positions.len());

	let mut result = Vec::new();
	for (index, subpath) in source.iter().enumerate() {
		if subpath.is_empty() {
			continue;
		}
		let segments = subpath.closed_segments();
		let cuts = normalize_positions(&positions, index, segments.len(), subpath.closed, eps);
		if cuts.is_empty() {
			result.push(vec![subpath.clone()]);
			continue;
		}
		result.extend(split_subpath(&segments, subpath.closed, &cuts, eps).into_iter().map(|piece| vec![piece]));
	}
	result
}

/// Source positions at every arrangement vertex where a source edge meets a cutter edge.
///
/// When the source crosses itself at such a vertex, each of its branches through the vertex is cut.
fn cut_positions(source: &Discretized, cutter: &Discretized, eps: &Epsilons) -> Vec<CutPosition> {
	let mut builder = ArrangementBuilder::new(eps);
	builder.insert_discretized(source, Slot::A, false);
	builder.insert_discretized(cutter, Slot::B, false);
	let arrangement = builder.build();

	let mut incident: Vec<SmallVec<[usize; 4]>> = vec![SmallVec::new(); arrangement.vertices.len()];
	for (index, edge) in arrangement.edges.iter().enumerate() {
		incident[edge.start].push(index);
		incident[edge.end].push(index);
	}

	let mut positions = Vec::new();
	for (vertex, edges) in incident.iter().enumerate() {
		if edges.len() <= 2 {
			continue;
		}
		let edges = edges.iter().map(|&index| &arrangement.edges[index]);
		if !edges.clone().any(|edge| edge.has_operand(Slot::B)) {
			continue;
		}

		for edge in edges.filter(|edge| edge.has_operand(Slot::A)) {
			let Some(back) = edge.back.filter(|back| back.path_id == SOURCE) else { continue };
			let Some(piece) = source.pieces.get(back.piece) else { continue };
			let t = if edge.start == vertex { back.t_start } else { back.t_end };
			let position = CutPosition {
				subpath: piece.subpath,
				curve: piece.curve,
				t: piece.segment_time(t),
			};
			if !positions.contains(&position) {
				positions.push(position);
			}
		}
	}
	positions
}

/// Cuts on one subpath as sorted `(curve, t)` pairs, with positions at segment ends moved to the start of the next segment
/// and the end points of open subpaths left out.
fn normalize_positions(positions: &[CutPosition], subpath: usize, segment_count: usize, closed: bool, eps: &Epsilons) -> Vec<(usize, f64)> {
	let mut cuts: Vec<(usize, f64)> = positions
		.iter()
		.filter(|position| position.subpath == subpath)
		.filter_map(|position| {
			let (mut curve, mut t) = (position.curve, position.t);
			if t >= 1. - eps.param {
				curve += 1;
				t = 0.;
			} else if t <= eps.param {
				t = 0.;
			}
			if curve == segment_count {
				if !closed {
					return None;
				}
				curve = 0;
			}
			if !closed && curve == 0 && t == 0. {
				return None;
			}
			Some((curve, t))
		})
		.collect();

	cuts.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));
	cuts.dedup_by(|later, earlier| later.0 == earlier.0 && (later.1 - earlier.1).abs() < eps.param);
	cuts
}

fn point_at(segment: &PathSegment, t: f64) -> glam::DVec2 {
	if t <= 0. {
		segment.start()
	} else if t >= 1. {
		segment.end()
	} else {
		segment.sample_at(t)
	}
}

/// The part of the subpath between two positions given as `curve + t`, wrapping around closed subpaths.
fn extract(segments: &[PathSegment], from: f64, to: f64, eps: &Epsilons) -> Vec<PathSegment> {
	let count = segments.len();
	let mut result = Vec::new();

	let mut curve = from.floor() as usize;
	while (curve as f64) < to {
		let segment = &segments[curve % count];
		let t0 = (from - curve as f64).max(0.);
		let t1 = (to - curve as f64).min(1.);
		if t1 - t0 > eps.param {
			let piece = if t0 == 0. && t1 == 1. { *segment } else { segment.subsegment(t0, t1) };
			result.push(piece.with_end_points(point_at(segment, t0), point_at(segment, t1)));
		}
		curve += 1;
	}
	result
}

fn split_subpath(segments: &[PathSegment], closed: bool, cuts: &[(usize, f64)], eps: &Epsilons) -> Vec<Subpath> {
	let count = segments.len() as f64;
	let stops: Vec<f64> = cuts.iter().map(|&(curve, t)| curve as f64 + t).collect();

	let ranges: Vec<(f64, f64)> = if closed {
		(0..stops.len())
			.map(|i| {
				let from = stops[i];
				let next = stops[(i + 1) % stops.len()];
				(from, if next > from { next } else { next + count })
			})
			.collect()
	} else {
		std::iter::once(0.).chain(stops.iter().copied()).zip(stops.iter().copied().chain(std::iter::once(count))).collect()
	};

	ranges
		.into_iter()
		.map(|(from, to)| extract(segments, from, to, eps))
		.filter(|segments| !segments.is_empty())
		.map(|segments| Subpath::new(segments, false))
		.collect()
}
