//! Flattening of path vectors into polylines whose edges remember the curve they approximate.

use crate::epsilons::BooleanOptions;
use crate::error::DegenerateCurve;
use crate::path::PathVector;
use crate::path::intersections::SplitTimes;
use crate::path_segment::PathSegment;
use crate::util::math::distance_to_segment;
use glam::DVec2;

const MAX_SUBDIVISION_DEPTH: u32 = 16;

/// Where a polyline edge came from: a piece of an operand and the piece parameters at the edge's start and end.
///
/// `exact` is cleared once the edge has been cut by the arrangement, after which the parameters are only estimates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct BackRef {
	pub path_id: usize,
	pub piece: usize,
	pub t_start: f64,
	pub t_end: f64,
	pub exact: bool,
}

impl BackRef {
	pub fn reversed(self) -> Self {
		Self {
			t_start: self.t_end,
			t_end: self.t_start,
			..self
		}
	}
}

/// A part of an input segment between two consecutive split times.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Piece {
	pub segment: PathSegment,
	pub subpath: usize,
	pub curve: usize,
	pub t_start: f64,
	pub t_end: f64,
}

impl Piece {
	/// Parameter on the input segment for a parameter on this piece.
	pub fn segment_time(&self, t: f64) -> f64 {
		crate::util::math::lerp(self.t_start, self.t_end, t)
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PolyEdge {
	pub from: DVec2,
	pub to: DVec2,
	pub back: Option<BackRef>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Polyline {
	pub subpath: usize,
	pub edges: Vec<PolyEdge>,
	pub closed: bool,
}

/// One operand after flattening.
#[derive(Clone, Debug, Default)]
pub(crate) struct Discretized {
	pub path_id: usize,
	/// Segments of every subpath, including the implicit closing line of closed subpaths.
	pub segments: Vec<Vec<PathSegment>>,
	pub pieces: Vec<Piece>,
	pub polylines: Vec<Polyline>,
	pub skipped: Vec<DegenerateCurve>,
}

impl Discretized {
	pub fn edges(&self) -> impl Iterator<Item = &PolyEdge> {
		self.polylines.iter().flat_map(|polyline| polyline.edges.iter())
	}
}

/// Flattens `path` after splitting its segments at `times`.
///
/// With `close` set, open subpaths get a straight closing edge without a back reference.
pub(crate) fn discretize(path: &PathVector, path_id: usize, times: &SplitTimes, close: bool, options: &BooleanOptions) -> Discretized {
	let mut result = Discretized {
		path_id,
		..Default::default()
	};

	for (subpath_index, subpath) in path.iter().enumerate() {
		let segments = subpath.closed_segments();
		let mut polyline = Polyline {
			subpath: subpath_index,
			edges: Vec::new(),
			closed: subpath.closed || close,
		};

		for (curve, segment) in segments.iter().enumerate() {
			let segment_times = times.get(subpath_index).and_then(|subpath_times| subpath_times.get(curve)).map(Vec::as_slice).unwrap_or_default();

			for piece in split_into_pieces(segment, subpath_index, curve, segment_times) {
				if piece.segment.is_degenerate(options.epsilons.point) {
					continue;
				}
				let piece_index = result.pieces.len();
				let tolerance = options.relative_threshold * piece.segment.control_polygon_length();
				flatten_piece(&piece.segment, path_id, piece_index, tolerance, &mut polyline.edges);
				result.pieces.push(piece);
			}
		}

		if polyline.edges.is_empty() {
			let warning = DegenerateCurve { path_id, subpath: subpath_index };
			log::warn!("{warning}");
			result.skipped.push(warning);
			result.segments.push(segments);
			continue;
		}

		if close {
			close_if_needed(&mut polyline);
		}
		result.segments.push(segments);
		result.polylines.push(polyline);
	}

	log::debug!("Operand {path_id} flattened into {} edges from {} pieces", result.edges().count(), result.pieces.len());
	result
}

fn split_into_pieces(segment: &PathSegment, subpath: usize, curve: usize, times: &[f64]) -> Vec<Piece> {
	let mut pieces = Vec::with_capacity(times.len() + 1);
	let mut remainder = *segment;
	let mut previous = 0.;

	for &t in times {
		let local = (t - previous) / (1. - previous);
		let (left, right) = remainder.split_at(local);
		pieces.push(Piece {
			segment: left,
			subpath,
			curve,
			t_start: previous,
			t_end: t,
		});
		remainder = right;
		previous = t;
	}
	pieces.push(Piece {
		segment: remainder,
		subpath,
		curve,
		t_start: previous,
		t_end: 1.,
	});
	pieces
}

fn flatten_piece(segment: &PathSegment, path_id: usize, piece: usize, tolerance: f64, edges: &mut Vec<PolyEdge>) {
	let mut emit = |from: DVec2, to: DVec2, t_start: f64, t_end: f64| {
		edges.push(PolyEdge {
			from,
			to,
			back: Some(BackRef {
				path_id,
				piece,
				t_start,
				t_end,
				exact: true,
			}),
		});
	};

	match *segment {
		PathSegment::Line(start, end) => emit(start, end, 0., 1.),
		PathSegment::Cubic(..) => subdivide(segment, 0., 1., tolerance, 0, &mut emit),
	}
}

fn subdivide(segment: &PathSegment, t_start: f64, t_end: f64, tolerance: f64, depth: u32, emit: &mut impl FnMut(DVec2, DVec2, f64, f64)) {
	let [p0, p1, p2, p3] = segment.to_cubic();
	let deviation = distance_to_segment(p1, p0, p3).max(distance_to_segment(p2, p0, p3));

	if deviation <= tolerance || depth >= MAX_SUBDIVISION_DEPTH {
		emit(p0, p3, t_start, t_end);
		return;
	}

	let (left, right) = segment.split_at(0.5);
	let t_mid = (t_start + t_end) / 2.;
	subdivide(&left, t_start, t_mid, tolerance, depth + 1, emit);
	subdivide(&right, t_mid, t_end, tolerance, depth + 1, emit);
}

fn close_if_needed(polyline: &mut Polyline) {
	let (Some(first), Some(last)) = (polyline.edges.first(), polyline.edges.last()) else { return };
	if first.from != last.to {
		let closing = PolyEdge {
			from: last.to,
			to: first.from,
			back: None,
		};
		polyline.edges.push(closing);
	}
	polyline.closed = true;
}
