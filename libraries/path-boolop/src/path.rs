pub(crate) mod intersections;
pub(crate) mod line_segment;

use crate::path_segment::PathSegment;
use glam::{DAffine2, DVec2};

/// A connected run of segments, each starting where the previous one ended.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Subpath {
	pub segments: Vec<PathSegment>,
	pub closed: bool,
}

/// An ordered set of subpaths sharing one coordinate space, as found in a single path object of a document.
pub type PathVector = Vec<Subpath>;

impl Subpath {
	pub fn new(segments: Vec<PathSegment>, closed: bool) -> Self {
		Self { segments, closed }
	}

	pub fn is_empty(&self) -> bool {
		self.segments.is_empty()
	}

	pub fn start(&self) -> Option<DVec2> {
		self.segments.first().map(PathSegment::start)
	}

	pub fn end(&self) -> Option<DVec2> {
		self.segments.last().map(PathSegment::end)
	}

	/// Signed area swept by the segments around the origin, positive for counter-clockwise outlines.
	///
	/// Closed subpaths are measured with their closing segment, so the result is the enclosed area. For open subpaths it is
	/// the partial sum, and the pieces of a subpath that was cut apart add up to the area of the whole.
	pub fn signed_area(&self) -> f64 {
		self.closed_segments().iter().map(PathSegment::signed_area).sum()
	}

	pub fn reversed(&self) -> Subpath {
		Subpath {
			segments: self.segments.iter().rev().map(PathSegment::reverse).collect(),
			closed: self.closed,
		}
	}

	pub fn apply_transform(&self, transform: DAffine2) -> Subpath {
		Subpath {
			segments: self.segments.iter().map(|segment| segment.apply_transform(transform)).collect(),
			closed: self.closed,
		}
	}

	/// All segments plus a straight closing segment when the subpath is closed but its ends do not meet.
	pub(crate) fn closed_segments(&self) -> Vec<PathSegment> {
		let mut segments = self.segments.clone();
		if let (Some(start), Some(end)) = (self.start(), self.end()) {
			if self.closed && start != end {
				segments.push(PathSegment::Line(end, start));
			}
		}
		segments
	}
}

pub fn path_area(path: &PathVector) -> f64 {
	path.iter().map(Subpath::signed_area).sum()
}

pub fn path_transform(path: &PathVector, transform: DAffine2) -> PathVector {
	path.iter().map(|subpath| subpath.apply_transform(transform)).collect()
}

pub fn path_reversed(path: &PathVector) -> PathVector {
	path.iter().map(Subpath::reversed).collect()
}

pub fn path_segment_count(path: &PathVector) -> usize {
	path.iter().map(|subpath| subpath.segments.len()).sum()
}

/// Builds a closed polygonal subpath through `points`.
pub fn polygon(points: &[DVec2]) -> Subpath {
	let segments = (0..points.len()).map(|i| PathSegment::Line(points[i], points[(i + 1) % points.len()])).collect();
	Subpath::new(segments, true)
}

/// Builds an open polyline through `points`.
pub fn polyline(points: &[DVec2]) -> Subpath {
	let segments = points.windows(2).map(|pair| PathSegment::Line(pair[0], pair[1])).collect();
	Subpath::new(segments, false)
}
