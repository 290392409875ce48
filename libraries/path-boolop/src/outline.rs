//! Turning a normalized arrangement back into closed subpaths, with holes grouped under their islands.

use crate::arrangement::Arrangement;
use crate::discretize::Discretized;
use crate::epsilons::Epsilons;
use crate::path::{PathVector, Subpath};
use crate::path_segment::PathSegment;
use crate::util::aabb::Aabb;
use crate::util::math::{clockwise_angle, distance_to_segment, polygon_winding};
use glam::DVec2;
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

new_key_type! {
	pub struct ContourId;
}

/// Two curve parameters closer than this are treated as the same position when joining edges back into curves.
const CONTINUITY_EPS: f64 = 1e-9;

/// One closed outline of a result.
#[derive(Clone, Debug)]
pub struct Contour {
	pub subpath: Subpath,
	/// Vertices of the arrangement along the outline.
	pub polygon: Vec<DVec2>,
	/// Positive for islands, negative for holes.
	pub area: f64,
	pub parent: Option<ContourId>,
	pub depth: usize,
	bounding_box: Aabb,
}

impl Contour {
	pub fn is_island(&self) -> bool {
		self.area > 0.
	}
}

/// All contours of a result in the order they were traced, with their containment relations.
#[derive(Clone, Debug, Default)]
pub struct ContourForest {
	contours: SlotMap<ContourId, Contour>,
	order: Vec<ContourId>,
}

impl ContourForest {
	pub fn len(&self) -> usize {
		self.order.len()
	}

	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (ContourId, &Contour)> {
		self.order.iter().map(|&id| (id, &self.contours[id]))
	}

	pub fn islands(&self) -> impl Iterator<Item = ContourId> + '_ {
		self.order.iter().copied().filter(|&id| self.contours[id].is_island())
	}

	pub fn holes_of(&self, island: ContourId) -> impl Iterator<Item = ContourId> + '_ {
		self.order.iter().copied().filter(move |&id| !self.contours[id].is_island() && self.contours[id].parent == Some(island))
	}

	fn insert(&mut self, contour: Contour) -> ContourId {
		let id = self.contours.insert(contour);
		self.order.push(id);
		id
	}

	/// Finds the parent of every contour: the smallest island around each hole and the smallest hole around each island.
	pub(crate) fn assign_nesting(&mut self, eps: &Epsilons) {
		let ids = self.order.clone();
		for &id in &ids {
			let contour = &self.contours[id];
			let parent = ids
				.iter()
				.copied()
				.filter(|&other| other != id && self.contours[other].is_island() != contour.is_island())
				.filter(|&other| self.contours[other].area.abs() > contour.area.abs())
				.filter(|&other| encloses(&self.contours[other], contour, eps))
				.min_by(|&a, &b| self.contours[a].area.abs().total_cmp(&self.contours[b].area.abs()));
			self.contours[id].parent = parent;
		}

		for &id in &ids {
			let mut depth = 0;
			let mut current = self.contours[id].parent;
			while let Some(parent) = current {
				depth += 1;
				current = self.contours[parent].parent;
				if depth > ids.len() {
					break;
				}
			}
			self.contours[id].depth = depth;
		}
		log::trace!("Deepest contour is nested {} levels", self.contours.values().map(|contour| contour.depth).max().unwrap_or_default());
	}

	fn ordered_groups(&self) -> Vec<Vec<ContourId>> {
		let mut placed = vec![false; self.order.len()];
		let index_of = |id: ContourId| self.order.iter().position(|&other| other == id);
		let mut groups = Vec::new();

		for island in self.islands() {
			let mut group = vec![island];
			group.extend(self.holes_of(island));
			for &id in &group {
				if let Some(index) = index_of(id) {
					placed[index] = true;
				}
			}
			groups.push(group);
		}
		for (index, &id) in self.order.iter().enumerate() {
			if !placed[index] {
				log::debug!("Contour {id:?} has no enclosing island");
				groups.push(vec![id]);
			}
		}
		groups
	}

	/// One path vector holding every contour, each island directly followed by its holes.
	pub fn to_path_vector(&self, nested: bool) -> PathVector {
		if !nested {
			return self.iter().map(|(_, contour)| contour.subpath.clone()).collect();
		}
		self.ordered_groups().into_iter().flatten().map(|id| self.contours[id].subpath.clone()).collect()
	}

	/// One path vector per island, holding the island and its holes.
	pub fn to_pieces(&self) -> Vec<PathVector> {
		self.ordered_groups()
			.into_iter()
			.map(|group| group.into_iter().map(|id| self.contours[id].subpath.clone()).collect())
			.collect()
	}
}

fn encloses(outer: &Contour, inner: &Contour, eps: &Epsilons) -> bool {
	let (outer_box, inner_box) = (&outer.bounding_box, &inner.bounding_box);
	if !(outer_box.contains(inner_box.min()) && outer_box.contains(inner_box.max())) {
		return false;
	}

	let on_boundary = |point: DVec2| {
		let count = outer.polygon.len();
		(0..count).any(|i| distance_to_segment(point, outer.polygon[i], outer.polygon[(i + 1) % count]) <= eps.point)
	};
	let probe = inner.polygon.iter().copied().find(|&point| !on_boundary(point)).or_else(|| {
		// Every vertex lies on the outer boundary, so try the middle of the inner edges
		let count = inner.polygon.len();
		(0..count).map(|i| (inner.polygon[i] + inner.polygon[(i + 1) % count]) * 0.5).find(|&point| !on_boundary(point))
	});

	probe.is_some_and(|point| polygon_winding(&outer.polygon, point) != 0)
}

/// Traces closed loops of edges, turning as sharply clockwise as possible at every vertex.
fn trace_loops(arrangement: &Arrangement) -> Vec<Vec<usize>> {
	let edges = &arrangement.edges;
	let direction = |edge: usize| {
		let [from, to] = arrangement.edge_points(&edges[edge]);
		to - from
	};

	let mut outgoing: Vec<SmallVec<[usize; 4]>> = vec![SmallVec::new(); arrangement.vertices.len()];
	for (index, edge) in edges.iter().enumerate() {
		outgoing[edge.start].push(index);
	}

	let mut visited = vec![false; edges.len()];
	let mut loops = Vec::new();
	for first in 0..edges.len() {
		if visited[first] {
			continue;
		}
		visited[first] = true;
		let mut edge_loop = vec![first];
		let mut current = first;

		loop {
			let reversed = -direction(current);
			let candidate = outgoing[edges[current].end]
				.iter()
				.copied()
				.filter(|&edge| !visited[edge] || edge == first)
				.min_by(|&a, &b| clockwise_angle(reversed, direction(a)).total_cmp(&clockwise_angle(reversed, direction(b))));

			match candidate {
				Some(edge) if edge == first => break,
				Some(edge) => {
					visited[edge] = true;
					edge_loop.push(edge);
					current = edge;
				}
				None => {
					log::warn!("Outline starting at edge {first} does not close, closing it with a straight line");
					break;
				}
			}
		}

		loops.push(edge_loop);
	}
	loops
}

/// A stretch of a contour that maps onto one input segment, or a straight chord.
#[derive(Clone, Copy, Debug)]
struct Run {
	/// Operand, subpath and segment of the input curve.
	key: Option<(usize, usize, usize)>,
	t_start: f64,
	t_end: f64,
	from: usize,
	to: usize,
}

impl Run {
	fn continued_by(&self, next: &Run) -> bool {
		self.key.is_some()
			&& self.key == next.key
			&& self.to == next.from
			&& (self.t_end - next.t_start).abs() <= CONTINUITY_EPS
			&& (self.t_end - self.t_start).signum() == (next.t_end - next.t_start).signum()
	}
}

fn edge_run(arrangement: &Arrangement, edge: usize, operands: &[Discretized]) -> Run {
	let edge = &arrangement.edges[edge];
	let chord = Run {
		key: None,
		t_start: 0.,
		t_end: 1.,
		from: edge.start,
		to: edge.end,
	};

	let Some(back) = edge.back.filter(|back| back.exact) else { return chord };
	let Some(piece) = operands.iter().find(|operand| operand.path_id == back.path_id).and_then(|operand| operand.pieces.get(back.piece)) else {
		return chord;
	};

	Run {
		key: Some((back.path_id, piece.subpath, piece.curve)),
		t_start: piece.segment_time(back.t_start),
		t_end: piece.segment_time(back.t_end),
		..chord
	}
}

fn run_segment(run: &Run, arrangement: &Arrangement, operands: &[Discretized]) -> PathSegment {
	let (from, to) = (arrangement.vertices[run.from], arrangement.vertices[run.to]);
	let original = run.key.and_then(|(path_id, subpath, curve)| {
		let operand = operands.iter().find(|operand| operand.path_id == path_id)?;
		operand.segments.get(subpath)?.get(curve).copied()
	});
	let Some(original) = original else { return PathSegment::Line(from, to) };

	let starts_at = |t: f64| (run.t_start - t).abs() <= CONTINUITY_EPS;
	let ends_at = |t: f64| (run.t_end - t).abs() <= CONTINUITY_EPS;
	let segment = if starts_at(0.) && ends_at(1.) {
		original
	} else if starts_at(1.) && ends_at(0.) {
		original.reverse()
	} else {
		original.subsegment(run.t_start, run.t_end)
	};
	segment.with_end_points(from, to)
}

fn reconstruct(arrangement: &Arrangement, edge_loop: &[usize], operands: &[Discretized]) -> Subpath {
	let runs: Vec<Run> = edge_loop.iter().map(|&edge| edge_run(arrangement, edge, operands)).collect();
	let count = runs.len();

	// Start at a point where the curve changes, so no input segment is split across the end of the loop
	let start = (0..count).find(|&i| !runs[(i + count - 1) % count].continued_by(&runs[i])).unwrap_or(0);

	let mut merged: Vec<Run> = Vec::with_capacity(count);
	for offset in 0..count {
		let run = runs[(start + offset) % count];
		match merged.last_mut() {
			Some(last) if last.continued_by(&run) => {
				last.t_end = run.t_end;
				last.to = run.to;
			}
			_ => merged.push(run),
		}
	}

	let segments = merged.iter().map(|run| run_segment(run, arrangement, operands)).collect();
	Subpath::new(segments, true)
}

/// Traces every contour of a normalized arrangement, reattaching the input curves that survived uncut.
pub(crate) fn extract_contours(arrangement: &Arrangement, operands: &[Discretized], nesting: bool, eps: &Epsilons) -> ContourForest {
	let mut forest = ContourForest::default();

	for edge_loop in trace_loops(arrangement) {
		let polygon: Vec<DVec2> = edge_loop.iter().map(|&edge| arrangement.vertices[arrangement.edges[edge].start]).collect();
		let subpath = reconstruct(arrangement, &edge_loop, operands);
		let area = subpath.signed_area();
		if area.abs() <= eps.point * eps.point && subpath.segments.len() < 3 {
			log::trace!("Dropping empty contour of {} segments", subpath.segments.len());
			continue;
		}

		forest.insert(Contour {
			bounding_box: Aabb::around_points(polygon.iter().copied()),
			subpath,
			polygon,
			area,
			parent: None,
			depth: 0,
		});
	}

	if nesting {
		forest.assign_nesting(eps);
	}

	log::debug!("Extracted {} contours, {} of them islands", forest.len(), forest.islands().count());
	forest
}
