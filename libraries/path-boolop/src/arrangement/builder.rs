use super::{Arrangement, ArrangementState, Edge, Slot, Winding};
use crate::discretize::Discretized;
use crate::epsilons::Epsilons;
use crate::path::line_segment::{line_segment_intersection, project_onto_segment};
use crate::util::aabb::{Aabb, bounding_boxes_overlap, expand_bounding_box};
use crate::util::grid::{BitVec, Grid};
use crate::util::math::lerp;
use glam::DVec2;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Spatial hash handing out one index per group of points closer than the tolerance.
struct VertexPool {
	tolerance: f64,
	cell_factor: f64,
	cells: FxHashMap<(i64, i64), SmallVec<[usize; 2]>>,
	points: Vec<DVec2>,
}

impl VertexPool {
	fn new(tolerance: f64, capacity: usize) -> Self {
		Self {
			tolerance,
			cell_factor: tolerance.recip(),
			cells: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
			points: Vec::with_capacity(capacity),
		}
	}

	fn cell(&self, point: DVec2) -> (i64, i64) {
		let scaled = (point * self.cell_factor).floor();
		(scaled.x as i64, scaled.y as i64)
	}

	fn insert(&mut self, point: DVec2) -> usize {
		let (x, y) = self.cell(point);
		for i in x - 1..=x + 1 {
			for j in y - 1..=y + 1 {
				if let Some(indices) = self.cells.get(&(i, j)) {
					if let Some(&index) = indices.iter().find(|&&index| self.points[index].distance(point) <= self.tolerance) {
						return index;
					}
				}
			}
		}

		let index = self.points.len();
		self.points.push(point);
		self.cells.entry((x, y)).or_default().push(index);
		index
	}
}

/// Collects edges from any number of operands and resolves them into an uncrossed [`Arrangement`].
pub(crate) struct ArrangementBuilder<'a> {
	eps: &'a Epsilons,
	raw: Arrangement,
}

impl<'a> ArrangementBuilder<'a> {
	pub fn new(eps: &'a Epsilons) -> Self {
		Self {
			eps,
			raw: Arrangement::empty(ArrangementState::Raw),
		}
	}

	fn push_edge(&mut self, from: DVec2, to: DVec2, winding: Winding, operands: u8, back: Option<crate::discretize::BackRef>) {
		let start = self.raw.vertices.len();
		self.raw.vertices.push(from);
		self.raw.vertices.push(to);
		self.raw.edges.push(Edge {
			start,
			end: start + 1,
			winding,
			operands,
			back,
		});
	}

	/// Adds every flattened edge of an operand. Unweighted operands only take part in splitting.
	pub fn insert_discretized(&mut self, discretized: &Discretized, slot: Slot, weighted: bool) {
		let winding = if weighted { Winding::unit(slot) } else { Winding::ZERO };
		for edge in discretized.edges() {
			self.push_edge(edge.from, edge.to, winding, slot.bit(), edge.back);
		}
	}

	/// Adds the edges of an already resolved arrangement, moving their slot A winding into `slot`.
	pub fn insert_arrangement(&mut self, arrangement: &Arrangement, slot: Slot) {
		for edge in &arrangement.edges {
			let [from, to] = arrangement.edge_points(edge);
			self.push_edge(from, to, edge.winding.moved_to(slot), slot.bit(), edge.back);
		}
	}

	pub fn build(self) -> Arrangement {
		let eps = self.eps;
		let raw = self.raw;
		let mut pool = VertexPool::new(eps.point, raw.vertices.len());

		let mut edges: Vec<Edge> = raw
			.edges
			.iter()
			.map(|edge| Edge {
				start: pool.insert(raw.vertices[edge.start]),
				end: pool.insert(raw.vertices[edge.end]),
				..*edge
			})
			.filter(|edge| edge.start != edge.end)
			.collect();

		let splits = find_splits(&edges, &mut pool, eps);
		edges = split_edges(&edges, splits, &pool.points, eps);
		let edges = merge_duplicates(edges);

		log::debug!("Uncrossed arrangement has {} vertices and {} edges ({} raw edges)", pool.points.len(), edges.len(), raw.edges.len());

		Arrangement {
			vertices: pool.points,
			edges,
			state: ArrangementState::Uncrossed,
		}
	}
}

/// Split points per edge as `(parameter, vertex)`.
type Splits = Vec<Vec<(f64, usize)>>;

fn find_splits(edges: &[Edge], pool: &mut VertexPool, eps: &Epsilons) -> Splits {
	let mut splits: Splits = vec![Vec::new(); edges.len()];
	if edges.is_empty() {
		return splits;
	}

	let boxes: Vec<Aabb> = edges
		.iter()
		.map(|edge| expand_bounding_box(&Aabb::from_points(pool.points[edge.start], pool.points[edge.end]), eps.point))
		.collect();

	let mut grid = Grid::for_boxes(&boxes);
	for (index, bbox) in boxes.iter().enumerate() {
		grid.insert(bbox, index);
	}

	let mut candidates = BitVec::new(edges.len());
	for i in 0..edges.len() {
		candidates.clear();
		grid.query(&boxes[i], &mut candidates);
		for j in candidates.iter_set_bits().filter(|&j| j > i) {
			if bounding_boxes_overlap(&boxes[i], &boxes[j]) {
				intersect_edge_pair(edges, i, j, pool, eps, &mut splits);
			}
		}
	}

	splits
}

fn intersect_edge_pair(edges: &[Edge], i: usize, j: usize, pool: &mut VertexPool, eps: &Epsilons, splits: &mut Splits) {
	let (edge_i, edge_j) = (&edges[i], &edges[j]);
	let ends_i = [edge_i.start, edge_i.end];
	let ends_j = [edge_j.start, edge_j.end];
	let segment_i = ends_i.map(|vertex| pool.points[vertex]);
	let segment_j = ends_j.map(|vertex| pool.points[vertex]);

	// End points resting on the other edge's interior, which also covers collinear overlaps
	let mut touched = false;
	for (ends, other_segment, other_ends, other_index) in [(ends_j, segment_i, ends_i, i), (ends_i, segment_j, ends_j, j)] {
		for vertex in ends {
			if other_ends.contains(&vertex) {
				continue;
			}
			let point = pool.points[vertex];
			if other_segment.iter().any(|end| end.distance(point) <= eps.point) {
				continue;
			}
			if let Some(t) = project_onto_segment(point, other_segment, eps.point) {
				log::trace!("Vertex {vertex} rests on edge {other_index} at t = {t}");
				splits[other_index].push((t, vertex));
				touched = true;
			}
		}
	}
	if touched || ends_i.iter().any(|vertex| ends_j.contains(vertex)) {
		return;
	}

	let Some((s, t)) = line_segment_intersection(segment_i, segment_j, 0.) else { return };
	let point = segment_i[0].lerp(segment_i[1], s);
	if segment_i.iter().chain(segment_j.iter()).any(|end| end.distance(point) <= eps.point) {
		return;
	}

	let vertex = pool.insert(point);
	if ends_i.contains(&vertex) || ends_j.contains(&vertex) {
		return;
	}
	log::trace!("Edges {i} and {j} cross at vertex {vertex}");
	splits[i].push((s, vertex));
	splits[j].push((t, vertex));
}

/// Replaces each edge by the chain of edges through its split points. Split children carry interpolated back references.
fn split_edges(edges: &[Edge], mut splits: Splits, points: &[DVec2], eps: &Epsilons) -> Vec<Edge> {
	let mut result = Vec::with_capacity(edges.len() + splits.iter().map(Vec::len).sum::<usize>());

	for (edge, edge_splits) in edges.iter().zip(splits.iter_mut()) {
		if edge_splits.is_empty() {
			result.push(*edge);
			continue;
		}

		edge_splits.sort_by(|a, b| a.0.total_cmp(&b.0));
		let end_point = points[edge.end];
		let mut previous_point = points[edge.start];
		let mut kept: SmallVec<[(f64, usize); 4]> = SmallVec::new();
		for &(t, vertex) in edge_splits.iter() {
			let point = points[vertex];
			let repeated = vertex == edge.start || vertex == edge.end || kept.last().is_some_and(|&(_, last)| last == vertex);
			if repeated || point.distance(previous_point) < eps.point || point.distance(end_point) < eps.point {
				continue;
			}
			kept.push((t, vertex));
			previous_point = point;
		}

		if kept.is_empty() {
			result.push(*edge);
			continue;
		}

		let (mut start, mut t_start) = (edge.start, 0.);
		for (t_end, end) in kept.into_iter().chain(std::iter::once((1., edge.end))) {
			let back = edge.back.map(|back| crate::discretize::BackRef {
				t_start: lerp(back.t_start, back.t_end, t_start),
				t_end: lerp(back.t_start, back.t_end, t_end),
				exact: false,
				..back
			});
			result.push(Edge { start, end, back, ..*edge });
			(start, t_start) = (end, t_end);
		}
	}

	result
}

/// Merges edges joining the same two vertices, summing their windings in the direction of the first one.
fn merge_duplicates(edges: Vec<Edge>) -> Vec<Edge> {
	let mut index: FxHashMap<(usize, usize), usize> = FxHashMap::with_capacity_and_hasher(edges.len(), Default::default());
	let mut merged: Vec<Edge> = Vec::with_capacity(edges.len());

	for edge in edges {
		if edge.start == edge.end {
			continue;
		}
		let key = (edge.start.min(edge.end), edge.start.max(edge.end));
		match index.get(&key) {
			Some(&existing) => {
				let kept = &mut merged[existing];
				if kept.start == edge.start {
					kept.winding += edge.winding;
				} else {
					kept.winding -= edge.winding;
				}
				kept.operands |= edge.operands;
			}
			None => {
				index.insert(key, merged.len());
				merged.push(edge);
			}
		}
	}

	merged
}
