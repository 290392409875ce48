use super::{Arrangement, Winding};
use crate::util::math::winding_contribution;
use smallvec::SmallVec;
use std::collections::VecDeque;

/// Winding numbers of the faces on both sides of an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct EdgeWindings {
	pub left: Winding,
	pub right: Winding,
}

fn find(parents: &mut [usize], mut vertex: usize) -> usize {
	while parents[vertex] != vertex {
		parents[vertex] = parents[parents[vertex]];
		vertex = parents[vertex];
	}
	vertex
}

/// Computes the face winding numbers on both sides of every edge of an uncrossed arrangement.
///
/// Half-edge `2e` runs along edge `e`, `2e + 1` against it. Faces are traced by always continuing with the half-edge
/// that is next clockwise around the vertex, which keeps the traced face on the left. The unbounded face of each
/// connected component gets its winding number from a ray cast against the other components.
pub(crate) fn edge_windings(arrangement: &Arrangement) -> Vec<EdgeWindings> {
	let edges = &arrangement.edges;
	let vertices = &arrangement.vertices;
	let half_count = edges.len() * 2;
	if half_count == 0 {
		return Vec::new();
	}

	let tail = |half: usize| if half % 2 == 0 { edges[half / 2].start } else { edges[half / 2].end };
	let head = |half: usize| tail(half ^ 1);
	let half_winding = |half: usize| if half % 2 == 0 { edges[half / 2].winding } else { -edges[half / 2].winding };
	let angle = |half: usize| (vertices[head(half)] - vertices[tail(half)]).to_angle();

	// Outgoing half-edges around each vertex, counter-clockwise
	let mut outgoing: Vec<SmallVec<[usize; 4]>> = vec![SmallVec::new(); vertices.len()];
	for half in 0..half_count {
		outgoing[tail(half)].push(half);
	}
	let mut position = vec![0; half_count];
	for around in &mut outgoing {
		around.sort_by(|&a, &b| angle(a).total_cmp(&angle(b)));
		for (index, &half) in around.iter().enumerate() {
			position[half] = index;
		}
	}

	let next: Vec<usize> = (0..half_count)
		.map(|half| {
			let around = &outgoing[head(half)];
			let twin_position = position[half ^ 1];
			around[(twin_position + around.len() - 1) % around.len()]
		})
		.collect();

	let mut face_of = vec![usize::MAX; half_count];
	let mut face_starts = Vec::new();
	for start in 0..half_count {
		if face_of[start] != usize::MAX {
			continue;
		}
		let face = face_starts.len();
		face_starts.push(start);
		let mut half = start;
		while face_of[half] == usize::MAX {
			face_of[half] = face;
			half = next[half];
		}
	}

	let mut parents: Vec<usize> = (0..vertices.len()).collect();
	for edge in edges {
		let (a, b) = (find(&mut parents, edge.start), find(&mut parents, edge.end));
		parents[a] = b;
	}
	let component_of_edge: Vec<usize> = edges.iter().map(|edge| find(&mut parents, edge.start)).collect();

	// Leftmost, then lowest, vertex of every component
	let mut extreme_vertex: Vec<Option<usize>> = vec![None; vertices.len()];
	for edge in edges {
		let component = find(&mut parents, edge.start);
		for vertex in [edge.start, edge.end] {
			let point = vertices[vertex];
			let better = extreme_vertex[component].is_none_or(|current| {
				let current = vertices[current];
				point.x < current.x || (point.x == current.x && point.y < current.y)
			});
			if better {
				extreme_vertex[component] = Some(vertex);
			}
		}
	}

	let mut face_winding: Vec<Option<Winding>> = vec![None; face_starts.len()];
	let mut queue = VecDeque::new();
	for (component, vertex) in extreme_vertex.iter().enumerate() {
		let Some(vertex) = *vertex else { continue };
		let Some(&last) = outgoing[vertex].last() else { continue };
		let outer_face = face_of[last];

		let point = vertices[vertex];
		let mut winding = Winding::ZERO;
		for (edge, &edge_component) in edges.iter().zip(component_of_edge.iter()) {
			if edge_component == component {
				continue;
			}
			let [a, b] = arrangement.edge_points(edge);
			winding += edge.winding * winding_contribution(a, b, point);
		}

		face_winding[outer_face] = Some(winding);
		queue.push_back(outer_face);
	}

	while let Some(face) = queue.pop_front() {
		let Some(winding) = face_winding[face] else { continue };
		let start = face_starts[face];
		let mut half = start;
		loop {
			let neighbour = face_of[half ^ 1];
			if face_winding[neighbour].is_none() {
				face_winding[neighbour] = Some(winding - half_winding(half));
				queue.push_back(neighbour);
			}
			half = next[half];
			if half == start {
				break;
			}
		}
	}

	log::debug!("Traced {} faces over {} edges", face_starts.len(), edges.len());

	(0..edges.len())
		.map(|edge| EdgeWindings {
			left: face_winding[face_of[2 * edge]].unwrap_or_default(),
			right: face_winding[face_of[2 * edge + 1]].unwrap_or_default(),
		})
		.collect()
}
