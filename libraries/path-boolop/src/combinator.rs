use crate::arrangement::{Arrangement, ArrangementBuilder, ArrangementState, Edge, Slot, Winding, edge_windings};
use crate::boolean::BooleanOp;
use crate::epsilons::Epsilons;
use smallvec::SmallVec;

/// What distinguishes one operator from another once both operands share an arrangement.
#[derive(Clone, Copy)]
pub(crate) struct Policy {
	/// Whether a face inside A and/or B belongs to the result.
	pub keep: fn(bool, bool) -> bool,
	/// Whether holes have to be assigned to their islands in the output.
	pub nesting: bool,
	/// Whether cutter edges inside the result are kept on both sides, splitting it into pieces.
	pub two_sided: bool,
}

impl BooleanOp {
	pub(crate) fn policy(self) -> Policy {
		let (keep, nesting, two_sided): (fn(bool, bool) -> bool, bool, bool) = match self {
			BooleanOp::Union => (|a, b| a || b, true, false),
			BooleanOp::Intersect => (|a, b| a && b, false, false),
			BooleanOp::Diff => (|a, b| a && !b, true, false),
			BooleanOp::SymDiff => (|a, b| a != b, true, false),
			BooleanOp::Cut => (|a, _| a, true, true),
			BooleanOp::Slice => (|a, _| a, false, true),
		};
		Policy { keep, nesting, two_sided }
	}
}

/// Combines two normalized arrangements, both wound in slot A, into the normalized result of `operation`.
///
/// For two-sided operators `b` is a cutter resolved without fill, whose edges inside `a` end up in the result
/// once in each direction.
pub(crate) fn combine(a: &Arrangement, b: &Arrangement, operation: BooleanOp, eps: &Epsilons) -> Arrangement {
	let policy = operation.policy();

	let mut builder = ArrangementBuilder::new(eps);
	builder.insert_arrangement(a, Slot::A);
	builder.insert_arrangement(b, Slot::B);
	let merged = builder.build();

	let windings = edge_windings(&merged);
	let inside = |winding: Winding| (policy.keep)(winding.a != 0, winding.b != 0);

	let mut edges = Vec::with_capacity(merged.edges.len());
	for (edge, windings) in merged.edges.iter().zip(windings) {
		let (left, right) = (inside(windings.left), inside(windings.right));

		let result_edge = match (left, right) {
			(true, false) => Some(*edge),
			(false, true) => Some(edge.reversed()),
			_ => None,
		};
		if let Some(mut result_edge) = result_edge {
			result_edge.winding = Winding::unit(Slot::A);
			edges.push(result_edge);
			continue;
		}

		if policy.two_sided && left && right && edge.has_operand(Slot::B) {
			let mut forward = *edge;
			forward.winding = Winding::ZERO;
			edges.push(forward);
			edges.push(forward.reversed());
		}
	}

	if policy.two_sided {
		prune_dangling(&mut edges, merged.vertices.len());
	}
	log::debug!("{operation} kept {} of {} merged edges", edges.len(), merged.edges.len());

	Arrangement {
		vertices: merged.vertices,
		edges,
		state: ArrangementState::Normalized,
	}
}

/// Removes unweighted edges with an end that touches nothing else, repeatedly, so cutters that stop inside a shape leave no spurs.
fn prune_dangling(edges: &mut Vec<Edge>, vertex_count: usize) {
	loop {
		let mut neighbours: Vec<SmallVec<[usize; 4]>> = vec![SmallVec::new(); vertex_count];
		for edge in edges.iter() {
			for (from, to) in [(edge.start, edge.end), (edge.end, edge.start)] {
				if !neighbours[from].contains(&to) {
					neighbours[from].push(to);
				}
			}
		}

		let before = edges.len();
		edges.retain(|edge| edge.winding != Winding::ZERO || (neighbours[edge.start].len() > 1 && neighbours[edge.end].len() > 1));
		if edges.len() == before {
			break;
		}
	}
}

/// Result of folding `b` into the running result `a` when either of them has no edges, or `None` if both have some.
pub(crate) fn short_circuit(a: &Arrangement, b: &Arrangement, operation: BooleanOp) -> Option<Arrangement> {
	let empty = || Arrangement::empty(ArrangementState::Normalized);
	match (a.is_empty(), b.is_empty()) {
		(false, false) => None,
		(true, true) => Some(empty()),
		(true, false) => Some(match operation {
			BooleanOp::Union | BooleanOp::SymDiff => b.clone(),
			_ => empty(),
		}),
		(false, true) => Some(match operation {
			BooleanOp::Intersect => empty(),
			_ => a.clone(),
		}),
	}
}
