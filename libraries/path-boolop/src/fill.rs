use crate::arrangement::{Arrangement, ArrangementState, Slot, Winding, edge_windings};
use crate::boolean::FillRule;

impl FillRule {
	/// Whether a face with this winding number is inside the shape.
	pub fn is_filled(self, winding: i32) -> bool {
		match self {
			FillRule::NonZero => winding != 0,
			FillRule::EvenOdd => winding % 2 != 0,
			FillRule::DontCare => true,
		}
	}
}

/// Turns an uncrossed single-operand arrangement into its normalized boundary under `fill_rule`.
///
/// Only edges between a filled and an empty face survive. They are oriented with the filled face on their left and
/// carry a winding of one. Cutters resolved with [`FillRule::DontCare`] keep all their edges with no winding at all.
pub(crate) fn resolve(mut arrangement: Arrangement, fill_rule: FillRule) -> Arrangement {
	debug_assert_eq!(arrangement.state, ArrangementState::Uncrossed);

	if fill_rule == FillRule::DontCare {
		for edge in &mut arrangement.edges {
			edge.winding = Winding::ZERO;
		}
		return arrangement;
	}

	let windings = edge_windings(&arrangement);
	let edges = arrangement
		.edges
		.iter()
		.zip(windings)
		.filter_map(|(edge, windings)| {
			let left = fill_rule.is_filled(windings.left.get(Slot::A));
			let right = fill_rule.is_filled(windings.right.get(Slot::A));
			match (left, right) {
				(true, false) => Some(*edge),
				(false, true) => Some(edge.reversed()),
				_ => None,
			}
		})
		.map(|mut edge| {
			edge.winding = Winding::unit(Slot::A);
			edge
		})
		.collect::<Vec<_>>();

	log::debug!("{fill_rule:?} fill kept {} of {} edges", edges.len(), arrangement.edges.len());

	Arrangement {
		vertices: arrangement.vertices,
		edges,
		state: ArrangementState::Normalized,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::arrangement::ArrangementBuilder;
	use crate::discretize::discretize;
	use crate::epsilons::{BooleanOptions, EPS};
	use crate::path::intersections::empty_split_times;
	use crate::path::{PathVector, polygon};
	use crate::util::math::polygon_area;
	use glam::DVec2;

	fn uncrossed(path: &PathVector) -> Arrangement {
		let mut builder = ArrangementBuilder::new(&EPS);
		builder.insert_discretized(&discretize(path, 0, &empty_split_times(path), true, &BooleanOptions::default()), Slot::A, true);
		builder.build()
	}

	fn boundary_area(arrangement: &Arrangement) -> f64 {
		arrangement
			.edges
			.iter()
			.map(|edge| {
				let [a, b] = arrangement.edge_points(edge);
				polygon_area(&[DVec2::ZERO, a, b])
			})
			.sum()
	}

	fn doubly_wound_square() -> PathVector {
		let outer = polygon(&[DVec2::new(0., 0.), DVec2::new(4., 0.), DVec2::new(4., 4.), DVec2::new(0., 4.)]);
		let inner = polygon(&[DVec2::new(1., 1.), DVec2::new(2., 1.), DVec2::new(2., 2.), DVec2::new(1., 2.)]);
		vec![outer, inner]
	}

	#[test]
	fn nonzero_keeps_outer_boundary_only() {
		let resolved = resolve(uncrossed(&doubly_wound_square()), FillRule::NonZero);
		assert_eq!(resolved.state, ArrangementState::Normalized);
		assert_eq!(resolved.edges.len(), 4);
		assert!((boundary_area(&resolved) - 16.).abs() < 1e-9);
	}

	#[test]
	fn even_odd_punches_a_hole() {
		let resolved = resolve(uncrossed(&doubly_wound_square()), FillRule::EvenOdd);
		assert_eq!(resolved.edges.len(), 8);
		assert!((boundary_area(&resolved) - 15.).abs() < 1e-9);
	}

	#[test]
	fn clockwise_input_is_reoriented() {
		let clockwise = vec![polygon(&[DVec2::new(0., 0.), DVec2::new(0., 1.), DVec2::new(1., 1.), DVec2::new(1., 0.)])];
		let resolved = resolve(uncrossed(&clockwise), FillRule::NonZero);
		assert!((boundary_area(&resolved) - 1.).abs() < 1e-9);
		assert!(resolved.edges.iter().all(|edge| edge.winding == Winding::unit(Slot::A)));
	}

	#[test]
	fn self_cancelling_path_is_empty() {
		let square = polygon(&[DVec2::new(0., 0.), DVec2::new(1., 0.), DVec2::new(1., 1.), DVec2::new(0., 1.)]);
		let resolved = resolve(uncrossed(&vec![square.clone(), square.reversed()]), FillRule::NonZero);
		assert!(resolved.is_empty());
	}

	#[test]
	fn dont_care_keeps_every_edge_unweighted() {
		let resolved = resolve(uncrossed(&doubly_wound_square()), FillRule::DontCare);
		assert_eq!(resolved.edges.len(), 8);
		assert!(resolved.edges.iter().all(|edge| edge.winding == Winding::ZERO));
	}
}
