use crate::arrangement::{Arrangement, ArrangementBuilder, Slot};
use crate::combinator::{combine, short_circuit};
use crate::discretize::{Discretized, discretize};
use crate::epsilons::{BooleanOptions, Epsilons};
use crate::error::BooleanError;
use crate::fill::resolve;
use crate::outline::extract_contours;
use crate::path::PathVector;
use crate::path::intersections::split_times_for;
use crate::slice::slice;

/// How the winding number of a point decides whether it is inside a shape.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillRule {
	#[default]
	NonZero,
	EvenOdd,
	/// For cutters, which only split other shapes and enclose nothing themselves.
	DontCare,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BooleanOp {
	Union,
	Intersect,
	/// The first operand minus the second.
	Diff,
	SymDiff,
	/// Divides the first operand along the second, keeping every piece.
	Cut,
	/// Splits the outline of the first operand where the second crosses it, without closing the pieces.
	Slice,
}

impl std::fmt::Display for BooleanOp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			BooleanOp::Union => "union",
			BooleanOp::Intersect => "intersection",
			BooleanOp::Diff => "difference",
			BooleanOp::SymDiff => "exclusion",
			BooleanOp::Cut => "division",
			BooleanOp::Slice => "cut path",
		};
		f.write_str(name)
	}
}

impl BooleanOp {
	pub const ALL: [BooleanOp; 6] = [BooleanOp::Union, BooleanOp::Intersect, BooleanOp::Diff, BooleanOp::SymDiff, BooleanOp::Cut, BooleanOp::Slice];

	pub fn minimum_operands(self) -> usize {
		match self {
			BooleanOp::Union => 1,
			_ => 2,
		}
	}

	/// Operators that take one source and one other operand accept no more than two.
	pub fn exact_operands(self) -> Option<usize> {
		match self {
			BooleanOp::Diff | BooleanOp::Cut | BooleanOp::Slice => Some(2),
			BooleanOp::Union | BooleanOp::Intersect | BooleanOp::SymDiff => None,
		}
	}

	/// Whether the result depends on which operand is on top.
	pub fn is_ordered(self) -> bool {
		self.exact_operands().is_some()
	}

	pub fn validate_operand_count(self, found: usize) -> Result<(), BooleanError> {
		let minimum = self.minimum_operands();
		if found < minimum {
			return Err(BooleanError::InsufficientOperands { operation: self, minimum, found });
		}
		match self.exact_operands() {
			Some(expected) if found != expected => Err(BooleanError::UnexpectedOperandCount { operation: self, expected, found }),
			_ => Ok(()),
		}
	}
}

/// A path vector together with the rule deciding its inside.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Operand {
	pub path: PathVector,
	pub fill_rule: FillRule,
}

impl Operand {
	pub fn new(path: PathVector, fill_rule: FillRule) -> Self {
		Self { path, fill_rule }
	}
}

/// Applies `operation` to two path vectors.
///
/// Returns no paths for an empty result, a single path for the set operations and one path per piece for
/// [`BooleanOp::Cut`] and [`BooleanOp::Slice`].
pub fn path_boolean(a: &PathVector, fill_a: FillRule, b: &PathVector, fill_b: FillRule, operation: BooleanOp) -> Result<Vec<PathVector>, BooleanError> {
	path_boolean_with_options(a, fill_a, b, fill_b, operation, &BooleanOptions::default())
}

pub fn path_boolean_with_options(a: &PathVector, fill_a: FillRule, b: &PathVector, fill_b: FillRule, operation: BooleanOp, options: &BooleanOptions) -> Result<Vec<PathVector>, BooleanError> {
	let operands = [Operand::new(a.clone(), fill_a), Operand::new(b.clone(), fill_b)];
	path_boolean_many_with_options(&operands, operation, options)
}

/// Applies `operation` to any number of operands, folding them from left to right.
pub fn path_boolean_many(operands: &[Operand], operation: BooleanOp) -> Result<Vec<PathVector>, BooleanError> {
	path_boolean_many_with_options(operands, operation, &BooleanOptions::default())
}

pub fn path_boolean_many_with_options(operands: &[Operand], operation: BooleanOp, options: &BooleanOptions) -> Result<Vec<PathVector>, BooleanError> {
	if let Err(error) = operation.validate_operand_count(operands.len()) {
		log::warn!("Rejected {operation}: {error}");
		return Err(error);
	}

	let result = match operation {
		BooleanOp::Slice => slice(&operands[0].path, &operands[1].path, options),
		BooleanOp::Cut => cut(&operands[0], &operands[1].path, options),
		_ => fold(operands, operation, options),
	};
	log::debug!("{operation} of {} operands produced {} paths", operands.len(), result.len());
	Ok(result)
}

/// Resolves the self-overlaps of one path under its fill rule.
pub fn flattened(path: &PathVector, fill_rule: FillRule) -> PathVector {
	flattened_with_options(path, fill_rule, &BooleanOptions::default())
}

pub fn flattened_with_options(path: &PathVector, fill_rule: FillRule, options: &BooleanOptions) -> PathVector {
	fold(&[Operand::new(path.clone(), fill_rule)], BooleanOp::Union, options).into_iter().next().unwrap_or_default()
}

/// Divides a non-zero filled path along `lines`, returning every piece with its holes.
pub fn pathvector_cut(path: &PathVector, lines: &PathVector) -> Vec<PathVector> {
	pathvector_cut_with_options(path, lines, &BooleanOptions::default())
}

pub fn pathvector_cut_with_options(path: &PathVector, lines: &PathVector, options: &BooleanOptions) -> Vec<PathVector> {
	cut(&Operand::new(path.clone(), FillRule::NonZero), lines, options)
}

fn normalized(discretized: &Discretized, fill_rule: FillRule, eps: &Epsilons) -> Arrangement {
	let mut builder = ArrangementBuilder::new(eps);
	builder.insert_discretized(discretized, Slot::A, fill_rule != FillRule::DontCare);
	resolve(builder.build(), fill_rule)
}

fn fold(operands: &[Operand], operation: BooleanOp, options: &BooleanOptions) -> Vec<PathVector> {
	let eps = &options.epsilons;
	let paths: Vec<&PathVector> = operands.iter().map(|operand| &operand.path).collect();
	let times = split_times_for(&paths, eps);

	let discretized: Vec<Discretized> = operands
		.iter()
		.zip(times.iter())
		.enumerate()
		.map(|(path_id, (operand, times))| discretize(&operand.path, path_id, times, true, options))
		.collect();
	let skipped: usize = discretized.iter().map(|operand| operand.skipped.len()).sum();
	if skipped > 0 {
		log::debug!("{operation} continues without {skipped} degenerate subpaths");
	}

	let mut shapes = operands.iter().zip(discretized.iter()).map(|(operand, discretized)| normalized(discretized, operand.fill_rule, eps));
	let Some(first) = shapes.next() else { return Vec::new() };
	let result = shapes.fold(first, |running, next| short_circuit(&running, &next, operation).unwrap_or_else(|| combine(&running, &next, operation, eps)));

	let policy = operation.policy();
	let forest = extract_contours(&result, &discretized, policy.nesting, eps);
	if forest.is_empty() {
		return Vec::new();
	}
	vec![forest.to_path_vector(policy.nesting)]
}

fn cut(source: &Operand, cutter: &PathVector, options: &BooleanOptions) -> Vec<PathVector> {
	let eps = &options.epsilons;
	let times = split_times_for(&[&source.path, cutter], eps);
	let discretized = [discretize(&source.path, 0, &times[0], true, options), discretize(cutter, 1, &times[1], false, options)];

	let shape = normalized(&discretized[0], source.fill_rule, eps);
	if shape.is_empty() {
		return Vec::new();
	}
	let knife = normalized(&discretized[1], FillRule::DontCare, eps);
	let result = combine(&shape, &knife, BooleanOp::Cut, eps);

	extract_contours(&result, &discretized, true, eps).to_pieces()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::path::{path_area, polygon, polyline};
	use glam::DVec2;

	fn square(min: DVec2, size: f64) -> PathVector {
		vec![polygon(&[min, min + DVec2::new(size, 0.), min + DVec2::splat(size), min + DVec2::new(0., size)])]
	}

	#[test]
	fn operand_counts() {
		assert_eq!(
			BooleanOp::Intersect.validate_operand_count(1),
			Err(BooleanError::InsufficientOperands {
				operation: BooleanOp::Intersect,
				minimum: 2,
				found: 1
			})
		);
		assert_eq!(
			BooleanOp::Cut.validate_operand_count(3),
			Err(BooleanError::UnexpectedOperandCount {
				operation: BooleanOp::Cut,
				expected: 2,
				found: 3
			})
		);
		assert!(BooleanOp::Union.validate_operand_count(1).is_ok());
		assert!(BooleanOp::SymDiff.validate_operand_count(5).is_ok());
		assert!(BooleanOp::Union.validate_operand_count(0).is_err());
	}

	#[test]
	fn union_of_three() {
		let operands: Vec<Operand> = (0..3).map(|i| Operand::new(square(DVec2::new(i as f64, 0.), 1.), FillRule::NonZero)).collect();
		let result = path_boolean_many(&operands, BooleanOp::Union).unwrap();
		assert_eq!(result.len(), 1);
		assert_eq!(result[0].len(), 1);
		assert!((path_area(&result[0]) - 3.).abs() < 1e-9);
	}

	#[test]
	fn intersection_of_disjoint_is_empty() {
		let result = path_boolean(&square(DVec2::ZERO, 1.), FillRule::NonZero, &square(DVec2::splat(3.), 1.), FillRule::NonZero, BooleanOp::Intersect).unwrap();
		assert!(result.is_empty());
	}

	#[test]
	fn cut_pieces() {
		let pieces = pathvector_cut(&square(DVec2::ZERO, 2.), &vec![polyline(&[DVec2::new(1., -1.), DVec2::new(1., 3.)])]);
		assert_eq!(pieces.len(), 2);
		for piece in &pieces {
			assert!((path_area(piece) - 2.).abs() < 1e-9);
		}
	}

	#[test]
	fn flattening_a_doubled_square() {
		let mut doubled = square(DVec2::ZERO, 1.);
		doubled.extend(square(DVec2::ZERO, 1.));
		let result = flattened(&doubled, FillRule::NonZero);
		assert_eq!(result.len(), 1);
		assert!((path_area(&result) - 1.).abs() < 1e-9);
	}
}
