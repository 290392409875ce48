use glam::DVec2;
use path_boolop::*;

fn init() {
	let _ = env_logger::builder().is_test(true).try_init();
}

fn square(min: DVec2, size: f64) -> PathVector {
	vec![polygon(&[min, min + DVec2::new(size, 0.), min + DVec2::splat(size), min + DVec2::new(0., size)])]
}

fn circle(center: DVec2, radius: f64) -> PathVector {
	let (right, left) = (center + DVec2::new(radius, 0.), center - DVec2::new(radius, 0.));
	path_from_path_data(&format!(
		"M {},{} A {radius},{radius} 0 0 1 {},{} A {radius},{radius} 0 0 1 {},{} Z",
		right.x, right.y, left.x, left.y, right.x, right.y
	))
	.unwrap()
}

fn area_of(result: &[PathVector]) -> f64 {
	result.iter().map(path_area).sum()
}

fn boolean(a: &PathVector, b: &PathVector, operation: BooleanOp) -> Vec<PathVector> {
	path_boolean(a, FillRule::NonZero, b, FillRule::NonZero, operation).unwrap()
}

fn first(result: Vec<PathVector>) -> PathVector {
	result.into_iter().next().unwrap_or_default()
}

#[test]
fn union_of_one_is_idempotent() {
	init();
	let shapes = [square(DVec2::ZERO, 2.), circle(DVec2::splat(5.), 3.), path_reversed(&circle(DVec2::ZERO, 1.))];
	for shape in shapes {
		for fill_rule in [FillRule::NonZero, FillRule::EvenOdd] {
			let once = flattened(&shape, fill_rule);
			let twice = flattened(&once, fill_rule);
			assert!((path_area(&once) - path_area(&shape).abs()).abs() < 1e-9);
			assert!((path_area(&twice) - path_area(&once)).abs() < 1e-9);
			assert_eq!(path_segment_count(&twice), path_segment_count(&once));
		}
	}
}

#[test]
fn union_and_intersection_commute() {
	init();
	let a = circle(DVec2::ZERO, 2.);
	let b = square(DVec2::new(1., -0.5), 3.);
	for operation in [BooleanOp::Union, BooleanOp::Intersect, BooleanOp::SymDiff] {
		let forward = area_of(&boolean(&a, &b, operation));
		let backward = area_of(&boolean(&b, &a, operation));
		assert!((forward - backward).abs() < 1e-6, "{operation}: {forward} against {backward}");
	}
}

#[test]
fn complement_of_union_is_intersection_of_complements() {
	init();
	let bound = square(DVec2::ZERO, 4.);
	let a = square(DVec2::splat(0.5), 2.);
	let b = circle(DVec2::splat(2.5), 1.);

	let left = boolean(&bound, &first(boolean(&a, &b, BooleanOp::Union)), BooleanOp::Diff);
	let outside_a = first(boolean(&bound, &a, BooleanOp::Diff));
	let outside_b = first(boolean(&bound, &b, BooleanOp::Diff));
	let right = boolean(&outside_a, &outside_b, BooleanOp::Intersect);

	assert!((area_of(&left) - area_of(&right)).abs() < 1e-6);
}

#[test]
fn union_and_intersection_add_up() {
	init();
	let cases = [
		(square(DVec2::ZERO, 1.), square(DVec2::splat(0.5), 1.)),
		(circle(DVec2::ZERO, 1.), circle(DVec2::new(1., 0.), 1.)),
		(circle(DVec2::ZERO, 3.), square(DVec2::new(-1., -4.), 2.)),
	];
	for (a, b) in cases {
		let union = area_of(&boolean(&a, &b, BooleanOp::Union));
		let intersection = area_of(&boolean(&a, &b, BooleanOp::Intersect));
		let expected = path_area(&a).abs() + path_area(&b).abs();
		assert!((union + intersection - expected).abs() < 1e-6 * expected, "{union} + {intersection} against {expected}");
	}
}

#[test]
fn cut_pieces_reassemble() {
	init();
	let lines = vec![polyline(&[DVec2::new(-5., 0.3), DVec2::new(5., -0.2)]), polyline(&[DVec2::new(0.1, -5.), DVec2::new(-0.2, 5.)])];
	let shape = circle(DVec2::ZERO, 2.);

	let pieces = pathvector_cut(&shape, &lines);
	assert_eq!(pieces.len(), 4);
	assert!((area_of(&pieces) - path_area(&shape).abs()).abs() < 1e-9);

	let operands: Vec<Operand> = pieces.into_iter().map(|piece| Operand::new(piece, FillRule::NonZero)).collect();
	let reassembled = path_boolean_many(&operands, BooleanOp::Union).unwrap();
	assert!((area_of(&reassembled) - path_area(&shape).abs()).abs() < 1e-6);
}

#[test]
fn slicing_preserves_area() {
	init();
	let shape = circle(DVec2::ZERO, 2.);
	let cutter = vec![polyline(&[DVec2::new(-3., 0.5), DVec2::new(3., 0.5)])];

	let pieces = boolean(&shape, &cutter, BooleanOp::Slice);
	assert_eq!(pieces.len(), 2);
	let sliced: f64 = pieces.iter().flatten().map(Subpath::signed_area).sum();
	assert!((sliced - path_area(&shape)).abs() < 1e-9);
}

#[test]
fn difference_and_intersection_partition_the_first_operand() {
	init();
	let a = circle(DVec2::ZERO, 2.);
	let b = circle(DVec2::new(1.5, 1.), 1.5);
	let difference = area_of(&boolean(&a, &b, BooleanOp::Diff));
	let intersection = area_of(&boolean(&a, &b, BooleanOp::Intersect));
	assert!((difference + intersection - path_area(&a).abs()).abs() < 1e-6);
}
