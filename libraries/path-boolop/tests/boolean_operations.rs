use glam::DVec2;
use path_boolop::*;

fn init() {
	let _ = env_logger::builder().is_test(true).try_init();
}

fn path(data: &str) -> PathVector {
	path_from_path_data(data).unwrap()
}

fn square(min: DVec2, size: f64) -> PathVector {
	vec![polygon(&[min, min + DVec2::new(size, 0.), min + DVec2::splat(size), min + DVec2::new(0., size)])]
}

fn boolean(a: &PathVector, b: &PathVector, operation: BooleanOp) -> Vec<PathVector> {
	path_boolean(a, FillRule::NonZero, b, FillRule::NonZero, operation).unwrap()
}

fn single(result: Vec<PathVector>) -> PathVector {
	assert_eq!(result.len(), 1, "expected one path, got {result:?}");
	result.into_iter().next().unwrap()
}

fn assert_close(actual: f64, expected: f64, tolerance: f64) {
	assert!((actual - expected).abs() <= tolerance, "expected {expected}, got {actual}");
}

fn corners(path: &PathVector) -> Vec<DVec2> {
	path.iter().flat_map(|subpath| subpath.segments.iter().map(PathSegment::start)).collect()
}

fn rectangle_bigger() -> PathVector {
	path("M 0,0 L 0,2 L 2,2 L 2,0 z")
}

fn rectangle_smaller() -> PathVector {
	path("M 0.5,0.5 L 0.5,1.5 L 1.5,1.5 L 1.5,0.5 z")
}

fn rectangle_outside() -> PathVector {
	path("M 0,1.5 L 0.5,1.5 L 0.5,2.5 L 0,2.5 z")
}

const STAR: &str = "M 0,10 20,0 15,25 5,0 25,15 z";
const STAR_BOUNDING_BOX: &str = "M 0,0 L 0,25 L 25,25 L 25,0 z";

#[test]
fn overlapping_squares() {
	init();
	let a = square(DVec2::ZERO, 1.);
	let b = square(DVec2::splat(0.5), 1.);

	let union = single(boolean(&a, &b, BooleanOp::Union));
	assert_eq!(union.len(), 1);
	assert_close(path_area(&union), 1.75, 1e-9);
	let outline = [(0., 0.), (1., 0.), (1., 0.5), (1.5, 0.5), (1.5, 1.5), (0.5, 1.5), (0.5, 1.), (0., 1.)].map(|(x, y)| DVec2::new(x, y));
	assert!(corners(&union).iter().all(|corner| outline.contains(corner)));

	let intersection = single(boolean(&a, &b, BooleanOp::Intersect));
	assert_eq!(intersection.len(), 1);
	assert_eq!(path_segment_count(&intersection), 4);
	assert_close(path_area(&intersection), 0.25, 1e-9);

	let difference = single(boolean(&a, &b, BooleanOp::Diff));
	assert_close(path_area(&difference), 0.75, 1e-9);

	let exclusion = single(boolean(&a, &b, BooleanOp::SymDiff));
	assert_close(path_area(&exclusion), 1.5, 1e-9);
}

#[test]
fn bowtie_lobes() {
	init();
	let bowtie = vec![polygon(&[DVec2::new(0., 0.), DVec2::new(2., 2.), DVec2::new(2., 0.), DVec2::new(0., 2.)])];
	let result = single(path_boolean_many(&[Operand::new(bowtie, FillRule::EvenOdd)], BooleanOp::Union).unwrap());

	assert_eq!(result.len(), 2);
	for lobe in &result {
		assert_close(lobe.signed_area(), 1., 1e-9);
	}
}

#[test]
fn difference_of_disjoint_squares() {
	init();
	let a = square(DVec2::ZERO, 1.);
	let result = single(boolean(&a, &square(DVec2::splat(3.), 1.), BooleanOp::Diff));

	assert_eq!(result.len(), 1);
	assert_eq!(path_segment_count(&result), 4);
	assert_close(path_area(&result), 1., 1e-12);
}

#[test]
fn cubic_survives_a_union_of_one() {
	init();
	let data = "M 10,0 C 10,10 0,10 0,0 Z";
	let result = flattened(&path(data), FillRule::NonZero);

	assert_eq!(result.len(), 1);
	assert!(result[0].closed);
	assert_eq!(path_to_path_data(&result), data);
}

#[test]
fn clockwise_input_comes_back_counter_clockwise() {
	init();
	let result = flattened(&path("M 0,0 C 0,10 10,10 10,0 Z"), FillRule::NonZero);
	assert_eq!(path_to_path_data(&result), "M 0,0 L 10,0 C 10,10 0,10 0,0 Z");
	assert!(path_area(&result) > 0.);
}

#[test]
fn union_outside() {
	init();
	for (a, b) in [(rectangle_bigger(), rectangle_outside()), (rectangle_outside(), rectangle_bigger())] {
		let result = single(path_boolean(&a, FillRule::EvenOdd, &b, FillRule::EvenOdd, BooleanOp::Union).unwrap());
		assert_eq!(result.len(), 1);
		assert_close(path_area(&result), 4.25, 1e-9);
	}
}

#[test]
fn union_inside() {
	init();
	for (a, b) in [(rectangle_bigger(), rectangle_smaller()), (rectangle_smaller(), rectangle_bigger())] {
		let result = single(path_boolean(&a, FillRule::EvenOdd, &b, FillRule::EvenOdd, BooleanOp::Union).unwrap());
		assert_eq!(result.len(), 1);
		assert_eq!(path_segment_count(&result), 4);
		assert_close(path_area(&result), 4., 1e-12);
	}
}

#[test]
fn intersection_inside() {
	init();
	let result = single(path_boolean(&rectangle_bigger(), FillRule::EvenOdd, &rectangle_smaller(), FillRule::EvenOdd, BooleanOp::Intersect).unwrap());
	assert_eq!(result.len(), 1);
	assert_eq!(path_segment_count(&result), 4);
	assert_close(path_area(&result), 1., 1e-12);
}

#[test]
fn intersection_of_star_under_even_odd() {
	init();
	let reference = path(
		"M 5 0 L 7.5 6.25 L 11 4.5 z M 11 4.5 L 18.04296875 9.783203125 L 20 0 z M 18.04296875 9.783203125 L 17.30859375 13.4609375 L 25 15 z \
		 M 17.30859375 13.4609375 L 9.783203125 11.95703125 L 15 25 z M 9.783203125 11.95703125 L 7.5 6.25 L 0 10 z",
	);
	let reference_area: f64 = reference.iter().map(|subpath| subpath.signed_area().abs()).sum();

	for bounding_box_fill in [FillRule::EvenOdd, FillRule::NonZero] {
		let result = single(path_boolean(&path(STAR), FillRule::EvenOdd, &path(STAR_BOUNDING_BOX), bounding_box_fill, BooleanOp::Intersect).unwrap());
		assert_eq!(result.len(), 5);
		assert!(result.iter().all(|triangle| triangle.segments.len() == 3));
		assert_close(path_area(&result), reference_area, 0.05);
	}
}

#[test]
fn intersection_of_star_under_non_zero() {
	init();
	let reference = path(
		"M 5 0 L 7.5 6.25 L 0 10 L 9.783203125 11.95703125 L 15 25 L 17.30859375 13.4609375 L 25 15 L 18.04296875 9.783203125 L 20 0 L 11 4.5 z",
	);

	let result = single(path_boolean(&path(STAR), FillRule::NonZero, &path(STAR_BOUNDING_BOX), FillRule::EvenOdd, BooleanOp::Intersect).unwrap());
	assert_eq!(result.len(), 1);
	assert_eq!(path_segment_count(&result), 10);
	assert_close(path_area(&result), path_area(&reference).abs(), 0.05);
}

#[test]
fn difference_inside_is_empty() {
	init();
	let result = path_boolean(&rectangle_smaller(), FillRule::EvenOdd, &rectangle_bigger(), FillRule::EvenOdd, BooleanOp::Diff).unwrap();
	assert!(result.is_empty());
}

#[test]
fn difference_outside_leaves_a_hole() {
	init();
	let result = single(path_boolean(&rectangle_bigger(), FillRule::EvenOdd, &rectangle_smaller(), FillRule::EvenOdd, BooleanOp::Diff).unwrap());

	assert_eq!(result.len(), 2);
	assert_close(result[0].signed_area(), 4., 1e-12);
	assert_close(result[1].signed_area(), -1., 1e-12);
}

#[test]
fn cut_keeps_holes_with_their_piece() {
	init();
	let mut source = square(DVec2::ZERO, 4.);
	source.extend(path_reversed(&square(DVec2::splat(0.5), 1.)));
	let cutter = vec![polyline(&[DVec2::new(2., -1.), DVec2::new(2., 5.)])];

	let mut pieces = pathvector_cut(&source, &cutter);
	assert_eq!(pieces.len(), 2);
	pieces.sort_by_key(PathVector::len);
	assert_eq!(pieces[0].len(), 1);
	assert_eq!(pieces[1].len(), 2);
	assert_close(path_area(&pieces[0]), 8., 1e-9);
	assert_close(path_area(&pieces[1]), 7., 1e-9);
}

#[test]
fn slice_opens_the_outline() {
	init();
	let cutter = vec![polyline(&[DVec2::new(1., -1.), DVec2::new(1., 3.)])];
	let pieces = path_boolean(&square(DVec2::ZERO, 2.), FillRule::NonZero, &cutter, FillRule::NonZero, BooleanOp::Slice).unwrap();

	assert_eq!(pieces.len(), 2);
	assert!(pieces.iter().all(|piece| piece.len() == 1 && !piece[0].closed));
}

#[test]
fn operand_count_is_checked_first() {
	init();
	let a = square(DVec2::ZERO, 1.);
	let operands = vec![Operand::new(a, FillRule::NonZero); 3];
	assert_eq!(
		path_boolean_many(&operands, BooleanOp::Diff),
		Err(BooleanError::UnexpectedOperandCount {
			operation: BooleanOp::Diff,
			expected: 2,
			found: 3
		})
	);
	assert!(path_boolean_many(&operands[..1], BooleanOp::SymDiff).is_err());
	assert!(path_boolean_many(&operands[..1], BooleanOp::Union).is_ok());
}

#[test]
fn empty_operands() {
	init();
	let a = square(DVec2::ZERO, 1.);
	let empty = PathVector::new();

	assert_close(path_area(&single(boolean(&empty, &a, BooleanOp::Union))), 1., 1e-12);
	assert_close(path_area(&single(boolean(&a, &empty, BooleanOp::Diff))), 1., 1e-12);
	assert!(boolean(&a, &empty, BooleanOp::Intersect).is_empty());
	assert!(boolean(&empty, &a, BooleanOp::Diff).is_empty());
}

#[test]
fn nested_circles() {
	init();
	let a = path("M 47,24 A 23,23 0 0 1 24,47 23,23 0 0 1 1,24 23,23 0 0 1 24,1 23,23 0 0 1 47,24 Z");
	let b = path(
		"M 37.909023,24 A 13.909023,13.909023 0 0 1 24,37.909023 13.909023,13.909023 0 0 1 10.090978,24 13.909023,13.909023 0 0 1 24,10.090978 13.909023,13.909023 0 0 1 37.909023,24 Z",
	);
	let result = single(boolean(&a, &b, BooleanOp::Union));
	assert_eq!(result.len(), 1);
	assert_close(path_area(&result), path_area(&a).abs(), 1e-6);
}

#[test]
fn curve_with_small_circles() {
	init();
	let a = path("M 0.99999994,31.334457 C 122.61195,71.81859 -79.025816,-5.5803326 47,32.253367 V 46.999996 H 0.99999994 Z");
	let b = path(
		"m 25.797222,29.08718 c 0,1.292706 -1.047946,2.340652 -2.340652,2.340652 -1.292707,0 -2.340652,-1.047946 -2.340652,-2.340652 0,-1.292707 1.047945,-2.340652 2.340652,-2.340652 1.292706,0 2.340652,1.047945 2.340652,2.340652 z M 7.5851073,28.332212 c 1e-7,1.292706 -1.0479456,2.340652 -2.3406521,2.340652 -1.2927063,-1e-6 -2.3406518,-1.047946 -2.3406517,-2.340652 -10e-8,-1.292707 1.0479454,-2.340652 2.3406517,-2.340652 1.2927065,-1e-6 2.3406522,1.047945 2.3406521,2.340652 z",
	);
	assert_eq!(boolean(&a, &b, BooleanOp::Union).len(), 1);
}

#[test]
fn rectangle_and_ellipse() {
	init();
	let a = path("M 0,-10 C5.517848,-10 10,-5.517848 10,0 C10,5.517848 5.517848,10.000000 0.000000,10.000000 C-5.517848,10 -10,5.517848 -10,0 C-10,-5.517848 -5.517848,-10 0,-10");
	let b = path(
		"M-10,-10.438833C-10,-10.438833 10,-10.438833 10,-10.438833 C10,-10.438833 10,5.770318 10,5.770318 C10,5.770318 -10,5.770318 -10,5.770318 C-10,5.770318 -10,-10.438833 -10,-10.438833 Z",
	);
	assert_eq!(boolean(&a, &b, BooleanOp::Union).len(), 1);
}

#[test]
fn open_outline_touching_a_corner() {
	init();
	let a = path(
		"M969.000000,0.000000C969.000000,0.000000 1110.066898,76.934393 1085.000000,181.000000 C1052.000000,318.000000 1199.180581,334.301571 1277.000000,319.000000 C1455.000000,284.000000 1586.999985,81.000000 1418.000000,0.000000 C1418.000000,0.000000 969.000000,0.000000 969.000000,0.000000",
	);
	let b = path("M1211.000000,0.000000C1211.000000,0.000000 1255.000000,78.000000 1536.000000,95.000000 C1536.000000,95.000000 1536.000000,0.000000 1536.000000,0.000000 C1536.000000,0.000000 1211.000000,0.000000 1211.000000,0.000000 Z");
	assert_eq!(boolean(&a, &b, BooleanOp::Intersect).len(), 1);
}
