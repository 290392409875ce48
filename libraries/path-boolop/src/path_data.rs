use crate::error::PathDataError;
use crate::path::{PathVector, Subpath};
use crate::path_segment::{PathSegment, quadratic_to_cubic, to_dvec, to_point};
use glam::DVec2;
use regex::Regex;
use std::fmt::Write;
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?P<command>[MmLlHhVvCcSsQqTtAaZz])|(?P<number>[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)|(?P<separator>[\s,]+)").expect("path data token pattern is valid")
});

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
	Command(char, usize),
	Number(f64, usize),
}

fn tokenize(data: &str) -> Result<Vec<Token>, PathDataError> {
	let unexpected = |offset: usize| PathDataError::UnexpectedCharacter {
		character: data[offset..].chars().next().unwrap_or_default(),
		offset,
	};

	let mut tokens = Vec::new();
	let mut expected = 0;
	for captures in TOKEN.captures_iter(data) {
		let Some(whole) = captures.get(0) else { continue };
		if whole.start() != expected {
			return Err(unexpected(expected));
		}
		expected = whole.end();

		if let Some(command) = captures.name("command") {
			tokens.push(Token::Command(command.as_str().chars().next().unwrap_or_default(), command.start()));
		} else if let Some(number) = captures.name("number") {
			let value = number.as_str().parse().map_err(|_| unexpected(number.start()))?;
			tokens.push(Token::Number(value, number.start()));
		}
	}
	if expected != data.len() {
		return Err(unexpected(expected));
	}
	Ok(tokens)
}

fn arity(command: char) -> usize {
	match command.to_ascii_uppercase() {
		'M' | 'L' | 'T' => 2,
		'H' | 'V' => 1,
		'S' | 'Q' => 4,
		'C' => 6,
		'A' => 7,
		_ => 0,
	}
}

#[derive(Default)]
struct PathBuilder {
	path: PathVector,
	segments: Vec<PathSegment>,
	start: DVec2,
	current: DVec2,
	previous_cubic_control: Option<DVec2>,
	previous_quadratic_control: Option<DVec2>,
}

impl PathBuilder {
	fn finish_subpath(&mut self, closed: bool) {
		if !self.segments.is_empty() {
			self.path.push(Subpath::new(std::mem::take(&mut self.segments), closed));
		}
	}

	fn move_to(&mut self, point: DVec2) {
		self.finish_subpath(false);
		self.start = point;
		self.current = point;
	}

	fn push(&mut self, segment: PathSegment) {
		self.current = segment.end();
		self.segments.push(segment);
	}

	fn line_to(&mut self, point: DVec2) {
		self.push(PathSegment::Line(self.current, point));
	}

	fn cubic_to(&mut self, control1: DVec2, control2: DVec2, end: DVec2) {
		self.push(PathSegment::Cubic(self.current, control1, control2, end));
		self.previous_cubic_control = Some(control2);
	}

	fn quadratic_to(&mut self, control: DVec2, end: DVec2) {
		let [start, control1, control2, end] = quadratic_to_cubic(self.current, control, end);
		self.push(PathSegment::Cubic(start, control1, control2, end));
		self.previous_quadratic_control = Some(control);
	}

	fn arc_to(&mut self, radii: DVec2, x_rotation: f64, large_arc: bool, sweep: bool, end: DVec2) {
		let arc = kurbo::SvgArc {
			from: to_point(self.current),
			to: to_point(end),
			radii: kurbo::Vec2::new(radii.x.abs(), radii.y.abs()),
			x_rotation: x_rotation.to_radians(),
			large_arc,
			sweep,
		};
		let Some(arc) = kurbo::Arc::from_svg_arc(&arc) else {
			self.line_to(end);
			return;
		};

		let tolerance = (arc.radii.x.max(arc.radii.y) * 1e-6).max(1e-9);
		let mut cubics = Vec::new();
		arc.to_cubic_beziers(tolerance, |control1, control2, point| cubics.push([to_dvec(control1), to_dvec(control2), to_dvec(point)]));
		if let Some(last) = cubics.last_mut() {
			last[2] = end;
		}
		for [control1, control2, point] in cubics {
			self.push(PathSegment::Cubic(self.current, control1, control2, point));
		}
	}

	fn close(&mut self) {
		if !self.segments.is_empty() && self.current != self.start {
			self.line_to(self.start);
		}
		self.finish_subpath(true);
		self.current = self.start;
	}

	fn finish(mut self) -> PathVector {
		self.finish_subpath(false);
		self.path
	}
}

/// Reads SVG path data into lines and cubics. Quadratic curves and elliptical arcs are converted to cubics.
pub fn path_from_path_data(data: &str) -> Result<PathVector, PathDataError> {
	let tokens = tokenize(data)?;
	let mut builder = PathBuilder::default();

	let mut index = 0;
	let mut previous: Option<char> = None;
	while index < tokens.len() {
		let command = match tokens[index] {
			Token::Command(command, _) => {
				index += 1;
				command
			}
			Token::Number(_, offset) => match previous {
				Some('M') => 'L',
				Some('m') => 'l',
				Some(command) if arity(command) > 0 => command,
				_ => {
					return Err(PathDataError::UnexpectedCharacter {
						character: data[offset..].chars().next().unwrap_or_default(),
						offset,
					});
				}
			},
		};
		if previous.is_none() && !matches!(command, 'M' | 'm') {
			return Err(PathDataError::MissingMoveTo { command });
		}

		let count = arity(command);
		let mut arguments = [0.; 7];
		for argument in arguments.iter_mut().take(count) {
			match tokens.get(index) {
				Some(&Token::Number(value, _)) => *argument = value,
				Some(&Token::Command(_, offset)) => return Err(PathDataError::MissingNumber { command, offset }),
				None => return Err(PathDataError::MissingNumber { command, offset: data.len() }),
			}
			index += 1;
		}

		let base = if command.is_ascii_lowercase() { builder.current } else { DVec2::ZERO };
		let point = |i: usize| base + DVec2::new(arguments[i], arguments[i + 1]);
		let previous_cubic_control = builder.previous_cubic_control.take();
		let previous_quadratic_control = builder.previous_quadratic_control.take();

		match command.to_ascii_uppercase() {
			'M' => builder.move_to(point(0)),
			'L' => builder.line_to(point(0)),
			'H' => builder.line_to(DVec2::new(arguments[0] + base.x, builder.current.y)),
			'V' => builder.line_to(DVec2::new(builder.current.x, arguments[0] + base.y)),
			'C' => builder.cubic_to(point(0), point(2), point(4)),
			'S' => {
				let reflected = previous_cubic_control.map_or(builder.current, |control| 2. * builder.current - control);
				builder.cubic_to(reflected, point(0), point(2));
			}
			'Q' => builder.quadratic_to(point(0), point(2)),
			'T' => {
				let reflected = previous_quadratic_control.map_or(builder.current, |control| 2. * builder.current - control);
				builder.quadratic_to(reflected, point(0));
			}
			'A' => builder.arc_to(DVec2::new(arguments[0], arguments[1]), arguments[2], arguments[3] != 0., arguments[4] != 0., point(5)),
			_ => builder.close(),
		}
		previous = Some(command);
	}

	Ok(builder.finish())
}

fn write_point(output: &mut String, point: DVec2) {
	let _ = write!(output, " {},{}", point.x, point.y);
}

/// Writes a path vector as SVG path data with absolute commands.
///
/// A closed subpath that returns to its start along a straight line is written with `Z` in place of that line.
pub fn path_to_path_data(path: &PathVector) -> String {
	let mut output = String::new();
	for subpath in path.iter().filter(|subpath| !subpath.is_empty()) {
		let Some(start) = subpath.start() else { continue };
		if !output.is_empty() {
			output.push(' ');
		}
		output.push('M');
		write_point(&mut output, start);

		let mut segments = subpath.segments.as_slice();
		if subpath.closed {
			if let [rest @ .., PathSegment::Line(_, end)] = segments {
				if *end == start && !rest.is_empty() {
					segments = rest;
				}
			}
		}

		for segment in segments {
			match *segment {
				PathSegment::Line(_, end) => {
					output.push_str(" L");
					write_point(&mut output, end);
				}
				PathSegment::Cubic(_, control1, control2, end) => {
					output.push_str(" C");
					write_point(&mut output, control1);
					write_point(&mut output, control2);
					write_point(&mut output, end);
				}
			}
		}
		if subpath.closed {
			output.push_str(" Z");
		}
	}
	output
}
