//! Planar arrangements: vertices joined by directed edges that only meet at shared vertices once uncrossed.

mod builder;
mod faces;

pub(crate) use builder::ArrangementBuilder;
pub(crate) use faces::edge_windings;

use crate::discretize::BackRef;
use glam::DVec2;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Which of the two operands of a combination an edge belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
	A,
	B,
}

impl Slot {
	pub fn bit(self) -> u8 {
		match self {
			Slot::A => 0b01,
			Slot::B => 0b10,
		}
	}
}

/// Winding contribution of an edge, or winding number of a face, counted separately for each operand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Winding {
	pub a: i32,
	pub b: i32,
}

impl Winding {
	pub const ZERO: Winding = Winding { a: 0, b: 0 };

	pub fn unit(slot: Slot) -> Self {
		Self::ZERO.with(slot, 1)
	}

	pub fn get(self, slot: Slot) -> i32 {
		match slot {
			Slot::A => self.a,
			Slot::B => self.b,
		}
	}

	pub fn with(self, slot: Slot, value: i32) -> Self {
		match slot {
			Slot::A => Winding { a: value, ..self },
			Slot::B => Winding { b: value, ..self },
		}
	}

	/// Moves the count of slot A into `slot`.
	pub fn moved_to(self, slot: Slot) -> Self {
		Self::ZERO.with(slot, self.a)
	}
}

impl Add for Winding {
	type Output = Winding;
	fn add(self, rhs: Self) -> Self::Output {
		Winding { a: self.a + rhs.a, b: self.b + rhs.b }
	}
}

impl AddAssign for Winding {
	fn add_assign(&mut self, rhs: Self) {
		*self = *self + rhs;
	}
}

impl Sub for Winding {
	type Output = Winding;
	fn sub(self, rhs: Self) -> Self::Output {
		Winding { a: self.a - rhs.a, b: self.b - rhs.b }
	}
}

impl SubAssign for Winding {
	fn sub_assign(&mut self, rhs: Self) {
		*self = *self - rhs;
	}
}

impl Neg for Winding {
	type Output = Winding;
	fn neg(self) -> Self::Output {
		Winding { a: -self.a, b: -self.b }
	}
}

impl Mul<i32> for Winding {
	type Output = Winding;
	fn mul(self, rhs: i32) -> Self::Output {
		Winding { a: self.a * rhs, b: self.b * rhs }
	}
}

/// A directed edge between two vertices.
///
/// The winding number of the face on the left exceeds the one on the right by `winding`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Edge {
	pub start: usize,
	pub end: usize,
	pub winding: Winding,
	/// Bit set of the [`Slot`]s whose input produced this edge.
	pub operands: u8,
	pub back: Option<BackRef>,
}

impl Edge {
	pub fn reversed(&self) -> Edge {
		Edge {
			start: self.end,
			end: self.start,
			winding: -self.winding,
			operands: self.operands,
			back: self.back.map(BackRef::reversed),
		}
	}

	pub fn has_operand(&self, slot: Slot) -> bool {
		self.operands & slot.bit() != 0
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ArrangementState {
	/// Edges straight from the input; they may cross and vertices may repeat.
	Raw,
	/// Coincident vertices merged, crossings split and duplicate edges merged.
	Uncrossed,
	/// Uncrossed, and every edge separates a filled face on its left from an empty face on its right.
	Normalized,
}

#[derive(Clone, Debug)]
pub(crate) struct Arrangement {
	pub vertices: Vec<DVec2>,
	pub edges: Vec<Edge>,
	pub state: ArrangementState,
}

impl Arrangement {
	pub fn empty(state: ArrangementState) -> Self {
		Self {
			vertices: Vec::new(),
			edges: Vec::new(),
			state,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.edges.is_empty()
	}

	pub fn edge_points(&self, edge: &Edge) -> [DVec2; 2] {
		[self.vertices[edge.start], self.vertices[edge.end]]
	}
}
