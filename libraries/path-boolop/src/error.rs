use crate::boolean::BooleanOp;

use thiserror::Error;

/// Reasons a boolean request is rejected before any geometry is computed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BooleanError {
	#[error("Select at least {minimum} paths to perform {operation} ({found} selected)")]
	InsufficientOperands { operation: BooleanOp, minimum: usize, found: usize },

	#[error("Select exactly {expected} paths to perform {operation} ({found} selected)")]
	UnexpectedOperandCount { operation: BooleanOp, expected: usize, found: usize },

	#[error("One of the objects is not a path, cannot perform boolean operation (item {index})")]
	NonShapeOperand { index: usize },

	#[error("The selected paths do not share a common parent, cannot tell which one is on top")]
	UnrelatedOperands,
}

/// Problems found while reading path data text.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PathDataError {
	#[error("Unexpected character {character:?} at offset {offset}")]
	UnexpectedCharacter { character: char, offset: usize },

	#[error("Command {command} at offset {offset} is missing a number")]
	MissingNumber { command: char, offset: usize },

	#[error("Path data must begin with a move-to command, found {command}")]
	MissingMoveTo { command: char },
}

/// A subpath that produced no usable edge while flattening and was left out of the operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DegenerateCurve {
	pub path_id: usize,
	pub subpath: usize,
}

impl std::fmt::Display for DegenerateCurve {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Subpath {} of operand {} has no length and was skipped", self.subpath, self.path_id)
	}
}
