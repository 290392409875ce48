/// Numerical tolerances shared by every stage of a boolean operation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Epsilons {
	/// Absolute distance below which two points are the same arrangement vertex.
	pub point: f64,
	/// Bounding box extent below which a curve piece is treated as straight while intersecting curves.
	pub linear: f64,
	/// Parametric distance from 0 or 1 within which a split time is considered an existing endpoint.
	pub param: f64,
}

pub static EPS: Epsilons = Epsilons {
	point: 1e-6,
	linear: 1e-4,
	param: 1e-6,
};

impl Default for Epsilons {
	fn default() -> Self {
		EPS
	}
}

/// Default fraction of a curve piece's control polygon length that a flattened chord may deviate from the curve.
pub const RELATIVE_THRESHOLD: f64 = 0.002;

/// Tuning knobs for a boolean request.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BooleanOptions {
	pub epsilons: Epsilons,
	pub relative_threshold: f64,
}

impl Default for BooleanOptions {
	fn default() -> Self {
		Self {
			epsilons: EPS,
			relative_threshold: RELATIVE_THRESHOLD,
		}
	}
}
