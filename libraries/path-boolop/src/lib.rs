mod arrangement;
mod boolean;
mod combinator;
mod discretize;
pub mod document;
mod epsilons;
mod error;
mod fill;
mod intersection_path_segment;
mod outline;
mod path;
#[cfg(feature = "parsing")]
mod path_data;
mod path_segment;
mod slice;
mod util;

pub use boolean::{
	BooleanOp, FillRule, Operand, flattened, flattened_with_options, path_boolean, path_boolean_many, path_boolean_many_with_options, path_boolean_with_options, pathvector_cut, pathvector_cut_with_options,
};
pub use epsilons::{BooleanOptions, EPS, Epsilons, RELATIVE_THRESHOLD};
pub use error::{BooleanError, PathDataError};
pub use intersection_path_segment::{path_cubic_segment_self_intersection, path_segment_intersection, segments_equal};
pub use path::intersections::{PathVectorTime, pathvector_intersections, pathvector_self_intersections};
pub use path::{PathVector, Subpath, path_area, path_reversed, path_segment_count, path_transform, polygon, polyline};
#[cfg(feature = "parsing")]
pub use path_data::{path_from_path_data, path_to_path_data};
pub use path_segment::PathSegment;
pub use util::aabb::Aabb;
