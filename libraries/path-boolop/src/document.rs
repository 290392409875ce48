//! Running boolean operations on the items of a document, where operands carry a transform, a z-order and attributes
//! that the results inherit.

use crate::boolean::{BooleanOp, FillRule, Operand, path_boolean_many};
use crate::epsilons::EPS;
use crate::error::BooleanError;
use crate::path::{PathVector, path_transform};
use glam::DAffine2;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::iter::successors;

pub type NodeId = u64;

pub type Attributes = BTreeMap<String, String>;

/// Attributes a result takes over from its source item, besides every `on*` event handler.
const COPIED_ATTRIBUTES: [&str; 11] = [
	"id",
	"clip-path",
	"mask",
	"style",
	"class",
	"inkscape:label",
	"inkscape:highlight-color",
	"inkscape:transform-center-x",
	"inkscape:transform-center-y",
	"transform",
	"inkscape:path-effect",
];

const COPIED_CHILDREN: [&str; 2] = ["title", "desc"];

/// A child element holding text, such as a title or description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DescriptiveChild {
	pub tag: String,
	pub text: String,
}

impl DescriptiveChild {
	pub fn new(tag: impl Into<String>, text: impl Into<String>) -> Self {
		Self { tag: tag.into(), text: text.into() }
	}
}

pub trait SceneItem {
	/// The outline in item coordinates, or `None` for items that are not shapes.
	fn path(&self) -> Option<PathVector>;
	fn fill_rule(&self) -> FillRule;
	/// Maps item coordinates to document coordinates.
	fn transform(&self) -> DAffine2;
	fn attributes(&self) -> &Attributes;
	fn children(&self) -> &[DescriptiveChild];
}

pub trait DocumentTree {
	type Item: SceneItem;

	fn item(&self, id: NodeId) -> Option<&Self::Item>;
	fn parent(&self, id: NodeId) -> Option<NodeId>;
	/// Children of a node from bottom to top.
	fn children(&self, id: NodeId) -> &[NodeId];

	fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
		successors(self.parent(node), |&id| self.parent(id)).any(|id| id == ancestor)
	}

	fn lowest_common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
		let ancestors_of_a: Vec<NodeId> = successors(self.parent(a), |&id| self.parent(id)).collect();
		successors(self.parent(b), |&id| self.parent(id)).find(|id| ancestors_of_a.contains(id))
	}

	/// The child of `ancestor` on the way down to `node`.
	fn containing_child(&self, node: NodeId, ancestor: NodeId) -> Option<NodeId> {
		successors(Some(node), |&id| self.parent(id)).find(|&id| self.parent(id) == Some(ancestor))
	}

	/// `Greater` when `a` is drawn above `b`. Descendants are above their ancestors.
	fn z_order(&self, a: NodeId, b: NodeId) -> Option<Ordering> {
		if a == b {
			return Some(Ordering::Equal);
		}
		if self.is_descendant_of(a, b) {
			return Some(Ordering::Greater);
		}
		if self.is_descendant_of(b, a) {
			return Some(Ordering::Less);
		}

		let parent = self.lowest_common_ancestor(a, b)?;
		let children = self.children(parent);
		let position = |node: NodeId| self.containing_child(node, parent).and_then(|child| children.iter().position(|&id| id == child));
		Some(position(a)?.cmp(&position(b)?))
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BooleanRequest {
	pub operation: BooleanOp,
	/// Leave recording the change to the caller.
	pub skip_undo: bool,
	/// Do not report failures to the user.
	pub silent: bool,
}

impl BooleanRequest {
	pub fn new(operation: BooleanOp) -> Self {
		Self {
			operation,
			skip_undo: false,
			silent: false,
		}
	}
}

/// The application around the document.
pub trait BooleanHost {
	fn commit_undo(&mut self, description: &str, icon: &str);
	fn flash_error(&mut self, message: &str);
}

/// A path item to be created in place of the source item.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputShape {
	/// In the coordinates of the source item, to be placed under its transform.
	pub path: PathVector,
	pub attributes: Attributes,
	pub children: Vec<DescriptiveChild>,
	pub keeps_source_id: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BooleanOutcome {
	/// Every operand is removed and the outputs are inserted at the position of `source`.
	Replaced { source: NodeId, removed: Vec<NodeId>, outputs: Vec<OutputShape> },
	/// The result was empty, so the operands are removed with nothing in their place.
	Deleted { removed: Vec<NodeId> },
}

impl BooleanOp {
	pub fn undo_description(self) -> &'static str {
		match self {
			BooleanOp::Union => "Union",
			BooleanOp::Intersect => "Intersection",
			BooleanOp::Diff => "Difference",
			BooleanOp::SymDiff => "Exclusion",
			BooleanOp::Cut => "Division",
			BooleanOp::Slice => "Cut path",
		}
	}

	pub fn icon_name(self) -> &'static str {
		match self {
			BooleanOp::Union => "path-union",
			BooleanOp::Intersect => "path-intersection",
			BooleanOp::Diff => "path-difference",
			BooleanOp::SymDiff => "path-exclusion",
			BooleanOp::Cut => "path-division",
			BooleanOp::Slice => "path-cut",
		}
	}
}

/// Runs `request` on the document items `items`, reporting the outcome to `host`.
///
/// For difference, division and cut the lower item is the source and the upper one the operand taken away from or cut
/// across it. For the other operations the lowest item is the source whose attributes the result inherits.
pub fn perform_boolean<T: DocumentTree>(tree: &T, items: &[NodeId], request: BooleanRequest, host: &mut impl BooleanHost) -> Result<BooleanOutcome, BooleanError> {
	let operation = request.operation;
	let outcome = apply(tree, items, operation);

	match &outcome {
		Ok(_) if !request.skip_undo => host.commit_undo(operation.undo_description(), operation.icon_name()),
		Ok(_) => {}
		Err(error) => {
			log::warn!("Could not perform {operation}: {error}");
			if !request.silent {
				host.flash_error(&error.to_string());
			}
		}
	}
	outcome
}

fn apply<T: DocumentTree>(tree: &T, items: &[NodeId], operation: BooleanOp) -> Result<BooleanOutcome, BooleanError> {
	operation.validate_operand_count(items.len())?;

	// Paths in document coordinates
	let mut shapes = items
		.iter()
		.enumerate()
		.map(|(index, &id)| {
			let item = tree.item(id).ok_or(BooleanError::NonShapeOperand { index })?;
			let path = item.path().map(|path| path_transform(&path, item.transform())).filter(has_geometry);
			let path = path.ok_or(BooleanError::NonShapeOperand { index })?;
			Ok((id, item, path))
		})
		.collect::<Result<Vec<_>, BooleanError>>()?;

	let source_index = if operation.is_ordered() {
		match tree.z_order(shapes[0].0, shapes[1].0) {
			Some(Ordering::Greater) => shapes.swap(0, 1),
			Some(_) => {}
			None => return Err(BooleanError::UnrelatedOperands),
		}
		0
	} else {
		(0..shapes.len())
			.reduce(|lowest, index| if tree.z_order(shapes[index].0, shapes[lowest].0) == Some(Ordering::Less) { index } else { lowest })
			.unwrap_or_default()
	};

	let operands: Vec<Operand> = shapes
		.iter()
		.map(|(_, item, path)| {
			let fill_rule = match item.fill_rule() {
				FillRule::EvenOdd => FillRule::EvenOdd,
				_ => FillRule::NonZero,
			};
			Operand::new(path.clone(), fill_rule)
		})
		.collect();
	let paths: Vec<PathVector> = path_boolean_many(&operands, operation)?.into_iter().filter(|path| !path.is_empty()).collect();

	let removed = items.to_vec();
	if paths.is_empty() {
		return Ok(BooleanOutcome::Deleted { removed });
	}

	let (source, item, _) = &shapes[source_index];
	let inverse = item.transform().inverse();
	let (attributes, children) = copy_object_properties(*item);

	let last = paths.len() - 1;
	let outputs = paths
		.into_iter()
		.enumerate()
		.map(|(index, path)| {
			let keeps_source_id = index == last;
			let mut attributes = attributes.clone();
			if !keeps_source_id {
				attributes.remove("id");
			}
			if operation == BooleanOp::Slice {
				let style = attributes.get("style").map(String::as_str).unwrap_or_default();
				let style = set_style_property(style, "fill", "none");
				attributes.insert("style".to_string(), style);
			}
			OutputShape {
				path: path_transform(&path, inverse),
				attributes,
				children: children.clone(),
				keeps_source_id,
			}
		})
		.collect();

	Ok(BooleanOutcome::Replaced { source: *source, removed, outputs })
}

/// Whether any segment of the path has extent.
fn has_geometry(path: &PathVector) -> bool {
	path.iter().flat_map(|subpath| subpath.segments.iter()).any(|segment| !segment.is_degenerate(EPS.point))
}

/// The attributes and descriptive children a result takes over from `source`, copied verbatim.
pub fn copy_object_properties(source: &impl SceneItem) -> (Attributes, Vec<DescriptiveChild>) {
	let attributes = source
		.attributes()
		.iter()
		.filter(|(name, _)| COPIED_ATTRIBUTES.contains(&name.as_str()) || name.starts_with("on"))
		.map(|(name, value)| (name.clone(), value.clone()))
		.collect();
	let children = source.children().iter().filter(|child| COPIED_CHILDREN.contains(&child.tag.as_str())).cloned().collect();
	(attributes, children)
}

/// Sets one property of an inline style declaration list, keeping the others in place.
pub fn set_style_property(style: &str, name: &str, value: &str) -> String {
	let mut found = false;
	let mut declarations: Vec<String> = style
		.split(';')
		.map(str::trim)
		.filter(|declaration| !declaration.is_empty())
		.map(|declaration| match declaration.split_once(':') {
			Some((property, _)) if property.trim() == name => {
				found = true;
				format!("{name}:{value}")
			}
			_ => declaration.to_string(),
		})
		.collect();
	if !found {
		declarations.push(format!("{name}:{value}"));
	}
	declarations.join(";")
}
