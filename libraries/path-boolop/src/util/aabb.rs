use glam::{BVec2, DVec2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
	min: DVec2,
	max: DVec2,
}

impl Default for Aabb {
	fn default() -> Self {
		Self {
			min: DVec2::INFINITY,
			max: DVec2::NEG_INFINITY,
		}
	}
}

impl Aabb {
	#[inline]
	pub fn min(&self) -> DVec2 {
		self.min
	}
	#[inline]
	pub fn max(&self) -> DVec2 {
		self.max
	}

	#[inline]
	pub fn from_points(a: DVec2, b: DVec2) -> Self {
		Aabb { min: a.min(b), max: a.max(b) }
	}

	pub fn around_points(points: impl IntoIterator<Item = DVec2>) -> Self {
		points.into_iter().fold(Aabb::default(), |bounding_box, point| Aabb {
			min: bounding_box.min.min(point),
			max: bounding_box.max.max(point),
		})
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.min.cmpgt(self.max).any()
	}

	#[inline]
	pub fn contains(&self, point: DVec2) -> bool {
		(self.min.cmple(point) & point.cmple(self.max)) == BVec2::TRUE
	}
}

#[inline]
pub(crate) fn bounding_boxes_overlap(a: &Aabb, b: &Aabb) -> bool {
	(a.min.cmple(b.max) & b.min.cmple(a.max)) == BVec2::TRUE
}

pub(crate) fn bounding_box_max_extent(bounding_box: &Aabb) -> f64 {
	(bounding_box.max - bounding_box.min).max_element()
}

pub(crate) fn expand_bounding_box(bounding_box: &Aabb, padding: f64) -> Aabb {
	Aabb {
		min: bounding_box.min - DVec2::splat(padding),
		max: bounding_box.max + DVec2::splat(padding),
	}
}

/// Whether the segment `a`-`b` touches the box, by clipping the segment's parameter range against each slab.
pub(crate) fn line_segment_aabb_intersect([a, b]: [DVec2; 2], bounding_box: &Aabb) -> bool {
	if bounding_box.contains(a) || bounding_box.contains(b) {
		return true;
	}

	let direction = b - a;
	let mut t_min = 0_f64;
	let mut t_max = 1_f64;

	for axis in 0..2 {
		let (origin, delta, low, high) = (a[axis], direction[axis], bounding_box.min[axis], bounding_box.max[axis]);
		if delta == 0. {
			if origin < low || origin > high {
				return false;
			}
			continue;
		}
		let (mut t0, mut t1) = ((low - origin) / delta, (high - origin) / delta);
		if t0 > t1 {
			std::mem::swap(&mut t0, &mut t1);
		}
		t_min = t_min.max(t0);
		t_max = t_max.min(t1);
		if t_min > t_max {
			return false;
		}
	}

	true
}
