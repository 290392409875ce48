use crate::util::aabb::Aabb;
use glam::{DVec2, IVec2};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Uniform spatial hash over edge bounding boxes, used as the broad phase of crossing detection.
pub(crate) struct Grid {
	cell_factor: f64,
	cells: FxHashMap<IVec2, SmallVec<[usize; 6]>>,
}

impl Grid {
	pub(crate) fn new(cell_size: f64, edges: usize) -> Self {
		Grid {
			cell_factor: cell_size.recip(),
			cells: FxHashMap::with_capacity_and_hasher(edges, Default::default()),
		}
	}

	/// Picks a cell size from the average extent of the boxes that will be inserted.
	pub(crate) fn for_boxes(boxes: &[Aabb]) -> Self {
		let total: f64 = boxes.iter().map(|bbox| (bbox.max() - bbox.min()).max_element()).sum();
		let average = if boxes.is_empty() { 1. } else { total / boxes.len() as f64 };
		let cell_size = if average.is_finite() && average > 0. { average * 2. } else { 1. };
		Grid::new(cell_size, boxes.len())
	}

	pub(crate) fn insert(&mut self, bbox: &Aabb, index: usize) {
		let min_cell = self.point_to_cell_floor(bbox.min());
		let max_cell = self.point_to_cell_ceil(bbox.max());

		for i in min_cell.x..=max_cell.x {
			for j in min_cell.y..=max_cell.y {
				self.cells.entry((i, j).into()).or_default().push(index);
			}
		}
	}

	pub(crate) fn query(&self, bbox: &Aabb, result: &mut BitVec) {
		let min_cell = self.point_to_cell_floor(bbox.min());
		let max_cell = self.point_to_cell_ceil(bbox.max());

		for i in min_cell.x..=max_cell.x {
			for j in min_cell.y..=max_cell.y {
				if let Some(indices) = self.cells.get(&(i, j).into()) {
					for &index in indices {
						result.set(index);
					}
				}
			}
		}
	}

	fn point_to_cell_ceil(&self, point: DVec2) -> IVec2 {
		(point * self.cell_factor).ceil().as_ivec2()
	}
	fn point_to_cell_floor(&self, point: DVec2) -> IVec2 {
		(point * self.cell_factor).floor().as_ivec2()
	}
}

pub(crate) struct BitVec {
	data: Vec<u64>,
}

impl BitVec {
	pub(crate) fn new(capacity: usize) -> Self {
		let num_words = capacity.div_ceil(64);
		BitVec { data: vec![0; num_words] }
	}

	pub(crate) fn set(&mut self, index: usize) {
		let word_index = index / 64;
		let bit_index = index % 64;
		self.data[word_index] |= 1u64 << bit_index;
	}

	pub(crate) fn clear(&mut self) {
		self.data.fill(0);
	}

	pub(crate) fn iter_set_bits(&self) -> BitVecIterator<'_> {
		BitVecIterator {
			bit_vec: self,
			current_word: self.data.first().copied().unwrap_or(0),
			word_index: 0,
		}
	}
}

pub(crate) struct BitVecIterator<'a> {
	bit_vec: &'a BitVec,
	current_word: u64,
	word_index: usize,
}

impl Iterator for BitVecIterator<'_> {
	type Item = usize;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			if self.current_word == 0 {
				self.word_index += 1;
				if self.word_index >= self.bit_vec.data.len() {
					return None;
				}
				self.current_word = self.bit_vec.data[self.word_index];
				continue;
			}
			let tz = self.current_word.trailing_zeros() as usize;
			self.current_word ^= 1 << tz;

			return Some(self.word_index * 64 + tz);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bitvec_iterates_set_bits_in_order() {
		let mut bv = BitVec::new(200);
		bv.set(5);
		bv.set(64);
		bv.set(128);
		bv.set(199);

		let set_bits: Vec<usize> = bv.iter_set_bits().collect();
		assert_eq!(set_bits, vec![5, 64, 128, 199]);

		bv.clear();
		assert_eq!(bv.iter_set_bits().count(), 0);
	}

	#[test]
	fn empty_bitvec() {
		let bv = BitVec::new(0);
		assert_eq!(bv.iter_set_bits().next(), None);
	}

	#[test]
	fn grid_finds_overlapping_boxes() {
		let boxes = [
			Aabb::from_points(DVec2::new(0., 0.), DVec2::new(1., 1.)),
			Aabb::from_points(DVec2::new(0.5, 0.5), DVec2::new(2., 2.)),
			Aabb::from_points(DVec2::new(10., 10.), DVec2::new(11., 11.)),
		];
		let mut grid = Grid::for_boxes(&boxes);
		for (index, bbox) in boxes.iter().enumerate() {
			grid.insert(bbox, index);
		}

		let mut candidates = BitVec::new(boxes.len());
		grid.query(&boxes[0], &mut candidates);
		let found: Vec<usize> = candidates.iter_set_bits().collect();
		assert!(found.contains(&0));
		assert!(found.contains(&1));
		assert!(!found.contains(&2));
	}
}
