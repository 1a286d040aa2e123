//! Chord layout engine: converts the adjacency matrix into angular geometry
//! on a circle of circumference 2π. Angles are in radians, zero at twelve
//! o'clock, increasing clockwise; the renderer owns the radius.

use std::cmp::Ordering;
use std::f64::consts::TAU;

use super::matrix::Matrix;

/// Ordering policy for groups, subgroups and chord draw order.
/// `Descending` is a total order: ties on equal values fall back to the
/// original matrix index, so layouts are reproducible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortPolicy {
	/// Keep matrix row/column order.
	#[default]
	MatrixOrder,
	/// Heaviest first, ties by original index.
	Descending,
}

/// Layout knobs. The defaults mirror the reference diagram: a 0.02 rad gap
/// between arcs, subgroups and chords heaviest-first, groups in matrix order.
#[derive(Clone, Copy, Debug)]
pub struct LayoutConfig {
	pub pad_angle: f64,
	pub sort_groups: SortPolicy,
	pub sort_subgroups: SortPolicy,
	pub sort_chords: SortPolicy,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			pad_angle: 0.02,
			sort_groups: SortPolicy::MatrixOrder,
			sort_subgroups: SortPolicy::Descending,
			sort_chords: SortPolicy::Descending,
		}
	}
}

/// Half-open angular interval on the circle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ArcSpan {
	pub start: f64,
	pub end: f64,
}

impl ArcSpan {
	pub fn mid(&self) -> f64 {
		(self.start + self.end) / 2.0
	}

	pub fn contains(&self, angle: f64) -> bool {
		angle >= self.start && angle < self.end
	}
}

/// One entity's arc. `index` points back into the label map; `value` is the
/// row sum the span was sized from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Group {
	pub index: usize,
	pub span: ArcSpan,
	pub value: f64,
}

/// The sub-segment of group `index`'s arc dedicated to its relationship
/// with group `subindex`, sized by `value = matrix[index][subindex]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Subgroup {
	pub index: usize,
	pub subindex: usize,
	pub span: ArcSpan,
	pub value: f64,
}

/// One directed relationship drawn as a ribbon. `source` is the i -> j
/// subgroup, `target` the j -> i subgroup, so both direction weights travel
/// with the chord (the tooltip reports both).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Chord {
	pub source: Subgroup,
	pub target: Subgroup,
}

impl Chord {
	/// Whether either endpoint lies on the given group.
	pub fn touches(&self, group: usize) -> bool {
		self.source.index == group || self.target.index == group
	}

	fn sort_key(&self) -> f64 {
		(self.source.value + self.target.value) / 2.0
	}
}

/// Arc and chord geometry derived deterministically from one matrix.
/// Groups are indexed by original matrix index; chords are in draw order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChordLayout {
	pub groups: Vec<Group>,
	pub chords: Vec<Chord>,
}

fn order_indices(n: usize, values: impl Fn(usize) -> f64, policy: SortPolicy) -> Vec<usize> {
	let mut order: Vec<usize> = (0..n).collect();
	if policy == SortPolicy::Descending {
		order.sort_by(|&a, &b| {
			values(b)
				.partial_cmp(&values(a))
				.unwrap_or(Ordering::Equal)
				.then(a.cmp(&b))
		});
	}
	order
}

impl ChordLayout {
	/// Computes group spans, subgroup spans and chords for one matrix.
	///
	/// Each group's span is proportional to its row-sum share of the total
	/// weight; a fixed pad separates consecutive groups, carved out of the
	/// circumference so that span sum plus pad sum equals exactly 2π.
	/// A zero total weight short-circuits to zero-length spans instead of
	/// dividing by zero.
	pub fn compute(matrix: &Matrix, config: &LayoutConfig) -> Self {
		let n = matrix.dim();
		if n == 0 {
			return Self::default();
		}

		let row_sums: Vec<f64> = (0..n).map(|i| matrix.row_sum(i)).collect();
		let total: f64 = row_sums.iter().sum();

		// n pads must never eat more than the full circle.
		let pad = config.pad_angle.min(TAU / n as f64);
		let unit = if total > 0.0 {
			(TAU - pad * n as f64) / total
		} else {
			0.0
		};

		let group_order = order_indices(n, |i| row_sums[i], config.sort_groups);

		let mut groups = vec![
			Group {
				index: 0,
				span: ArcSpan::default(),
				value: 0.0,
			};
			n
		];
		let mut subgroups = vec![ArcSpan::default(); n * n];

		let mut x = 0.0;
		for &i in &group_order {
			let start = x;
			for j in order_indices(n, |j| matrix.get(i, j), config.sort_subgroups) {
				let end = x + matrix.get(i, j) * unit;
				subgroups[i * n + j] = ArcSpan { start: x, end };
				x = end;
			}
			groups[i] = Group {
				index: i,
				span: ArcSpan { start, end: x },
				value: row_sums[i],
			};
			x += pad;
		}

		let mut chords = Vec::new();
		for i in 0..n {
			for j in 0..n {
				let value = matrix.get(i, j);
				if value == 0.0 {
					continue;
				}
				chords.push(Chord {
					source: Subgroup {
						index: i,
						subindex: j,
						span: subgroups[i * n + j],
						value,
					},
					target: Subgroup {
						index: j,
						subindex: i,
						span: subgroups[j * n + i],
						value: matrix.get(j, i),
					},
				});
			}
		}
		if config.sort_chords == SortPolicy::Descending {
			chords.sort_by(|a, b| {
				b.sort_key()
					.partial_cmp(&a.sort_key())
					.unwrap_or(Ordering::Equal)
					.then((a.source.index, a.source.subindex).cmp(&(b.source.index, b.source.subindex)))
			});
		}

		Self { groups, chords }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPS: f64 = 1e-9;

	fn two_by_two() -> Matrix {
		Matrix::from_rows(vec![vec![0.0, 3.0], vec![5.0, 0.0]]).unwrap()
	}

	#[test]
	fn spans_plus_padding_cover_the_circle() {
		let matrix = two_by_two();
		let config = LayoutConfig::default();
		let layout = ChordLayout::compute(&matrix, &config);
		let span_sum: f64 = layout
			.groups
			.iter()
			.map(|g| g.span.end - g.span.start)
			.sum();
		let padding = config.pad_angle * layout.groups.len() as f64;
		assert!((span_sum + padding - TAU).abs() < EPS);
	}

	#[test]
	fn spans_are_proportional_to_row_sums() {
		let matrix = two_by_two();
		let layout = ChordLayout::compute(&matrix, &LayoutConfig::default());
		let len = |g: &Group| g.span.end - g.span.start;
		let (a, b) = (&layout.groups[0], &layout.groups[1]);
		assert_eq!(a.value, 3.0);
		assert_eq!(b.value, 5.0);
		assert!((len(b) / len(a) - 5.0 / 3.0).abs() < EPS);
	}

	#[test]
	fn one_chord_per_nonzero_cell() {
		let matrix = two_by_two();
		let layout = ChordLayout::compute(&matrix, &LayoutConfig::default());
		assert_eq!(layout.chords.len(), 2);
		// Both chords carry the same pair mean (3+5)/2, so the index
		// tie-break puts A -> B first.
		let a_to_b = &layout.chords[0];
		assert_eq!((a_to_b.source.index, a_to_b.source.subindex), (0, 1));
		assert_eq!(a_to_b.source.value, 3.0);
		assert_eq!(a_to_b.target.value, 5.0);
		let b_to_a = &layout.chords[1];
		assert_eq!((b_to_a.source.index, b_to_a.source.subindex), (1, 0));
		assert_eq!(b_to_a.source.value, 5.0);
		assert_eq!(b_to_a.target.value, 3.0);
	}

	#[test]
	fn self_chord_keeps_source_and_target_on_one_group() {
		let matrix = Matrix::from_rows(vec![vec![2.0]]).unwrap();
		let layout = ChordLayout::compute(&matrix, &LayoutConfig::default());
		assert_eq!(layout.groups.len(), 1);
		assert_eq!(layout.chords.len(), 1);
		let chord = &layout.chords[0];
		assert_eq!(chord.source.index, chord.target.index);
		assert_eq!(chord.source.span, chord.target.span);
	}

	#[test]
	fn zero_matrix_degenerates_without_nan() {
		let matrix = Matrix::from_rows(vec![vec![0.0, 0.0], vec![0.0, 0.0]]).unwrap();
		let layout = ChordLayout::compute(&matrix, &LayoutConfig::default());
		assert!(layout.chords.is_empty());
		for group in &layout.groups {
			assert!(group.span.start.is_finite());
			assert!((group.span.end - group.span.start).abs() < EPS);
		}
	}

	#[test]
	fn empty_matrix_yields_empty_layout() {
		let layout = ChordLayout::compute(&Matrix::default(), &LayoutConfig::default());
		assert!(layout.groups.is_empty());
		assert!(layout.chords.is_empty());
	}

	#[test]
	fn layout_is_idempotent() {
		let matrix = two_by_two();
		let config = LayoutConfig::default();
		assert_eq!(
			ChordLayout::compute(&matrix, &config),
			ChordLayout::compute(&matrix, &config)
		);
	}

	#[test]
	fn descending_groups_form_a_total_order() {
		let matrix = Matrix::from_rows(vec![
			vec![0.0, 1.0, 0.0],
			vec![4.0, 0.0, 0.0],
			vec![2.0, 0.0, 0.0],
		])
		.unwrap();
		let config = LayoutConfig {
			sort_groups: SortPolicy::Descending,
			..LayoutConfig::default()
		};
		let layout = ChordLayout::compute(&matrix, &config);
		let mut by_angle: Vec<&Group> = layout.groups.iter().collect();
		by_angle.sort_by(|a, b| a.span.start.partial_cmp(&b.span.start).unwrap());
		for pair in by_angle.windows(2) {
			assert!(pair[0].value >= pair[1].value);
		}
		assert_eq!(by_angle[0].index, 1);
	}

	#[test]
	fn descending_sort_breaks_ties_by_original_index() {
		let matrix = Matrix::from_rows(vec![vec![0.0, 2.0], vec![2.0, 0.0]]).unwrap();
		let config = LayoutConfig {
			sort_groups: SortPolicy::Descending,
			..LayoutConfig::default()
		};
		let layout = ChordLayout::compute(&matrix, &config);
		// Equal row sums: group 0 keeps its slot ahead of group 1.
		assert!(layout.groups[0].span.start < layout.groups[1].span.start);
	}

	#[test]
	fn subgroups_sort_heaviest_first_within_a_group() {
		let matrix = Matrix::from_rows(vec![
			vec![0.0, 1.0, 4.0],
			vec![0.0, 0.0, 0.0],
			vec![0.0, 0.0, 0.0],
		])
		.unwrap();
		let layout = ChordLayout::compute(&matrix, &LayoutConfig::default());
		let heavy = layout
			.chords
			.iter()
			.find(|c| c.source.subindex == 2)
			.unwrap();
		let light = layout
			.chords
			.iter()
			.find(|c| c.source.subindex == 1)
			.unwrap();
		assert!(heavy.source.span.start < light.source.span.start);
	}

	#[test]
	fn chord_draw_order_is_heaviest_pair_first() {
		let matrix = Matrix::from_rows(vec![
			vec![0.0, 1.0, 8.0],
			vec![0.0, 0.0, 0.0],
			vec![0.0, 0.0, 0.0],
		])
		.unwrap();
		let layout = ChordLayout::compute(&matrix, &LayoutConfig::default());
		assert_eq!(layout.chords.len(), 2);
		assert_eq!(layout.chords[0].source.subindex, 2);
		assert_eq!(layout.chords[1].source.subindex, 1);
	}

	#[test]
	fn oversized_padding_is_clamped() {
		let matrix = two_by_two();
		let config = LayoutConfig {
			pad_angle: 10.0,
			..LayoutConfig::default()
		};
		let layout = ChordLayout::compute(&matrix, &config);
		for group in &layout.groups {
			assert!(group.span.end >= group.span.start);
		}
	}
}
