//! Relational matrix builder: turns a flat list of records into a dense
//! square adjacency matrix plus an ordered label index, using a pluggable
//! matching/aggregation strategy.

use super::types::Record;

/// Errors surfaced by [`MatrixBuilder::build`] and [`Matrix::from_rows`].
// Display/Error are implemented by hand rather than via `thiserror` because
// the `source` field holds an entity name, not a source error, and thiserror
// unconditionally treats a field named `source` as the error source.
#[derive(Clone, Debug, PartialEq)]
pub enum MatrixError {
	/// The aggregation strategy produced a weight the layout cannot use.
	/// Never coerced or clamped: a bad weight would silently corrupt arc
	/// proportions, so it is reported as a configuration error instead.
	InvalidWeight {
		source: String,
		target: String,
		value: f64,
	},
	/// A row of a hand-built matrix does not match the matrix dimension.
	NotSquare {
		row: usize,
		len: usize,
		expected: usize,
	},
}

impl std::fmt::Display for MatrixError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidWeight {
				source,
				target,
				value,
			} => write!(
				f,
				"invalid weight {value} aggregated for {source} -> {target}: weights must be finite and non-negative"
			),
			Self::NotSquare { row, len, expected } => {
				write!(f, "matrix row {row} has {len} cells, expected {expected}")
			}
		}
	}
}

impl std::error::Error for MatrixError {}

/// Ordered list of distinct entity names. The position of a name is its
/// canonical identity (matrix row/column index) for the rest of the pipeline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabelMap {
	names: Vec<String>,
}

impl LabelMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Collects the distinct values of one field, in first-occurrence order.
	pub fn from_field<F>(records: &[Record], field: F) -> Self
	where
		F: Fn(&Record) -> &str,
	{
		let mut map = Self::new();
		map.add_values(records, field);
		map
	}

	/// Appends distinct values of another field, preserving order of first
	/// occurrence across calls. Lets callers index both `Source` and
	/// `Target` so sink-only entities still get an arc.
	pub fn add_values<F>(&mut self, records: &[Record], field: F)
	where
		F: Fn(&Record) -> &str,
	{
		for record in records {
			let name = field(record);
			if !self.names.iter().any(|n| n == name) {
				self.names.push(name.to_owned());
			}
		}
	}

	pub fn len(&self) -> usize {
		self.names.len()
	}

	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}

	pub fn get(&self, index: usize) -> Option<&str> {
		self.names.get(index).map(String::as_str)
	}

	pub fn index_of(&self, name: &str) -> Option<usize> {
		self.names.iter().position(|n| n == name)
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.names.iter().map(String::as_str)
	}
}

/// Dense N×N matrix of non-negative weights, row-major.
/// `get(i, j)` is the aggregated weight of the relationship i -> j;
/// directionality is preserved, so `get(i, j)` need not equal `get(j, i)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Matrix {
	n: usize,
	cells: Vec<f64>,
}

impl Matrix {
	/// All-zero N×N matrix.
	pub fn zeroed(n: usize) -> Self {
		Self {
			n,
			cells: vec![0.0; n * n],
		}
	}

	/// Builds a matrix from explicit rows, checking squareness.
	pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
		let n = rows.len();
		let mut cells = Vec::with_capacity(n * n);
		for (row, values) in rows.into_iter().enumerate() {
			if values.len() != n {
				return Err(MatrixError::NotSquare {
					row,
					len: values.len(),
					expected: n,
				});
			}
			cells.extend(values);
		}
		Ok(Self { n, cells })
	}

	/// Number of rows (and columns).
	pub fn dim(&self) -> usize {
		self.n
	}

	pub fn is_empty(&self) -> bool {
		self.n == 0
	}

	pub fn get(&self, i: usize, j: usize) -> f64 {
		self.cells[i * self.n + j]
	}

	fn set(&mut self, i: usize, j: usize, value: f64) {
		self.cells[i * self.n + j] = value;
	}

	/// Total outgoing weight of one entity.
	pub fn row_sum(&self, i: usize) -> f64 {
		self.cells[i * self.n..(i + 1) * self.n].iter().sum()
	}

	/// Sum of every cell.
	pub fn total(&self) -> f64 {
		self.cells.iter().sum()
	}
}

/// Matching/aggregation strategy injected into the builder: `matches`
/// selects which records belong to an ordered (source, target) pair and
/// `aggregate` reduces the matched records to one cell weight.
pub trait RelationStrategy {
	fn matches(&self, record: &Record, source: &str, target: &str) -> bool;

	/// Reduces the matched records (in stable input order) to the cell
	/// weight. Must return a finite, non-negative number.
	fn aggregate(&self, matched: &[&Record], source: &str, target: &str) -> f64;
}

/// Reference strategy: exact source/target name match, first matched
/// record's weight, zero when nothing matches. Suited to one-record-per-pair
/// datasets; later records for the same pair are ignored, not summed.
#[derive(Clone, Copy, Debug, Default)]
pub struct TakeFirstWeight;

impl RelationStrategy for TakeFirstWeight {
	fn matches(&self, record: &Record, source: &str, target: &str) -> bool {
		record.source == source && record.target == target
	}

	fn aggregate(&self, matched: &[&Record], _source: &str, _target: &str) -> f64 {
		matched.first().map_or(0.0, |r| r.weight)
	}
}

/// Summing strategy for datasets with multiple records per pair.
#[derive(Clone, Copy, Debug, Default)]
pub struct SumWeights;

impl RelationStrategy for SumWeights {
	fn matches(&self, record: &Record, source: &str, target: &str) -> bool {
		record.source == source && record.target == target
	}

	fn aggregate(&self, matched: &[&Record], _source: &str, _target: &str) -> f64 {
		matched.iter().map(|r| r.weight).sum()
	}
}

/// Pure builder: borrows the record set and a strategy, produces matrices.
pub struct MatrixBuilder<'a, S: RelationStrategy> {
	records: &'a [Record],
	strategy: S,
}

impl<'a> MatrixBuilder<'a, TakeFirstWeight> {
	/// Builder with the reference [`TakeFirstWeight`] strategy.
	pub fn new(records: &'a [Record]) -> Self {
		Self::with_strategy(records, TakeFirstWeight)
	}
}

impl<'a, S: RelationStrategy> MatrixBuilder<'a, S> {
	pub fn with_strategy(records: &'a [Record], strategy: S) -> Self {
		Self { records, strategy }
	}

	/// Records belonging to the ordered pair (source, target), in stable
	/// input order.
	fn matched(&self, source: &str, target: &str) -> Vec<&'a Record> {
		self.records
			.iter()
			.filter(|r| self.strategy.matches(r, source, target))
			.collect()
	}

	/// Populates every cell, including the diagonal. O(N²·R); N and R are
	/// bounded by what fits legibly on one circle.
	pub fn build(&self, labels: &LabelMap) -> Result<Matrix, MatrixError> {
		let n = labels.len();
		let mut matrix = Matrix::zeroed(n);
		for i in 0..n {
			let source = labels.get(i).unwrap_or_default();
			for j in 0..n {
				let target = labels.get(j).unwrap_or_default();
				let matched = self.matched(source, target);
				let value = self.strategy.aggregate(&matched, source, target);
				if !value.is_finite() || value < 0.0 {
					return Err(MatrixError::InvalidWeight {
						source: source.to_owned(),
						target: target.to_owned(),
						value,
					});
				}
				matrix.set(i, j, value);
			}
		}
		Ok(matrix)
	}
}
