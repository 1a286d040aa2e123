use std::collections::HashMap;

use super::matrix::{LabelMap, Matrix};

/// One relational record: a weighted, directed relationship between two
/// named entities. Columns beyond `Source`/`Target`/`Weight` end up in
/// `extra`, ignored by the core but visible to a matching strategy.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
	pub source: String,
	pub target: String,
	pub weight: f64,
	pub extra: HashMap<String, String>,
}

impl Record {
	/// Record with no extra columns.
	pub fn new(source: impl Into<String>, target: impl Into<String>, weight: f64) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			weight,
			extra: HashMap::new(),
		}
	}
}

/// Everything the diagram component needs: the ordered entity names and the
/// aggregated adjacency matrix. Built once per render cycle, immutable after.
#[derive(Clone, Debug, Default)]
pub struct DiagramData {
	pub labels: LabelMap,
	pub matrix: Matrix,
}
