mod component;
mod data;
mod layout;
mod matrix;
mod render;
pub mod scale;
mod state;
mod types;

pub use component::ChordDiagramCanvas;
pub use data::{DataError, fetch_records, parse_records};
pub use layout::{ChordLayout, LayoutConfig, SortPolicy};
pub use matrix::{
	LabelMap, Matrix, MatrixBuilder, MatrixError, RelationStrategy, SumWeights, TakeFirstWeight,
};
pub use types::{DiagramData, Record};
