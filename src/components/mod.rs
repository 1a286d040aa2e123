//! Reusable UI components.

pub mod chord_diagram;
