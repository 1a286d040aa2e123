//! Ordinal color scale mapping group indices to palette colors.

/// The classic category-10 palette.
pub const CATEGORY10: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// Maps a non-negative group index to a color, cycling over the range so the
/// domain covers `[0, N)` for any N.
#[derive(Clone, Debug)]
pub struct OrdinalScale {
	range: Vec<String>,
}

impl OrdinalScale {
	pub fn new(range: impl IntoIterator<Item = impl Into<String>>) -> Self {
		let range: Vec<String> = range.into_iter().map(Into::into).collect();
		assert!(!range.is_empty(), "ordinal scale needs at least one color");
		Self { range }
	}

	pub fn category10() -> Self {
		Self::new(CATEGORY10.iter().copied())
	}

	pub fn color(&self, index: usize) -> &str {
		&self.range[index % self.range.len()]
	}
}

impl Default for OrdinalScale {
	fn default() -> Self {
		Self::category10()
	}
}

/// Darkened variant of a `#rrggbb` color (channels scaled by 0.7), used for
/// chord outlines. Non-hex input is returned unchanged.
pub fn darker(color: &str) -> String {
	let hex = match color.strip_prefix('#') {
		Some(hex) if hex.len() == 6 => hex,
		_ => return color.to_owned(),
	};
	let Ok(rgb) = u32::from_str_radix(hex, 16) else {
		return color.to_owned();
	};
	let scale = |c: u32| ((c as f64) * 0.7).round() as u32;
	let (r, g, b) = (
		scale((rgb >> 16) & 0xff),
		scale((rgb >> 8) & 0xff),
		scale(rgb & 0xff),
	);
	format!("#{r:02x}{g:02x}{b:02x}")
}
