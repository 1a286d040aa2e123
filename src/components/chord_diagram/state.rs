use std::f64::consts::{PI, TAU};

use super::layout::{ChordLayout, LayoutConfig};
use super::matrix::{LabelMap, Matrix};
use super::scale::OrdinalScale;
use super::types::DiagramData;

/// Ring thickness in pixels.
pub const RING_WIDTH: f64 = 20.0;
/// Gap between the ring and the label anchors.
pub const LABEL_OFFSET: f64 = 6.0;
/// Margin reserved around the circle for labels.
const LABEL_MARGIN: f64 = 100.0;

/// What the pointer is currently over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverTarget {
	/// Group by original matrix index.
	Group(usize),
	/// Chord by position in the layout's draw order.
	Chord(usize),
}

/// Hover lifecycle: `Idle -> Hovering(target) -> Idle`, driven by pointer
/// events. `highlight_t` eases the chord fade in and out across frames.
#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub target: Option<HoverTarget>,
	pub highlight_t: f64,
	pub prev_target: Option<HoverTarget>,
	delay_t: f64,
}

/// Tooltip content computed from the hovered shape. The component overlays
/// it as a positioned div; the content is fully overwritten on every hover
/// event, never patched.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipContent {
	pub title: String,
	pub lines: Vec<String>,
}

/// Per-diagram-instance state: immutable matrix and geometry plus the
/// mutable hover machine. Rendering is stateless recomputation from this.
pub struct ChordDiagramState {
	pub labels: LabelMap,
	pub matrix: Matrix,
	pub layout: ChordLayout,
	pub colors: OrdinalScale,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
}

fn format_weight(value: f64) -> String {
	if value.fract() == 0.0 {
		format!("{}", value as i64)
	} else {
		format!("{value:.2}")
	}
}

impl ChordDiagramState {
	pub fn new(data: &DiagramData, config: &LayoutConfig, width: f64, height: f64) -> Self {
		Self {
			labels: data.labels.clone(),
			matrix: data.matrix.clone(),
			layout: ChordLayout::compute(&data.matrix, config),
			colors: OrdinalScale::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
		}
	}

	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	/// Inner and outer ring radius for the current canvas size.
	pub fn radii(&self) -> (f64, f64) {
		let inner = (self.width.min(self.height) / 2.0 - LABEL_MARGIN).max(RING_WIDTH * 2.0);
		(inner, inner + RING_WIDTH)
	}

	/// The group under a canvas-space point, if the point lies on the ring.
	pub fn group_at_position(&self, x: f64, y: f64) -> Option<usize> {
		let (cx, cy) = self.center();
		let (dx, dy) = (x - cx, y - cy);
		let radius = (dx * dx + dy * dy).sqrt();
		let (inner, outer) = self.radii();
		if radius < inner || radius > outer {
			return None;
		}
		// Angle with zero at twelve o'clock, clockwise, in [0, 2π).
		let angle = dx.atan2(-dy).rem_euclid(TAU);
		self.layout
			.groups
			.iter()
			.find(|g| g.span.contains(angle))
			.map(|g| g.index)
	}

	pub fn set_hover(&mut self, target: Option<HoverTarget>) {
		if self.hover.target == target {
			return;
		}
		let was_hovering = self.hover.target.is_some();
		if was_hovering && target.is_none() {
			self.hover.prev_target = self.hover.target.take();
		} else {
			self.hover.prev_target = None;
		}
		self.hover.target = target;
		if target.is_some() && !was_hovering {
			self.hover.delay_t = 0.0;
		}
	}

	/// Whether a chord should fade under the current hover: only chords
	/// whose source and target both differ from the hovered group fade.
	pub fn chord_fades(&self, chord_index: usize) -> bool {
		let hovered = self.hover.target.or(self.hover.prev_target);
		let Some(HoverTarget::Group(group)) = hovered else {
			return false;
		};
		self.layout
			.chords
			.get(chord_index)
			.is_some_and(|c| !c.touches(group))
	}

	pub fn has_active_fade(&self) -> bool {
		matches!(
			self.hover.target.or(self.hover.prev_target),
			Some(HoverTarget::Group(_))
		)
	}

	/// Tooltip for the hovered shape, or `None` when idle.
	pub fn tooltip(&self) -> Option<TooltipContent> {
		match self.hover.target? {
			HoverTarget::Group(i) => Some(self.group_tooltip(i)),
			HoverTarget::Chord(i) => self.chord_tooltip(i),
		}
	}

	fn name(&self, index: usize) -> &str {
		self.labels.get(index).unwrap_or("?")
	}

	fn group_tooltip(&self, index: usize) -> TooltipContent {
		TooltipContent {
			title: "Group Info:".into(),
			lines: vec![format!(
				"{} defines {} dependencies",
				self.name(index),
				format_weight(self.matrix.row_sum(index)),
			)],
		}
	}

	/// Reports both directions of the pair, whichever side was hovered.
	fn chord_tooltip(&self, chord_index: usize) -> Option<TooltipContent> {
		let chord = self.layout.chords.get(chord_index)?;
		let (sname, tname) = (self.name(chord.source.index), self.name(chord.target.index));
		Some(TooltipContent {
			title: "Chord Info:".into(),
			lines: vec![
				format!(
					"{sname} has {} dependencies on {tname}",
					format_weight(chord.source.value)
				),
				format!(
					"{tname} has {} dependencies on {sname}",
					format_weight(chord.target.value)
				),
			],
		})
	}

	/// Advances the fade animation. Mirrors the hover easing of the force
	/// graph this renderer grew out of: a short delay before fading in,
	/// exponential decay back to idle.
	pub fn tick(&mut self, dt: f64) {
		let (target, delay, speed) = if self.hover.target.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.target.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_target = None;
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Anchor angle for a group's label; text past π flips to stay upright.
	pub fn label_flips(angle: f64) -> bool {
		angle > PI
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::chord_diagram::matrix::MatrixBuilder;
	use crate::components::chord_diagram::types::Record;

	fn three_entity_state() -> ChordDiagramState {
		// Chords A -> B and B -> C.
		let records = vec![Record::new("A", "B", 1.0), Record::new("B", "C", 1.0)];
		let mut labels = LabelMap::from_field(&records, |r| &r.source);
		labels.add_values(&records, |r| &r.target);
		let matrix = MatrixBuilder::new(&records).build(&labels).unwrap();
		ChordDiagramState::new(
			&DiagramData { labels, matrix },
			&LayoutConfig::default(),
			600.0,
			600.0,
		)
	}

	fn chord_index_for(state: &ChordDiagramState, source: usize, subindex: usize) -> usize {
		state
			.layout
			.chords
			.iter()
			.position(|c| c.source.index == source && c.source.subindex == subindex)
			.unwrap()
	}

	#[test]
	fn hovering_a_group_fades_only_untouched_chords() {
		let mut state = three_entity_state();
		let a = state.labels.index_of("A").unwrap();
		state.set_hover(Some(HoverTarget::Group(a)));

		let a_to_b = chord_index_for(&state, 0, 1);
		let b_to_c = chord_index_for(&state, 1, 2);
		assert!(!state.chord_fades(a_to_b));
		assert!(state.chord_fades(b_to_c));
	}

	#[test]
	fn chord_hover_never_fades() {
		let mut state = three_entity_state();
		let b_to_c = chord_index_for(&state, 1, 2);
		state.set_hover(Some(HoverTarget::Chord(b_to_c)));
		assert!(!state.has_active_fade());
		assert!(!state.chord_fades(chord_index_for(&state, 0, 1)));
	}

	#[test]
	fn group_tooltip_reports_total_outgoing_weight() {
		let mut state = three_entity_state();
		state.set_hover(Some(HoverTarget::Group(0)));
		let tip = state.tooltip().unwrap();
		assert_eq!(tip.title, "Group Info:");
		assert_eq!(tip.lines, vec!["A defines 1 dependencies"]);
	}

	#[test]
	fn chord_tooltip_reports_both_directions() {
		let records = vec![Record::new("A", "B", 3.0), Record::new("B", "A", 5.0)];
		let labels = LabelMap::from_field(&records, |r| &r.source);
		let matrix = MatrixBuilder::new(&records).build(&labels).unwrap();
		let mut state = ChordDiagramState::new(
			&DiagramData { labels, matrix },
			&LayoutConfig::default(),
			600.0,
			600.0,
		);
		let a_to_b = chord_index_for(&state, 0, 1);
		state.set_hover(Some(HoverTarget::Chord(a_to_b)));
		let tip = state.tooltip().unwrap();
		assert_eq!(tip.title, "Chord Info:");
		assert_eq!(
			tip.lines,
			vec![
				"A has 3 dependencies on B",
				"B has 5 dependencies on A",
			]
		);
	}

	#[test]
	fn tooltip_clears_when_idle() {
		let mut state = three_entity_state();
		state.set_hover(Some(HoverTarget::Group(0)));
		state.set_hover(None);
		assert_eq!(state.tooltip(), None);
	}

	#[test]
	fn ring_hit_testing_maps_angles_to_groups() {
		let state = three_entity_state();
		let (cx, cy) = state.center();
		let (inner, outer) = state.radii();
		let r = (inner + outer) / 2.0;

		let mid = state.layout.groups[0].span.mid();
		let (x, y) = (cx + r * mid.sin(), cy - r * mid.cos());
		assert_eq!(state.group_at_position(x, y), Some(0));

		// Center of the circle is not on the ring.
		assert_eq!(state.group_at_position(cx, cy), None);
		// Neither is a point outside it.
		assert_eq!(state.group_at_position(cx, cy - outer - 10.0), None);
	}

	#[test]
	fn fade_eases_out_after_hover_ends() {
		let mut state = three_entity_state();
		state.set_hover(Some(HoverTarget::Group(0)));
		for _ in 0..120 {
			state.tick(0.016);
		}
		assert!(state.hover.highlight_t > 0.5);

		state.set_hover(None);
		// Previous target keeps the fade addressed while it decays.
		assert!(state.has_active_fade());
		for _ in 0..600 {
			state.tick(0.016);
		}
		assert_eq!(state.hover.highlight_t, 0.0);
		assert!(!state.has_active_fade());
	}

	#[test]
	fn labels_flip_past_half_circle() {
		assert!(!ChordDiagramState::label_flips(PI / 2.0));
		assert!(ChordDiagramState::label_flips(PI + 0.1));
	}
}
