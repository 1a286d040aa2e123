use std::f64::consts::{FRAC_PI_2, PI, TAU};

use web_sys::{CanvasRenderingContext2d, Path2d};

use super::layout::{ArcSpan, Chord};
use super::scale::darker;
use super::state::{ChordDiagramState, LABEL_OFFSET};

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Layout angles have zero at twelve o'clock; canvas angles at three.
fn canvas_angle(angle: f64) -> f64 {
	angle - FRAC_PI_2
}

/// Full redraw from the current state. Shapes are rebuilt every frame; the
/// state is read, never mutated.
pub fn render(state: &ChordDiagramState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	let (cx, cy) = state.center();
	let (inner, outer) = state.radii();

	ctx.set_fill_style_str("#16213e");
	ctx.begin_path();
	let _ = ctx.arc(cx, cy, outer, 0.0, TAU);
	ctx.fill();

	draw_groups(state, ctx, cx, cy, inner, outer);
	draw_labels(state, ctx, cx, cy, outer);
	draw_chords(state, ctx, cx, cy, inner);
}

fn draw_groups(
	state: &ChordDiagramState,
	ctx: &CanvasRenderingContext2d,
	cx: f64,
	cy: f64,
	inner: f64,
	outer: f64,
) {
	ctx.set_line_width(1.0);
	ctx.set_stroke_style_str("black");
	for group in &state.layout.groups {
		let (a0, a1) = (canvas_angle(group.span.start), canvas_angle(group.span.end));
		ctx.begin_path();
		let _ = ctx.arc(cx, cy, outer, a0, a1);
		let _ = ctx.arc_with_anticlockwise(cx, cy, inner, a1, a0, true);
		ctx.close_path();
		ctx.set_fill_style_str(state.colors.color(group.index));
		ctx.fill();
		ctx.stroke();
	}
}

fn draw_labels(
	state: &ChordDiagramState,
	ctx: &CanvasRenderingContext2d,
	cx: f64,
	cy: f64,
	outer: f64,
) {
	ctx.set_font("10px helvetica, arial, sans-serif");
	ctx.set_fill_style_str("#e0e0e0");
	ctx.set_text_baseline("middle");
	for group in &state.layout.groups {
		let Some(name) = state.labels.get(group.index) else {
			continue;
		};
		let angle = group.span.mid();
		ctx.save();
		let _ = ctx.translate(cx, cy);
		let _ = ctx.rotate(canvas_angle(angle));
		let _ = ctx.translate(outer + LABEL_OFFSET, 0.0);
		// Flip text past the six o'clock point so it reads upright,
		// anchoring from the far end instead.
		if ChordDiagramState::label_flips(angle) {
			let _ = ctx.rotate(PI);
			ctx.set_text_align("end");
		} else {
			ctx.set_text_align("start");
		}
		let _ = ctx.fill_text(name, 0.0, 0.0);
		ctx.restore();
	}
	ctx.set_text_align("start");
}

fn draw_chords(
	state: &ChordDiagramState,
	ctx: &CanvasRenderingContext2d,
	cx: f64,
	cy: f64,
	radius: f64,
) {
	let t = ease_out_cubic(state.hover.highlight_t);
	ctx.set_line_width(1.0);
	for (i, chord) in state.layout.chords.iter().enumerate() {
		let alpha = if state.chord_fades(i) {
			0.8 - 0.7 * t
		} else {
			0.8
		};
		let path = chord_path(chord, cx, cy, radius);
		let color = state.colors.color(chord.target.index);
		ctx.set_global_alpha(alpha);
		ctx.set_fill_style_str(color);
		ctx.fill_with_path_2d(&path);
		ctx.set_stroke_style_str(&darker(color));
		ctx.stroke_with_path(&path);
	}
	ctx.set_global_alpha(1.0);
}

fn span_start(span: &ArcSpan, cx: f64, cy: f64, radius: f64) -> (f64, f64) {
	let a = canvas_angle(span.start);
	(cx + radius * a.cos(), cy + radius * a.sin())
}

/// Ribbon path for one chord: an arc along the source span, a quadratic
/// curve through the circle center to the target span, an arc along it and
/// a curve back. Built in absolute coordinates so the identical path serves
/// both drawing and `isPointInPath` hit testing.
pub fn chord_path(chord: &Chord, cx: f64, cy: f64, radius: f64) -> Path2d {
	let path = Path2d::new().unwrap();
	let source = &chord.source.span;
	let target = &chord.target.span;

	let (sx0, sy0) = span_start(source, cx, cy, radius);
	path.move_to(sx0, sy0);
	let _ = path.arc(cx, cy, radius, canvas_angle(source.start), canvas_angle(source.end));

	if source == target {
		// Self-chord: one arc, one curve home.
		path.quadratic_curve_to(cx, cy, sx0, sy0);
	} else {
		let (tx0, ty0) = span_start(target, cx, cy, radius);
		path.quadratic_curve_to(cx, cy, tx0, ty0);
		let _ = path.arc(cx, cy, radius, canvas_angle(target.start), canvas_angle(target.end));
		path.quadratic_curve_to(cx, cy, sx0, sy0);
	}
	path.close_path();
	path
}

/// The topmost chord under a canvas-space point. Chords are drawn in layout
/// order, so the last hit in that order wins.
pub fn chord_at_position(
	state: &ChordDiagramState,
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
) -> Option<usize> {
	let (cx, cy) = state.center();
	let (inner, _) = state.radii();
	let (dx, dy) = (x - cx, y - cy);
	if dx * dx + dy * dy >= inner * inner {
		return None;
	}
	state
		.layout
		.chords
		.iter()
		.enumerate()
		.rev()
		.find(|(_, chord)| {
			let path = chord_path(chord, cx, cy, inner);
			ctx.is_point_in_path_with_path_2d_and_f64(&path, x, y)
		})
		.map(|(i, _)| i)
}
