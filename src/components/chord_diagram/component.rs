use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::layout::LayoutConfig;
use super::render;
use super::scale::OrdinalScale;
use super::state::{ChordDiagramState, HoverTarget, TooltipContent};
use super::types::DiagramData;

/// Tooltip content plus the viewport position it should appear at.
#[derive(Clone, Debug, PartialEq)]
struct TooltipAt {
	content: TooltipContent,
	x: f64,
	y: f64,
}

#[component]
pub fn ChordDiagramCanvas(
	#[prop(into)] data: Signal<DiagramData>,
	#[prop(optional)] config: Option<LayoutConfig>,
	#[prop(optional)] colors: Option<OrdinalScale>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ChordDiagramState>>> = Rc::new(RefCell::new(None));
	let context: Rc<RefCell<Option<CanvasRenderingContext2d>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let tooltip: RwSignal<Option<TooltipAt>> = RwSignal::new(None);
	let layout_config = config.unwrap_or_default();
	let (state_init, context_init, animate_init, resize_cb_init) = (
		state.clone(),
		context.clone(),
		animate.clone(),
		resize_cb.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();
		*context_init.borrow_mut() = Some(ctx.clone());
		let mut diagram = ChordDiagramState::new(&data.get(), &layout_config, w, h);
		if let Some(ref scale) = colors {
			diagram.colors = scale.clone();
		}
		*state_init.borrow_mut() = Some(diagram);

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.animation_running {
					s.tick(0.016);
				}
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let (state_mm, context_mm) = (state.clone(), context.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut s) = *state_mm.borrow_mut() {
			let hovered = s.group_at_position(x, y).map(HoverTarget::Group).or_else(|| {
				context_mm
					.borrow()
					.as_ref()
					.and_then(|ctx| render::chord_at_position(s, ctx, x, y))
					.map(HoverTarget::Chord)
			});
			s.set_hover(hovered);

			// Tooltip offsets match the reference diagram: group tips sit
			// up-left of the pointer, chord tips a little further out.
			tooltip.set(s.tooltip().map(|content| {
				let (dx, dy) = match s.hover.target {
					Some(HoverTarget::Chord(_)) => (-100.0, -100.0),
					_ => (-130.0, -80.0),
				};
				TooltipAt {
					content,
					x: ev.client_x() as f64 + dx,
					y: ev.client_y() as f64 + dy,
				}
			}));
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.set_hover(None);
		}
		tooltip.set(None);
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="chord-diagram-canvas"
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			style="display: block;"
		/>
		{move || {
			tooltip.get().map(|tip| {
				view! {
					<div
						class="chord-tooltip"
						style=format!("left: {:.0}px; top: {:.0}px;", tip.x, tip.y)
					>
						<div class="chord-tooltip-title">{tip.content.title}</div>
						{tip.content
							.lines
							.into_iter()
							.map(|line| view! { <div>{line}</div> })
							.collect_view()}
					</div>
				}
			})
		}}
	}
}
