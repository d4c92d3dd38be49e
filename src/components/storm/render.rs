//! Canvas rendering for the storm scene.
//!
//! Draw order, back to front:
//! 1. Translucent wash and ground
//! 2. Sun (halo, body, rays) and cloud cells, each scaled by its opacity
//! 3. Particles
//! 4. Phase overlays: capacitor plates, or tree, bolt and screen flash

use std::f64::consts::PI;

use glam::DVec2;
use web_sys::CanvasRenderingContext2d;

use super::lightning::LightningState;
use super::state::{StormState, WorldState};
use super::theme::Theme;
use super::types::Phase;

const RAY_PULSE_SPEED: f64 = 0.05;
const RAY_PULSE_DEPTH: f64 = 0.15;
const PLATE_HALF_WIDTH: f64 = 170.0;
const PLATE_GAP: f64 = 120.0;

/// Renders one frame of the storm to the canvas.
pub fn render(state: &StormState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let world = &state.world;

	draw_background(world, ctx, theme);
	draw_sun(state, ctx, theme);
	draw_cloud(state, ctx, theme);
	draw_particles(state, ctx, theme);

	if world.phase == Phase::Insulator {
		draw_capacitor(world, ctx, theme);
	}
	if world.phase == Phase::Lightning || state.lightning.active {
		draw_tree(world, &state.lightning, ctx, theme);
	}
	if state.lightning.active {
		draw_strike(world, &state.lightning, ctx, theme);
	}
}

fn draw_background(world: &WorldState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	ctx.set_fill_style_str(&theme.scene.wash.to_css());
	ctx.fill_rect(0.0, 0.0, world.width, world.height);

	let gradient = ctx.create_linear_gradient(0.0, world.ground_level, 0.0, world.height);
	let _ = gradient.add_color_stop(0.0, &theme.scene.ground_top.to_css());
	let _ = gradient.add_color_stop(1.0, &theme.scene.ground_bottom.to_css());
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(
		0.0,
		world.ground_level,
		world.width,
		world.height - world.ground_level,
	);
}

fn draw_sun(state: &StormState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let world = &state.world;
	let opacity = world.sun_opacity;
	if opacity <= 0.0 {
		return;
	}
	let scene = &theme.scene;
	let DVec2 { x, y } = world.sun_center;
	let r = world.sun_radius;

	if let Ok(halo) = ctx.create_radial_gradient(x, y, r * 0.8, x, y, r * 2.2) {
		let _ = halo.add_color_stop(0.0, &scene.sun_glow.fade(opacity).to_css());
		let _ = halo.add_color_stop(1.0, &scene.sun_glow.with_alpha(0.0).to_css());
		ctx.begin_path();
		let _ = ctx.arc(x, y, r * 2.2, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		ctx.set_fill_style(&halo);
		ctx.fill();
	}

	ctx.set_stroke_style_str(&scene.sun_ray.fade(opacity).to_css());
	ctx.set_line_width(3.0);
	ctx.set_line_cap("round");
	for ray in &state.rays {
		let pulse = 1.0 + RAY_PULSE_DEPTH * (state.frame as f64 * RAY_PULSE_SPEED + ray.phase).sin();
		let (cos, sin) = (ray.angle.cos(), ray.angle.sin());
		let inner = r + 8.0;
		let outer = inner + ray.length * pulse;
		ctx.begin_path();
		ctx.move_to(x + cos * inner, y + sin * inner);
		ctx.line_to(x + cos * outer, y + sin * outer);
		ctx.stroke();
	}

	if let Ok(body) = ctx.create_radial_gradient(x - r * 0.3, y - r * 0.3, 0.0, x, y, r) {
		let _ = body.add_color_stop(0.0, &scene.sun_core.fade(opacity).to_css());
		let _ = body.add_color_stop(1.0, &scene.sun_edge.fade(opacity).to_css());
		ctx.begin_path();
		let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		ctx.set_fill_style(&body);
		ctx.fill();
	}
}

fn draw_cloud(state: &StormState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let opacity = state.world.cloud_opacity;
	if opacity <= 0.0 {
		return;
	}
	let scene = &theme.scene;

	for cell in &state.cells {
		let DVec2 { x, y } = cell.center;
		let Ok(gradient) = ctx.create_radial_gradient(x, y, 0.0, x, y, cell.radius) else {
			continue;
		};
		let _ = gradient.add_color_stop(0.0, &scene.cloud_core.fade(opacity).to_css());
		let _ = gradient.add_color_stop(0.5, &scene.cloud_mid.fade(opacity).to_css());
		let _ = gradient.add_color_stop(1.0, &scene.cloud_edge.fade(opacity).to_css());

		ctx.begin_path();
		let _ = ctx.arc(x, y, cell.radius, 0.0, 2.0 * PI);
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
		ctx.fill();

		ctx.set_stroke_style_str(&scene.cloud_outline.fade(opacity).to_css());
		ctx.set_line_width(2.0);
		ctx.stroke();
	}
}

fn draw_particles(state: &StormState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let palette = &theme.particles;
	let outline = palette.outline.to_css();

	ctx.set_line_width(1.0);
	ctx.set_font("bold 12px Arial");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	for p in &state.system.particles {
		let DVec2 { x, y } = p.position;
		ctx.begin_path();
		let _ = ctx.arc(x, y, p.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&palette.color(p.category).to_css());
		ctx.fill();
		ctx.set_stroke_style_str(&outline);
		ctx.stroke();

		if let Some(charge) = p.charge {
			let glyph = if charge > 0 { "+" } else { "\u{2212}" };
			ctx.set_fill_style_str(&palette.glyph.to_css());
			let _ = ctx.fill_text(glyph, x, y);
		}
	}
}

/// Cloud drawn as a parallel-plate capacitor: positive layer on top,
/// negative below, the air between them insulating.
fn draw_capacitor(world: &WorldState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let style = &theme.strike;
	let DVec2 { x, y } = world.anchor;
	let (left, right) = (x - PLATE_HALF_WIDTH, x + PLATE_HALF_WIDTH);
	let top = y - PLATE_GAP;
	let bottom = y + PLATE_GAP;

	ctx.set_stroke_style_str(&style.plate.to_css());
	ctx.set_line_width(3.0);
	for plate_y in [top, bottom] {
		ctx.begin_path();
		ctx.move_to(left, plate_y);
		ctx.line_to(right, plate_y);
		ctx.stroke();
	}

	ctx.set_fill_style_str(&style.label.to_css());
	ctx.set_font(style.label_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let signs = 7;
	for i in 0..signs {
		let sx = left + (i as f64 + 0.5) * (right - left) / signs as f64;
		let _ = ctx.fill_text("+", sx, top - 12.0);
		let _ = ctx.fill_text("\u{2212}", sx, bottom + 12.0);
	}

	ctx.set_text_align("left");
	let _ = ctx.fill_text("Positive charge (upper cloud)", right + 16.0, top);
	let _ = ctx.fill_text("Air insulates: charge builds up", right + 16.0, y);
	let _ = ctx.fill_text("Negative charge (cloud base)", right + 16.0, bottom);
}

fn draw_tree(
	world: &WorldState,
	lightning: &LightningState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
) {
	let style = &theme.strike;
	let DVec2 { x, y } = world.tree_base;
	let top = world.tree_top();
	let glow = lightning.tree_glow();

	if glow > 0.0 {
		let (cx, cy, radius) = (top.x, top.y + 30.0, 90.0);
		if let Ok(gradient) = ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, radius) {
			let _ = gradient.add_color_stop(0.0, &style.tree_glow.with_alpha(0.7 * glow).to_css());
			let _ = gradient.add_color_stop(1.0, &style.tree_glow.with_alpha(0.0).to_css());
			ctx.begin_path();
			let _ = ctx.arc(cx, cy, radius, 0.0, 2.0 * PI);
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill();
		}
	}

	ctx.set_fill_style_str(&style.trunk.to_css());
	ctx.fill_rect(x - 6.0, y - 45.0, 12.0, 45.0);

	let crown = if glow > 0.0 {
		style.crown.lerp(style.tree_glow, glow * 0.6)
	} else {
		style.crown
	};
	ctx.set_fill_style_str(&crown.to_css());
	for (dx, dy, r) in [(0.0, 25.0, 28.0), (-18.0, 45.0, 22.0), (18.0, 45.0, 22.0)] {
		ctx.begin_path();
		let _ = ctx.arc(top.x + dx, top.y + dy, r, 0.0, 2.0 * PI);
		ctx.fill();
	}
}

fn draw_strike(
	world: &WorldState,
	lightning: &LightningState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
) {
	let style = &theme.strike;
	let alpha = lightning.bolt_alpha();

	if alpha > 0.0 {
		ctx.save();
		ctx.set_line_cap("round");
		ctx.set_shadow_blur(18.0 * alpha);
		ctx.set_shadow_color(&style.bolt_glow.to_css());
		for pass in [(&style.bolt_glow, 3.0), (&style.bolt, 1.0)] {
			let (color, width_mult) = pass;
			ctx.set_stroke_style_str(&color.fade(alpha).to_css());
			for segment in &lightning.bolt {
				ctx.set_line_width(width_mult * 3.0 / (segment.depth as f64 + 1.0));
				ctx.begin_path();
				ctx.move_to(segment.from.x, segment.from.y);
				ctx.line_to(segment.to.x, segment.to.y);
				ctx.stroke();
			}
		}
		ctx.restore();
	}

	let flash = lightning.flash_alpha();
	if flash > 0.0 {
		ctx.set_fill_style_str(&style.flash.with_alpha(flash).to_css());
		ctx.fill_rect(0.0, 0.0, world.width, world.height);
	}
}
