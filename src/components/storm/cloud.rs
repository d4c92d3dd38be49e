//! Procedural cloud silhouette and sun rays.
//!
//! The cloud is a cluster of overlapping circles around an anchor point: a ring
//! of large "core" cells plus a scatter of smaller filler cells. The cells also
//! serve as convection targets for rising particles.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;

/// Large cells on the ring around the anchor.
pub const CORE_CELLS: usize = 8;
/// Smaller cells scattered inside the ring.
pub const FILLER_CELLS: usize = 10;
/// Rays around the sun.
pub const SUN_RAYS: usize = 12;

/// One circular region of the cloud.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudCell {
	/// Circle center in canvas pixels.
	pub center: DVec2,
	/// Circle radius in pixels.
	pub radius: f64,
}

/// A single sun ray, drawn from the sun's rim outward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunRay {
	/// Direction from the sun's center, in radians.
	pub angle: f64,
	/// Rest length before pulsing.
	pub length: f64,
	/// Offset into the pulse cycle so rays don't breathe in unison.
	pub phase: f64,
}

/// Build a fresh set of cloud cells around `anchor`.
pub fn generate<R: Rng + ?Sized>(anchor: DVec2, rng: &mut R) -> Vec<CloudCell> {
	let mut cells = Vec::with_capacity(CORE_CELLS + FILLER_CELLS);

	for i in 0..CORE_CELLS {
		let angle = i as f64 / CORE_CELLS as f64 * TAU;
		let distance = rng.random_range(100.0..140.0);
		cells.push(CloudCell {
			center: DVec2::new(
				anchor.x + angle.cos() * distance,
				anchor.y + angle.sin() * distance * 0.4,
			),
			radius: rng.random_range(60.0..100.0),
		});
	}

	for _ in 0..FILLER_CELLS {
		let angle = rng.random_range(0.0..TAU);
		let distance = rng.random_range(0.0..150.0);
		cells.push(CloudCell {
			center: DVec2::new(
				anchor.x + angle.cos() * distance,
				anchor.y + angle.sin() * distance * 0.3,
			),
			radius: rng.random_range(30.0..70.0),
		});
	}

	cells
}

/// Evenly spaced rays with randomized length.
pub fn generate_rays<R: Rng + ?Sized>(rng: &mut R) -> Vec<SunRay> {
	(0..SUN_RAYS)
		.map(|i| SunRay {
			angle: i as f64 / SUN_RAYS as f64 * TAU,
			length: rng.random_range(30.0..50.0),
			phase: rng.random_range(0.0..TAU),
		})
		.collect()
}
