//! Lightning strike: branching bolt geometry and the strike's timeline.

use glam::DVec2;
use rand::Rng;

/// Recursion hard stop for bolt branches.
pub const MAX_DEPTH: u8 = 6;
/// Side branches may only sprout from branches shallower than this.
pub const BRANCH_DEPTH_LIMIT: u8 = 3;
/// Chance that a side branch sprouts at each step.
pub const BRANCH_PROBABILITY: f64 = 0.2;
const JITTER: f64 = 20.0;

/// The strike retires once its counter passes this many ticks.
pub const STRIKE_TICKS: u32 = 90;
const FLASH_WINDOW: std::ops::Range<u32> = 10..30;
const TREE_GLOW_TICKS: u32 = 40;
const BOLT_SOLID_TICKS: u32 = 30;

/// One straight piece of the bolt. `depth` 0 is the main channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoltSegment {
	/// Start point.
	pub from: DVec2,
	/// End point.
	pub to: DVec2,
	/// Branch nesting level.
	pub depth: u8,
}

/// Build a jagged, branching path from `start` down to `end`.
pub fn generate_bolt<R: Rng + ?Sized>(start: DVec2, end: DVec2, rng: &mut R) -> Vec<BoltSegment> {
	let mut segments = Vec::new();
	branch(start, end, 0, rng, &mut segments);
	segments
}

fn branch<R: Rng + ?Sized>(
	start: DVec2,
	end: DVec2,
	depth: u8,
	rng: &mut R,
	out: &mut Vec<BoltSegment>,
) {
	if depth >= MAX_DEPTH {
		return;
	}

	let steps = rng.random_range(5..=9);
	let mut current = start;
	for i in 1..=steps {
		let t = i as f64 / steps as f64;
		let next = if i == steps {
			end
		} else {
			DVec2::new(
				start.x + (end.x - start.x) * t + rng.random_range(-JITTER..=JITTER),
				start.y + (end.y - start.y) * t,
			)
		};
		out.push(BoltSegment {
			from: current,
			to: next,
			depth,
		});

		if i < steps && depth < BRANCH_DEPTH_LIMIT && rng.random_bool(BRANCH_PROBABILITY) {
			let remaining = end.y - next.y;
			let side = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
			let sub_target = DVec2::new(
				next.x + side * rng.random_range(40.0..100.0),
				next.y + remaining * rng.random_range(0.3..0.6),
			);
			branch(next, sub_target, depth + 1, rng, out);
		}
		current = next;
	}
}

/// Timeline of one strike, advanced once per frame.
#[derive(Clone, Debug, Default)]
pub struct LightningState {
	/// A strike is on screen.
	pub active: bool,
	/// Frames since the strike was armed.
	pub ticks: u32,
	/// Geometry of the current bolt; empty when idle.
	pub bolt: Vec<BoltSegment>,
}

impl LightningState {
	/// Arm a new strike along a freshly generated bolt.
	pub fn arm<R: Rng + ?Sized>(&mut self, start: DVec2, end: DVec2, rng: &mut R) {
		self.active = true;
		self.ticks = 0;
		self.bolt = generate_bolt(start, end, rng);
	}

	/// Advance the strike by one frame, retiring it after [`STRIKE_TICKS`].
	pub fn tick(&mut self) {
		if !self.active {
			return;
		}
		self.ticks += 1;
		if self.ticks > STRIKE_TICKS {
			self.active = false;
			self.bolt.clear();
		}
	}

	/// White screen overlay alpha; zero outside the flash window.
	pub fn flash_alpha(&self) -> f64 {
		if !self.active || !FLASH_WINDOW.contains(&self.ticks) {
			return 0.0;
		}
		let t = (self.ticks - FLASH_WINDOW.start) as f64
			/ (FLASH_WINDOW.end - FLASH_WINDOW.start) as f64;
		0.5 * (1.0 - t)
	}

	/// Glow around the struck tree, flickering with the return strokes.
	pub fn tree_glow(&self) -> f64 {
		if !self.active || self.ticks >= TREE_GLOW_TICKS {
			return 0.0;
		}
		(self.ticks as f64 * 0.4).sin().abs()
	}

	/// Bolt opacity: solid at first, then an afterglow fading to nothing.
	pub fn bolt_alpha(&self) -> f64 {
		if !self.active {
			return 0.0;
		}
		if self.ticks < BOLT_SOLID_TICKS {
			return 1.0;
		}
		let fade = (self.ticks - BOLT_SOLID_TICKS) as f64 / (STRIKE_TICKS - BOLT_SOLID_TICKS) as f64;
		(0.5 * (1.0 - fade)).max(0.0)
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	#[test]
	fn bolt_reaches_target_and_respects_depth_caps() {
		let start = DVec2::new(300.0, 200.0);
		let end = DVec2::new(700.0, 510.0);
		for seed in 0..200 {
			let mut rng = SmallRng::seed_from_u64(seed);
			let bolt = generate_bolt(start, end, &mut rng);

			let main: Vec<_> = bolt.iter().filter(|s| s.depth == 0).collect();
			assert!((5..=9).contains(&main.len()));
			assert_eq!(main[0].from, start);
			assert_eq!(main.last().map(|s| s.to), Some(end));
			assert!(bolt.iter().all(|s| s.depth <= BRANCH_DEPTH_LIMIT));
			assert!(bolt.iter().all(|s| s.depth < MAX_DEPTH));
		}
	}

	#[test]
	fn main_channel_steps_downward_with_bounded_jitter() {
		let mut rng = SmallRng::seed_from_u64(21);
		let start = DVec2::new(0.0, 0.0);
		let end = DVec2::new(0.0, 300.0);
		let bolt = generate_bolt(start, end, &mut rng);

		let mut last_y = start.y;
		for s in bolt.iter().filter(|s| s.depth == 0) {
			assert!(s.to.y > last_y);
			assert!(s.to.x.abs() <= JITTER);
			last_y = s.to.y;
		}
	}

	#[test]
	fn some_seed_produces_branches() {
		let branched = (0..50).any(|seed| {
			let mut rng = SmallRng::seed_from_u64(seed);
			generate_bolt(DVec2::ZERO, DVec2::new(0.0, 300.0), &mut rng)
				.iter()
				.any(|s| s.depth > 0)
		});
		assert!(branched);
	}

	#[test]
	fn strike_retires_only_after_ninety_ticks() {
		let mut rng = SmallRng::seed_from_u64(22);
		let mut strike = LightningState::default();
		strike.arm(DVec2::ZERO, DVec2::new(0.0, 100.0), &mut rng);

		for _ in 0..STRIKE_TICKS {
			strike.tick();
			assert!(strike.active);
		}
		assert_eq!(strike.ticks, 90);
		strike.tick();
		assert!(!strike.active);
		assert!(strike.bolt.is_empty());

		strike.tick();
		assert_eq!(strike.ticks, 91);
	}

	#[test]
	fn effect_windows() {
		let mut rng = SmallRng::seed_from_u64(23);
		let mut strike = LightningState::default();
		strike.arm(DVec2::ZERO, DVec2::new(0.0, 100.0), &mut rng);

		let mut flashes = Vec::new();
		let mut glows = Vec::new();
		for _ in 0..=STRIKE_TICKS {
			flashes.push((strike.ticks, strike.flash_alpha()));
			glows.push((strike.ticks, strike.tree_glow()));
			assert!((0.0..=1.0).contains(&strike.bolt_alpha()));
			strike.tick();
		}
		for (tick, alpha) in flashes {
			assert_eq!(alpha > 0.0, (10..30).contains(&tick), "tick {tick}");
		}
		for (tick, glow) in glows {
			if tick >= 40 {
				assert_eq!(glow, 0.0);
			}
		}
	}
}
