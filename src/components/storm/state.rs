//! Simulation state and the phase controller.
//!
//! [`StormState`] owns everything the animation needs: scene geometry, the
//! particle population, the cloud, pending deferred actions and the lightning
//! timeline. The host drives it through three calls ([`StormState::set_phase`],
//! [`StormState::trigger_lightning`], [`StormState::resize`]) plus one
//! [`StormState::tick`] per animation frame.

use glam::DVec2;
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::cloud::{self, CloudCell, SunRay};
use super::lightning::LightningState;
use super::particles::{Category, ParticleSystem};
use super::physics;
use super::schedule::{Action, Scheduler};
use super::types::{Phase, StormConfig};

/// Distance of the cloud anchor from the top of the canvas.
const CLOUD_TOP_PADDING: f64 = 140.0;
const GROUND_HEIGHT: f64 = 100.0;
const SUN_RADIUS: f64 = 50.0;
const TREE_HEIGHT: f64 = 90.0;

/// How long ice is churned before charges separate.
pub const CHARGE_MIX_MS: f64 = 1500.0;
/// Interval between turbulent kicks while mixing.
pub const MIX_KICK_MS: f64 = 100.0;
/// Containment radius around the anchor while mixing.
pub const MIX_BOUND_RADIUS: f64 = 180.0;

/// Scene geometry and global visual parameters.
#[derive(Clone, Debug)]
pub struct WorldState {
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
	/// Center of the cloud.
	pub anchor: DVec2,
	/// Y of the ground line.
	pub ground_level: f64,
	/// Center of the sun.
	pub sun_center: DVec2,
	/// Radius of the sun body.
	pub sun_radius: f64,
	/// Base of the tree the lightning strikes.
	pub tree_base: DVec2,
	/// 0 hides the sun, 1 shows it fully.
	pub sun_opacity: f64,
	/// 0 hides the cloud, 1 shows it fully.
	pub cloud_opacity: f64,
	/// Active lesson phase.
	pub phase: Phase,
	/// Suspends velocity damping while ice is being mixed.
	pub no_friction: bool,
}

impl WorldState {
	/// Geometry for a `width` x `height` canvas with a clear sky.
	pub fn new(width: f64, height: f64) -> Self {
		let mut world = Self {
			width: 0.0,
			height: 0.0,
			anchor: DVec2::ZERO,
			ground_level: 0.0,
			sun_center: DVec2::ZERO,
			sun_radius: SUN_RADIUS,
			tree_base: DVec2::ZERO,
			sun_opacity: 1.0,
			cloud_opacity: 0.0,
			phase: Phase::Ambient,
			no_friction: false,
		};
		world.set_size(width, height);
		world
	}

	fn set_size(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.anchor = DVec2::new(width * 0.3, CLOUD_TOP_PADDING);
		self.ground_level = height - GROUND_HEIGHT;
		self.sun_center = DVec2::new(width * 0.8, 120.0);
		self.tree_base = DVec2::new(width * 0.7, self.ground_level);
	}

	/// Top of the tree, where the bolt lands.
	pub fn tree_top(&self) -> DVec2 {
		DVec2::new(self.tree_base.x, self.tree_base.y - TREE_HEIGHT)
	}

	/// Underside of the cloud, where the bolt starts.
	pub fn cloud_base(&self) -> DVec2 {
		DVec2::new(self.anchor.x, self.anchor.y + 60.0)
	}

	fn show_sky(&mut self, sun: f64, cloud: f64) {
		self.sun_opacity = sun;
		self.cloud_opacity = cloud;
	}
}

/// The complete animation state. One instance per canvas.
pub struct StormState {
	/// Scene geometry and visual parameters.
	pub world: WorldState,
	/// Every particle.
	pub system: ParticleSystem,
	/// Cloud silhouette and convection targets.
	pub cells: Vec<CloudCell>,
	/// Sun rays.
	pub rays: Vec<SunRay>,
	/// Current strike, if any.
	pub lightning: LightningState,
	/// Frames rendered so far; drives pulsing effects.
	pub frame: u64,
	generation: u64,
	scheduler: Scheduler,
	config: StormConfig,
	rng: SmallRng,
}

impl StormState {
	/// Build the opening scene: clear sky, ambient dust and water.
	///
	/// `now_ms` is the host clock used for deferred actions.
	pub fn new(config: StormConfig, seed: u64, width: f64, height: f64, now_ms: f64) -> Self {
		let mut rng = SmallRng::seed_from_u64(seed);
		let world = WorldState::new(width, height);
		let cells = cloud::generate(world.anchor, &mut rng);
		let rays = cloud::generate_rays(&mut rng);

		let mut system = ParticleSystem::default();
		system.spawn_ambient(config.dust_count, config.water_count, width, height, &mut rng);

		let mut scheduler = Scheduler::default();
		if let Some(delay) = config.auto_start_ms {
			scheduler.schedule(Action::AutoConvection, 0, now_ms + delay);
		}

		info!(
			"storm: {} particles on {}x{} canvas, seed {}",
			system.len(),
			width,
			height,
			seed
		);

		Self {
			world,
			system,
			cells,
			rays,
			lightning: LightningState::default(),
			frame: 0,
			generation: 0,
			scheduler,
			config,
			rng,
		}
	}

	/// Active lesson phase.
	pub fn phase(&self) -> Phase {
		self.world.phase
	}

	/// Bumped on every effective phase change.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Whether the charge-mix timer is still running.
	pub fn is_mixing(&self) -> bool {
		self.scheduler.is_pending(Action::FinishChargeMix)
	}

	/// Switch to `phase`, running its one-shot setup.
	///
	/// Re-selecting the current phase is ignored unless a deferred action is
	/// still outstanding. Returns whether the switch happened.
	pub fn set_phase(&mut self, phase: Phase, now_ms: f64) -> bool {
		if phase == self.world.phase && self.scheduler.is_empty() {
			return false;
		}

		self.generation += 1;
		self.scheduler.cancel_stale(self.generation);
		if self.world.no_friction {
			// Abandoned mid-mix: the timer that would have restored these is gone.
			self.world.no_friction = false;
			self.system.clear_bounds();
		}
		self.world.phase = phase;
		info!("storm: phase -> {:?} (generation {})", phase, self.generation);

		match phase {
			Phase::Ambient => self.world.show_sky(1.0, 0.0),
			Phase::Convection => {
				self.world.show_sky(1.0, 0.0);
				if !self.system.has_ambient() {
					let (w, h) = (self.world.width, self.world.height);
					self.system.spawn_ambient(
						self.config.dust_count,
						self.config.water_count,
						w,
						h,
						&mut self.rng,
					);
				}
				self.system.reset_navigation();
			}
			Phase::IceFormed => {
				self.world.show_sky(0.0, 1.0);
				self.system.spawn_ice(&self.cells, &mut self.rng);
			}
			Phase::ChargeSeparated => {
				self.world.show_sky(0.0, 1.0);
				self.start_charge_mix(now_ms);
			}
			Phase::Insulator => self.world.show_sky(0.0, 1.0),
			Phase::Lightning => {
				self.world.show_sky(0.0, 1.0);
				self.trigger_lightning();
			}
		}
		true
	}

	fn start_charge_mix(&mut self, now_ms: f64) {
		self.system
			.start_mixing(self.world.anchor, MIX_BOUND_RADIUS, &mut self.rng);
		self.world.no_friction = true;
		self.scheduler
			.schedule(Action::FinishChargeMix, self.generation, now_ms + CHARGE_MIX_MS);
		self.scheduler
			.schedule(Action::MixKick, self.generation, now_ms + MIX_KICK_MS);
		debug!("storm: charge mix until {}", now_ms + CHARGE_MIX_MS);
	}

	fn kick_charge_mix(&mut self, now_ms: f64) {
		// The finish timer fired in the same frame: nothing left to churn.
		if !self.is_mixing() {
			return;
		}
		self.system.stir(&mut self.rng);
		self.scheduler
			.schedule(Action::MixKick, self.generation, now_ms + MIX_KICK_MS);
	}

	fn finish_charge_mix(&mut self) {
		self.system.clear_bounds();
		self.world.no_friction = false;
		self.system.separate_charges();
		info!(
			"storm: charges separated ({} positive, {} negative)",
			self.system.count(Category::Positive),
			self.system.count(Category::Negative)
		);
	}

	/// Start a lightning strike from the cloud base to the tree.
	pub fn trigger_lightning(&mut self) {
		let (start, end) = (self.world.cloud_base(), self.world.tree_top());
		self.lightning.arm(start, end, &mut self.rng);
		info!("storm: lightning ({} bolt segments)", self.lightning.bolt.len());
	}

	/// Adapt geometry to a new canvas size.
	///
	/// Particles keep their positions; convection targets into the old cloud
	/// are dropped and re-picked on the next tick.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.world.set_size(width, height);
		self.cells = cloud::generate(self.world.anchor, &mut self.rng);
		self.rays = cloud::generate_rays(&mut self.rng);
		self.system.clear_targets();
		debug!(
			"storm: resized to {}x{}, anchor ({}, {})",
			width, height, self.world.anchor.x, self.world.anchor.y
		);
	}

	/// Advance one animation frame.
	///
	/// Returns the new phase if a deferred action switched it during this
	/// frame, so the host can keep its phase selector in sync.
	pub fn tick(&mut self, now_ms: f64) -> Option<Phase> {
		let mut switched = None;
		for action in self.scheduler.take_due(now_ms, self.generation) {
			match action {
				Action::AutoConvection => {
					if self.set_phase(Phase::Convection, now_ms) {
						switched = Some(Phase::Convection);
					}
				}
				Action::MixKick => self.kick_charge_mix(now_ms),
				Action::FinishChargeMix => self.finish_charge_mix(),
			}
		}

		physics::step(
			&mut self.world,
			&mut self.system,
			&self.cells,
			&mut self.rng,
		);
		self.lightning.tick();
		self.frame += 1;
		switched
	}
}
