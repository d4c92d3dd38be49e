//! Particle population and its lifecycle transitions.
//!
//! The population is replaced wholesale at phase boundaries: ambient dust and
//! water, then ice crystals and hail, then charged ice.

use glam::DVec2;
use rand::Rng;

use super::cloud::CloudCell;

/// Ice crystals spawned below the cloud cells.
pub const ICE_BOTTOM_COUNT: usize = 50;
/// Hail spawned above the cloud cells.
pub const ICE_TOP_COUNT: usize = 35;

/// Per-axis speed of the random kicks that churn ice while mixing.
pub const MIX_KICK_SPEED: f64 = 5.0;

/// Ice lighter than this ends up positively charged.
pub const CHARGE_MASS_THRESHOLD: f64 = 1.5;

/// What a particle represents. Drives both physics and color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
	/// Aerosol dust drifting near the ground.
	Dust,
	/// Water droplets drifting near the ground.
	Water,
	/// Small ice crystals in the lower part of the cloud.
	IceBottom,
	/// Graupel / hail in the upper part of the cloud.
	IceTop,
	/// Light ice that picked up positive charge.
	Positive,
	/// Heavy ice that picked up negative charge.
	Negative,
}

impl Category {
	/// Dust or water, the particles convection lifts.
	pub fn is_ambient(self) -> bool {
		matches!(self, Category::Dust | Category::Water)
	}

	/// Uncharged ice or hail.
	pub fn is_ice(self) -> bool {
		matches!(self, Category::IceBottom | Category::IceTop)
	}

	/// Carries a charge sign.
	pub fn is_charged(self) -> bool {
		matches!(self, Category::Positive | Category::Negative)
	}
}

/// Soft containment circle used while charges are being mixed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bound {
	/// Center of the circle.
	pub center: DVec2,
	/// Distance beyond which particles are pushed back.
	pub radius: f64,
}

/// One simulated dust grain, droplet or ice particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	/// Canvas position in pixels.
	pub position: DVec2,
	/// Displacement per frame.
	pub velocity: DVec2,
	/// Drawn radius.
	pub radius: f64,
	/// What the particle represents.
	pub category: Category,
	/// Decides the charge sign of ice.
	pub mass: f64,
	/// `+1` or `-1` once the particle is charged.
	pub charge: Option<i8>,
	/// Convection destination inside the cloud.
	pub target: Option<DVec2>,
	/// Reached its convection target and parked.
	pub in_cloud: bool,
	/// Containment while ice is mixed.
	pub bound: Option<Bound>,
}

impl Particle {
	fn new(position: DVec2, velocity: DVec2, radius: f64, category: Category, mass: f64) -> Self {
		Self {
			position,
			velocity,
			radius,
			category,
			mass,
			charge: None,
			target: None,
			in_cloud: false,
			bound: None,
		}
	}
}

/// Owns every simulated particle.
#[derive(Clone, Debug, Default)]
pub struct ParticleSystem {
	/// The live population.
	pub particles: Vec<Particle>,
}

impl ParticleSystem {
	/// Number of particles.
	pub fn len(&self) -> usize {
		self.particles.len()
	}

	/// No particles at all.
	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	/// Number of particles in `category`.
	pub fn count(&self, category: Category) -> usize {
		self.particles
			.iter()
			.filter(|p| p.category == category)
			.count()
	}

	/// Any dust or water left.
	pub fn has_ambient(&self) -> bool {
		self.particles.iter().any(|p| p.category.is_ambient())
	}

	/// Replace the population with dust and water scattered over the canvas.
	pub fn spawn_ambient<R: Rng + ?Sized>(
		&mut self,
		n_dust: usize,
		n_water: usize,
		width: f64,
		height: f64,
		rng: &mut R,
	) {
		self.particles.clear();
		self.particles.reserve(n_dust + n_water);

		let kinds = std::iter::repeat_n(Category::Dust, n_dust)
			.chain(std::iter::repeat_n(Category::Water, n_water));
		for category in kinds {
			let position = DVec2::new(
				rng.random_range(0.0..=width.max(0.0)),
				rng.random_range(0.0..=height.max(0.0)),
			);
			let velocity = DVec2::new(rng.random_range(-1.0..=1.0), rng.random_range(-1.0..=1.0));
			self.particles.push(Particle::new(
				position,
				velocity,
				rng.random_range(1.0..3.0),
				category,
				rng.random_range(0.5..1.5),
			));
		}
	}

	/// Drop dust and water and seed ice crystals (below cells) and hail (above).
	///
	/// Previous ice is replaced too, so re-entering the ice phase never
	/// accumulates particles. Does nothing without cloud cells.
	pub fn spawn_ice<R: Rng + ?Sized>(&mut self, cells: &[CloudCell], rng: &mut R) {
		if cells.is_empty() {
			return;
		}
		self.particles.clear();
		self.particles.reserve(ICE_BOTTOM_COUNT + ICE_TOP_COUNT);

		for _ in 0..ICE_BOTTOM_COUNT {
			let cell = cells[rng.random_range(0..cells.len())];
			let position = DVec2::new(
				cell.center.x + rng.random_range(-40.0..=40.0),
				cell.center.y + rng.random_range(40.0..100.0),
			);
			self.particles.push(Particle::new(
				position,
				DVec2::ZERO,
				rng.random_range(2.0..4.0),
				Category::IceBottom,
				rng.random_range(1.0..1.5),
			));
		}

		for _ in 0..ICE_TOP_COUNT {
			let cell = cells[rng.random_range(0..cells.len())];
			let position = DVec2::new(
				cell.center.x + rng.random_range(-40.0..=40.0),
				cell.center.y - rng.random_range(40.0..100.0),
			);
			self.particles.push(Particle::new(
				position,
				DVec2::ZERO,
				rng.random_range(3.0..5.0),
				Category::IceTop,
				rng.random_range(2.0..3.0),
			));
		}
	}

	/// Turn every ice particle into a charge carrier, discarding anything else.
	///
	/// Light ice becomes positive, heavy ice negative. Charged particles pass
	/// through unchanged, so calling this twice is harmless.
	pub fn separate_charges(&mut self) {
		self.particles
			.retain(|p| p.category.is_ice() || p.category.is_charged());

		for p in &mut self.particles {
			if p.category.is_charged() {
				continue;
			}
			let (category, charge) = if p.mass < CHARGE_MASS_THRESHOLD {
				(Category::Positive, 1)
			} else {
				(Category::Negative, -1)
			};
			p.category = category;
			p.charge = Some(charge);
			p.bound = None;
		}
	}

	/// Forget all convection progress so dust and water rise again from where they are.
	pub fn reset_navigation(&mut self) {
		for p in &mut self.particles {
			if p.category.is_ambient() {
				p.in_cloud = false;
				p.target = None;
			}
		}
	}

	/// Drop convection targets that point into a cloud that no longer exists.
	pub fn clear_targets(&mut self) {
		for p in &mut self.particles {
			if !p.in_cloud {
				p.target = None;
			}
		}
	}

	/// Kick ice into a turbulent swirl confined around `center`.
	pub fn start_mixing<R: Rng + ?Sized>(&mut self, center: DVec2, radius: f64, rng: &mut R) {
		for p in &mut self.particles {
			if p.category.is_ice() {
				p.bound = Some(Bound { center, radius });
			}
		}
		self.stir(rng);
	}

	/// Give every bound ice particle a new random velocity.
	pub fn stir<R: Rng + ?Sized>(&mut self, rng: &mut R) {
		for p in &mut self.particles {
			if p.category.is_ice() && p.bound.is_some() {
				p.velocity = DVec2::new(
					rng.random_range(-MIX_KICK_SPEED..=MIX_KICK_SPEED),
					rng.random_range(-MIX_KICK_SPEED..=MIX_KICK_SPEED),
				);
			}
		}
	}

	/// Release every particle from its mixing bound.
	pub fn clear_bounds(&mut self) {
		for p in &mut self.particles {
			p.bound = None;
		}
	}

	/// Fraction of dust and water already parked in the cloud, or `None` if there is none.
	pub fn in_cloud_fraction(&self) -> Option<f64> {
		let (total, parked) = self
			.particles
			.iter()
			.filter(|p| p.category.is_ambient())
			.fold((0usize, 0usize), |(total, parked), p| {
				(total + 1, parked + usize::from(p.in_cloud))
			});
		(total > 0).then(|| parked as f64 / total as f64)
	}
}
