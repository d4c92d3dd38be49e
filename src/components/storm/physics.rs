//! Per-tick particle integration.
//!
//! Each tick applies the active phase's force rule, moves every particle by its
//! velocity, resolves phase constraints (edge bounces, mixing bounds, charge
//! layers), then damps velocity unless friction is suspended.

use glam::DVec2;
use rand::Rng;

use super::cloud::CloudCell;
use super::particles::{Category, Particle, ParticleSystem};
use super::state::WorldState;
use super::types::Phase;

/// Velocity multiplier applied every frame unless friction is suspended.
pub const DAMPING: f64 = 0.95;

const AMBIENT_JITTER: f64 = 0.075;
const AMBIENT_MAX_SPEED: f64 = 1.6;
const WALL_RESTITUTION: f64 = 0.8;
const GROUND_RESTITUTION: f64 = 0.6;

const CONVECTION_GAIN: f64 = 0.02;
const CONVECTION_MAX_SPEED: f64 = 3.0;
/// Distance at which a rising particle counts as inside the cloud.
pub const ARRIVAL_RADIUS: f64 = 8.0;

const MIX_RESTITUTION: f64 = 0.7;
const MIX_REENTRY: f64 = 0.95;

const CHARGE_DRIFT: f64 = 0.1;
const CHARGE_LAYER_OFFSET: f64 = 100.0;
const CHARGE_TURBULENCE: f64 = 0.15;

/// Advance the whole population by one frame.
pub fn step<R: Rng + ?Sized>(
	world: &mut WorldState,
	system: &mut ParticleSystem,
	cells: &[CloudCell],
	rng: &mut R,
) {
	let phase = world.phase;
	let anchor = world.anchor;

	for p in &mut system.particles {
		match phase {
			Phase::Ambient if p.category.is_ambient() => ambient_force(p, rng),
			Phase::Convection if p.category.is_ambient() => convection_force(p, cells, rng),
			Phase::ChargeSeparated if p.category.is_charged() => charge_force(p, rng),
			_ => {}
		}

		p.position += p.velocity;

		if phase == Phase::Ambient && p.category.is_ambient() {
			bounce(p, world.width, world.ground_level);
		}
		if p.bound.is_some() {
			contain(p);
		}
		if phase == Phase::ChargeSeparated {
			hold_charge_layer(p, anchor);
		}

		if !world.no_friction {
			p.velocity *= DAMPING;
		}
	}

	if phase == Phase::Convection {
		check_cloud_formation(world, system);
	}
}

/// Cross-fade sun and cloud as particles gather.
pub fn check_cloud_formation(world: &mut WorldState, system: &ParticleSystem) {
	let Some(fraction) = system.in_cloud_fraction() else {
		return;
	};
	world.sun_opacity = (1.0 - 1.8 * fraction).max(0.0);
	world.cloud_opacity = (1.5 * fraction).min(1.0);
}

fn ambient_force<R: Rng + ?Sized>(p: &mut Particle, rng: &mut R) {
	let jitter = DVec2::new(
		rng.random_range(-AMBIENT_JITTER..=AMBIENT_JITTER),
		rng.random_range(-AMBIENT_JITTER..=AMBIENT_JITTER),
	);
	p.velocity = (p.velocity + jitter).clamp_length_max(AMBIENT_MAX_SPEED);
}

fn bounce(p: &mut Particle, width: f64, ground: f64) {
	if p.position.x < 0.0 {
		p.position.x = 0.0;
		p.velocity.x = -p.velocity.x * WALL_RESTITUTION;
	} else if p.position.x > width {
		p.position.x = width;
		p.velocity.x = -p.velocity.x * WALL_RESTITUTION;
	}
	if p.position.y > ground {
		p.position.y = ground;
		p.velocity.y = -p.velocity.y * GROUND_RESTITUTION;
	}
}

fn convection_force<R: Rng + ?Sized>(p: &mut Particle, cells: &[CloudCell], rng: &mut R) {
	if p.in_cloud {
		return;
	}
	if p.target.is_none() {
		if cells.is_empty() {
			return;
		}
		let cell = cells[rng.random_range(0..cells.len())];
		let half = cell.radius / 2.0;
		p.target = Some(DVec2::new(
			cell.center.x + rng.random_range(-half..=half),
			cell.center.y + rng.random_range(-half..=half) * 0.5,
		));
	}
	let Some(target) = p.target else {
		return;
	};

	let displacement = target - p.position;
	if displacement.length() < ARRIVAL_RADIUS {
		p.in_cloud = true;
		p.velocity = DVec2::ZERO;
	} else {
		p.velocity = (p.velocity + displacement * CONVECTION_GAIN).clamp_length_max(CONVECTION_MAX_SPEED);
	}
}

fn contain(p: &mut Particle) {
	let Some(bound) = p.bound else {
		return;
	};
	let offset = p.position - bound.center;
	if offset.length() <= bound.radius {
		return;
	}
	let angle = offset.y.atan2(offset.x);
	let r = bound.radius * MIX_REENTRY;
	p.position = bound.center + DVec2::new(angle.cos() * r, angle.sin() * r);
	p.velocity *= -MIX_RESTITUTION;
}

fn charge_force<R: Rng + ?Sized>(p: &mut Particle, rng: &mut R) {
	match p.category {
		Category::Positive => p.velocity.y -= CHARGE_DRIFT,
		Category::Negative => p.velocity.y += CHARGE_DRIFT,
		_ => return,
	}
	p.velocity += DVec2::new(
		rng.random_range(-CHARGE_TURBULENCE..=CHARGE_TURBULENCE),
		rng.random_range(-CHARGE_TURBULENCE..=CHARGE_TURBULENCE),
	);
}

fn hold_charge_layer(p: &mut Particle, anchor: DVec2) {
	match p.category {
		Category::Positive => {
			p.position.y = p.position.y.max(anchor.y - CHARGE_LAYER_OFFSET);
		}
		Category::Negative => {
			p.position.y = p.position.y.min(anchor.y + CHARGE_LAYER_OFFSET);
		}
		_ => {}
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::super::cloud;
	use super::super::particles::Bound;
	use super::*;

	fn world(phase: Phase) -> WorldState {
		let mut world = WorldState::new(1000.0, 700.0);
		world.phase = phase;
		world
	}

	#[test]
	fn ambient_particles_stay_slow_and_above_ground() {
		let mut rng = SmallRng::seed_from_u64(10);
		let mut world = world(Phase::Ambient);
		let mut system = ParticleSystem::default();
		system.spawn_ambient(200, 120, world.width, world.height, &mut rng);

		for _ in 0..300 {
			step(&mut world, &mut system, &[], &mut rng);
			for p in &system.particles {
				assert!(p.velocity.length() <= AMBIENT_MAX_SPEED + 1e-9);
				assert!(p.position.y <= world.ground_level);
				assert!((0.0..=world.width).contains(&p.position.x));
			}
		}
	}

	#[test]
	fn ground_bounce_loses_energy() {
		let mut p = ParticleSystem::default();
		let mut rng = SmallRng::seed_from_u64(11);
		p.spawn_ambient(1, 0, 10.0, 10.0, &mut rng);
		let particle = &mut p.particles[0];
		particle.position = DVec2::new(5.0, 101.0);
		particle.velocity = DVec2::new(0.0, 1.0);

		bounce(particle, 10.0, 100.0);
		assert_eq!(particle.position.y, 100.0);
		assert!((particle.velocity.y + 0.6).abs() < 1e-12);
	}

	#[test]
	fn wall_bounce_clamps_and_reverses() {
		let mut system = ParticleSystem::default();
		let mut rng = SmallRng::seed_from_u64(19);
		system.spawn_ambient(2, 0, 10.0, 10.0, &mut rng);

		let left = &mut system.particles[0];
		left.position = DVec2::new(-3.0, 50.0);
		left.velocity = DVec2::new(-1.5, 0.2);
		bounce(left, 200.0, 100.0);
		assert_eq!(left.position.x, 0.0);
		assert!((left.velocity.x - 1.2).abs() < 1e-12);
		assert_eq!(left.velocity.y, 0.2);

		let right = &mut system.particles[1];
		right.position = DVec2::new(204.0, 50.0);
		right.velocity = DVec2::new(1.0, -0.4);
		bounce(right, 200.0, 100.0);
		assert_eq!(right.position.x, 200.0);
		assert!((right.velocity.x + 0.8).abs() < 1e-12);
		assert_eq!(right.velocity.y, -0.4);
	}

	#[test]
	fn convection_parks_particles_with_zero_velocity() {
		let mut rng = SmallRng::seed_from_u64(12);
		let mut world = world(Phase::Convection);
		let cells = cloud::generate(world.anchor, &mut rng);
		let mut system = ParticleSystem::default();
		system.spawn_ambient(40, 20, world.width, world.height, &mut rng);

		let mut parked_ever = vec![false; system.len()];
		for _ in 0..2000 {
			step(&mut world, &mut system, &cells, &mut rng);
			for (i, p) in system.particles.iter().enumerate() {
				if p.in_cloud {
					assert_eq!(p.velocity, DVec2::ZERO);
					parked_ever[i] = true;
				} else {
					assert!(!parked_ever[i], "particle {i} left the cloud");
				}
			}
		}
		assert!(parked_ever.iter().all(|&parked| parked));
		assert_eq!(world.sun_opacity, 0.0);
		assert_eq!(world.cloud_opacity, 1.0);
	}

	#[test]
	fn convection_without_cells_leaves_particles_untargeted() {
		let mut rng = SmallRng::seed_from_u64(13);
		let mut world = world(Phase::Convection);
		let mut system = ParticleSystem::default();
		system.spawn_ambient(5, 5, world.width, world.height, &mut rng);

		step(&mut world, &mut system, &[], &mut rng);
		assert!(system.particles.iter().all(|p| p.target.is_none()));
	}

	#[test]
	fn cloud_formation_cross_fades() {
		let mut rng = SmallRng::seed_from_u64(14);
		let mut world = world(Phase::Convection);
		let mut system = ParticleSystem::default();
		system.spawn_ambient(90, 0, 100.0, 100.0, &mut rng);

		check_cloud_formation(&mut world, &system);
		assert_eq!((world.sun_opacity, world.cloud_opacity), (1.0, 0.0));

		let mut last_sun = world.sun_opacity;
		for i in 0..90 {
			system.particles[i].in_cloud = true;
			check_cloud_formation(&mut world, &system);
			let fraction = (i + 1) as f64 / 90.0;
			assert!(world.sun_opacity <= last_sun);
			assert!((world.sun_opacity - (1.0 - 1.8 * fraction).max(0.0)).abs() < 1e-12);
			assert!((world.cloud_opacity - (1.5 * fraction).min(1.0)).abs() < 1e-12);
			if fraction >= 2.0 / 3.0 {
				assert_eq!(world.cloud_opacity, 1.0);
			}
			last_sun = world.sun_opacity;
		}
	}

	#[test]
	fn mixing_bound_reflects_escapees() {
		let mut rng = SmallRng::seed_from_u64(15);
		let mut world = world(Phase::ChargeSeparated);
		world.no_friction = true;
		let center = world.anchor;
		let cells = cloud::generate(center, &mut rng);
		let mut system = ParticleSystem::default();
		system.spawn_ice(&cells, &mut rng);
		system.start_mixing(center, 180.0, &mut rng);

		for _ in 0..500 {
			step(&mut world, &mut system, &cells, &mut rng);
			for p in &system.particles {
				assert!((p.position - center).length() <= 180.0 + 1e-9);
			}
		}
	}

	#[test]
	fn containment_reverses_and_slows() {
		let mut rng = SmallRng::seed_from_u64(16);
		let mut system = ParticleSystem::default();
		system.spawn_ambient(1, 0, 1.0, 1.0, &mut rng);
		let p = &mut system.particles[0];
		p.bound = Some(Bound {
			center: DVec2::ZERO,
			radius: 100.0,
		});
		p.position = DVec2::new(0.0, 120.0);
		p.velocity = DVec2::new(1.0, 4.0);

		contain(p);
		assert!((p.position.y - 95.0).abs() < 1e-9);
		assert!(p.position.x.abs() < 1e-9);
		assert!((p.velocity.x + 0.7).abs() < 1e-12);
		assert!((p.velocity.y + 2.8).abs() < 1e-12);
	}

	#[test]
	fn charges_settle_into_layers() {
		let mut rng = SmallRng::seed_from_u64(17);
		let mut world = world(Phase::ChargeSeparated);
		let cells = cloud::generate(world.anchor, &mut rng);
		let mut system = ParticleSystem::default();
		system.spawn_ice(&cells, &mut rng);
		system.separate_charges();

		for _ in 0..400 {
			step(&mut world, &mut system, &cells, &mut rng);
			for p in &system.particles {
				match p.category {
					Category::Positive => assert!(p.position.y >= world.anchor.y - 100.0),
					Category::Negative => assert!(p.position.y <= world.anchor.y + 100.0),
					other => panic!("unexpected {other:?}"),
				}
			}
		}
		let mean_y = |category| {
			let ys: Vec<f64> = system
				.particles
				.iter()
				.filter(|p| p.category == category)
				.map(|p| p.position.y)
				.collect();
			ys.iter().sum::<f64>() / ys.len() as f64
		};
		assert!(mean_y(Category::Positive) < mean_y(Category::Negative));
	}

	#[test]
	fn insulator_view_only_damps() {
		let mut rng = SmallRng::seed_from_u64(18);
		let mut world = world(Phase::Insulator);
		let mut system = ParticleSystem::default();
		system.spawn_ambient(1, 0, 10.0, 10.0, &mut rng);
		system.particles[0].velocity = DVec2::new(2.0, 0.0);
		let start = system.particles[0].position;

		step(&mut world, &mut system, &[], &mut rng);
		let p = &system.particles[0];
		assert_eq!(p.position, start + DVec2::new(2.0, 0.0));
		assert!((p.velocity.x - 1.9).abs() < 1e-12);
	}
}
