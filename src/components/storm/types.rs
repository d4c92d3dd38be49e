//! Shared value types: the lesson phases and host configuration.

use serde::Deserialize;

/// The six steps of the electrification lesson.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
	/// Dust and water drift near the ground under a clear sky.
	#[default]
	Ambient,
	/// Particles are carried up into the cloud.
	Convection,
	/// Small ice crystals sink, large hail rises.
	IceFormed,
	/// Collisions charge the ice; charges drift apart.
	ChargeSeparated,
	/// The cloud behaves like a charged capacitor.
	Insulator,
	/// Discharge to the ground.
	Lightning,
}

impl Phase {
	/// Every phase in lesson order.
	pub const ALL: [Phase; 6] = [
		Phase::Ambient,
		Phase::Convection,
		Phase::IceFormed,
		Phase::ChargeSeparated,
		Phase::Insulator,
		Phase::Lightning,
	];

	/// Map the host's numeric phase id (0..=5).
	pub fn from_index(index: usize) -> Option<Phase> {
		Self::ALL.get(index).copied()
	}

	/// Numeric id used by the host, inverse of [`Phase::from_index`].
	pub fn index(self) -> usize {
		self as usize
	}

	/// Short caption for phase selector buttons.
	pub fn title(self) -> &'static str {
		match self {
			Phase::Ambient => "Clear sky",
			Phase::Convection => "Convection",
			Phase::IceFormed => "Ice & hail",
			Phase::ChargeSeparated => "Charge separation",
			Phase::Insulator => "Static buildup",
			Phase::Lightning => "Lightning",
		}
	}
}

/// Host-supplied simulation settings.
///
/// Read from a `<script id="storm-config" type="application/json">` element;
/// every field is optional.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct StormConfig {
	/// Dust particles spawned for the ambient scene.
	pub dust_count: usize,
	/// Water particles spawned for the ambient scene.
	pub water_count: usize,
	/// Fixed RNG seed for reproducible runs. Seeded from `Math.random` if unset.
	pub seed: Option<u64>,
	/// Delay before convection starts on its own, in milliseconds.
	pub auto_start_ms: Option<f64>,
}

impl Default for StormConfig {
	fn default() -> Self {
		Self {
			dust_count: 200,
			water_count: 120,
			seed: None,
			auto_start_ms: Some(500.0),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn phase_index_round_trips_host_ids() {
		for (i, phase) in Phase::ALL.iter().enumerate() {
			assert_eq!(Phase::from_index(i), Some(*phase));
			assert_eq!(phase.index(), i);
		}
		assert_eq!(Phase::from_index(6), None);
	}

	#[test]
	fn config_fills_missing_fields_with_defaults() {
		let config: StormConfig = serde_json::from_str(r#"{ "dust_count": 50, "seed": 7 }"#)
			.expect("valid config");
		assert_eq!(config.dust_count, 50);
		assert_eq!(config.water_count, 120);
		assert_eq!(config.seed, Some(7));
		assert_eq!(config.auto_start_ms, Some(500.0));
	}

	#[test]
	fn config_can_disable_auto_start() {
		let config: StormConfig =
			serde_json::from_str(r#"{ "auto_start_ms": null }"#).expect("valid config");
		assert_eq!(config.auto_start_ms, None);
	}
}
