//! Deferred actions owned by a phase generation.
//!
//! Every phase switch bumps the generation. An action only runs if the
//! generation that scheduled it is still current; otherwise it is dropped.

/// Work the state machine wants done later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
	/// Start convection without user input.
	AutoConvection,
	/// Re-randomise ice velocities; repeats until the mix ends.
	MixKick,
	/// End the turbulent mix and split the ice into charges.
	FinishChargeMix,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Pending {
	action: Action,
	generation: u64,
	due_ms: f64,
}

#[derive(Clone, Debug, Default)]
pub struct Scheduler {
	pending: Vec<Pending>,
}

impl Scheduler {
	/// Queue `action` to run at `due_ms` if `generation` is still current then.
	pub fn schedule(&mut self, action: Action, generation: u64, due_ms: f64) {
		// One slot per action kind: re-scheduling replaces the old timer.
		self.pending.retain(|p| p.action != action);
		self.pending.push(Pending {
			action,
			generation,
			due_ms,
		});
	}

	/// Drop everything scheduled by an older generation.
	pub fn cancel_stale(&mut self, generation: u64) {
		self.pending.retain(|p| p.generation == generation);
	}

	pub fn is_pending(&self, action: Action) -> bool {
		self.pending.iter().any(|p| p.action == action)
	}

	pub fn is_empty(&self) -> bool {
		self.pending.is_empty()
	}

	/// Remove and return the actions due at `now_ms` that belong to `generation`.
	///
	/// Due actions from other generations are discarded.
	pub fn take_due(&mut self, now_ms: f64, generation: u64) -> Vec<Action> {
		let mut due = Vec::new();
		self.pending.retain(|p| {
			if p.due_ms > now_ms {
				return true;
			}
			if p.generation == generation {
				due.push(p.action);
			} else {
				log::debug!("storm: dropping stale {:?} from generation {}", p.action, p.generation);
			}
			false
		});
		due
	}
}
