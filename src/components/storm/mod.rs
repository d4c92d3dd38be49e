//! Thunderstorm electrification animation.
//!
//! Renders an educational storm on an HTML canvas:
//! - Dust and water rise from the ground into a forming cloud
//! - Ice crystals and hail form inside the cloud
//! - Collisions charge the ice; positive charge rises, negative sinks
//! - The charged cloud is shown as a capacitor, then discharges as lightning
//!
//! The host selects lesson steps through the `phase` signal and fires bolts by
//! bumping the `strikes` counter.
//!
//! # Example
//!
//! ```ignore
//! let (phase, set_phase) = signal(Phase::Ambient);
//! let (strikes, set_strikes) = signal(0u32);
//!
//! view! { <StormCanvas phase=phase strikes=strikes fullscreen=true /> }
//! ```

mod cloud;
mod component;
mod lightning;
mod particles;
mod physics;
mod render;
mod schedule;
mod state;
pub mod theme;
mod types;

pub use cloud::{CloudCell, SunRay};
pub use component::StormCanvas;
pub use lightning::{BoltSegment, LightningState};
pub use particles::{Bound, Category, Particle, ParticleSystem};
pub use state::{StormState, WorldState};
pub use theme::Theme;
pub use types::{Phase, StormConfig};
