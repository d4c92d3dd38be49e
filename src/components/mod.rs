//! UI components.

pub mod storm;
