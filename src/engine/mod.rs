//! Engine module housing the visualization loop.
//!
//! `clock` provides host time sources; `core` holds the `Visualizer` that
//! turns one spectrum frame into one particle scene per tick.

pub mod clock;
pub mod core;

pub use clock::{FrameClock, ManualFrameClock, SystemFrameClock};
pub use self::core::{FrameOutput, SceneRenderer, Visualizer};
