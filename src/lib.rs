//! Route playback: advances a simulated vehicle along a recorded GPS route.
//!
//! [`playback`] holds the engine and its state machine, [`driver`] runs it
//! from real timers, and [`input`] loads the route with a bundled fallback.

pub mod config;
pub mod control;
pub mod core;
pub mod driver;
pub mod input;
pub mod playback;
pub mod render;
