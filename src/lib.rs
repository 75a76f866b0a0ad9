//! Gamepad TestKit - Gamepad polling rate and input accuracy measurement
//!
//! Measures how frequently an XInput controller reports state changes,
//! quantifies timing jitter, and scores the geometric accuracy of
//! analog-stick travel.

pub mod circularity;
pub mod config;
pub mod detect;
pub mod gamepad;
pub mod recorder;
pub mod report;
pub mod session;
pub mod stats;

pub use config::Config;
