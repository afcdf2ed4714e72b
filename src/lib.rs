//! Detects repeating high/low setpoint cycles in process time-series data,
//! rebases timestamps to elapsed minutes since the first cycle, and builds a
//! cycle-annotated chart description for an external renderer.

pub mod analysis;
pub mod chart;
pub mod config;
pub mod data;
pub mod manager;
pub mod stats;
