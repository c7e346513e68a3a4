//! Reinforcement-service ("reforço") booking rules for the CCB Organiza dashboard.
//!
//! The [`booking`] module holds the pure decision functions together with the
//! stores, service, and HTTP routes that surround them. [`config`], [`error`],
//! and [`telemetry`] carry the application plumbing shared with the API binary.

pub mod booking;
pub mod config;
pub mod error;
pub mod telemetry;
