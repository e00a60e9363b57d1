//! Fitness Tracker - Client-side state over the users and workouts services.
//!
//! The crate keeps one observable snapshot of a user's workouts, workout
//! plans and exercise catalog, and turns user intents into calls against the
//! remote REST services.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
