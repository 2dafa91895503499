//! Domain layer for the Lead Manager backend.
//!
//! This crate contains:
//! - Domain models (User, Lead, Service, RunningAd, ActivityLog)
//! - Business logic services (access policy, assignment resolver,
//!   analytics aggregation, CSV import)
//! - Domain error types

pub mod models;
pub mod services;
