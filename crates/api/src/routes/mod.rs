//! Route handlers.

pub mod activity;
pub mod analytics;
pub mod auth;
pub mod export;
pub mod health;
pub mod import;
pub mod leads;
pub mod running_ads;
pub mod services;
pub mod users;
