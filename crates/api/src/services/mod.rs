//! Application services bridging HTTP handlers and the persistence layer.

pub mod auth;
