//! Business logic services.

pub mod analytics;
pub mod assignment;
pub mod csv_import;
pub mod policy;
