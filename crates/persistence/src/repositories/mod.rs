//! Repository implementations for database operations.

pub mod activity_log;
pub mod lead;
pub mod running_ad;
pub mod service;
pub mod user;

pub use activity_log::ActivityLogRepository;
pub use lead::{BulkValue, InlineValue, LeadRepository};
pub use running_ad::RunningAdRepository;
pub use service::ServiceRepository;
pub use user::UserRepository;
