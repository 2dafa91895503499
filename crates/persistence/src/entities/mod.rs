//! Database entity definitions (row mappings).

pub mod activity_log;
pub mod lead;
pub mod running_ad;
pub mod service;
pub mod user;

pub use activity_log::ActivityLogEntity;
pub use lead::LeadEntity;
pub use running_ad::RunningAdEntity;
pub use service::ServiceEntity;
pub use user::{SessionEntity, UserEntity};
