//! Domain model definitions.

pub mod activity_log;
pub mod analytics;
pub mod csv_import;
pub mod filter;
pub mod lead;
pub mod running_ad;
pub mod service;
pub mod user;

pub use activity_log::{ActivityAction, ActivityLog, CreateActivityInput};
pub use analytics::{
    AnalyticsReport, AssignmentCount, DailyCount, DashboardStats, FollowUpSummary, IndustryCount,
    StatusBreakdown,
};
pub use csv_import::{ImportRowError, ImportSummary, MAX_IMPORT_FILE_BYTES};
pub use filter::{AssignedFilter, LeadFilter};
pub use lead::{
    is_ad_derived_source, BulkField, ClientStatus, FieldError, InlineField, Lead, LeadDraft,
    LeadForm, ValidatedLead, CSV_IMPORT_SOURCE, INDUSTRIES, MANUAL_SOURCE,
};
pub use running_ad::{CreateRunningAdRequest, RunningAd, UpdateRunningAdRequest};
pub use service::{CreateServiceRequest, Service, UpdateServiceRequest};
pub use user::{CreateUserRequest, Role, User, UserSummary};
