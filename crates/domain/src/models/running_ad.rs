//! Running ad (campaign) models.
//!
//! A running ad is a marketing-configured lead source. Its
//! `assigned_sales_member` is the authoritative owner for any lead whose
//! `source_ad_id` points at the campaign.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// An ad campaign.
#[derive(Debug, Clone, Serialize)]
pub struct RunningAd {
    pub id: Uuid,
    pub ad_name: String,
    pub service_id: Uuid,
    pub platform: String,
    pub budget: f64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub target_audience: Option<String>,
    pub ad_copy: Option<String>,
    pub assigned_sales_member: Uuid,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a campaign (marketing or admin).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRunningAdRequest {
    #[validate(length(min = 1, max = 150, message = "ad_name must be 1-150 characters"))]
    pub ad_name: String,

    pub service_id: Uuid,

    #[validate(length(min = 1, max = 50, message = "platform must be 1-50 characters"))]
    pub platform: String,

    #[validate(range(min = 0.0, message = "budget must be non-negative"))]
    pub budget: f64,

    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,

    #[validate(length(max = 500, message = "target_audience must be at most 500 characters"))]
    pub target_audience: Option<String>,

    #[validate(length(max = 2000, message = "ad_copy must be at most 2000 characters"))]
    pub ad_copy: Option<String>,

    /// Owning sales user for leads captured by this campaign. Required.
    pub assigned_sales_member: Uuid,
}

/// Request to update a campaign. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRunningAdRequest {
    #[validate(length(min = 1, max = 150, message = "ad_name must be 1-150 characters"))]
    pub ad_name: Option<String>,

    pub service_id: Option<Uuid>,

    #[validate(length(min = 1, max = 50, message = "platform must be 1-50 characters"))]
    pub platform: Option<String>,

    #[validate(range(min = 0.0, message = "budget must be non-negative"))]
    pub budget: Option<f64>,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    #[validate(length(max = 500, message = "target_audience must be at most 500 characters"))]
    pub target_audience: Option<String>,

    #[validate(length(max = 2000, message = "ad_copy must be at most 2000 characters"))]
    pub ad_copy: Option<String>,

    pub assigned_sales_member: Option<Uuid>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_running_ad_validation() {
        let req = CreateRunningAdRequest {
            ad_name: String::new(),
            service_id: Uuid::new_v4(),
            platform: "Facebook".to_string(),
            budget: -10.0,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: None,
            target_audience: None,
            ad_copy: None,
            assigned_sales_member: Uuid::new_v4(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("ad_name"));
        assert!(errors.field_errors().contains_key("budget"));
    }

    #[test]
    fn test_create_running_ad_valid() {
        let req = CreateRunningAdRequest {
            ad_name: "Spring SEO Push".to_string(),
            service_id: Uuid::new_v4(),
            platform: "Google".to_string(),
            budget: 1500.0,
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            end_date: Some(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()),
            target_audience: Some("SMB owners".to_string()),
            ad_copy: None,
            assigned_sales_member: Uuid::new_v4(),
        };
        assert!(req.validate().is_ok());
    }
}
