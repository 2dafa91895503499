//! Analytics and dashboard response models.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

/// Count of leads per pipeline status, including the no-status bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    pub interested: u64,
    pub not_interested: u64,
    pub budget_not_met: u64,
    pub meeting_scheduled: u64,
    pub no_status: u64,
}

impl StatusBreakdown {
    /// Leads with any non-empty status.
    pub fn contacted(&self) -> u64 {
        self.interested + self.not_interested + self.budget_not_met + self.meeting_scheduled
    }
}

/// Count of leads for one industry bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndustryCount {
    pub industry: String,
    pub count: u64,
}

/// Lead count for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// Lead count per sales owner; `user_id = None` is the Unassigned bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentCount {
    pub user_id: Option<Uuid>,
    pub name: String,
    pub count: u64,
}

/// Follow-up bucket counts relative to a reference day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FollowUpSummary {
    /// follow_up within [today, today + 7 days].
    pub upcoming: u64,
    /// follow_up strictly before today.
    pub overdue: u64,
}

/// Role-scoped dashboard numbers.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_leads: u64,
    pub status_breakdown: StatusBreakdown,
    pub conversion_rate: f64,
    pub follow_ups: FollowUpSummary,
}

/// Full analytics report (admin/marketing).
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub total_leads: u64,
    pub status_breakdown: StatusBreakdown,
    pub industry_breakdown: Vec<IndustryCount>,
    pub daily_counts: Vec<DailyCount>,
    /// Present only for admin callers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment_breakdown: Option<Vec<AssignmentCount>>,
    pub conversion_rate: f64,
    pub follow_ups: FollowUpSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contacted_sums_non_empty_statuses() {
        let breakdown = StatusBreakdown {
            interested: 3,
            not_interested: 5,
            budget_not_met: 1,
            meeting_scheduled: 2,
            no_status: 10,
        };
        assert_eq!(breakdown.contacted(), 11);
    }

    #[test]
    fn test_assignment_breakdown_omitted_when_none() {
        let report = AnalyticsReport {
            total_leads: 0,
            status_breakdown: StatusBreakdown::default(),
            industry_breakdown: vec![],
            daily_counts: vec![],
            assignment_breakdown: None,
            conversion_rate: 0.0,
            follow_ups: FollowUpSummary::default(),
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("assignment_breakdown"));
    }
}
