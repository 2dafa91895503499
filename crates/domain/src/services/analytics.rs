//! Analytics aggregation over an in-memory, already visibility-filtered
//! lead set. Pure functions; nothing here touches the database.

use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::{
    AnalyticsReport, AssignmentCount, ClientStatus, DailyCount, DashboardStats, FollowUpSummary,
    IndustryCount, Lead, StatusBreakdown, INDUSTRIES,
};

/// Number of calendar days covered by the time series, today inclusive.
pub const TIME_SERIES_DAYS: i64 = 30;

/// Follow-up dates within this many days of today count as upcoming.
pub const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Classification of a follow-up date relative to a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpState {
    /// Within [today, today + 7 days]; today itself is upcoming, not overdue.
    Upcoming,
    /// Strictly before today.
    Overdue { days_overdue: i64 },
    /// More than 7 days out.
    Later,
}

/// Classifies a follow-up date.
pub fn follow_up_state(follow_up: NaiveDate, today: NaiveDate) -> FollowUpState {
    if follow_up < today {
        FollowUpState::Overdue {
            days_overdue: (today - follow_up).num_days(),
        }
    } else if follow_up <= today + Duration::days(UPCOMING_WINDOW_DAYS) {
        FollowUpState::Upcoming
    } else {
        FollowUpState::Later
    }
}

/// Counts leads per status, including the no-status bucket.
pub fn status_breakdown(leads: &[Lead]) -> StatusBreakdown {
    let mut breakdown = StatusBreakdown::default();
    for lead in leads {
        match lead.client_status {
            Some(ClientStatus::Interested) => breakdown.interested += 1,
            Some(ClientStatus::NotInterested) => breakdown.not_interested += 1,
            Some(ClientStatus::BudgetNotMet) => breakdown.budget_not_met += 1,
            Some(ClientStatus::MeetingScheduled) => breakdown.meeting_scheduled += 1,
            None => breakdown.no_status += 1,
        }
    }
    breakdown
}

/// Conversion rate: (interested + meeting scheduled) / contacted * 100,
/// rounded to one decimal. 0.0 when nothing has been contacted.
pub fn conversion_rate(breakdown: &StatusBreakdown) -> f64 {
    let contacted = breakdown.contacted();
    if contacted == 0 {
        return 0.0;
    }
    let converted = breakdown.interested + breakdown.meeting_scheduled;
    let rate = converted as f64 / contacted as f64 * 100.0;
    (rate * 10.0).round() / 10.0
}

/// Counts leads per fixed industry bucket. Leads with an industry outside
/// the fixed list, or none at all, fall into "Other".
pub fn industry_breakdown(leads: &[Lead]) -> Vec<IndustryCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for lead in leads {
        let bucket = lead
            .industry
            .as_deref()
            .filter(|i| INDUSTRIES.contains(i))
            .unwrap_or("Other");
        *counts.entry(bucket).or_default() += 1;
    }
    INDUSTRIES
        .iter()
        .map(|industry| IndustryCount {
            industry: industry.to_string(),
            count: counts.get(industry).copied().unwrap_or(0),
        })
        .collect()
}

/// Lead counts for each of the last 30 calendar days (inclusive of today),
/// zero-filled for days with no leads.
pub fn daily_lead_counts(leads: &[Lead], today: NaiveDate) -> Vec<DailyCount> {
    let start = today - Duration::days(TIME_SERIES_DAYS - 1);
    let mut counts: HashMap<NaiveDate, u64> = HashMap::new();
    for lead in leads {
        let day = lead.created_at.date_naive();
        if day >= start && day <= today {
            *counts.entry(day).or_default() += 1;
        }
    }
    (0..TIME_SERIES_DAYS)
        .map(|offset| {
            let date = start + Duration::days(offset);
            DailyCount {
                date,
                count: counts.get(&date).copied().unwrap_or(0),
            }
        })
        .collect()
}

/// Lead counts per sales owner plus an Unassigned bucket. Admin-only view;
/// the caller provides the (id, name) list of sales users.
pub fn assignment_breakdown(leads: &[Lead], sales_users: &[(Uuid, String)]) -> Vec<AssignmentCount> {
    let mut counts: HashMap<Option<Uuid>, u64> = HashMap::new();
    for lead in leads {
        *counts.entry(lead.assigned_to).or_default() += 1;
    }

    let mut breakdown: Vec<AssignmentCount> = sales_users
        .iter()
        .map(|(id, name)| AssignmentCount {
            user_id: Some(*id),
            name: name.clone(),
            count: counts.get(&Some(*id)).copied().unwrap_or(0),
        })
        .collect();
    breakdown.push(AssignmentCount {
        user_id: None,
        name: "Unassigned".to_string(),
        count: counts.get(&None).copied().unwrap_or(0),
    });
    breakdown
}

/// Counts upcoming and overdue follow-ups.
pub fn follow_up_summary(leads: &[Lead], today: NaiveDate) -> FollowUpSummary {
    let mut summary = FollowUpSummary::default();
    for lead in leads {
        if let Some(date) = lead.follow_up {
            match follow_up_state(date, today) {
                FollowUpState::Upcoming => summary.upcoming += 1,
                FollowUpState::Overdue { .. } => summary.overdue += 1,
                FollowUpState::Later => {}
            }
        }
    }
    summary
}

/// Role-scoped dashboard numbers over the visible lead set.
pub fn dashboard_stats(leads: &[Lead], today: NaiveDate) -> DashboardStats {
    let breakdown = status_breakdown(leads);
    let rate = conversion_rate(&breakdown);
    DashboardStats {
        total_leads: leads.len() as u64,
        conversion_rate: rate,
        follow_ups: follow_up_summary(leads, today),
        status_breakdown: breakdown,
    }
}

/// Full analytics report. `sales_users` is provided for admin callers only
/// and enables the assignment breakdown.
pub fn analytics_report(
    leads: &[Lead],
    today: NaiveDate,
    sales_users: Option<&[(Uuid, String)]>,
) -> AnalyticsReport {
    let breakdown = status_breakdown(leads);
    let rate = conversion_rate(&breakdown);
    AnalyticsReport {
        total_leads: leads.len() as u64,
        industry_breakdown: industry_breakdown(leads),
        daily_counts: daily_lead_counts(leads, today),
        assignment_breakdown: sales_users.map(|users| assignment_breakdown(leads, users)),
        conversion_rate: rate,
        follow_ups: follow_up_summary(leads, today),
        status_breakdown: breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn lead(status: Option<ClientStatus>) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            client_name: "Test Client".to_string(),
            required_services: None,
            website: None,
            phone: None,
            email: None,
            call_enquiry: None,
            mail: None,
            whatsapp: None,
            follow_up: None,
            client_status: status,
            notes: None,
            industry: None,
            assigned_to: None,
            source_ad_id: None,
            lead_source: "Manual".to_string(),
            selected_service_ids: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn leads_with_statuses(specs: &[(Option<ClientStatus>, usize)]) -> Vec<Lead> {
        specs
            .iter()
            .flat_map(|(status, n)| (0..*n).map(move |_| lead(*status)))
            .collect()
    }

    #[test]
    fn test_status_breakdown_counts_all_buckets() {
        let leads = leads_with_statuses(&[
            (Some(ClientStatus::Interested), 3),
            (Some(ClientStatus::NotInterested), 5),
            (Some(ClientStatus::MeetingScheduled), 2),
            (None, 4),
        ]);
        let breakdown = status_breakdown(&leads);
        assert_eq!(breakdown.interested, 3);
        assert_eq!(breakdown.not_interested, 5);
        assert_eq!(breakdown.meeting_scheduled, 2);
        assert_eq!(breakdown.budget_not_met, 0);
        assert_eq!(breakdown.no_status, 4);
    }

    #[test]
    fn test_conversion_rate_mixed_statuses() {
        // {Interested: 3, Meeting Scheduled: 2, Not Interested: 5}, no blanks
        let leads = leads_with_statuses(&[
            (Some(ClientStatus::Interested), 3),
            (Some(ClientStatus::MeetingScheduled), 2),
            (Some(ClientStatus::NotInterested), 5),
        ]);
        let rate = conversion_rate(&status_breakdown(&leads));
        assert_eq!(rate, 50.0);
    }

    #[test]
    fn test_conversion_rate_zero_contacted() {
        let leads = leads_with_statuses(&[(None, 7)]);
        assert_eq!(conversion_rate(&status_breakdown(&leads)), 0.0);
    }

    #[test]
    fn test_conversion_rate_one_decimal() {
        // 1 of 3 contacted = 33.333... -> 33.3
        let leads = leads_with_statuses(&[
            (Some(ClientStatus::Interested), 1),
            (Some(ClientStatus::NotInterested), 2),
        ]);
        assert_eq!(conversion_rate(&status_breakdown(&leads)), 33.3);
    }

    #[test]
    fn test_industry_breakdown_fixed_buckets() {
        let mut leads = vec![lead(None), lead(None), lead(None)];
        leads[0].industry = Some("Finance".to_string());
        leads[1].industry = Some("Finance".to_string());
        leads[2].industry = Some("Interpretive Dance".to_string()); // not in list

        let breakdown = industry_breakdown(&leads);
        assert_eq!(breakdown.len(), INDUSTRIES.len());
        let finance = breakdown.iter().find(|b| b.industry == "Finance").unwrap();
        assert_eq!(finance.count, 2);
        let other = breakdown.iter().find(|b| b.industry == "Other").unwrap();
        assert_eq!(other.count, 1);
    }

    #[test]
    fn test_daily_lead_counts_zero_filled_inclusive() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let mut l1 = lead(None);
        l1.created_at = Utc.with_ymd_and_hms(2025, 6, 30, 9, 0, 0).unwrap();
        let mut l2 = lead(None);
        l2.created_at = Utc.with_ymd_and_hms(2025, 6, 1, 23, 59, 59).unwrap();
        let mut old = lead(None);
        old.created_at = Utc.with_ymd_and_hms(2025, 5, 31, 12, 0, 0).unwrap();

        let counts = daily_lead_counts(&[l1, l2, old], today);
        assert_eq!(counts.len(), 30);
        assert_eq!(counts[0].date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(counts[0].count, 1);
        assert_eq!(counts[29].date, today);
        assert_eq!(counts[29].count, 1);
        // Everything in between zero-filled
        assert!(counts[1..29].iter().all(|c| c.count == 0));
    }

    #[test]
    fn test_assignment_breakdown_with_unassigned_bucket() {
        let amara = Uuid::new_v4();
        let jonas = Uuid::new_v4();
        let mut l1 = lead(None);
        l1.assigned_to = Some(amara);
        let mut l2 = lead(None);
        l2.assigned_to = Some(amara);
        let l3 = lead(None);

        let users = vec![(amara, "Amara".to_string()), (jonas, "Jonas".to_string())];
        let breakdown = assignment_breakdown(&[l1, l2, l3], &users);
        assert_eq!(breakdown.len(), 3);
        assert_eq!(breakdown[0].count, 2);
        assert_eq!(breakdown[1].count, 0);
        assert_eq!(breakdown[2].name, "Unassigned");
        assert_eq!(breakdown[2].count, 1);
    }

    #[test]
    fn test_follow_up_today_is_upcoming() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert_eq!(follow_up_state(today, today), FollowUpState::Upcoming);
    }

    #[test]
    fn test_follow_up_yesterday_overdue_one_day() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
        assert_eq!(
            follow_up_state(yesterday, today),
            FollowUpState::Overdue { days_overdue: 1 }
        );
    }

    #[test]
    fn test_follow_up_window_boundaries() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let plus_seven = NaiveDate::from_ymd_opt(2025, 6, 22).unwrap();
        let plus_eight = NaiveDate::from_ymd_opt(2025, 6, 23).unwrap();
        assert_eq!(follow_up_state(plus_seven, today), FollowUpState::Upcoming);
        assert_eq!(follow_up_state(plus_eight, today), FollowUpState::Later);
    }

    #[test]
    fn test_follow_up_summary_counts() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let mut upcoming = lead(None);
        upcoming.follow_up = Some(today);
        let mut overdue = lead(None);
        overdue.follow_up = Some(today - Duration::days(3));
        let mut later = lead(None);
        later.follow_up = Some(today + Duration::days(30));
        let none = lead(None);

        let summary = follow_up_summary(&[upcoming, overdue, later, none], today);
        assert_eq!(summary.upcoming, 1);
        assert_eq!(summary.overdue, 1);
    }

    #[test]
    fn test_dashboard_stats() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let leads = leads_with_statuses(&[(Some(ClientStatus::Interested), 1), (None, 1)]);
        let stats = dashboard_stats(&leads, today);
        assert_eq!(stats.total_leads, 2);
        assert_eq!(stats.conversion_rate, 100.0);
    }

    #[test]
    fn test_analytics_report_assignment_only_for_admin() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let leads = vec![lead(None)];
        let report = analytics_report(&leads, today, None);
        assert!(report.assignment_breakdown.is_none());

        let users: Vec<(Uuid, String)> = vec![];
        let report = analytics_report(&leads, today, Some(&users));
        assert!(report.assignment_breakdown.is_some());
    }
}
