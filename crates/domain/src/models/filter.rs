//! Lead search/filter criteria.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::lead::FieldError;

/// The `assigned_to` filter value `unassigned` selects leads with no owner.
pub const UNASSIGNED_SENTINEL: &str = "unassigned";

/// Optional lead filter criteria. Absent or empty fields are omitted from
/// the query predicate entirely; present fields combine with AND, always
/// together with the caller's visibility predicate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadFilter {
    /// Free-text search over client name, email, phone, required services.
    pub search: Option<String>,
    pub status: Option<String>,
    pub industry: Option<String>,
    /// A user id, or the literal `unassigned` (admin/marketing only).
    pub assigned_to: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub lead_source: Option<String>,
    pub has_follow_up: Option<bool>,
}

/// Parsed `assigned_to` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignedFilter {
    User(Uuid),
    Unassigned,
}

impl LeadFilter {
    /// Drops fields that were submitted as blank strings so they never match
    /// "empty string" semantics.
    pub fn normalized(mut self) -> Self {
        let blank_to_none =
            |v: &mut Option<String>| *v = v.take().map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        blank_to_none(&mut self.search);
        blank_to_none(&mut self.status);
        blank_to_none(&mut self.industry);
        blank_to_none(&mut self.assigned_to);
        blank_to_none(&mut self.lead_source);
        self
    }

    /// Parses the `assigned_to` criterion.
    pub fn assigned_filter(&self) -> Result<Option<AssignedFilter>, FieldError> {
        match self.assigned_to.as_deref() {
            None => Ok(None),
            Some(UNASSIGNED_SENTINEL) => Ok(Some(AssignedFilter::Unassigned)),
            Some(raw) => Uuid::parse_str(raw)
                .map(|id| Some(AssignedFilter::User(id)))
                .map_err(|_| {
                    FieldError::new("assigned_to", "Expected a user id or 'unassigned'")
                }),
        }
    }
}
