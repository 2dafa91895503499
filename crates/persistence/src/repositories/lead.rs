//! Lead repository for database operations.
//!
//! Every read and mutation takes a [`LeadVisibility`]. The predicate is
//! applied inside the SQL, so a lead outside the caller's visibility behaves
//! exactly like a missing row.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::{
    AssignedFilter, BulkField, ClientStatus, InlineField, LeadDraft, LeadFilter, ValidatedLead,
};
use domain::services::policy::LeadVisibility;

use crate::entities::LeadEntity;
use crate::metrics::QueryTimer;

const LEAD_COLUMNS: &str = "id, client_name, required_services, website, phone, email, \
     call_enquiry, mail, whatsapp, follow_up, client_status, notes, industry, \
     assigned_to, source_ad_id, lead_source, selected_service_ids, created_at, updated_at";

/// Typed value for the single-field inline edit path.
#[derive(Debug, Clone)]
pub enum InlineValue {
    Date(Option<NaiveDate>),
    Status(Option<ClientStatus>),
    Text(Option<String>),
}

/// Typed value for the bulk update path.
#[derive(Debug, Clone)]
pub enum BulkValue {
    Status(Option<ClientStatus>),
    Text(Option<String>),
    Owner(Option<Uuid>),
}

/// Owner parameter for visibility-guarded queries. NULL means unrestricted.
fn owner_param(visibility: LeadVisibility) -> Option<Uuid> {
    match visibility {
        LeadVisibility::All => None,
        LeadVisibility::AssignedTo(user_id) => Some(user_id),
    }
}

/// Helper struct for building dynamic WHERE clauses from lead filters.
/// Tracks conditions and parameter positions to avoid code duplication.
struct LeadFilterBuilder {
    conditions: Vec<String>,
    param_count: i32,
}

impl LeadFilterBuilder {
    fn build(
        visibility: LeadVisibility,
        filter: &LeadFilter,
        assigned: Option<AssignedFilter>,
    ) -> Self {
        let mut conditions = Vec::new();
        let mut param_count = 0;

        if matches!(visibility, LeadVisibility::AssignedTo(_)) {
            param_count += 1;
            conditions.push(format!("assigned_to = ${}", param_count));
        }

        if filter.search.is_some() {
            param_count += 1;
            conditions.push(format!(
                "(client_name ILIKE ${p} OR email ILIKE ${p} OR phone ILIKE ${p} \
                 OR required_services ILIKE ${p})",
                p = param_count
            ));
        }

        if filter.status.is_some() {
            param_count += 1;
            conditions.push(format!("client_status = ${}", param_count));
        }

        if filter.industry.is_some() {
            param_count += 1;
            conditions.push(format!("industry = ${}", param_count));
        }

        match assigned {
            Some(AssignedFilter::User(_)) => {
                param_count += 1;
                conditions.push(format!("assigned_to = ${}", param_count));
            }
            Some(AssignedFilter::Unassigned) => {
                conditions.push("assigned_to IS NULL".to_string());
            }
            None => {}
        }

        if filter.date_from.is_some() {
            param_count += 1;
            conditions.push(format!("created_at::date >= ${}", param_count));
        }

        if filter.date_to.is_some() {
            param_count += 1;
            conditions.push(format!("created_at::date <= ${}", param_count));
        }

        if filter.lead_source.is_some() {
            param_count += 1;
            conditions.push(format!("lead_source = ${}", param_count));
        }

        match filter.has_follow_up {
            Some(true) => conditions.push("follow_up IS NOT NULL".to_string()),
            Some(false) => conditions.push("follow_up IS NULL".to_string()),
            None => {}
        }

        Self {
            conditions,
            param_count,
        }
    }

    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    fn param_count(&self) -> i32 {
        self.param_count
    }
}

/// Macro to bind lead filter parameters to a SQLx builder, in the same order
/// the builder emitted conditions.
macro_rules! bind_lead_filters {
    ($builder:expr, $visibility:expr, $filter:expr, $assigned:expr, $search_pattern:expr) => {{
        let mut b = $builder;
        if let Some(owner) = owner_param($visibility) {
            b = b.bind(owner);
        }
        if let Some(ref pattern) = $search_pattern {
            b = b.bind(pattern);
        }
        if let Some(ref status) = $filter.status {
            b = b.bind(status);
        }
        if let Some(ref industry) = $filter.industry {
            b = b.bind(industry);
        }
        if let Some(AssignedFilter::User(user_id)) = $assigned {
            b = b.bind(user_id);
        }
        if let Some(date_from) = $filter.date_from {
            b = b.bind(date_from);
        }
        if let Some(date_to) = $filter.date_to {
            b = b.bind(date_to);
        }
        if let Some(ref lead_source) = $filter.lead_source {
            b = b.bind(lead_source);
        }
        b
    }};
}

/// Repository for lead database operations.
#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    /// Creates a new LeadRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new lead.
    pub async fn insert(&self, draft: &LeadDraft) -> Result<LeadEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_lead");
        let f = &draft.fields;
        let result = sqlx::query_as::<_, LeadEntity>(&format!(
            r#"
            INSERT INTO leads (
                client_name, required_services, website, phone, email,
                call_enquiry, mail, whatsapp, follow_up, client_status,
                notes, industry, assigned_to, source_ad_id, lead_source,
                selected_service_ids
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {}
            "#,
            LEAD_COLUMNS
        ))
        .bind(&f.client_name)
        .bind(&f.required_services)
        .bind(&f.website)
        .bind(&f.phone)
        .bind(&f.email)
        .bind(&f.call_enquiry)
        .bind(&f.mail)
        .bind(&f.whatsapp)
        .bind(f.follow_up)
        .bind(f.client_status.map(|s| s.as_str()))
        .bind(&f.notes)
        .bind(&f.industry)
        .bind(draft.assigned_to)
        .bind(f.source_ad_id)
        .bind(&f.lead_source)
        .bind(&f.selected_service_ids)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a visible lead by ID.
    pub async fn find_by_id(
        &self,
        id: Uuid,
        visibility: LeadVisibility,
    ) -> Result<Option<LeadEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_lead_by_id");
        let result = sqlx::query_as::<_, LeadEntity>(&format!(
            r#"
            SELECT {}
            FROM leads
            WHERE id = $1 AND ($2::uuid IS NULL OR assigned_to = $2)
            "#,
            LEAD_COLUMNS
        ))
        .bind(id)
        .bind(owner_param(visibility))
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List visible leads matching the filter, newest first.
    pub async fn list(
        &self,
        visibility: LeadVisibility,
        filter: &LeadFilter,
        assigned: Option<AssignedFilter>,
        limit: i64,
    ) -> Result<Vec<LeadEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_leads");

        let builder = LeadFilterBuilder::build(visibility, filter, assigned);
        let query = format!(
            "SELECT {} FROM leads {} ORDER BY created_at DESC LIMIT ${}",
            LEAD_COLUMNS,
            builder.where_clause(),
            builder.param_count() + 1
        );

        let search_pattern = filter.search.as_ref().map(|s| format!("%{}%", s));
        let q = sqlx::query_as::<_, LeadEntity>(&query);
        let q = bind_lead_filters!(q, visibility, filter, assigned, search_pattern);
        let result = q.bind(limit).fetch_all(&self.pool).await;
        timer.record();
        result
    }

    /// Load all visible leads. Used by the analytics aggregations.
    pub async fn list_visible(
        &self,
        visibility: LeadVisibility,
    ) -> Result<Vec<LeadEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_visible_leads");
        let result = sqlx::query_as::<_, LeadEntity>(&format!(
            r#"
            SELECT {}
            FROM leads
            WHERE ($1::uuid IS NULL OR assigned_to = $1)
            ORDER BY created_at DESC
            "#,
            LEAD_COLUMNS
        ))
        .bind(owner_param(visibility))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replace all editable fields of a visible lead.
    pub async fn update(
        &self,
        id: Uuid,
        fields: &ValidatedLead,
        assigned_to: Option<Uuid>,
        visibility: LeadVisibility,
    ) -> Result<Option<LeadEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_lead");
        let result = sqlx::query_as::<_, LeadEntity>(&format!(
            r#"
            UPDATE leads
            SET client_name = $3, required_services = $4, website = $5, phone = $6,
                email = $7, call_enquiry = $8, mail = $9, whatsapp = $10,
                follow_up = $11, client_status = $12, notes = $13, industry = $14,
                assigned_to = $15, source_ad_id = $16, lead_source = $17,
                selected_service_ids = $18, updated_at = NOW()
            WHERE id = $1 AND ($2::uuid IS NULL OR assigned_to = $2)
            RETURNING {}
            "#,
            LEAD_COLUMNS
        ))
        .bind(id)
        .bind(owner_param(visibility))
        .bind(&fields.client_name)
        .bind(&fields.required_services)
        .bind(&fields.website)
        .bind(&fields.phone)
        .bind(&fields.email)
        .bind(&fields.call_enquiry)
        .bind(&fields.mail)
        .bind(&fields.whatsapp)
        .bind(fields.follow_up)
        .bind(fields.client_status.map(|s| s.as_str()))
        .bind(&fields.notes)
        .bind(&fields.industry)
        .bind(assigned_to)
        .bind(fields.source_ad_id)
        .bind(&fields.lead_source)
        .bind(&fields.selected_service_ids)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Set a single inline-editable field on a visible lead.
    pub async fn update_inline(
        &self,
        id: Uuid,
        field: InlineField,
        value: InlineValue,
        visibility: LeadVisibility,
    ) -> Result<Option<LeadEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_lead_inline");
        let query = format!(
            r#"
            UPDATE leads
            SET {} = $3, updated_at = NOW()
            WHERE id = $1 AND ($2::uuid IS NULL OR assigned_to = $2)
            RETURNING {}
            "#,
            field.column(),
            LEAD_COLUMNS
        );

        let q = sqlx::query_as::<_, LeadEntity>(&query)
            .bind(id)
            .bind(owner_param(visibility));
        let q = match value {
            InlineValue::Date(date) => q.bind(date),
            InlineValue::Status(status) => q.bind(status.map(|s| s.as_str())),
            InlineValue::Text(text) => q.bind(text),
        };
        let result = q.fetch_optional(&self.pool).await;
        timer.record();
        result
    }

    /// Set one field across many visible leads. Returns the number of leads
    /// actually updated; ids outside visibility are silently skipped.
    pub async fn bulk_update(
        &self,
        ids: &[Uuid],
        field: BulkField,
        value: BulkValue,
        visibility: LeadVisibility,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("bulk_update_leads");
        let query = format!(
            r#"
            UPDATE leads
            SET {} = $3, updated_at = NOW()
            WHERE id = ANY($1) AND ($2::uuid IS NULL OR assigned_to = $2)
            "#,
            field.column()
        );

        let q = sqlx::query(&query).bind(ids).bind(owner_param(visibility));
        let q = match value {
            BulkValue::Status(status) => q.bind(status.map(|s| s.as_str())),
            BulkValue::Text(text) => q.bind(text),
            BulkValue::Owner(owner) => q.bind(owner),
        };
        let result = q.execute(&self.pool).await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Reassign a lead to a new owner (or clear the owner).
    pub async fn set_owner(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
    ) -> Result<Option<LeadEntity>, sqlx::Error> {
        let timer = QueryTimer::new("set_lead_owner");
        let result = sqlx::query_as::<_, LeadEntity>(&format!(
            r#"
            UPDATE leads
            SET assigned_to = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            LEAD_COLUMNS
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a lead. Returns false when no such lead exists.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_lead");
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter_with(
        search: Option<&str>,
        status: Option<&str>,
        has_follow_up: Option<bool>,
    ) -> LeadFilter {
        LeadFilter {
            search: search.map(str::to_string),
            status: status.map(str::to_string),
            has_follow_up,
            ..LeadFilter::default()
        }
    }

    #[test]
    fn test_filter_builder_no_criteria_all_visibility() {
        let builder =
            LeadFilterBuilder::build(LeadVisibility::All, &LeadFilter::default(), None);
        assert_eq!(builder.where_clause(), "");
        assert_eq!(builder.param_count(), 0);
    }

    #[test]
    fn test_filter_builder_visibility_is_first_param() {
        let builder = LeadFilterBuilder::build(
            LeadVisibility::AssignedTo(Uuid::new_v4()),
            &filter_with(None, Some("Interested"), None),
            None,
        );
        assert_eq!(
            builder.where_clause(),
            "WHERE assigned_to = $1 AND client_status = $2"
        );
        assert_eq!(builder.param_count(), 2);
    }

    #[test]
    fn test_filter_builder_search_reuses_one_param() {
        let builder = LeadFilterBuilder::build(
            LeadVisibility::All,
            &filter_with(Some("acme"), None, None),
            None,
        );
        assert_eq!(builder.param_count(), 1);
        assert!(builder.where_clause().contains("client_name ILIKE $1"));
        assert!(builder.where_clause().contains("required_services ILIKE $1"));
    }

    #[test]
    fn test_filter_builder_unassigned_adds_no_param() {
        let builder = LeadFilterBuilder::build(
            LeadVisibility::All,
            &LeadFilter::default(),
            Some(AssignedFilter::Unassigned),
        );
        assert_eq!(builder.where_clause(), "WHERE assigned_to IS NULL");
        assert_eq!(builder.param_count(), 0);
    }

    #[test]
    fn test_filter_builder_has_follow_up_variants() {
        let with = LeadFilterBuilder::build(
            LeadVisibility::All,
            &filter_with(None, None, Some(true)),
            None,
        );
        assert_eq!(with.where_clause(), "WHERE follow_up IS NOT NULL");

        let without = LeadFilterBuilder::build(
            LeadVisibility::All,
            &filter_with(None, None, Some(false)),
            None,
        );
        assert_eq!(without.where_clause(), "WHERE follow_up IS NULL");
    }

    #[test]
    fn test_filter_builder_date_range_params_in_order() {
        let filter = LeadFilter {
            date_from: Some(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
            date_to: Some(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()),
            ..LeadFilter::default()
        };
        let builder = LeadFilterBuilder::build(LeadVisibility::All, &filter, None);
        assert_eq!(
            builder.where_clause(),
            "WHERE created_at::date >= $1 AND created_at::date <= $2"
        );
    }
}
