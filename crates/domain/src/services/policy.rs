//! Access policy: role/permission table and lead visibility.
//!
//! Every role check in the API delegates here; route handlers never compare
//! role strings themselves. Repository operations that return leads take a
//! [`LeadVisibility`] and apply it in SQL, so a lead outside the caller's
//! visibility is indistinguishable from a missing one.

use uuid::Uuid;

use crate::models::Role;

/// Actions gated by the permission table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ViewAllLeads,
    EditLeads,
    AddLeads,
    DeleteLeads,
    /// Set or clear a lead's owner directly.
    AssignLeads,
    ViewAnalytics,
    ExportLeads,
    ManageUsers,
    /// Create and edit the service catalog.
    ManageServices,
    /// Create and edit running ad campaigns.
    ManageCampaigns,
}

/// Fixed role/permission mapping. No per-user overrides.
pub fn can(role: Role, permission: Permission) -> bool {
    match role {
        Role::Admin => true,
        Role::Sales => matches!(
            permission,
            Permission::EditLeads | Permission::AddLeads | Permission::ExportLeads
        ),
        Role::Marketing => matches!(
            permission,
            Permission::ViewAllLeads
                | Permission::ViewAnalytics
                | Permission::ExportLeads
                | Permission::ManageCampaigns
        ),
    }
}

/// Whether a user with this role may own leads. Lead ownership drives
/// sales visibility, so only sales accounts may hold it; admin and
/// marketing act on leads without owning them.
pub fn can_own_leads(role: Role) -> bool {
    role == Role::Sales
}

/// Row-visibility predicate over leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadVisibility {
    /// All leads (admin, marketing).
    All,
    /// Only leads owned by the given user (sales).
    AssignedTo(Uuid),
}

/// Computes the visibility predicate for a role/user pair.
pub fn visibility(role: Role, user_id: Uuid) -> LeadVisibility {
    match role {
        Role::Admin | Role::Marketing => LeadVisibility::All,
        Role::Sales => LeadVisibility::AssignedTo(user_id),
    }
}

impl LeadVisibility {
    /// Whether a lead with the given owner is visible under this predicate.
    pub fn allows(&self, assigned_to: Option<Uuid>) -> bool {
        match self {
            LeadVisibility::All => true,
            LeadVisibility::AssignedTo(user_id) => assigned_to == Some(*user_id),
        }
    }
}
