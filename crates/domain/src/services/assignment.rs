//! Ad-campaign assignment resolver.
//!
//! Computes a lead's owner at create or edit time. Evaluated strictly in
//! priority order:
//!
//! 1. Ad-derived source with a selected, existing campaign: the campaign's
//!    `assigned_sales_member` wins. Unconditional on create; on edit only
//!    when the actor set the explicit reassign confirmation, since the lead
//!    may already have a different owner.
//! 2. Otherwise admins assign whoever they picked (or leave unassigned).
//! 3. Otherwise a sales actor self-assigns on create; on edit the existing
//!    owner stays untouched regardless of form input.
//!
//! A `source_ad_id` pointing at a campaign that no longer exists falls back
//! to the manual rules instead of failing the operation.

use uuid::Uuid;

use crate::models::{is_ad_derived_source, Role};

/// Whether a lead is being created or an existing one edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOp {
    Create,
    Edit {
        /// The lead's current owner.
        current: Option<Uuid>,
        /// Actor explicitly opted into campaign auto-assignment.
        confirm_reassign: bool,
    },
}

/// Inputs to the assignment decision.
#[derive(Debug, Clone)]
pub struct AssignmentInput<'a> {
    pub actor_role: Role,
    pub actor_id: Uuid,
    pub lead_source: &'a str,
    /// `assigned_sales_member` of the selected campaign, if a campaign was
    /// selected and it exists.
    pub campaign_owner: Option<Uuid>,
    /// Owner explicitly picked in the manual-override control (admins).
    pub manual_selection: Option<Uuid>,
    pub op: AssignmentOp,
}

/// Resolves the `assigned_to` value for a lead mutation.
pub fn resolve_assignment(input: &AssignmentInput) -> Option<Uuid> {
    if is_ad_derived_source(input.lead_source) {
        if let Some(owner) = input.campaign_owner {
            match input.op {
                AssignmentOp::Create => return Some(owner),
                AssignmentOp::Edit {
                    confirm_reassign: true,
                    ..
                } => return Some(owner),
                AssignmentOp::Edit { .. } => {}
            }
        }
    }

    match (input.actor_role, input.op) {
        (Role::Admin, _) => input.manual_selection,
        (_, AssignmentOp::Create) => Some(input.actor_id),
        (_, AssignmentOp::Edit { current, .. }) => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input<'a>(role: Role, actor: Uuid, source: &'a str) -> AssignmentInput<'a> {
        AssignmentInput {
            actor_role: role,
            actor_id: actor,
            lead_source: source,
            campaign_owner: None,
            manual_selection: None,
            op: AssignmentOp::Create,
        }
    }

    #[test]
    fn test_sales_manual_create_self_assigns() {
        let actor = Uuid::new_v4();
        let result = resolve_assignment(&input(Role::Sales, actor, "Manual"));
        assert_eq!(result, Some(actor));
    }

    #[test]
    fn test_campaign_auto_assignment_wins_on_create() {
        let owner = Uuid::new_v4();
        let mut i = input(Role::Admin, Uuid::new_v4(), "Facebook Ad");
        i.campaign_owner = Some(owner);
        i.manual_selection = Some(Uuid::new_v4());
        assert_eq!(resolve_assignment(&i), Some(owner));
    }

    #[test]
    fn test_campaign_auto_assignment_overrides_sales_self() {
        let owner = Uuid::new_v4();
        let mut i = input(Role::Sales, Uuid::new_v4(), "Google Ad");
        i.campaign_owner = Some(owner);
        assert_eq!(resolve_assignment(&i), Some(owner));
    }

    #[test]
    fn test_missing_campaign_falls_back_to_admin_manual() {
        let picked = Uuid::new_v4();
        let mut i = input(Role::Admin, Uuid::new_v4(), "Facebook Ad");
        // source_ad_id referenced a campaign that does not exist
        i.campaign_owner = None;
        i.manual_selection = Some(picked);
        assert_eq!(resolve_assignment(&i), Some(picked));
    }

    #[test]
    fn test_missing_campaign_admin_unassigned() {
        let mut i = input(Role::Admin, Uuid::new_v4(), "Facebook Ad");
        i.campaign_owner = None;
        assert_eq!(resolve_assignment(&i), None);
    }

    #[test]
    fn test_admin_manual_create() {
        let picked = Uuid::new_v4();
        let mut i = input(Role::Admin, Uuid::new_v4(), "Manual");
        i.manual_selection = Some(picked);
        assert_eq!(resolve_assignment(&i), Some(picked));
    }

    #[test]
    fn test_sales_edit_cannot_reassign() {
        let current = Uuid::new_v4();
        let mut i = input(Role::Sales, Uuid::new_v4(), "Manual");
        i.manual_selection = Some(Uuid::new_v4());
        i.op = AssignmentOp::Edit {
            current: Some(current),
            confirm_reassign: false,
        };
        assert_eq!(resolve_assignment(&i), Some(current));
    }

    #[test]
    fn test_edit_campaign_requires_confirmation() {
        let current = Uuid::new_v4();
        let owner = Uuid::new_v4();
        let mut i = input(Role::Sales, Uuid::new_v4(), "Facebook Ad");
        i.campaign_owner = Some(owner);
        i.op = AssignmentOp::Edit {
            current: Some(current),
            confirm_reassign: false,
        };
        // Without the confirmation flag the owner is preserved
        assert_eq!(resolve_assignment(&i), Some(current));

        i.op = AssignmentOp::Edit {
            current: Some(current),
            confirm_reassign: true,
        };
        assert_eq!(resolve_assignment(&i), Some(owner));
    }

    #[test]
    fn test_admin_edit_reassigns_manually() {
        let picked = Uuid::new_v4();
        let mut i = input(Role::Admin, Uuid::new_v4(), "Manual");
        i.manual_selection = Some(picked);
        i.op = AssignmentOp::Edit {
            current: Some(Uuid::new_v4()),
            confirm_reassign: false,
        };
        assert_eq!(resolve_assignment(&i), Some(picked));
    }

    #[test]
    fn test_non_ad_source_ignores_campaign_owner() {
        let actor = Uuid::new_v4();
        let mut i = input(Role::Sales, actor, "Manual");
        // Campaign selected but source is not ad-derived: rule 1 does not apply
        i.campaign_owner = Some(Uuid::new_v4());
        assert_eq!(resolve_assignment(&i), Some(actor));
    }
}
