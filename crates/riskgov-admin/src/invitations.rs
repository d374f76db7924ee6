//! Invitation and user-approval workflow.
//!
//! invite → accept (PENDING_APPROVAL user) → approve or reject.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use riskgov_core::config::AdminConfig;
use riskgov_core::constants::SYSTEM_ACTOR;
use riskgov_core::errors::{AdminError, RiskGovError, RiskGovResult};
use riskgov_core::models::{
    Capability, InvitationStatus, Role, SessionContext, UserInvitation, UserProfile, UserStatus,
};
use riskgov_core::traits::IAdminStorage;
use riskgov_observability::events;

use crate::clean_name;
use crate::email::normalize_email;

pub struct InvitationService {
    store: Arc<dyn IAdminStorage>,
    config: AdminConfig,
}

impl InvitationService {
    pub fn new(store: Arc<dyn IAdminStorage>, config: AdminConfig) -> Self {
        Self { store, config }
    }

    pub fn invite(
        &self,
        ctx: &SessionContext,
        organization_id: &str,
        email: &str,
        role: Role,
    ) -> RiskGovResult<UserInvitation> {
        self.invite_at(ctx, organization_id, email, role, Utc::now())
    }

    /// The inviter's role must outrank `role`. One live pending invitation
    /// per address, and none for an address that already has a user. A
    /// lapsed PENDING invitation for the address is marked EXPIRED first.
    pub fn invite_at(
        &self,
        ctx: &SessionContext,
        organization_id: &str,
        email: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> RiskGovResult<UserInvitation> {
        ctx.require_in(Capability::InviteUsers, organization_id)?;
        if !ctx.role.can_assign(role) {
            events::permission_denied(&ctx.user_id, ctx.role.as_str(), "assign role");
            return Err(ctx.denied(&format!("invite a {role}")));
        }
        let email = normalize_email(email)?;
        if self.store.find_user_by_email(organization_id, &email)?.is_some() {
            return Err(AdminError::DuplicateName { entity: "user", name: email }.into());
        }
        let pending = self
            .store
            .list_invitations(organization_id, Some(InvitationStatus::Pending))?;
        for existing in pending.iter().filter(|i| i.email.eq_ignore_ascii_case(&email)) {
            if !existing.is_expired_at(now) {
                return Err(AdminError::DuplicateName {
                    entity: "pending invitation",
                    name: email,
                }
                .into());
            }
            self.store
                .set_invitation_status(&existing.id, InvitationStatus::Expired, SYSTEM_ACTOR)?;
            tracing::debug!(invitation_id = %existing.id, "lapsed invitation expired on re-invite");
        }

        let invitation = UserInvitation {
            id: riskgov_core::new_id(),
            organization_id: organization_id.to_string(),
            email,
            role,
            token: riskgov_core::new_id(),
            invited_by: ctx.user_id.clone(),
            status: InvitationStatus::Pending,
            created_at: now,
            expires_at: now + Duration::days(i64::from(self.config.invitation_ttl_days)),
            accepted_at: None,
        };
        self.store.create_invitation(&invitation)?;
        tracing::info!(
            invitation_id = %invitation.id,
            organization_id,
            role = %role,
            expires_at = %invitation.expires_at,
            "invitation created"
        );
        Ok(invitation)
    }

    pub fn accept(&self, token: &str, full_name: &str) -> RiskGovResult<UserProfile> {
        self.accept_at(token, full_name, Utc::now())
    }

    /// Redeem `token`. An expired invitation is marked EXPIRED before the
    /// error is returned.
    pub fn accept_at(
        &self,
        token: &str,
        full_name: &str,
        now: DateTime<Utc>,
    ) -> RiskGovResult<UserProfile> {
        let full_name = clean_name("full_name", full_name)?;
        let invitation = self
            .store
            .find_invitation_by_token(token)?
            .ok_or_else(|| RiskGovError::not_found("invitation", "token"))?;
        if invitation.status == InvitationStatus::Pending && invitation.is_expired_at(now) {
            self.store
                .set_invitation_status(&invitation.id, InvitationStatus::Expired, SYSTEM_ACTOR)?;
            tracing::warn!(invitation_id = %invitation.id, "expired invitation redeemed");
            return Err(AdminError::InvitationExpired {
                id: invitation.id,
                expired_at: invitation.expires_at.to_rfc3339(),
            }
            .into());
        }
        let user = UserProfile {
            id: riskgov_core::new_id(),
            organization_id: invitation.organization_id.clone(),
            email: invitation.email.clone(),
            full_name,
            role: invitation.role,
            status: UserStatus::PendingApproval,
            created_at: now,
        };
        self.store.accept_invitation(&invitation.id, &user, now)?;
        events::admin_change("user", &user.id, "accept_invitation", &user.id);
        Ok(user)
    }

    /// PENDING → REVOKED.
    pub fn revoke(&self, ctx: &SessionContext, invitation_id: &str) -> RiskGovResult<UserInvitation> {
        let invitation = self
            .store
            .get_invitation(invitation_id)?
            .ok_or_else(|| RiskGovError::not_found("invitation", invitation_id))?;
        ctx.require_in(Capability::InviteUsers, &invitation.organization_id)?;
        let revoked =
            self.store
                .set_invitation_status(invitation_id, InvitationStatus::Revoked, &ctx.user_id)?;
        events::admin_change("invitation", invitation_id, "revoke", &ctx.user_id);
        Ok(revoked)
    }

    /// Sweep every stale PENDING invitation to EXPIRED.
    pub fn expire_stale(&self, now: DateTime<Utc>) -> RiskGovResult<usize> {
        let expired = self.store.expire_invitations(now)?;
        if expired > 0 {
            tracing::info!(expired, "stale invitations expired");
        }
        Ok(expired)
    }

    pub fn list_invitations(
        &self,
        ctx: &SessionContext,
        organization_id: &str,
        status: Option<InvitationStatus>,
    ) -> RiskGovResult<Vec<UserInvitation>> {
        ctx.require_in(Capability::InviteUsers, organization_id)?;
        self.store.list_invitations(organization_id, status)
    }

    pub fn list_users(
        &self,
        ctx: &SessionContext,
        organization_id: &str,
        status: Option<UserStatus>,
    ) -> RiskGovResult<Vec<UserProfile>> {
        ctx.require_in(Capability::ViewGovernance, organization_id)?;
        self.store.list_users(organization_id, status)
    }

    pub fn approve_user(&self, ctx: &SessionContext, user_id: &str) -> RiskGovResult<UserProfile> {
        self.decide(ctx, user_id, UserStatus::Active)
    }

    pub fn reject_user(&self, ctx: &SessionContext, user_id: &str) -> RiskGovResult<UserProfile> {
        self.decide(ctx, user_id, UserStatus::Rejected)
    }

    pub fn suspend_user(&self, ctx: &SessionContext, user_id: &str) -> RiskGovResult<UserProfile> {
        let user = self.user(user_id)?;
        ctx.require_in(Capability::ApproveUsers, &user.organization_id)?;
        if user.status != UserStatus::Active {
            return Err(RiskGovError::validation("status", format!("user is {}", user.status.as_str())));
        }
        self.store.set_user_status(user_id, UserStatus::Suspended, &ctx.user_id)
    }

    fn decide(
        &self,
        ctx: &SessionContext,
        user_id: &str,
        status: UserStatus,
    ) -> RiskGovResult<UserProfile> {
        let user = self.user(user_id)?;
        ctx.require_in(Capability::ApproveUsers, &user.organization_id)?;
        if user.status != UserStatus::PendingApproval {
            return Err(RiskGovError::validation(
                "status",
                format!("user is {}, expected PENDING_APPROVAL", user.status.as_str()),
            ));
        }
        let updated = self.store.set_user_status(user_id, status, &ctx.user_id)?;
        events::admin_change("user", user_id, status.as_str(), &ctx.user_id);
        Ok(updated)
    }

    fn user(&self, id: &str) -> RiskGovResult<UserProfile> {
        self.store
            .get_user(id)?
            .ok_or_else(|| RiskGovError::not_found("user", id))
    }
}
