//! Organization, structure, invitation, user, and regulator procedures.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde_json::json;

use riskgov_core::errors::{AdminError, RiskGovError, RiskGovResult};
use riskgov_core::models::{
    AuditEntity, AuditOperation, Department, Division, InvitationStatus, Organization,
    OrganizationStatus, Regulator, RegulatorAccess, UserInvitation, UserProfile, UserStatus,
};

use crate::audit::{AuditLogger, AuditRecord};
use crate::in_transaction;
use crate::queries::{
    invitation_ops, organization_ops, regulator_ops, structure_ops, user_ops,
};

fn load_organization(conn: &Connection, id: &str) -> RiskGovResult<Organization> {
    organization_ops::get(conn, id)?.ok_or_else(|| RiskGovError::not_found("organization", id))
}

fn load_invitation(conn: &Connection, id: &str) -> RiskGovResult<UserInvitation> {
    invitation_ops::get(conn, id)?.ok_or_else(|| RiskGovError::not_found("invitation", id))
}

fn load_user(conn: &Connection, id: &str) -> RiskGovResult<UserProfile> {
    user_ops::get(conn, id)?.ok_or_else(|| RiskGovError::not_found("user", id))
}

fn record<'a>(
    organization_id: Option<&'a str>,
    entity_type: AuditEntity,
    entity_id: &'a str,
    operation: AuditOperation,
    actor: &'a str,
    details: serde_json::Value,
) -> AuditRecord<'a> {
    AuditRecord {
        organization_id,
        entity_type,
        entity_id,
        operation,
        actor,
        details,
    }
}

// --- Organizations ---

pub fn create_organization(conn: &Connection, org: &Organization, actor: &str) -> RiskGovResult<()> {
    in_transaction(conn, "create_organization", |conn| {
        organization_ops::insert(conn, org)?;
        AuditLogger::log(
            conn,
            record(
                Some(&org.id),
                AuditEntity::Organization,
                &org.id,
                AuditOperation::Create,
                actor,
                json!({ "name": org.name, "industry": org.industry }),
            ),
        )?;
        Ok(())
    })
}

pub fn set_organization_status(
    conn: &Connection,
    id: &str,
    status: OrganizationStatus,
    actor: &str,
) -> RiskGovResult<Organization> {
    in_transaction(conn, "set_organization_status", |conn| {
        let current = load_organization(conn, id)?;
        if current.status == status {
            return Ok(current);
        }
        organization_ops::set_status(conn, id, status)?;
        let operation = match status {
            OrganizationStatus::Suspended => AuditOperation::Suspend,
            OrganizationStatus::Active => AuditOperation::Reactivate,
        };
        AuditLogger::log_simple(conn, Some(id), AuditEntity::Organization, id, operation, actor)?;
        load_organization(conn, id)
    })
}

pub fn set_organization_industry(
    conn: &Connection,
    id: &str,
    industry: Option<&str>,
    actor: &str,
) -> RiskGovResult<Organization> {
    in_transaction(conn, "set_organization_industry", |conn| {
        let current = load_organization(conn, id)?;
        organization_ops::set_industry(conn, id, industry)?;
        AuditLogger::log(
            conn,
            record(
                Some(id),
                AuditEntity::Organization,
                id,
                AuditOperation::Update,
                actor,
                json!({ "industry": { "from": current.industry, "to": industry } }),
            ),
        )?;
        load_organization(conn, id)
    })
}

// --- Structure ---

pub fn create_division(conn: &Connection, division: &Division, actor: &str) -> RiskGovResult<()> {
    in_transaction(conn, "create_division", |conn| {
        load_organization(conn, &division.organization_id)?;
        structure_ops::insert_division(conn, division)?;
        AuditLogger::log(
            conn,
            record(
                Some(&division.organization_id),
                AuditEntity::Division,
                &division.id,
                AuditOperation::Create,
                actor,
                json!({ "name": division.name }),
            ),
        )?;
        Ok(())
    })
}

pub fn rename_division(conn: &Connection, id: &str, name: &str, actor: &str) -> RiskGovResult<Division> {
    in_transaction(conn, "rename_division", |conn| {
        let current = structure_ops::get_division(conn, id)?
            .ok_or_else(|| RiskGovError::not_found("division", id))?;
        structure_ops::rename_division(conn, id, name)?;
        AuditLogger::log(
            conn,
            record(
                Some(&current.organization_id),
                AuditEntity::Division,
                id,
                AuditOperation::Update,
                actor,
                json!({ "from": current.name, "to": name }),
            ),
        )?;
        Ok(Division {
            name: name.to_string(),
            ..current
        })
    })
}

pub fn delete_division(conn: &Connection, id: &str, actor: &str) -> RiskGovResult<()> {
    in_transaction(conn, "delete_division", |conn| {
        let current = structure_ops::get_division(conn, id)?
            .ok_or_else(|| RiskGovError::not_found("division", id))?;
        let departments = structure_ops::count_departments(conn, id)?;
        if departments > 0 {
            return Err(AdminError::InUse {
                entity: "division",
                id: id.to_string(),
                reason: format!("{departments} department(s)"),
            }
            .into());
        }
        structure_ops::delete_division(conn, id)?;
        AuditLogger::log_simple(
            conn,
            Some(&current.organization_id),
            AuditEntity::Division,
            id,
            AuditOperation::Delete,
            actor,
        )?;
        Ok(())
    })
}

pub fn create_department(conn: &Connection, department: &Department, actor: &str) -> RiskGovResult<()> {
    in_transaction(conn, "create_department", |conn| {
        let division = structure_ops::get_division(conn, &department.division_id)?
            .ok_or_else(|| RiskGovError::not_found("division", &department.division_id))?;
        if division.organization_id != department.organization_id {
            return Err(RiskGovError::validation(
                "division_id",
                "division belongs to another organization",
            ));
        }
        structure_ops::insert_department(conn, department)?;
        AuditLogger::log(
            conn,
            record(
                Some(&department.organization_id),
                AuditEntity::Department,
                &department.id,
                AuditOperation::Create,
                actor,
                json!({ "name": department.name, "division_id": department.division_id }),
            ),
        )?;
        Ok(())
    })
}

pub fn delete_department(conn: &Connection, id: &str, actor: &str) -> RiskGovResult<()> {
    in_transaction(conn, "delete_department", |conn| {
        let current = structure_ops::get_department(conn, id)?
            .ok_or_else(|| RiskGovError::not_found("department", id))?;
        structure_ops::delete_department(conn, id)?;
        AuditLogger::log_simple(
            conn,
            Some(&current.organization_id),
            AuditEntity::Department,
            id,
            AuditOperation::Delete,
            actor,
        )?;
        Ok(())
    })
}

// --- Invitations and users ---

pub fn create_invitation(conn: &Connection, invitation: &UserInvitation) -> RiskGovResult<()> {
    in_transaction(conn, "create_invitation", |conn| {
        load_organization(conn, &invitation.organization_id)?;
        invitation_ops::insert(conn, invitation)?;
        AuditLogger::log(
            conn,
            record(
                Some(&invitation.organization_id),
                AuditEntity::Invitation,
                &invitation.id,
                AuditOperation::Create,
                &invitation.invited_by,
                json!({ "email": invitation.email, "role": invitation.role.as_str() }),
            ),
        )?;
        Ok(())
    })
}

pub fn set_invitation_status(
    conn: &Connection,
    id: &str,
    status: InvitationStatus,
    actor: &str,
) -> RiskGovResult<UserInvitation> {
    in_transaction(conn, "set_invitation_status", |conn| {
        let current = load_invitation(conn, id)?;
        if current.status != InvitationStatus::Pending {
            return Err(AdminError::InvitationNotPending {
                id: id.to_string(),
                status: current.status.to_string(),
            }
            .into());
        }
        invitation_ops::set_status(conn, id, status)?;
        let operation = match status {
            InvitationStatus::Revoked => AuditOperation::Revoke,
            InvitationStatus::Expired => AuditOperation::Expire,
            InvitationStatus::Accepted => AuditOperation::Accept,
            InvitationStatus::Pending => AuditOperation::Update,
        };
        AuditLogger::log_simple(
            conn,
            Some(&current.organization_id),
            AuditEntity::Invitation,
            id,
            operation,
            actor,
        )?;
        load_invitation(conn, id)
    })
}

pub fn accept_invitation(
    conn: &Connection,
    invitation_id: &str,
    user: &UserProfile,
    at: DateTime<Utc>,
) -> RiskGovResult<UserInvitation> {
    in_transaction(conn, "accept_invitation", |conn| {
        let current = load_invitation(conn, invitation_id)?;
        if current.status != InvitationStatus::Pending {
            return Err(AdminError::InvitationNotPending {
                id: invitation_id.to_string(),
                status: current.status.to_string(),
            }
            .into());
        }
        if current.is_expired_at(at) {
            return Err(AdminError::InvitationExpired {
                id: invitation_id.to_string(),
                expired_at: current.expires_at.to_rfc3339(),
            }
            .into());
        }
        if !invitation_ops::mark_accepted(conn, invitation_id, at)? {
            return Err(AdminError::InvitationNotPending {
                id: invitation_id.to_string(),
                status: current.status.to_string(),
            }
            .into());
        }
        user_ops::insert(conn, user)?;
        let org = Some(current.organization_id.as_str());
        AuditLogger::log_simple(
            conn,
            org,
            AuditEntity::Invitation,
            invitation_id,
            AuditOperation::Accept,
            &user.id,
        )?;
        AuditLogger::log(
            conn,
            record(
                org,
                AuditEntity::User,
                &user.id,
                AuditOperation::Create,
                &user.id,
                json!({ "email": user.email, "role": user.role.as_str() }),
            ),
        )?;
        load_invitation(conn, invitation_id)
    })
}

pub fn expire_invitations(conn: &Connection, now: DateTime<Utc>) -> RiskGovResult<usize> {
    in_transaction(conn, "expire_invitations", |conn| {
        let stale = invitation_ops::stale_pending_ids(conn, now)?;
        for (id, organization_id) in &stale {
            invitation_ops::set_status(conn, id, InvitationStatus::Expired)?;
            AuditLogger::log_simple(
                conn,
                Some(organization_id),
                AuditEntity::Invitation,
                id,
                AuditOperation::Expire,
                riskgov_core::constants::SYSTEM_ACTOR,
            )?;
        }
        Ok(stale.len())
    })
}

pub fn set_user_status(
    conn: &Connection,
    id: &str,
    status: UserStatus,
    actor: &str,
) -> RiskGovResult<UserProfile> {
    in_transaction(conn, "set_user_status", |conn| {
        let current = load_user(conn, id)?;
        user_ops::set_status(conn, id, status)?;
        let operation = match status {
            UserStatus::Active if current.status == UserStatus::PendingApproval => {
                AuditOperation::Approve
            }
            UserStatus::Active => AuditOperation::Reactivate,
            UserStatus::Rejected => AuditOperation::Reject,
            UserStatus::Suspended => AuditOperation::Suspend,
            UserStatus::PendingApproval => AuditOperation::Update,
        };
        AuditLogger::log(
            conn,
            record(
                Some(&current.organization_id),
                AuditEntity::User,
                id,
                operation,
                actor,
                json!({ "from": current.status.as_str(), "to": status.as_str() }),
            ),
        )?;
        load_user(conn, id)
    })
}

// --- Regulators ---

pub fn create_regulator(conn: &Connection, regulator: &Regulator, actor: &str) -> RiskGovResult<()> {
    in_transaction(conn, "create_regulator", |conn| {
        regulator_ops::insert(conn, regulator)?;
        AuditLogger::log(
            conn,
            record(
                None,
                AuditEntity::Regulator,
                &regulator.id,
                AuditOperation::Create,
                actor,
                json!({ "name": regulator.name, "jurisdiction": regulator.jurisdiction }),
            ),
        )?;
        Ok(())
    })
}

pub fn delete_regulator(conn: &Connection, id: &str, actor: &str) -> RiskGovResult<()> {
    in_transaction(conn, "delete_regulator", |conn| {
        if regulator_ops::get(conn, id)?.is_none() {
            return Err(RiskGovError::not_found("regulator", id));
        }
        let active = regulator_ops::count_active_access(conn, id)?;
        if active > 0 {
            return Err(AdminError::InUse {
                entity: "regulator",
                id: id.to_string(),
                reason: format!("{active} active access grant(s)"),
            }
            .into());
        }
        regulator_ops::delete(conn, id)?;
        AuditLogger::log_simple(conn, None, AuditEntity::Regulator, id, AuditOperation::Delete, actor)?;
        Ok(())
    })
}

pub fn grant_regulator_access(conn: &Connection, access: &RegulatorAccess) -> RiskGovResult<()> {
    in_transaction(conn, "grant_regulator_access", |conn| {
        if regulator_ops::get(conn, &access.regulator_id)?.is_none() {
            return Err(RiskGovError::not_found("regulator", &access.regulator_id));
        }
        load_organization(conn, &access.organization_id)?;
        regulator_ops::upsert_access(conn, access)?;
        AuditLogger::log_simple(
            conn,
            Some(&access.organization_id),
            AuditEntity::Regulator,
            &access.regulator_id,
            AuditOperation::Grant,
            &access.granted_by,
        )?;
        Ok(())
    })
}

pub fn revoke_regulator_access(
    conn: &Connection,
    regulator_id: &str,
    organization_id: &str,
    actor: &str,
) -> RiskGovResult<()> {
    in_transaction(conn, "revoke_regulator_access", |conn| {
        let revoked = regulator_ops::revoke_access(conn, regulator_id, organization_id, Utc::now())?;
        if revoked == 0 {
            return Err(RiskGovError::not_found(
                "regulator access",
                format!("{regulator_id}/{organization_id}"),
            ));
        }
        AuditLogger::log_simple(
            conn,
            Some(organization_id),
            AuditEntity::Regulator,
            regulator_id,
            AuditOperation::Revoke,
            actor,
        )?;
        Ok(())
    })
}
