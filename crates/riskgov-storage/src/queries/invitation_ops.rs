//! Row-level operations on user_invitations.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use riskgov_core::errors::RiskGovResult;
use riskgov_core::models::{InvitationStatus, Role, UserInvitation};

use super::row::{get_enum, get_opt_ts, get_ts, ts};
use crate::to_storage_err;

const COLUMNS: &str = "id, organization_id, email, role, token, invited_by, status,
    created_at, expires_at, accepted_at";

fn row_to_invitation(row: &Row<'_>) -> rusqlite::Result<UserInvitation> {
    Ok(UserInvitation {
        id: row.get(0)?,
        organization_id: row.get(1)?,
        email: row.get(2)?,
        role: get_enum(row, 3, Role::parse)?,
        token: row.get(4)?,
        invited_by: row.get(5)?,
        status: get_enum(row, 6, InvitationStatus::parse)?,
        created_at: get_ts(row, 7)?,
        expires_at: get_ts(row, 8)?,
        accepted_at: get_opt_ts(row, 9)?,
    })
}

pub fn insert(conn: &Connection, inv: &UserInvitation) -> RiskGovResult<()> {
    conn.execute(
        "INSERT INTO user_invitations (
            id, organization_id, email, role, token, invited_by, status,
            created_at, expires_at, accepted_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            inv.id,
            inv.organization_id,
            inv.email,
            inv.role.as_str(),
            inv.token,
            inv.invited_by,
            inv.status.as_str(),
            ts(&inv.created_at),
            ts(&inv.expires_at),
            inv.accepted_at.as_ref().map(ts),
        ],
    )
    .map_err(|e| to_storage_err(format!("insert invitation: {e}")))?;
    Ok(())
}

pub fn get(conn: &Connection, id: &str) -> RiskGovResult<Option<UserInvitation>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM user_invitations WHERE id = ?1"),
        params![id],
        row_to_invitation,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn find_by_token(conn: &Connection, token: &str) -> RiskGovResult<Option<UserInvitation>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM user_invitations WHERE token = ?1"),
        params![token],
        row_to_invitation,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Newest first.
pub fn list(
    conn: &Connection,
    organization_id: &str,
    status: Option<InvitationStatus>,
) -> RiskGovResult<Vec<UserInvitation>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM user_invitations
             WHERE organization_id = ?1 AND (?2 IS NULL OR status = ?2)
             ORDER BY created_at DESC"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(
            params![organization_id, status.map(|s| s.as_str())],
            row_to_invitation,
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn set_status(conn: &Connection, id: &str, status: InvitationStatus) -> RiskGovResult<usize> {
    conn.execute(
        "UPDATE user_invitations SET status = ?2 WHERE id = ?1",
        params![id, status.as_str()],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

/// PENDING → ACCEPTED. Returns false if the invitation was no longer pending.
pub fn mark_accepted(conn: &Connection, id: &str, at: DateTime<Utc>) -> RiskGovResult<bool> {
    let changed = conn
        .execute(
            "UPDATE user_invitations SET status = 'ACCEPTED', accepted_at = ?2
             WHERE id = ?1 AND status = 'PENDING'",
            params![id, ts(&at)],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed == 1)
}

/// Ids of PENDING invitations whose expiry is at or before `now`.
pub fn stale_pending_ids(conn: &Connection, now: DateTime<Utc>) -> RiskGovResult<Vec<(String, String)>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, organization_id FROM user_invitations
             WHERE status = 'PENDING' AND expires_at <= ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![ts(&now)], |row| Ok((row.get(0)?, row.get(1)?)))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
