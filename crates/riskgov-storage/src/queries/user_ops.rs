//! Row-level operations on user_profiles.

use rusqlite::{params, Connection, OptionalExtension, Row};

use riskgov_core::errors::RiskGovResult;
use riskgov_core::models::{Role, UserProfile, UserStatus};

use super::row::{get_enum, get_ts, ts};
use crate::{map_unique_err, to_storage_err};

const COLUMNS: &str = "id, organization_id, email, full_name, role, status, created_at";

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
    Ok(UserProfile {
        id: row.get(0)?,
        organization_id: row.get(1)?,
        email: row.get(2)?,
        full_name: row.get(3)?,
        role: get_enum(row, 4, Role::parse)?,
        status: get_enum(row, 5, UserStatus::parse)?,
        created_at: get_ts(row, 6)?,
    })
}

pub fn insert(conn: &Connection, user: &UserProfile) -> RiskGovResult<()> {
    conn.execute(
        "INSERT INTO user_profiles (id, organization_id, email, full_name, role, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user.id,
            user.organization_id,
            user.email,
            user.full_name,
            user.role.as_str(),
            user.status.as_str(),
            ts(&user.created_at),
        ],
    )
    .map_err(|e| map_unique_err(e, "user", &user.email))?;
    Ok(())
}

pub fn get(conn: &Connection, id: &str) -> RiskGovResult<Option<UserProfile>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM user_profiles WHERE id = ?1"),
        params![id],
        row_to_user,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn find_by_email(
    conn: &Connection,
    organization_id: &str,
    email: &str,
) -> RiskGovResult<Option<UserProfile>> {
    conn.query_row(
        &format!(
            "SELECT {COLUMNS} FROM user_profiles
             WHERE organization_id = ?1 AND email = ?2 COLLATE NOCASE"
        ),
        params![organization_id, email],
        row_to_user,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn list(
    conn: &Connection,
    organization_id: &str,
    status: Option<UserStatus>,
) -> RiskGovResult<Vec<UserProfile>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM user_profiles
             WHERE organization_id = ?1 AND (?2 IS NULL OR status = ?2)
             ORDER BY email COLLATE NOCASE"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![organization_id, status.map(|s| s.as_str())], row_to_user)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn set_status(conn: &Connection, id: &str, status: UserStatus) -> RiskGovResult<usize> {
    conn.execute(
        "UPDATE user_profiles SET status = ?2 WHERE id = ?1",
        params![id, status.as_str()],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
