//! v001: organizations, divisions, departments, users, invitations, regulators.

use rusqlite::Connection;

use riskgov_core::errors::RiskGovResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> RiskGovResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS organizations (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            industry    TEXT,
            status      TEXT NOT NULL DEFAULT 'ACTIVE'
                        CHECK (status IN ('ACTIVE', 'SUSPENDED')),
            created_at  TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_organizations_name
            ON organizations(name COLLATE NOCASE);

        CREATE TABLE IF NOT EXISTS divisions (
            id               TEXT PRIMARY KEY,
            organization_id  TEXT NOT NULL REFERENCES organizations(id),
            name             TEXT NOT NULL,
            created_at       TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_divisions_org_name
            ON divisions(organization_id, name COLLATE NOCASE);

        CREATE TABLE IF NOT EXISTS departments (
            id               TEXT PRIMARY KEY,
            organization_id  TEXT NOT NULL REFERENCES organizations(id),
            division_id      TEXT NOT NULL REFERENCES divisions(id),
            name             TEXT NOT NULL,
            created_at       TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_departments_division_name
            ON departments(division_id, name COLLATE NOCASE);
        CREATE INDEX IF NOT EXISTS idx_departments_org ON departments(organization_id);

        CREATE TABLE IF NOT EXISTS user_profiles (
            id               TEXT PRIMARY KEY,
            organization_id  TEXT NOT NULL REFERENCES organizations(id),
            email            TEXT NOT NULL,
            full_name        TEXT NOT NULL,
            role             TEXT NOT NULL,
            status           TEXT NOT NULL,
            created_at       TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_users_org_email
            ON user_profiles(organization_id, email COLLATE NOCASE);

        CREATE TABLE IF NOT EXISTS user_invitations (
            id               TEXT PRIMARY KEY,
            organization_id  TEXT NOT NULL REFERENCES organizations(id),
            email            TEXT NOT NULL,
            role             TEXT NOT NULL,
            token            TEXT NOT NULL UNIQUE,
            invited_by       TEXT NOT NULL,
            status           TEXT NOT NULL
                             CHECK (status IN ('PENDING', 'ACCEPTED', 'REVOKED', 'EXPIRED')),
            created_at       TEXT NOT NULL,
            expires_at       TEXT NOT NULL,
            accepted_at      TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_invitations_org_status
            ON user_invitations(organization_id, status);

        CREATE TABLE IF NOT EXISTS regulators (
            id             TEXT PRIMARY KEY,
            name           TEXT NOT NULL,
            jurisdiction   TEXT NOT NULL,
            contact_email  TEXT NOT NULL,
            created_at     TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_regulators_name
            ON regulators(name COLLATE NOCASE);

        CREATE TABLE IF NOT EXISTS regulator_access (
            regulator_id     TEXT NOT NULL REFERENCES regulators(id),
            organization_id  TEXT NOT NULL REFERENCES organizations(id),
            granted_by       TEXT NOT NULL,
            granted_at       TEXT NOT NULL,
            revoked_at       TEXT,
            PRIMARY KEY (regulator_id, organization_id)
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
