//! Structured log events for governance transitions.
//!
//! Each function emits one `tracing` event with an `event` field so log
//! pipelines can filter on it.

/// A statement moved between lifecycle states.
pub fn statement_transition(statement_id: &str, version: u32, to: &str, actor: &str) {
    tracing::info!(
        event = "statement_transition",
        statement_id = %statement_id,
        version = version,
        to = %to,
        actor = %actor,
        "appetite statement transitioned"
    );
}

/// A tolerance metric moved between lifecycle states.
pub fn metric_transition(metric_id: &str, version: u32, to: &str, actor: &str) {
    tracing::info!(
        event = "metric_transition",
        metric_id = %metric_id,
        version = version,
        to = %to,
        actor = %actor,
        "tolerance metric transitioned"
    );
}

/// A governance rule refused a requested transition.
pub fn transition_rejected(entity: &str, entity_id: &str, operation: &str, reason: &str) {
    tracing::warn!(
        event = "transition_rejected",
        entity = %entity,
        entity_id = %entity_id,
        operation = %operation,
        reason = %reason,
        "governance transition rejected"
    );
}

/// A chain validation finished.
pub fn chain_validated(organization_id: &str, checked: u32, gaps: usize, critical: usize) {
    tracing::info!(
        event = "chain_validated",
        organization_id = %organization_id,
        checked = checked,
        gaps = gaps,
        critical = critical,
        "appetite chain validated"
    );
}

/// A library generation run was written.
pub fn library_generated(organization_id: &str, categories: usize, items: u32) {
    tracing::info!(
        event = "library_generated",
        organization_id = %organization_id,
        categories = categories,
        items = items,
        "library generated"
    );
}

/// An admin action was refused for lack of permission.
pub fn permission_denied(user_id: &str, role: &str, action: &str) {
    tracing::warn!(
        event = "permission_denied",
        user_id = %user_id,
        role = %role,
        action = %action,
        "permission denied"
    );
}

/// An admin-side change (organization, structure, user, regulator).
pub fn admin_change(entity: &str, entity_id: &str, operation: &str, actor: &str) {
    tracing::info!(
        event = "admin_change",
        entity = %entity,
        entity_id = %entity_id,
        operation = %operation,
        actor = %actor,
        "admin change recorded"
    );
}
