//! Database enum type introspection.
//!
//! Fetches the values of the application's Postgres enum types from
//! `pg_enum`, ordered by sort order. The [`crate::enum_cache::EnumCache`]
//! wraps this with a TTL and invalidation channel; form dropdowns are
//! populated from the result.

use std::collections::BTreeMap;

use sqlx::PgPool;

use super::RepositoryError;

/// Mapping from enum type name to its ordered value list.
pub type EnumMap = BTreeMap<String, Vec<String>>;

/// Enum types the admin UI cares about.
const APP_ENUM_TYPES: &[&str] = &["offer_status", "cart_status", "program_focus"];

/// Fetch all application enum types and their ordered values.
///
/// # Errors
///
/// Returns [`RepositoryError::Database`] if the query fails.
pub async fn fetch_enum_types(pool: &PgPool) -> Result<EnumMap, RepositoryError> {
    let rows = sqlx::query_as::<_, (String, String)>(
        "SELECT t.typname, e.enumlabel \
         FROM pg_type t \
         JOIN pg_enum e ON e.enumtypid = t.oid \
         WHERE t.typname = ANY($1) \
         ORDER BY t.typname, e.enumsortorder",
    )
    .bind(APP_ENUM_TYPES)
    .fetch_all(pool)
    .await?;

    let mut map = EnumMap::new();
    for (typname, label) in rows {
        map.entry(typname).or_default().push(label);
    }

    Ok(map)
}
