use sqlx::PgPool;
use uuid::Uuid;

use crate::models::profile::Profile;

pub async fn fetch_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profile WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Stores the encoded skills, creating the profile row if it's missing.
pub async fn save_skills(pool: &PgPool, user_id: Uuid, skills_json: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO profile (user_id, skills) VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE SET skills = EXCLUDED.skills, updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(skills_json)
    .execute(pool)
    .await?;
    Ok(())
}

/// Stores the chosen role, creating the profile row if it's missing.
pub async fn save_role(pool: &PgPool, user_id: Uuid, role: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO profile (user_id, role) VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE SET role = EXCLUDED.role, updated_at = now()
        "#,
    )
    .bind(user_id)
    .bind(role)
    .execute(pool)
    .await?;
    Ok(())
}

/// The user's chosen role. A missing profile row and a NULL/blank role both
/// mean "no role selected yet".
pub async fn fetch_selected_role(pool: &PgPool, user_id: Uuid) -> Result<Option<String>, sqlx::Error> {
    Ok(fetch_profile(pool, user_id)
        .await?
        .and_then(|p| p.selected_role().map(str::to_string)))
}
