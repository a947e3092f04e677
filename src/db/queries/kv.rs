use crate::error::VideoResult;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;

pub async fn get_value(pool: &PgPool, key: &str) -> VideoResult<Option<Value>> {
    let value = sqlx::query_scalar::<_, Json<Value>>(
        r#"
        SELECT value FROM kv_store WHERE key = $1
        "#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(value.map(|Json(v)| v))
}

pub async fn set_value(pool: &PgPool, key: &str, value: Value) -> VideoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO kv_store (key, value, updated_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
        "#,
    )
    .bind(key)
    .bind(Json(value))
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_value(pool: &PgPool, key: &str) -> VideoResult<()> {
    sqlx::query(
        r#"
        DELETE FROM kv_store WHERE key = $1
        "#,
    )
    .bind(key)
    .execute(pool)
    .await?;

    Ok(())
}
