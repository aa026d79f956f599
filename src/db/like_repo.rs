use sqlx::{PgPool, Row};
use std::collections::HashMap;
use uuid::Uuid;

/// Toggle a user's like on a post and return (liked_by_user, likes_count).
///
/// Runs inside a single transaction: delete the like if present,
/// otherwise insert it. The UNIQUE(post_id, user_id) index plus
/// ON CONFLICT DO NOTHING keeps concurrent togglers from producing
/// duplicate rows or lost updates.
pub async fn toggle_like(
    pool: &PgPool,
    post_id: Uuid,
    user_id: Uuid,
) -> Result<(bool, i64), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query(
        r#"
        DELETE FROM post_likes
        WHERE post_id = $1 AND user_id = $2
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    let liked = if deleted.rows_affected() == 0 {
        sqlx::query(
            r#"
            INSERT INTO post_likes (post_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        true
    } else {
        false
    };

    let count: i64 = sqlx::query("SELECT COUNT(*) FROM post_likes WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(&mut *tx)
        .await?
        .get(0);

    tx.commit().await?;

    Ok((liked, count))
}

/// Liker set for a post, in like order
pub async fn get_liker_ids(pool: &PgPool, post_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT user_id
        FROM post_likes
        WHERE post_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|row| row.get("user_id")).collect())
}

/// Liker sets for a batch of posts in one query.
/// Posts without likes are simply absent from the map.
pub async fn get_liker_ids_for_posts(
    pool: &PgPool,
    post_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Uuid>>, sqlx::Error> {
    if post_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query(
        r#"
        SELECT post_id, user_id
        FROM post_likes
        WHERE post_id = ANY($1)
        ORDER BY created_at ASC
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await?;

    let mut likers: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for row in rows {
        likers
            .entry(row.get("post_id"))
            .or_default()
            .push(row.get("user_id"));
    }

    Ok(likers)
}
