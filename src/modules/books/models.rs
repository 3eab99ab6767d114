use sqlx::{FromRow, SqlitePool};

/// One user-owned book entry.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Book {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub completed: bool,
}

/// List all entries owned by `owner`, in insertion order.
pub async fn list_for_owner(db: &SqlitePool, owner: i64) -> sqlx::Result<Vec<Book>> {
    sqlx::query_as(
        "SELECT id, user_id, title, completed FROM books WHERE user_id = ? ORDER BY id",
    )
    .bind(owner)
    .fetch_all(db)
    .await
}

/// Create a new entry owned by `owner`, not yet completed.
pub async fn create(db: &SqlitePool, owner: i64, title: &str) -> sqlx::Result<i64> {
    let result = sqlx::query("INSERT INTO books (user_id, title, completed) VALUES (?, ?, FALSE)")
        .bind(owner)
        .bind(title)
        .execute(db)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Flip `completed` on the entry matching both `id` and `owner`.
///
/// The compound predicate is the access control: an id belonging to another
/// owner misses exactly like a nonexistent one. Returns the new `completed`
/// value, or `None` on a miss.
pub async fn toggle(db: &SqlitePool, id: i64, owner: i64) -> sqlx::Result<Option<bool>> {
    let row: Option<(bool,)> = sqlx::query_as(
        "UPDATE books SET completed = NOT completed WHERE id = ? AND user_id = ? RETURNING completed",
    )
    .bind(id)
    .bind(owner)
    .fetch_optional(db)
    .await?;

    Ok(row.map(|(completed,)| completed))
}

/// Delete the entry matching both `id` and `owner`.
///
/// Returns `false` on a miss, under the same lookup discipline as [`toggle`].
pub async fn delete(db: &SqlitePool, id: i64, owner: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM books WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(owner)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}
