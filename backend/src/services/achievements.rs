use chrono::Utc;
use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AchievementPayload, AchievementRow, PageEnvelope};
use crate::services::list_params::{like_pattern, FilterValue, ListParams, Operator, LIKE_ESCAPE};
use shared::Achievement;

#[derive(Debug, Error)]
pub enum AchievementError {
    #[error("Achievement not found")]
    NotFound,
    #[error("Stored todos are not valid JSON: {0}")]
    InvalidTodos(#[from] serde_json::Error),
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// A list response: every match when no page was requested, otherwise one
/// page with its navigation links.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ListResult {
    All(Vec<Achievement>),
    Page(PageEnvelope),
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, params: &ListParams) {
    let mut clause = " WHERE ";

    for condition in &params.conditions {
        builder.push(clause);
        clause = " AND ";
        builder.push(condition.column.sql());
        builder.push(condition.op.sql());
        match &condition.value {
            FilterValue::Int(n) => builder.push_bind(*n),
            FilterValue::Text(s) => builder.push_bind(s.clone()),
        };
        if condition.op == Operator::Like {
            builder.push(LIKE_ESCAPE);
        }
    }

    if let Some(search) = &params.search {
        let pattern = like_pattern(search);
        builder.push(clause);
        builder.push("(title LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(LIKE_ESCAPE);
        builder.push(" OR description LIKE ");
        builder.push_bind(pattern);
        builder.push(LIKE_ESCAPE);
        builder.push(")");
    }
}

fn push_order(builder: &mut QueryBuilder<'_, Sqlite>, params: &ListParams) {
    builder.push(" ORDER BY ");
    for sort in &params.sorts {
        builder.push(sort.column.sql());
        builder.push(if sort.descending { " DESC, " } else { " ASC, " });
    }
    // Insertion order breaks ties
    builder.push("rowid ASC");
}

fn rows_to_shared(rows: Vec<AchievementRow>) -> Result<Vec<Achievement>, AchievementError> {
    rows.iter()
        .map(|row| row.to_shared().map_err(AchievementError::from))
        .collect()
}

pub async fn count_matching(pool: &SqlitePool, params: &ListParams) -> Result<u32, AchievementError> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM achievements");
    push_filters(&mut builder, params);
    let count: i64 = builder.build_query_scalar().fetch_one(pool).await?;
    Ok(count.max(0) as u32)
}

pub async fn list_achievements(
    pool: &SqlitePool,
    params: &ListParams,
) -> Result<ListResult, AchievementError> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM achievements");
    push_filters(&mut builder, params);
    push_order(&mut builder, params);

    let Some(page) = params.page else {
        let rows: Vec<AchievementRow> = builder.build_query_as().fetch_all(pool).await?;
        return Ok(ListResult::All(rows_to_shared(rows)?));
    };

    builder.push(" LIMIT ");
    builder.push_bind(params.per_page as i64);
    builder.push(" OFFSET ");
    builder.push_bind(params.offset());

    let rows: Vec<AchievementRow> = builder.build_query_as().fetch_all(pool).await?;
    let items = count_matching(pool, params).await?;

    Ok(ListResult::Page(PageEnvelope::new(
        rows_to_shared(rows)?,
        page,
        params.per_page,
        items,
    )))
}

pub async fn get_achievement(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<Achievement>, AchievementError> {
    let row: Option<AchievementRow> = sqlx::query_as("SELECT * FROM achievements WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| r.to_shared()).transpose()?)
}

/// Stores a complete record under its own id.
pub async fn insert_achievement(
    pool: &SqlitePool,
    achievement: &Achievement,
) -> Result<(), AchievementError> {
    let todos = serde_json::to_string(achievement.todos())?;

    sqlx::query(
        r#"
        INSERT INTO achievements (id, title, description, category, progress, todos, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&achievement.id)
    .bind(&achievement.title)
    .bind(&achievement.description)
    .bind(&achievement.category)
    .bind(achievement.progress() as i64)
    .bind(todos)
    .bind(achievement.created_at)
    .bind(achievement.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_achievement(
    pool: &SqlitePool,
    payload: &AchievementPayload,
) -> Result<Achievement, AchievementError> {
    let now = Utc::now().timestamp();
    let created_at = payload.created_at.unwrap_or(now);

    let achievement = Achievement {
        id: Uuid::new_v4().to_string(),
        title: payload.title.clone(),
        description: payload.description.clone(),
        category: payload.category.clone(),
        progress: Some(payload.progress()),
        todos: Some(payload.todos().to_vec()),
        created_at,
        updated_at: payload.updated_at.unwrap_or(now).max(created_at),
    };

    insert_achievement(pool, &achievement).await?;
    Ok(achievement)
}

/// Full replacement. Fields missing from the payload fall back to their
/// defaults, except `createdAt` which is kept from the stored record.
pub async fn replace_achievement(
    pool: &SqlitePool,
    id: &str,
    payload: &AchievementPayload,
) -> Result<Achievement, AchievementError> {
    let existing = get_achievement(pool, id)
        .await?
        .ok_or(AchievementError::NotFound)?;

    let now = Utc::now().timestamp();
    let created_at = payload.created_at.unwrap_or(existing.created_at);

    let achievement = Achievement {
        id: existing.id,
        title: payload.title.clone(),
        description: payload.description.clone(),
        category: payload.category.clone(),
        progress: Some(payload.progress()),
        todos: Some(payload.todos().to_vec()),
        created_at,
        updated_at: payload.updated_at.unwrap_or(now).max(created_at),
    };
    let todos = serde_json::to_string(achievement.todos())?;

    sqlx::query(
        r#"
        UPDATE achievements
        SET title = ?, description = ?, category = ?, progress = ?, todos = ?, created_at = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&achievement.title)
    .bind(&achievement.description)
    .bind(&achievement.category)
    .bind(achievement.progress() as i64)
    .bind(todos)
    .bind(achievement.created_at)
    .bind(achievement.updated_at)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(achievement)
}

/// Deletes and returns the record.
pub async fn delete_achievement(
    pool: &SqlitePool,
    id: &str,
) -> Result<Achievement, AchievementError> {
    let existing = get_achievement(pool, id)
        .await?
        .ok_or(AchievementError::NotFound)?;

    sqlx::query("DELETE FROM achievements WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(existing)
}

pub async fn count_achievements(pool: &SqlitePool) -> Result<i64, AchievementError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM achievements")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use shared::TodoItem;
    use sqlx::sqlite::SqlitePoolOptions;

    pub(crate) async fn setup_test_db() -> SqlitePool {
        // One connection, otherwise each would get its own in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    fn achievement(id: &str, title: &str, category: &str, progress: u8, updated_at: i64) -> Achievement {
        Achievement {
            id: id.to_string(),
            title: title.to_string(),
            description: format!("{} description", title),
            category: category.to_string(),
            progress: Some(progress),
            todos: Some(Vec::new()),
            created_at: 1_700_000_000,
            updated_at,
        }
    }

    async fn seed(pool: &SqlitePool) {
        for a in [
            achievement("1", "Rust certificate", "Certification", 100, 1_704_067_200),
            achievement("2", "Marathon", "Award", 40, 1_704_153_600),
            achievement("3", "Rust compiler talk", "Education", 0, 1_704_240_000),
            achievement("4", "Hackathon", "Competition", 75, 1_704_326_400),
        ] {
            insert_achievement(pool, &a).await.unwrap();
        }
    }

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ListParams::parse(&pairs).unwrap()
    }

    fn ids(result: &ListResult) -> Vec<&str> {
        let data = match result {
            ListResult::All(data) => data,
            ListResult::Page(envelope) => &envelope.data,
        };
        data.iter().map(|a| a.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_list_without_page_returns_everything_in_insertion_order() {
        let pool = setup_test_db().await;
        seed(&pool).await;

        let result = list_achievements(&pool, &params(&[])).await.unwrap();

        assert!(matches!(result, ListResult::All(_)));
        assert_eq!(ids(&result), vec!["1", "2", "3", "4"]);
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts() {
        let pool = setup_test_db().await;
        seed(&pool).await;

        let result = list_achievements(
            &pool,
            &params(&[("title_like", "RUST"), ("_sort", "-updatedAt")]),
        )
        .await
        .unwrap();
        assert_eq!(ids(&result), vec!["3", "1"]);

        let result = list_achievements(
            &pool,
            &params(&[
                ("progress_gte", "40"),
                ("progress_lte", "80"),
                ("_sort", "progress"),
            ]),
        )
        .await
        .unwrap();
        assert_eq!(ids(&result), vec!["2", "4"]);

        let result = list_achievements(
            &pool,
            &params(&[
                ("updatedAt_gte", "1704153600"),
                ("updatedAt_lte", "1704239999"),
            ]),
        )
        .await
        .unwrap();
        assert_eq!(ids(&result), vec!["2"]);

        let result = list_achievements(&pool, &params(&[("category", "Award")]))
            .await
            .unwrap();
        assert_eq!(ids(&result), vec!["2"]);

        let result = list_achievements(&pool, &params(&[("q", "compiler")]))
            .await
            .unwrap();
        assert_eq!(ids(&result), vec!["3"]);
    }

    #[tokio::test]
    async fn test_like_and_search_match_wildcards_literally() {
        let pool = setup_test_db().await;
        seed(&pool).await;
        insert_achievement(&pool, &achievement("5", "Hit 100% coverage", "Technical", 100, 1))
            .await
            .unwrap();
        insert_achievement(&pool, &achievement("6", "snake_case lint", "Technical", 0, 1))
            .await
            .unwrap();

        let result = list_achievements(&pool, &params(&[("title_like", "100%")]))
            .await
            .unwrap();
        assert_eq!(ids(&result), vec!["5"]);

        let result = list_achievements(&pool, &params(&[("title_like", "_")]))
            .await
            .unwrap();
        assert_eq!(ids(&result), vec!["6"]);

        let result = list_achievements(&pool, &params(&[("q", "%")])).await.unwrap();
        assert_eq!(ids(&result), vec!["5"]);
    }

    #[tokio::test]
    async fn test_list_pagination_envelope() {
        let pool = setup_test_db().await;
        seed(&pool).await;

        let result = list_achievements(
            &pool,
            &params(&[("_page", "2"), ("_per_page", "3"), ("_sort", "title")]),
        )
        .await
        .unwrap();

        let ListResult::Page(envelope) = result else {
            panic!("expected a page");
        };
        assert_eq!(envelope.items, 4);
        assert_eq!(envelope.pages, 2);
        assert_eq!(envelope.prev, Some(1));
        assert_eq!(envelope.next, None);
        assert_eq!(envelope.data.len(), 1);
        assert_eq!(envelope.data[0].id, "3");
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_progress() {
        let pool = setup_test_db().await;

        let payload = AchievementPayload {
            title: "New".to_string(),
            category: "Project".to_string(),
            todos: Some(vec![
                TodoItem::new(1, "a", true),
                TodoItem::new(2, "b", false),
            ]),
            created_at: Some(10),
            updated_at: Some(5),
            ..Default::default()
        };

        let created = create_achievement(&pool, &payload).await.unwrap();
        assert!(Uuid::parse_str(&created.id).is_ok());
        assert_eq!(created.progress, Some(50));
        assert_eq!(created.updated_at, 10);

        let fetched = get_achievement(&pool, &created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(count_achievements(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_replace_keeps_created_at() {
        let pool = setup_test_db().await;
        seed(&pool).await;

        let payload = AchievementPayload {
            title: "Marathon (sub 4h)".to_string(),
            description: "Done".to_string(),
            category: "Award".to_string(),
            progress: Some(30),
            todos: Some(vec![TodoItem::new(1, "Run", true)]),
            ..Default::default()
        };

        let replaced = replace_achievement(&pool, "2", &payload).await.unwrap();
        assert_eq!(replaced.created_at, 1_700_000_000);
        assert_eq!(replaced.progress, Some(100));
        assert!(replaced.updated_at >= replaced.created_at);

        let fetched = get_achievement(&pool, "2").await.unwrap().unwrap();
        assert_eq!(fetched.title, "Marathon (sub 4h)");

        let missing = replace_achievement(&pool, "nope", &payload).await;
        assert!(matches!(missing, Err(AchievementError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_returns_record_then_not_found() {
        let pool = setup_test_db().await;
        seed(&pool).await;

        let deleted = delete_achievement(&pool, "1").await.unwrap();
        assert_eq!(deleted.title, "Rust certificate");
        assert!(get_achievement(&pool, "1").await.unwrap().is_none());

        let again = delete_achievement(&pool, "1").await;
        assert!(matches!(again, Err(AchievementError::NotFound)));
        assert_eq!(count_achievements(&pool).await.unwrap(), 3);
    }
}
