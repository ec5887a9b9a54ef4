use crate::models::resource::{NewResource, RoadmapEntry, SaveOutcome};
use crate::repositories::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, instrument};

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait ResourceRepository: Send + Sync {
    /// Store `resource` if its URL is unknown and link it to `user_id`.
    ///
    /// Both steps run in one transaction and rely on the UNIQUE constraints on
    /// `resources.url` and `saved_resources(user_id, resource_id)`.
    async fn save_for_user(
        &self,
        user_id: i64,
        resource: &NewResource,
    ) -> RepositoryResult<SaveOutcome>;
    async fn list_saved(&self, user_id: i64) -> RepositoryResult<Vec<RoadmapEntry>>;
}

pub struct SqliteResourceRepository {
    pool: SqlitePool,
}

impl SqliteResourceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceRepository for SqliteResourceRepository {
    #[instrument(skip(self, resource), fields(url = %resource.url))]
    async fn save_for_user(
        &self,
        user_id: i64,
        resource: &NewResource,
    ) -> RepositoryResult<SaveOutcome> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO resources (type, title, url, source, thumbnail_url)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(url) DO NOTHING
            "#,
        )
        .bind(resource.kind)
        .bind(&resource.title)
        .bind(&resource.url)
        .bind(resource.source.as_deref())
        .bind(resource.thumbnail_url.as_deref())
        .execute(&mut *tx)
        .await?;

        let resource_id: i64 = sqlx::query_scalar("SELECT id FROM resources WHERE url = ?")
            .bind(&resource.url)
            .fetch_one(&mut *tx)
            .await?;

        let linked = sqlx::query(
            r#"
            INSERT INTO saved_resources (user_id, resource_id)
            VALUES (?, ?)
            ON CONFLICT(user_id, resource_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(resource_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                RepositoryError::NotFound
            }
            _ => RepositoryError::Database(e),
        })?;

        tx.commit().await?;

        let outcome = if linked.rows_affected() > 0 {
            SaveOutcome::Saved
        } else {
            SaveOutcome::AlreadySaved
        };
        debug!(user_id, resource_id, ?outcome, "resource save settled");
        Ok(outcome)
    }

    async fn list_saved(&self, user_id: i64) -> RepositoryResult<Vec<RoadmapEntry>> {
        let entries = sqlx::query_as::<_, RoadmapEntry>(
            r#"
            SELECT
                r.id AS id,
                r.title AS title,
                r.url AS url,
                r.type AS type,
                r.source AS source,
                r.thumbnail_url AS thumbnail
            FROM saved_resources s
            JOIN resources r ON r.id = s.resource_id
            WHERE s.user_id = ?
            ORDER BY s.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
