//! PostgreSQL implementation of CategoryRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use blog_core::entities::Category;
use blog_core::error::DomainError;
use blog_core::traits::{CategoryRepository, RepoResult};

use crate::models::CategoryModel;

use super::error::{map_db_error, map_unique_violation};

#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Category>> {
        sqlx::query_as::<_, CategoryModel>(r"SELECT id, name, slug FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .map(Category::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        sqlx::query_as::<_, CategoryModel>(
            r"SELECT id, name, slug FROM categories WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .map(Category::try_from)
        .transpose()
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> RepoResult<Vec<Category>> {
        sqlx::query_as::<_, CategoryModel>(r"SELECT id, name, slug FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(Category::try_from)
            .collect()
    }

    #[instrument(skip(self, category), fields(name = %category.name))]
    async fn get_or_create(&self, category: &Category) -> RepoResult<Category> {
        // A name conflict means someone else created it first; a slug conflict
        // means a different name maps onto the same slug.
        let inserted = sqlx::query(
            r"
            INSERT INTO categories (id, name, slug)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO NOTHING
            ",
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(category.slug.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::CategorySlugTaken(category.slug.to_string())
            })
        })?;

        if inserted.rows_affected() > 0 {
            debug!(category_id = %category.id, "Created category");
        }

        self.find_by_name(&category.name)
            .await?
            .ok_or_else(|| DomainError::DatabaseError("category vanished after upsert".to_string()))
    }
}
