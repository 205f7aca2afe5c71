//! Category service

use blog_core::Category;
use tracing::{info, instrument};

use crate::dto::CategoryResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Category service
pub struct CategoryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CategoryService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Existing category with this name, or a new one
    ///
    /// Concurrent callers with the same name end up with the same row; a
    /// different name whose slug is already used is a validation error.
    #[instrument(skip(self))]
    pub async fn get_or_create(&self, name: &str) -> ServiceResult<Category> {
        let candidate = Category::from_name(name)?;

        if let Some(existing) = self.ctx.category_repo().find_by_name(&candidate.name).await? {
            return Ok(existing);
        }

        let category = self.ctx.category_repo().get_or_create(&candidate).await?;
        if category.id == candidate.id {
            info!(category_id = %category.id, slug = %category.slug, "Category created");
        }
        Ok(category)
    }

    /// All categories ordered by name
    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<CategoryResponse>> {
        let categories = self.ctx.category_repo().list_all().await?;
        Ok(categories.iter().map(CategoryResponse::from).collect())
    }
}
