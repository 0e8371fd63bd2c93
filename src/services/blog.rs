use crate::{
    entities::{blog_post, BlogPost},
    errors::ServiceError,
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct BlogPage {
    pub posts: Vec<blog_post::Model>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Published blog content; drafts are invisible here
#[derive(Clone)]
pub struct BlogService {
    db: Arc<DatabaseConnection>,
}

impl BlogService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Published posts, newest first
    #[instrument(skip(self))]
    pub async fn list_published(&self, page: u64, per_page: u64) -> Result<BlogPage, ServiceError> {
        let page = page.max(1);
        let per_page = per_page.max(1);

        let paginator = BlogPost::find()
            .filter(blog_post::Column::Published.eq(true))
            .order_by_desc(blog_post::Column::PublishedAt)
            .order_by_asc(blog_post::Column::Slug)
            .paginate(&*self.db, per_page);
        let total = paginator.num_items().await?;
        let posts = paginator.fetch_page(page - 1).await?;

        Ok(BlogPage {
            posts,
            total,
            page,
            per_page,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_by_slug(&self, slug: &str) -> Result<blog_post::Model, ServiceError> {
        BlogPost::find()
            .filter(blog_post::Column::Slug.eq(slug))
            .filter(blog_post::Column::Published.eq(true))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Blog post '{}' not found", slug)))
    }
}
