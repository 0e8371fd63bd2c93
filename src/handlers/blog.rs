use super::common::{success_response, PaginatedResponse, PaginationParams};
use crate::{entities::blog_post, errors::ApiError, ApiResponse, AppState};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};

pub fn blog_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts))
        .route("/:slug", get(get_post))
}

#[utoipa::path(
    get,
    path = "/api/v1/blog",
    params(PaginationParams),
    responses((status = 200, description = "Published posts, newest first", body = ApiResponse<PaginatedResponse<blog_post::Model>>)),
    tag = "blog"
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let per_page = state.config.page_size(params.per_page);
    let page = state
        .services
        .blog
        .list_published(params.page(), per_page)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        page.posts,
        page.total,
        page.page,
        page.per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/blog/{slug}",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Published post", body = ApiResponse<blog_post::Model>),
        (status = 404, description = "No published post with this slug", body = crate::errors::ErrorResponse)
    ),
    tag = "blog"
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(state.services.blog.get_by_slug(&slug).await?))
}
