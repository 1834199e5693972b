//! Catalog route handlers: listing, search, stats, newly-added, metadata.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use vs_catalog::{CatalogStats, ListQuery, SortKey, VideoEntry};
use vs_core::Error;

use crate::context::AppContext;
use crate::error::AppError;

/// Raw query parameters for listing videos.
///
/// Kept as strings so malformed numbers surface as validation errors rather
/// than extractor rejections.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVideosParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub search: Option<String>,
    pub content_generated: Option<String>,
}

impl ListVideosParams {
    /// Convert into a [`ListQuery`], rejecting unparsable paging values.
    pub fn into_query(self, default_limit: u32, max_limit: u32) -> Result<ListQuery, Error> {
        let limit = match self.limit.as_deref().map(str::trim) {
            None => default_limit,
            Some(raw) => raw.parse().map_err(|_| {
                Error::InvalidQuery(format!("Limit must be between 1 and {max_limit}"))
            })?,
        };
        let page = match self.page.as_deref().map(str::trim) {
            None => 1,
            Some(raw) => raw
                .parse()
                .map_err(|_| Error::InvalidQuery("Page must be >= 1".into()))?,
        };
        let content_generated = match self.content_generated.as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        };

        Ok(ListQuery {
            page,
            limit,
            sort: self.sort.as_deref().map(SortKey::parse).unwrap_or_default(),
            search: self.search.filter(|s| !s.is_empty()),
            content_generated,
        })
    }
}

/// GET /api/videos
pub async fn list_videos(
    State(ctx): State<AppContext>,
    Query(params): Query<ListVideosParams>,
) -> Result<Json<Value>, AppError> {
    let listing = &ctx.config.listing;
    let query = params.into_query(listing.default_limit, listing.max_limit)?;
    let page = ctx.catalog.query(&query).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Videos retrieved successfully",
        "data": {
            "videos": page.videos,
            "pagination": page.pagination,
        }
    })))
}

/// Query parameters for search.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    pub limit: Option<String>,
}

/// GET /api/videos/search
pub async fn search_videos(
    State(ctx): State<AppContext>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, AppError> {
    let max = ctx.config.listing.max_limit;
    let limit = params
        .limit
        .as_deref()
        .map(|raw| {
            raw.trim()
                .parse::<u32>()
                .map_err(|_| Error::InvalidQuery(format!("Limit must be between 1 and {max}")))
        })
        .transpose()?;

    let results = ctx.catalog.search(&params.query, limit).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Search completed",
        "data": {
            "videos": results.videos,
            "searchCriteria": { "query": results.query },
            "totalResults": results.total,
        }
    })))
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    #[serde(flatten)]
    pub stats: CatalogStats,
}

/// GET /api/videos/stats
pub async fn video_stats(State(ctx): State<AppContext>) -> Result<Json<StatsResponse>, AppError> {
    let stats = ctx.catalog.stats().await?;
    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct NewlyAddedParams {
    pub quantity: Option<String>,
}

/// GET /api/videos/newly-added?quantity=N|all
pub async fn newly_added(
    State(ctx): State<AppContext>,
    Query(params): Query<NewlyAddedParams>,
) -> Result<Json<Value>, AppError> {
    let quantity = match params.quantity.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(raw.parse::<usize>().map_err(|_| {
            Error::InvalidQuery("Quantity must be a non-negative number or \"all\"".into())
        })?),
    };

    let videos: Vec<VideoEntry> = ctx.catalog.newly_added(quantity).await?;
    Ok(Json(json!({ "success": true, "data": videos })))
}

/// GET /api/videos/{filename}/metadata
pub async fn video_metadata(
    State(ctx): State<AppContext>,
    Path(filename): Path<String>,
) -> Result<Json<Value>, AppError> {
    let entry = ctx.catalog.get_one(&filename).await?;
    Ok(Json(json!({ "success": true, "data": entry.meta })))
}
