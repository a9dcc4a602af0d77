pub mod summary;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::State, routing::get, Json, Router};
use shelfline_http::error::AppError;
use shelfline_kernel::{InitCtx, Module};

use crate::modules::books::service::{ListFilter, ReadingListService};
use summary::SummaryStats;

pub use summary::compute_summary;

/// Analytics module: summary statistics over the full book collection
pub struct AnalyticsModule {
    service: Arc<ReadingListService>,
}

impl AnalyticsModule {
    pub fn new(service: Arc<ReadingListService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for AnalyticsModule {
    fn name(&self) -> &'static str {
        "analytics"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "analytics module initialized");
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/summary", get(get_summary))
            .with_state(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/summary": {
                    "get": {
                        "summary": "Summary statistics over the full collection",
                        "tags": ["Analytics"],
                        "responses": {
                            "200": {
                                "description": "Aggregate statistics",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/SummaryStats"}
                                    }
                                }
                            },
                            "500": {
                                "description": "Internal server error",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "SummaryStats": {
                        "type": "object",
                        "properties": {
                            "totalBooks": {"type": "integer"},
                            "byStatus": {
                                "type": "object",
                                "properties": {
                                    "to-read": {"type": "integer"},
                                    "reading": {"type": "integer"},
                                    "completed": {"type": "integer"}
                                },
                                "required": ["to-read", "reading", "completed"]
                            },
                            "totalPages": {"type": "integer"},
                            "totalPagesCompleted": {"type": "integer"},
                            "completionRate": {"type": "number"},
                            "currentlyReading": {"type": "integer"},
                            "topAuthors": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "author": {"type": "string"},
                                        "count": {"type": "integer"}
                                    },
                                    "required": ["author", "count"]
                                }
                            },
                            "firstAddedAt": {"type": "string", "format": "date-time"},
                            "lastAddedAt": {"type": "string", "format": "date-time"}
                        },
                        "required": ["totalBooks", "byStatus", "completionRate", "currentlyReading", "topAuthors"]
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "analytics module stopped");
        Ok(())
    }
}

async fn get_summary(
    State(service): State<Arc<ReadingListService>>,
) -> Result<Json<SummaryStats>, AppError> {
    let books = service
        .list_books(ListFilter::default())
        .await
        .map_err(anyhow::Error::from)?;
    Ok(Json(compute_summary(&books)))
}

/// Create a new instance of the analytics module
pub fn create_module(service: Arc<ReadingListService>) -> Arc<dyn Module> {
    Arc::new(AnalyticsModule::new(service))
}
