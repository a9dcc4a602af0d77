pub mod models;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use shelfline_http::error::AppError;
use shelfline_kernel::{InitCtx, Module};
use shelfline_store::Book;

use models::{NewBook, SetStatus, UpdateBook};
use service::{ListFilter, ReadingListService};

/// Books module: the reading-list REST surface over [`ReadingListService`]
pub struct BooksModule {
    service: Arc<ReadingListService>,
}

impl BooksModule {
    pub fn new(service: Arc<ReadingListService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            data_file = %ctx.settings.store.data_file.display(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_books).post(create_book))
            .route(
                "/{id}",
                get(get_book).patch(update_book).delete(remove_book),
            )
            .route("/{id}/status", post(set_status))
            .with_state(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "parameters": [
                            {"name": "status", "in": "query", "schema": {"$ref": "#/components/schemas/ReadingStatus"}},
                            {"name": "author", "in": "query", "schema": {"type": "string"}},
                            {"name": "tag", "in": "query", "schema": {"type": "string"}}
                        ],
                        "responses": {
                            "200": {
                                "description": "Books sorted by addedAt descending",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {"$ref": "#/components/schemas/Book"}
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Add a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/NewBook"}
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Created book",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/Book"}
                                    }
                                }
                            },
                            "400": {
                                "description": "Missing title or author",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": [
                            {"name": "id", "in": "path", "required": true, "schema": {"type": "string"}}
                        ],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/Book"}
                                    }
                                }
                            },
                            "404": {
                                "description": "Unknown id",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            }
                        }
                    },
                    "patch": {
                        "summary": "Update book fields",
                        "tags": ["Books"],
                        "parameters": [
                            {"name": "id", "in": "path", "required": true, "schema": {"type": "string"}}
                        ],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/UpdateBook"}
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Updated book",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/Book"}
                                    }
                                }
                            },
                            "400": {
                                "description": "Invalid update payload",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            },
                            "404": {
                                "description": "Unknown id",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            }
                        }
                    },
                    "delete": {
                        "summary": "Remove a book",
                        "tags": ["Books"],
                        "parameters": [
                            {"name": "id", "in": "path", "required": true, "schema": {"type": "string"}}
                        ],
                        "responses": {
                            "204": {"description": "Removed"},
                            "404": {
                                "description": "Unknown id",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}/status": {
                    "post": {
                        "summary": "Set reading status",
                        "tags": ["Books"],
                        "parameters": [
                            {"name": "id", "in": "path", "required": true, "schema": {"type": "string"}}
                        ],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "status": {"$ref": "#/components/schemas/ReadingStatus"}
                                        },
                                        "required": ["status"]
                                    }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Updated book",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/Book"}
                                    }
                                }
                            },
                            "400": {
                                "description": "Invalid status",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/ErrorResponse"}
                                    }
                                }
                            },
                            "404": {
                                "description": "Unknown id",
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
                    "ReadingStatus": {
                        "type": "string",
                        "enum": ["to-read", "reading", "completed"]
                    },
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "string"},
                            "title": {"type": "string"},
                            "author": {"type": "string"},
                            "pages": {"type": "integer", "minimum": 0},
                            "status": {"$ref": "#/components/schemas/ReadingStatus"},
                            "addedAt": {"type": "string", "format": "date-time"},
                            "startedAt": {"type": "string", "format": "date-time"},
                            "completedAt": {"type": "string", "format": "date-time"},
                            "notes": {"type": "string"},
                            "tags": {"type": "array", "items": {"type": "string"}}
                        },
                        "required": ["id", "title", "author", "status", "addedAt"]
                    },
                    "NewBook": {
                        "type": "object",
                        "properties": {
                            "title": {"type": "string"},
                            "author": {"type": "string"},
                            "pages": {"type": "integer", "minimum": 0},
                            "notes": {"type": "string"},
                            "tags": {"type": "array", "items": {"type": "string"}}
                        },
                        "required": ["title", "author"]
                    },
                    "UpdateBook": {
                        "type": "object",
                        "properties": {
                            "title": {"type": "string"},
                            "author": {"type": "string"},
                            "pages": {"type": "integer", "minimum": 0},
                            "notes": {"type": "string"},
                            "tags": {"type": "array", "items": {"type": "string"}},
                            "status": {"$ref": "#/components/schemas/ReadingStatus"},
                            "startedAt": {"type": "string", "format": "date-time"},
                            "completedAt": {"type": "string", "format": "date-time"}
                        }
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Raw query parameters for listing books
///
/// An unrecognized `status` value is ignored rather than rejected, so stale
/// links keep working.
#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    status: Option<String>,
    author: Option<String>,
    tag: Option<String>,
}

impl ListQuery {
    fn into_filter(self) -> ListFilter {
        ListFilter {
            status: self.status.as_deref().and_then(|s| s.parse().ok()),
            author: self.author.filter(|a| !a.is_empty()),
            tag: self.tag.filter(|t| !t.is_empty()),
        }
    }
}

async fn list_books(
    State(service): State<Arc<ReadingListService>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Book>>, AppError> {
    let books = service
        .list_books(query.into_filter())
        .await
        .map_err(anyhow::Error::from)?;
    Ok(Json(books))
}

async fn create_book(
    State(service): State<Arc<ReadingListService>>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let input: NewBook = serde_json::from_value(body)
        .map_err(|err| AppError::bad_request(format!("invalid book payload: {err}")))?;

    if input.title.trim().is_empty() || input.author.trim().is_empty() {
        return Err(AppError::bad_request("title and author are required"));
    }

    let book = service
        .add_book(input)
        .await
        .map_err(anyhow::Error::from)?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn get_book(
    State(service): State<Arc<ReadingListService>>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    match service.get_book(&id).await.map_err(anyhow::Error::from)? {
        Some(book) => Ok(Json(book)),
        None => Err(AppError::not_found("book not found")),
    }
}

async fn update_book(
    State(service): State<Arc<ReadingListService>>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<Book>, AppError> {
    let input: UpdateBook = serde_json::from_value(body)
        .map_err(|err| AppError::bad_request(format!("invalid update payload: {err}")))?;

    match service
        .update_book(&id, input)
        .await
        .map_err(anyhow::Error::from)?
    {
        Some(book) => Ok(Json(book)),
        None => Err(AppError::not_found("book not found")),
    }
}

async fn remove_book(
    State(service): State<Arc<ReadingListService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if service
        .remove_book(&id)
        .await
        .map_err(anyhow::Error::from)?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("book not found"))
    }
}

async fn set_status(
    State(service): State<Arc<ReadingListService>>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<Book>, AppError> {
    let input: SetStatus = serde_json::from_value(body)
        .map_err(|err| AppError::bad_request(format!("invalid status: {err}")))?;

    match service
        .set_status(&id, input.status)
        .await
        .map_err(anyhow::Error::from)?
    {
        Some(book) => Ok(Json(book)),
        None => Err(AppError::not_found("book not found")),
    }
}

/// Create a new instance of the books module
pub fn create_module(service: Arc<ReadingListService>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(service))
}
