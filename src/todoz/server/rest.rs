//! JSON REST API over the todo facade.
//!
//! | method | path | result |
//! |---|---|---|
//! | GET | `/todos` | `{todos, shortIdMap}` |
//! | POST | `/todos` | 201 + created entry |
//! | GET / DELETE | `/todos/{id}` | entry / 204 |
//! | POST | `/todos/{id}/notified` | 204 |
//! | POST | `/todos/{id}/resolved` | 204 |
//! | POST | `/todos/{id}/due` | 204 |
//! | POST | `/search` | `{todos, shortIdMap}` |
//!
//! Request bodies must be sent as `application/json`. Errors are plain text
//! with 400 for bad input, 404 for unknown ids, 409 for title collisions and
//! 500 for storage failures.

use super::AppHandle;
use crate::api::CmdResult;
use crate::error::TodoError;
use crate::model::Entry;
use crate::short_id::ShortIds;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodosResponse {
    #[serde(default)]
    pub todos: Vec<Entry>,
    #[serde(default)]
    pub short_id_map: ShortIds,
}

impl TodosResponse {
    fn listed(result: CmdResult) -> Self {
        Self {
            todos: result.listed_entries.into_iter().map(|d| d.entry).collect(),
            short_id_map: result.short_ids,
        }
    }

    fn affected(result: CmdResult) -> Self {
        let short_id_map = result
            .affected_entries
            .iter()
            .map(|d| (d.entry.id_string(), d.short_id.clone()))
            .collect();
        Self {
            todos: result.affected_entries.into_iter().map(|d| d.entry).collect(),
            short_id_map,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddBody {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub details: String,
    pub due: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DueBody {
    pub due: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBody {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub search_for: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_before: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notified_before: Option<DateTime<Utc>>,
}

pub struct ApiError(StatusCode, String);

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self(StatusCode::BAD_REQUEST, message.into())
    }
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        let status = match &err {
            TodoError::NotFound(_) => StatusCode::NOT_FOUND,
            TodoError::AlreadyExists(_) => StatusCode::CONFLICT,
            TodoError::Validation { .. } | TodoError::Api(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %err, "request failed");
        }
        Self(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("Id is not a valid UUID"))
}

pub fn router(handle: AppHandle) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(add_todo))
        .route("/todos/{id}", get(get_todo).delete(delete_todo))
        .route("/todos/{id}/notified", post(mark_notified))
        .route("/todos/{id}/resolved", post(resolve_todo))
        .route("/todos/{id}/due", post(reschedule_todo))
        .route("/search", post(search))
        .with_state(handle)
}

/// Binds to the configured address and serves until `cancel` fires.
pub async fn serve(handle: AppHandle, cancel: CancellationToken) -> anyhow::Result<()> {
    let addr = handle.current().config.rest_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "REST server listening");

    axum::serve(listener, router(handle))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;
    Ok(())
}

// GET /todos
async fn list_todos(State(handle): State<AppHandle>) -> Result<Json<TodosResponse>, ApiError> {
    let result = handle.blocking(|api| api.list_all()).await?;
    Ok(Json(TodosResponse::listed(result)))
}

// POST /todos
async fn add_todo(
    State(handle): State<AppHandle>,
    Json(body): Json<AddBody>,
) -> Result<(StatusCode, Json<Entry>), ApiError> {
    if body.title.trim().is_empty() {
        return Err(ApiError::bad_request("A title must be provided"));
    }
    let Some(due) = body.due else {
        return Err(ApiError::bad_request("A due date must be provided"));
    };

    let result = handle
        .blocking(move |api| api.add(&body.title, body.details, Some(due)))
        .await?;
    let entry = result
        .affected_entries
        .into_iter()
        .next()
        .map(|d| d.entry)
        .ok_or_else(|| TodoError::Store("entry was not created".to_string()))?;
    Ok((StatusCode::CREATED, Json(entry)))
}

// GET /todos/{id}
async fn get_todo(
    State(handle): State<AppHandle>,
    Path(id): Path<String>,
) -> Result<Json<Entry>, ApiError> {
    let id = parse_id(&id)?;
    let result = handle.blocking(move |api| api.find_by_id(&id)).await?;
    let entry = result
        .affected_entries
        .into_iter()
        .next()
        .map(|d| d.entry)
        .ok_or_else(|| TodoError::NotFound(id.to_string()))?;
    Ok(Json(entry))
}

// DELETE /todos/{id}
async fn delete_todo(
    State(handle): State<AppHandle>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    handle.blocking(move |api| api.remove(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /todos/{id}/notified
async fn mark_notified(
    State(handle): State<AppHandle>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    handle.blocking(move |api| api.mark_notified(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /todos/{id}/resolved
async fn resolve_todo(
    State(handle): State<AppHandle>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    handle.blocking(move |api| api.resolve(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /todos/{id}/due
async fn reschedule_todo(
    State(handle): State<AppHandle>,
    Path(id): Path<String>,
    Json(body): Json<DueBody>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let Some(due) = body.due else {
        return Err(ApiError::bad_request("A due date must be provided"));
    };
    handle.blocking(move |api| api.reschedule(&id, due)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /search
async fn search(
    State(handle): State<AppHandle>,
    Json(body): Json<SearchBody>,
) -> Result<Json<TodosResponse>, ApiError> {
    if !body.search_for.is_empty() {
        let token = body.search_for;
        let found = handle.blocking(move |api| api.find_by_token(&token)).await;
        return match found {
            Ok(result) => Ok(Json(TodosResponse::affected(result))),
            Err(err) if err.is_not_found() => Ok(Json(TodosResponse::listed(CmdResult::default()))),
            Err(err) => Err(err.into()),
        };
    }

    let result = if let Some(threshold) = body.due_before {
        handle.blocking(move |api| api.list_due_before(threshold)).await?
    } else if let Some(threshold) = body.notified_before {
        handle
            .blocking(move |api| api.list_pending_notification_due_before(threshold))
            .await?
    } else {
        return Err(ApiError::bad_request("A search value must be provided"));
    };
    Ok(Json(TodosResponse::listed(result)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TodoConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn setup() -> (TempDir, AppHandle) {
        let home = TempDir::new().unwrap();
        let handle = AppHandle::new(home.path().to_path_buf(), TodoConfig::default());
        (home, handle)
    }

    async fn send(handle: &AppHandle, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router(handle.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn create(handle: &AppHandle, title: &str, due: &str) -> Value {
        let (status, body) = send(
            handle,
            "POST",
            "/todos",
            Some(json!({"title": title, "details": "", "due": due})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn create_and_list() {
        let (_home, handle) = setup();
        let created = create(&handle, "Buy milk", "2030-01-01T10:00:00Z").await;
        assert_eq!(created["title"], "Buy milk");
        assert_eq!(created["notification"]["type"], "once");

        let (status, body) = send(&handle, "GET", "/todos", None).await;
        assert_eq!(status, StatusCode::OK);
        let listed: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(listed["todos"].as_array().unwrap().len(), 1);
        let id = created["id"].as_str().unwrap();
        assert_eq!(listed["shortIdMap"][id], &id[..1]);
    }

    #[tokio::test]
    async fn create_requires_title_and_due() {
        let (_home, handle) = setup();
        let (status, _) = send(&handle, "POST", "/todos", Some(json!({"due": "2030-01-01T10:00:00Z"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&handle, "POST", "/todos", Some(json!({"title": "No due"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(String::from_utf8(body).unwrap(), "A due date must be provided");
    }

    #[tokio::test]
    async fn duplicate_title_conflicts() {
        let (_home, handle) = setup();
        create(&handle, "Same", "2030-01-01T10:00:00Z").await;
        let (status, _) = send(
            &handle,
            "POST",
            "/todos",
            Some(json!({"title": "Same", "due": "2030-01-01T10:00:00Z"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn get_and_delete_by_id() {
        let (_home, handle) = setup();
        let created = create(&handle, "Temp", "2030-01-01T10:00:00Z").await;
        let uri = format!("/todos/{}", created["id"].as_str().unwrap());

        let (status, body) = send(&handle, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let fetched: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(fetched["title"], "Temp");

        let (status, _) = send(&handle, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&handle, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&handle, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_uuid_is_bad_request() {
        let (_home, handle) = setup();
        let (status, body) = send(&handle, "GET", "/todos/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(String::from_utf8(body).unwrap(), "Id is not a valid UUID");
    }

    #[tokio::test]
    async fn notified_due_and_resolved() {
        let (_home, handle) = setup();
        let created = create(&handle, "Call bank", "2020-01-01T10:00:00Z").await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, _) = send(&handle, "POST", &format!("/todos/{id}/notified"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, body) = send(&handle, "GET", &format!("/todos/{id}"), None).await;
        let fetched: Value = serde_json::from_slice(&body).unwrap();
        assert!(fetched["notification"]["notifiedAt"].is_string());

        let (status, _) = send(
            &handle,
            "POST",
            &format!("/todos/{id}/due"),
            Some(json!({"due": "2031-05-05T08:00:00Z"})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, body) = send(&handle, "GET", &format!("/todos/{id}"), None).await;
        let fetched: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(fetched["due"], "2031-05-05T08:00:00Z");
        assert!(fetched["notification"].get("notifiedAt").is_none());

        let (status, _) = send(&handle, "POST", &format!("/todos/{id}/due"), Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&handle, "POST", &format!("/todos/{id}/resolved"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&handle, "GET", &format!("/todos/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn search_variants() {
        let (_home, handle) = setup();
        create(&handle, "Overdue", "2020-01-01T10:00:00Z").await;
        create(&handle, "Upcoming", "2040-01-01T10:00:00Z").await;

        let (status, body) = send(&handle, "POST", "/search", Some(json!({"searchFor": "upcom"}))).await;
        assert_eq!(status, StatusCode::OK);
        let found: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(found["todos"][0]["title"], "Upcoming");
        assert_eq!(found["shortIdMap"].as_object().unwrap().len(), 1);

        let (_, body) = send(&handle, "POST", "/search", Some(json!({"searchFor": "nothing"}))).await;
        let found: Value = serde_json::from_slice(&body).unwrap();
        assert!(found["todos"].as_array().unwrap().is_empty());

        let (_, body) = send(
            &handle,
            "POST",
            "/search",
            Some(json!({"dueBefore": "2030-01-01T00:00:00Z"})),
        )
        .await;
        let found: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(found["todos"].as_array().unwrap().len(), 1);
        assert_eq!(found["todos"][0]["title"], "Overdue");

        let (_, body) = send(
            &handle,
            "POST",
            "/search",
            Some(json!({"notifiedBefore": "2050-01-01T00:00:00Z"})),
        )
        .await;
        let found: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(found["todos"].as_array().unwrap().len(), 2);

        let (status, _) = send(&handle, "POST", "/search", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
