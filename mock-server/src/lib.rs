use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub completed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Ids are handed out in increasing order and never reused; the map keeps
/// the list ordered by id.
#[derive(Default)]
pub struct Store {
    next_id: i64,
    todos: BTreeMap<i64, Todo>,
}

pub type Db = Arc<RwLock<Store>>;

type HandlerError = (StatusCode, Json<ErrorBody>);

fn error(status: StatusCode, message: &str) -> HandlerError {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

fn not_found() -> HandlerError {
    error(StatusCode::NOT_FOUND, "todo not found")
}

/// Trimmed title, or 400 when nothing is left.
fn valid_title(raw: &str) -> Result<String, HandlerError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "title must not be empty"));
    }
    Ok(title.to_string())
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route("/api/todos/{id}", patch(update_todo).delete(delete_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    let store = db.read().await;
    debug!(count = store.todos.len(), "listing todos");
    Json(store.todos.values().cloned().collect())
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), HandlerError> {
    let title = valid_title(&input.title)?;
    let mut store = db.write().await;
    store.next_id += 1;
    let todo = Todo {
        id: store.next_id,
        title,
        completed: false,
        created_at: Utc::now(),
    };
    store.todos.insert(todo.id, todo.clone());
    debug!(id = todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, HandlerError> {
    let mut store = db.write().await;
    let todo = store.todos.get_mut(&id).ok_or_else(not_found)?;
    todo.completed = input.completed;
    debug!(id, completed = todo.completed, "updated todo");
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, HandlerError> {
    let mut store = db.write().await;
    store.todos.remove(&id).ok_or_else(not_found)?;
    debug!(id, "deleted todo");
    Ok(Json(serde_json::json!({ "deleted": id })))
}
