//! The todo synchronization service.
//!
//! # Design
//! `TodoSync` pairs the stateless `TodoClient` with a transport and the
//! shared list cache. Reads go through [`TodoSync::fetch_todos`], which
//! settles a cache ticket; each mutation is an independent async call that
//! invalidates the list on success and leaves the cache untouched on
//! failure. Nothing orders concurrent mutations: every success invalidates,
//! the next refresh re-reads the server, and the ticket clock in the cache
//! keeps the freshest list.

use std::sync::Arc;

use todo_core::{ApiError, CreateTodo, Operation, Todo, TodoClient, TodoId, UpdateTodo};
use tracing::{debug, info, warn};

use crate::cache::{QueryCache, QueryKey, QueryStatus};
use crate::error::SyncError;
use crate::transport::HttpTransport;

/// Cache key of the todo list.
pub const TODOS_KEY: QueryKey = QueryKey::new("todos");

pub type TodoCache = QueryCache<Vec<Todo>>;

pub struct TodoSync<T> {
    client: TodoClient,
    transport: T,
    cache: Arc<TodoCache>,
}

impl<T: HttpTransport> TodoSync<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self::with_cache(client, transport, Arc::new(QueryCache::new()))
    }

    pub fn with_cache(client: TodoClient, transport: T, cache: Arc<TodoCache>) -> Self {
        Self {
            client,
            transport,
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<TodoCache> {
        &self.cache
    }

    /// Current view of the list without touching the network.
    pub fn todos(&self) -> QueryStatus<Vec<Todo>> {
        self.cache.status(&TODOS_KEY)
    }

    /// GET the list and store the result in the cache. No retry.
    pub async fn fetch_todos(&self) -> Result<Vec<Todo>, SyncError> {
        let ticket = self.cache.begin_fetch(&TODOS_KEY);
        match self.list().await {
            Ok(todos) => {
                debug!(count = todos.len(), "fetched todos");
                self.cache.resolve(ticket, todos.clone());
                Ok(todos)
            }
            Err(source) => {
                let err = SyncError::new(Operation::List, source);
                warn!(error = %err.source, "listing todos failed");
                self.cache.reject(ticket, err.to_string());
                Err(err)
            }
        }
    }

    /// Re-fetch only when the list has never loaded or was invalidated.
    pub async fn refresh_if_stale(&self) -> Option<Result<Vec<Todo>, SyncError>> {
        if !self.cache.is_stale(&TODOS_KEY) {
            return None;
        }
        Some(self.fetch_todos().await)
    }

    /// Create a todo from a raw title. A title that is empty after trimming
    /// is rejected before any request is made.
    pub async fn create(&self, title: &str) -> Result<Todo, SyncError> {
        let result: Result<Todo, ApiError> = async {
            let input = CreateTodo::new(title)?;
            let request = self.client.build_create_todo(&input)?;
            let response = self.transport.execute(request).await?;
            self.client.parse_create_todo(response)
        }
        .await;
        self.settle_mutation(Operation::Create, result)
    }

    /// Set the completed flag of `id`.
    pub async fn toggle(&self, id: TodoId, completed: bool) -> Result<Todo, SyncError> {
        let result: Result<Todo, ApiError> = async {
            let request = self.client.build_update_todo(id, &UpdateTodo { completed })?;
            let response = self.transport.execute(request).await?;
            self.client.parse_update_todo(response)
        }
        .await;
        self.settle_mutation(Operation::Toggle, result)
    }

    pub async fn delete(&self, id: TodoId) -> Result<(), SyncError> {
        let result: Result<(), ApiError> = async {
            let response = self.transport.execute(self.client.build_delete_todo(id)).await?;
            self.client.parse_delete_todo(response)
        }
        .await;
        self.settle_mutation(Operation::Delete, result)
    }

    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let response = self.transport.execute(self.client.build_list_todos()).await?;
        self.client.parse_list_todos(response)
    }

    fn settle_mutation<R>(&self, operation: Operation, result: Result<R, ApiError>) -> Result<R, SyncError> {
        match result {
            Ok(value) => {
                info!(?operation, key = %TODOS_KEY, "mutation succeeded, invalidating");
                self.cache.invalidate(&TODOS_KEY);
                Ok(value)
            }
            Err(source) => {
                warn!(?operation, error = %source, "mutation failed");
                Err(SyncError::new(operation, source))
            }
        }
    }
}
