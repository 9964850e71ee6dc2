//! One interactive session: the page state plus the sync layer behind it.

use todo_core::{Theme, ThemeStore, TodoId};
use todo_sync::{HttpTransport, QueryStatus, TodoSync};
use tracing::{debug, info};

use crate::command::{Command, HELP};
use crate::input::TodoInput;
use crate::render::Renderer;

/// What the caller should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Re-render, optionally showing a one-line notice first.
    Continue(Option<String>),
    Quit,
}

pub struct Session<T> {
    sync: TodoSync<T>,
    theme: ThemeStore,
    input: TodoInput,
    color: bool,
}

impl<T: HttpTransport> Session<T> {
    pub fn new(sync: TodoSync<T>, theme: Theme, color: bool) -> Self {
        Self {
            sync,
            theme: ThemeStore::new(theme),
            input: TodoInput::default(),
            color,
        }
    }

    pub fn sync(&self) -> &TodoSync<T> {
        &self.sync
    }

    pub fn theme(&self) -> Theme {
        self.theme.theme()
    }

    pub fn input(&self) -> &TodoInput {
        &self.input
    }

    /// Render the page from the cache as it is right now.
    pub fn view(&self) -> String {
        Renderer::new(self.theme.theme(), self.color).render(&self.sync.todos())
    }

    /// Load the list if it has never loaded or a mutation invalidated it.
    pub async fn revalidate(&self) {
        // A failed list lands in the cache and is rendered as an error view.
        let _ = self.sync.refresh_if_stale().await;
    }

    /// Run one command, then bring the list up to date.
    pub async fn handle(&mut self, command: Command) -> Reply {
        debug!(?command, "handling command");
        let notice = match command {
            Command::Quit => return Reply::Quit,
            Command::Help => Some(HELP.to_string()),
            Command::List => None,
            Command::Refresh => {
                let _ = self.sync.fetch_todos().await;
                None
            }
            Command::Theme => {
                let theme = self.theme.toggle();
                info!(%theme, "theme switched");
                None
            }
            Command::Add(text) => self.add(text).await,
            Command::Toggle { id, completed } => self.toggle(id, completed).await,
            Command::Delete(id) => {
                // Failures are logged by the sync layer and leave the view as is.
                let _ = self.sync.delete(id).await;
                None
            }
        };
        self.revalidate().await;
        Reply::Continue(notice)
    }

    async fn add(&mut self, text: Option<String>) -> Option<String> {
        if let Some(text) = text {
            self.input.set(text);
        }
        let Some(title) = self.input.submission() else {
            return Some("nothing to add".to_string());
        };
        if self.sync.create(title).await.is_ok() {
            self.input.clear();
        }
        None
    }

    async fn toggle(&mut self, id: TodoId, completed: Option<bool>) -> Option<String> {
        let completed = match completed {
            Some(completed) => completed,
            None => match self.sync.todos() {
                QueryStatus::Ready { data, .. } => match data.iter().find(|t| t.id == id) {
                    Some(todo) => !todo.completed,
                    None => return Some(format!("no todo with id {id}")),
                },
                _ => return Some("the list is not loaded; try \"refresh\" or give the state".to_string()),
            },
        };
        let _ = self.sync.toggle(id, completed).await;
        None
    }
}
