//! Text rendering of the todo page.

use std::borrow::Cow;

use todo_core::{Theme, Todo};
use todo_sync::QueryStatus;

const RESET: &str = "\x1b[0m";

/// ANSI codes for one theme. Empty strings mean "terminal default".
#[derive(Debug, Clone, Copy)]
struct Palette {
    base: &'static str,
    muted: &'static str,
    done: &'static str,
}

impl Palette {
    const PLAIN: Palette = Palette {
        base: "",
        muted: "",
        done: "",
    };

    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                base: "",
                muted: "\x1b[90m",
                done: "\x1b[9;90m",
            },
            Theme::Dark => Palette {
                base: "\x1b[97;40m",
                muted: "\x1b[37;40m",
                done: "\x1b[9;37;40m",
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    theme: Theme,
    palette: Palette,
}

impl Renderer {
    pub fn new(theme: Theme, color: bool) -> Self {
        let palette = if color { Palette::for_theme(theme) } else { Palette::PLAIN };
        Self { theme, palette }
    }

    pub fn render(&self, status: &QueryStatus<Vec<Todo>>) -> String {
        let mut lines = vec![self.paint(self.palette.base, &format!("Todo App  [{} theme]", self.theme))];
        match status {
            QueryStatus::Loading => lines.push(self.paint(self.palette.base, "Loading...")),
            QueryStatus::Failed(message) => {
                lines.push(self.paint(self.palette.base, &format!("Error: {message}")));
            }
            QueryStatus::Ready { data, stale } => {
                lines.push(self.paint(self.palette.base, "Todo List"));
                lines.push(self.paint(self.palette.muted, "Manage your tasks"));
                lines.extend(data.iter().map(|todo| self.todo_line(todo)));
                let mut footer = item_count(data.len());
                if *stale {
                    footer.push_str(" (refreshing)");
                }
                lines.push(self.paint(self.palette.muted, &footer));
            }
        }
        lines.join("\n")
    }

    fn todo_line(&self, todo: &Todo) -> String {
        let (mark, style) = if todo.completed {
            ("[x]", self.palette.done)
        } else {
            ("[ ]", self.palette.base)
        };
        format!(
            "{} {}",
            self.paint(self.palette.base, &format!("{mark} {:>3}", todo.id)),
            self.paint(style, &sanitize(&todo.title))
        )
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if code.is_empty() {
            text.to_string()
        } else {
            format!("{code}{text}{RESET}")
        }
    }
}

/// Server-supplied text with every control character replaced by U+FFFD,
/// so it cannot carry terminal escape sequences.
pub fn sanitize(text: &str) -> Cow<'_, str> {
    if text.chars().any(char::is_control) {
        Cow::Owned(
            text.chars()
                .map(|c| if c.is_control() { char::REPLACEMENT_CHARACTER } else { c })
                .collect(),
        )
    } else {
        Cow::Borrowed(text)
    }
}

/// `0 items`, `1 item`, `2 items`, ...
pub fn item_count(n: usize) -> String {
    if n == 1 {
        "1 item".to_string()
    } else {
        format!("{n} items")
    }
}
