/// The "new todo" input field.
///
/// The draft survives a failed submission and is cleared only once the
/// server accepted it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoInput {
    draft: String,
}

impl TodoInput {
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn clear(&mut self) {
        self.draft.clear();
    }

    /// The trimmed draft, or `None` when there is nothing worth sending.
    pub fn submission(&self) -> Option<&str> {
        let title = self.draft.trim();
        (!title.is_empty()).then_some(title)
    }
}
