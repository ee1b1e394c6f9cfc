use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Category given to a todo created without one.
pub const DEFAULT_CATEGORY: &str = "미분류";

/// Caller-supplied fields for creating or replacing a todo.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct TodoData {
    #[serde(default)]
    pub complete: Option<bool>,
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl TodoData {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn complete(mut self, complete: bool) -> Self {
        self.complete = Some(complete);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn validate(&self) -> Result<(), TodoError> {
        if self.content.trim().is_empty() {
            return Err(TodoError::InvalidArgument(
                "Todo content cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: u64,
    pub complete: bool,
    pub content: String,
    pub category: String,
    pub tags: BTreeSet<String>,
}

impl Todo {
    pub fn new(id: u64, data: TodoData) -> Result<Self, TodoError> {
        Self::with_default_category(id, data, DEFAULT_CATEGORY)
    }

    /// Builds a todo, substituting `default_category` when the data has no
    /// category or an empty one.
    pub fn with_default_category(
        id: u64,
        data: TodoData,
        default_category: &str,
    ) -> Result<Self, TodoError> {
        if id == 0 {
            return Err(TodoError::InvalidArgument(
                "Todo id must be positive".to_string(),
            ));
        }
        data.validate()?;

        let category = data
            .category
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| default_category.to_string());

        Ok(Self {
            id,
            complete: data.complete.unwrap_or(false),
            content: data.content,
            category,
            tags: data.tags.unwrap_or_default().into_iter().collect(),
        })
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TodoError {
    #[error("Todo not found: {0}")]
    NotFound(u64),
    #[error("Tags not found on todo: {}", .0.join(", "))]
    TagNotFound(Vec<String>),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl TodoError {
    /// Transport code for this error kind, HTTP flavored.
    pub fn status_code(&self) -> u16 {
        match self {
            TodoError::NotFound(_) => 404,
            TodoError::TagNotFound(_) => 409,
            TodoError::InvalidArgument(_) => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_defaults() {
        let todo = Todo::new(1, TodoData::new("Buy milk")).unwrap();
        assert_eq!(todo.id, 1);
        assert!(!todo.complete);
        assert_eq!(todo.content, "Buy milk");
        assert_eq!(todo.category, DEFAULT_CATEGORY);
        assert!(todo.tags.is_empty());
    }

    #[test]
    fn test_todo_empty_category_falls_back() {
        let todo = Todo::new(3, TodoData::new("Call mom").category("")).unwrap();
        assert_eq!(todo.category, DEFAULT_CATEGORY);

        let todo =
            Todo::with_default_category(3, TodoData::new("Call mom"), "inbox").unwrap();
        assert_eq!(todo.category, "inbox");
    }

    #[test]
    fn test_todo_tags_collapse_duplicates() {
        let data = TodoData::new("Write report")
            .complete(true)
            .category("work")
            .tags(["urgent", "q3", "urgent"]);
        let todo = Todo::new(2, data).unwrap();

        assert!(todo.complete);
        assert_eq!(todo.category, "work");
        assert_eq!(todo.tags.len(), 2);
        assert!(todo.has_tag("urgent"));
        assert!(todo.has_tag("q3"));
        assert!(!todo.has_tag("Urgent"));
    }

    #[test]
    fn test_todo_rejects_blank_content() {
        let result = Todo::new(1, TodoData::new("   "));
        assert!(matches!(result, Err(TodoError::InvalidArgument(_))));
    }

    #[test]
    fn test_todo_rejects_zero_id() {
        let result = Todo::new(0, TodoData::new("Buy milk"));
        assert!(matches!(result, Err(TodoError::InvalidArgument(_))));
    }

    #[test]
    fn test_todo_data_from_json_uses_defaults() {
        let data: TodoData = serde_json::from_str(r#"{"content": "Read book"}"#).unwrap();
        assert_eq!(data, TodoData::new("Read book"));

        let todo = Todo::new(5, data).unwrap();
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["category"], DEFAULT_CATEGORY);
        assert_eq!(json["tags"], serde_json::json!([]));
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(TodoError::NotFound(9).status_code(), 404);
        assert_eq!(TodoError::TagNotFound(vec!["a".into()]).status_code(), 409);
        assert_eq!(
            TodoError::InvalidArgument("x".into()).status_code(),
            400
        );
        assert_eq!(
            TodoError::TagNotFound(vec!["a".into(), "z".into()]).to_string(),
            "Tags not found on todo: a, z"
        );
    }
}
