use crate::models::DEFAULT_CATEGORY;
use serde::{Deserialize, Serialize};

/// What `update` does when the target id is absent.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMissing {
    #[default]
    Reject,
    Insert,
}

impl UpdateMissing {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reject" => Some(UpdateMissing::Reject),
            "insert" => Some(UpdateMissing::Insert),
            _ => None,
        }
    }

    pub fn to_str(self) -> &'static str {
        match self {
            UpdateMissing::Reject => "reject",
            UpdateMissing::Insert => "insert",
        }
    }
}

/// What `delete_by_id` does when the target id is absent.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMissing {
    #[default]
    Ignore,
    Reject,
}

impl DeleteMissing {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ignore" => Some(DeleteMissing::Ignore),
            "reject" => Some(DeleteMissing::Reject),
            _ => None,
        }
    }

    pub fn to_str(self) -> &'static str {
        match self {
            DeleteMissing::Ignore => "ignore",
            DeleteMissing::Reject => "reject",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePolicy {
    pub default_category: String,
    pub update_missing: UpdateMissing,
    pub delete_missing: DeleteMissing,
}

impl Default for StorePolicy {
    fn default() -> Self {
        Self {
            default_category: DEFAULT_CATEGORY.to_string(),
            update_missing: UpdateMissing::default(),
            delete_missing: DeleteMissing::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parsing() {
        assert_eq!(UpdateMissing::from_str("INSERT"), Some(UpdateMissing::Insert));
        assert_eq!(UpdateMissing::from_str("upsert"), None);
        assert_eq!(DeleteMissing::from_str("reject"), Some(DeleteMissing::Reject));
        assert_eq!(DeleteMissing::Ignore.to_str(), "ignore");
    }

    #[test]
    fn test_default_policy() {
        let policy = StorePolicy::default();
        assert_eq!(policy.default_category, DEFAULT_CATEGORY);
        assert_eq!(policy.update_missing, UpdateMissing::Reject);
        assert_eq!(policy.delete_missing, DeleteMissing::Ignore);
    }
}
