use crate::models::{Todo, TodoData, TodoError};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

mod policy;
pub use policy::{DeleteMissing, StorePolicy, UpdateMissing};

/// In-memory todo collection with monotonic id allocation.
///
/// Records are keyed by id; since ids only grow, iterating the map in key
/// order is iterating in creation order.
#[derive(Debug, Default)]
pub struct TodoStore {
    items: BTreeMap<u64, Todo>,
    next_id: u64,
    policy: StorePolicy,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: StorePolicy) -> Self {
        Self {
            items: BTreeMap::new(),
            next_id: 0,
            policy,
        }
    }

    pub fn policy(&self) -> &StorePolicy {
        &self.policy
    }

    /// Last id handed out, 0 if none yet.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn build(&self, id: u64, data: TodoData) -> Result<Todo, TodoError> {
        Todo::with_default_category(id, data, &self.policy.default_category)
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut Todo, TodoError> {
        self.items.get_mut(&id).ok_or_else(|| {
            debug!("todo {} not found", id);
            TodoError::NotFound(id)
        })
    }

    pub fn add(&mut self, data: TodoData) -> Result<u64, TodoError> {
        // Validate before touching the counter so a rejected add burns no id.
        data.validate()?;
        let id = self.next_id.checked_add(1).ok_or_else(|| {
            TodoError::InvalidArgument("Todo id counter exhausted".to_string())
        })?;
        let todo = self.build(id, data)?;
        self.next_id = id;
        self.items.insert(id, todo);
        debug!("added todo {}", id);
        Ok(id)
    }

    pub fn find_all(&self) -> Vec<&Todo> {
        self.items.values().collect()
    }

    pub fn find_by_id(&self, id: u64) -> Result<&Todo, TodoError> {
        self.items.get(&id).ok_or(TodoError::NotFound(id))
    }

    /// Replaces the whole record at `id`; fields absent from `data` revert to
    /// their defaults.
    pub fn update(&mut self, id: u64, data: TodoData) -> Result<(), TodoError> {
        let todo = self.build(id, data)?;
        if !self.items.contains_key(&id) {
            match self.policy.update_missing {
                UpdateMissing::Reject => {
                    debug!("update rejected, todo {} not found", id);
                    return Err(TodoError::NotFound(id));
                }
                UpdateMissing::Insert => {
                    debug!("update inserting missing todo {}", id);
                    self.next_id = self.next_id.max(id);
                }
            }
        }
        self.items.insert(id, todo);
        debug!("updated todo {}", id);
        Ok(())
    }

    pub fn update_tag_by_id(
        &mut self,
        id: u64,
        before_tag: &str,
        after_tag: &str,
    ) -> Result<(), TodoError> {
        let todo = self.get_mut(id)?;
        if !todo.tags.remove(before_tag) {
            return Err(TodoError::TagNotFound(vec![before_tag.to_string()]));
        }
        todo.tags.insert(after_tag.to_string());
        debug!("renamed tag {:?} to {:?} on todo {}", before_tag, after_tag, id);
        Ok(())
    }

    /// Removes every record. The id counter keeps its value.
    pub fn delete_all(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        debug!("deleted all todos ({} removed)", removed);
        removed
    }

    pub fn delete_by_id(&mut self, id: u64) -> Result<Option<Todo>, TodoError> {
        let removed = self.items.remove(&id);
        match (&removed, self.policy.delete_missing) {
            (None, DeleteMissing::Reject) => return Err(TodoError::NotFound(id)),
            (None, DeleteMissing::Ignore) => debug!("delete of missing todo {} ignored", id),
            (Some(_), _) => debug!("deleted todo {}", id),
        }
        Ok(removed)
    }

    /// Removes each of `target_tags` from the todo. Tags that were found stay
    /// removed even when others are missing; the missing ones are reported
    /// together in a single `TagNotFound`.
    pub fn delete_tag_by_id<S: AsRef<str>>(
        &mut self,
        id: u64,
        target_tags: &[S],
    ) -> Result<(), TodoError> {
        let todo = self.get_mut(id)?;
        let mut seen = BTreeSet::new();
        let mut missing = Vec::new();
        for tag in target_tags.iter().map(AsRef::as_ref) {
            if !seen.insert(tag) {
                continue;
            }
            if !todo.tags.remove(tag) {
                missing.push(tag.to_string());
            }
        }
        debug!(
            "removed {} tag(s) from todo {}",
            seen.len() - missing.len(),
            id
        );
        if missing.is_empty() {
            Ok(())
        } else {
            Err(TodoError::TagNotFound(missing))
        }
    }

    pub fn delete_all_tags_by_id(&mut self, id: u64) -> Result<(), TodoError> {
        let todo = self.get_mut(id)?;
        todo.tags.clear();
        debug!("cleared tags on todo {}", id);
        Ok(())
    }
}
