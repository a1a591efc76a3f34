//! Copy-on-write ordered lists of editable entries.

use std::sync::Arc;

use crate::error::EditorError;

/// An entry whose fields can be edited from raw form input.
pub trait ListEntry: Clone {
    /// Field selector for this entry type.
    type Field: Copy + std::fmt::Debug;

    /// Overwrite one field from raw input, applying the field's coercion.
    fn apply_field(&mut self, field: Self::Field, raw: &str);
}

/// Ordered list addressed by position.
///
/// Readers take snapshots with [`EditableList::snapshot`]. Edits never touch a
/// vector that a snapshot still shares; they copy it first.
#[derive(Debug, Clone)]
pub struct EditableList<T> {
    entries: Arc<Vec<T>>,
}

impl<T: ListEntry> EditableList<T> {
    pub fn new(entries: Vec<T>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Shared view of the current entries.
    pub fn snapshot(&self) -> Arc<Vec<T>> {
        Arc::clone(&self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    /// Add an entry at the end.
    pub fn append(&mut self, entry: T) {
        Arc::make_mut(&mut self.entries).push(entry);
    }

    /// Remove the entry at `index`; later entries shift down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<T, EditorError> {
        self.check_index(index)?;
        Ok(Arc::make_mut(&mut self.entries).remove(index))
    }

    /// Overwrite one field of the entry at `index`.
    pub fn update_field(
        &mut self,
        index: usize,
        field: T::Field,
        raw: &str,
    ) -> Result<(), EditorError> {
        self.modify(index, |entry| entry.apply_field(field, raw))
    }

    /// Apply an arbitrary edit to the entry at `index`.
    pub fn modify<R>(
        &mut self,
        index: usize,
        edit: impl FnOnce(&mut T) -> R,
    ) -> Result<R, EditorError> {
        self.check_index(index)?;
        Ok(edit(&mut Arc::make_mut(&mut self.entries)[index]))
    }

    /// Replace the whole list, returning the previous entries.
    pub fn replace_all(&mut self, entries: Vec<T>) -> Arc<Vec<T>> {
        std::mem::replace(&mut self.entries, Arc::new(entries))
    }

    fn check_index(&self, index: usize) -> Result<(), EditorError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(EditorError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }
}

impl<T: ListEntry> Default for EditableList<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
