//! Navigation history.
//!
//! Mirrors the browser history API: a list of entries and a cursor.
//! Pushing drops every entry after the cursor; traversal only moves the
//! cursor.

use crate::routing::matcher::Location;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: Vec<Location>,
    cursor: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry after the current one, discarding forward entries.
    pub fn push(&mut self, location: Location) {
        if let Some(cursor) = self.cursor {
            self.entries.truncate(cursor + 1);
        }
        self.entries.push(location);
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Overwrite the current entry (push if there is none).
    pub fn replace(&mut self, location: Location) {
        match self.cursor {
            Some(cursor) => self.entries[cursor] = location,
            None => self.push(location),
        }
    }

    /// Entry `delta` steps from the cursor, with its index.
    pub fn peek(&self, delta: isize) -> Option<(usize, &Location)> {
        let cursor = self.cursor? as isize;
        let target = cursor.checked_add(delta)?;
        if target < 0 {
            return None;
        }
        let index = target as usize;
        self.entries.get(index).map(|loc| (index, loc))
    }

    /// Move the cursor to an existing entry.
    pub fn go_to(&mut self, index: usize) {
        if index < self.entries.len() {
            self.cursor = Some(index);
        }
    }

    pub fn current(&self) -> Option<&Location> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    pub fn entries(&self) -> &[Location] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        self.peek(-1).is_some()
    }

    pub fn can_go_forward(&self) -> bool {
        self.peek(1).is_some()
    }
}
