//! Session history stack
//!
//! Browser-style back/forward over the addresses visited in one session.
//! Never persisted; lives as long as the browser that owns it.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct HistoryStack {
    entries: Vec<String>,
    cursor: usize,
}

impl HistoryStack {
    /// Create a stack holding only `seed`.
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            entries: vec![seed.into()],
            cursor: 0,
        }
    }

    /// The address at the cursor.
    pub fn current(&self) -> &str {
        &self.entries[self.cursor]
    }

    /// Visit `address`, dropping any forward entries.
    ///
    /// Returns `false` without touching the stack when `address` is already current;
    /// the caller reloads instead.
    pub fn navigate(&mut self, address: impl Into<String>) -> bool {
        let address = address.into();
        if address == self.current() {
            return false;
        }

        self.entries.truncate(self.cursor + 1);
        self.entries.push(address);
        self.cursor = self.entries.len() - 1;

        tracing::debug!(
            address = %self.current(),
            depth = self.entries.len(),
            "History push"
        );

        true
    }

    pub fn go_back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn go_forward(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Signal a reload of the current entry. Leaves the stack untouched.
    pub fn refresh(&self) -> &str {
        self.current()
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor < self.entries.len() - 1
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; the seed entry is never removed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
