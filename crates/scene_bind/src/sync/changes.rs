//! Change-set accumulator
//!
//! Collects change tokens between two flushes. Adding is a set union that
//! keeps first-insertion order; draining turns the set into one apply pass.

use log::debug;

use super::token::ChangeToken;
use crate::foundation::collections::IndexSet;

/// What one drained pass should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pass {
    /// Dispatch these tokens in order
    Apply(Vec<ChangeToken>),
    /// Re-push current values only
    Refresh,
}

/// Pending change tokens of one owning node
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    tokens: IndexSet<ChangeToken>,
}

impl ChangeSet {
    /// Create an empty change-set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add comma or whitespace separated token names
    ///
    /// Unknown names are skipped. Returns how many names were recognised.
    pub fn add(&mut self, names: &str) -> usize {
        let mut recognised = 0;
        for name in names.split(|c: char| c == ',' || c.is_whitespace()).filter(|n| !n.is_empty()) {
            match name.parse::<ChangeToken>() {
                Ok(token) => {
                    self.tokens.insert(token);
                    recognised += 1;
                }
                Err(_) => debug!("Ignoring unknown change '{}'", name),
            }
        }
        recognised
    }

    /// Add several names
    pub fn add_all<S: AsRef<str>>(&mut self, names: impl IntoIterator<Item = S>) -> usize {
        names.into_iter().map(|name| self.add(name.as_ref())).sum()
    }

    /// Add one typed token
    pub fn add_token(&mut self, token: ChangeToken) {
        self.tokens.insert(token);
    }

    /// Whether a token is pending
    pub fn contains(&self, token: ChangeToken) -> bool {
        self.tokens.contains(&token)
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of pending tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Pending tokens in insertion order
    pub fn iter(&self) -> impl Iterator<Item = ChangeToken> + '_ {
        self.tokens.iter().copied()
    }

    /// Drop everything pending
    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    /// Take the next pass
    ///
    /// `init` expands to `canonical` followed by any other pending tokens and
    /// absorbs `clearinit`. A lone `clearinit` becomes a [`Pass::Refresh`]
    /// and leaves the other tokens queued for the following pass.
    pub fn take_pass(&mut self, canonical: &[ChangeToken]) -> Option<Pass> {
        if self.tokens.is_empty() {
            return None;
        }
        if self.tokens.shift_remove(&ChangeToken::Init) {
            self.tokens.shift_remove(&ChangeToken::ClearInit);
            let mut ordered: IndexSet<ChangeToken> = canonical.iter().copied().collect();
            ordered.extend(self.tokens.drain(..));
            return Some(Pass::Apply(ordered.into_iter().collect()));
        }
        if self.tokens.shift_remove(&ChangeToken::ClearInit) {
            return Some(Pass::Refresh);
        }
        Some(Pass::Apply(self.tokens.drain(..).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_keeps_first_insertion_order() {
        let mut changes = ChangeSet::new();
        changes.add("visible, position");
        changes.add("visible name");
        assert_eq!(
            changes.iter().collect::<Vec<_>>(),
            vec![ChangeToken::Visible, ChangeToken::Position, ChangeToken::Name]
        );
    }

    #[test]
    fn test_unknown_names_are_skipped() {
        let mut changes = ChangeSet::new();
        assert_eq!(changes.add_all(["visible", "sparkle", "scale"]), 2);
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn test_init_expands_canonical_first() {
        let mut changes = ChangeSet::new();
        changes.add("material,init,position,clearinit");
        let canonical = [ChangeToken::Position, ChangeToken::Visible];
        assert_eq!(
            changes.take_pass(&canonical),
            Some(Pass::Apply(vec![
                ChangeToken::Position,
                ChangeToken::Visible,
                ChangeToken::Material,
            ]))
        );
        assert!(changes.is_empty());
    }

    #[test]
    fn test_clearinit_short_circuits() {
        let mut changes = ChangeSet::new();
        changes.add("visible,clearinit");
        assert_eq!(changes.take_pass(&[]), Some(Pass::Refresh));
        assert_eq!(changes.take_pass(&[]), Some(Pass::Apply(vec![ChangeToken::Visible])));
        assert_eq!(changes.take_pass(&[]), None);
    }
}
