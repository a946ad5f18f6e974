//! Apply pass reports

use super::token::ChangeToken;
use crate::foundation::collections::{NodeId, ResourceId};

/// What one apply pass did to one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    /// Node the pass ran on
    pub node: NodeId,
    /// Dispatched tokens in order; a refresh pass records `clearinit`
    pub tokens: Vec<ChangeToken>,
    /// Resources attached during the pass
    pub attached: Vec<ResourceId>,
    /// Resources detached during the pass
    pub detached: Vec<ResourceId>,
    /// Whether the pass ended with an explicit matrix recompute
    pub matrix_updated: bool,
}

impl ApplyReport {
    pub(crate) fn new(node: NodeId) -> Self {
        Self {
            node,
            tokens: Vec::new(),
            attached: Vec::new(),
            detached: Vec::new(),
            matrix_updated: false,
        }
    }

    /// Dispatch trace as token names
    pub fn trace(&self) -> Vec<&'static str> {
        self.tokens.iter().map(|token| token.as_str()).collect()
    }

    /// Whether this was a value-only refresh
    pub fn is_refresh(&self) -> bool {
        self.tokens == [ChangeToken::ClearInit]
    }
}
