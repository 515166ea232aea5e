//! Command Guard
//!
//! Stateless pattern checker for shell invocations. The surrounding
//! application runs every candidate command through [`CommandGuard::check`]
//! before execution and refuses the ones that match a destructive pattern.
//!
//! ## Architecture
//!
//! - `GuardVerdict`: accept/reject decision with a reason
//! - `GuardRule`: one named regex pattern
//! - `CommandGuard`: built-in rule set plus user-defined rules
//! - `GuardDecision`: the JSON payload emitted by the hook

pub mod command;

use serde::{Deserialize, Serialize};

pub use command::CommandGuard;

/// Result of checking one command against the guard rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GuardVerdict {
    /// Command matched no rule and may run.
    Allow,
    /// Command matched a rule and must not run.
    Block {
        /// Reason the command was blocked
        reason: String,
    },
}

impl GuardVerdict {
    /// Returns true if the verdict is Allow.
    pub fn is_allow(&self) -> bool {
        matches!(self, GuardVerdict::Allow)
    }

    /// Returns true if the verdict is Block.
    pub fn is_block(&self) -> bool {
        matches!(self, GuardVerdict::Block { .. })
    }

    /// Returns a human-readable type string for logging.
    pub fn verdict_type(&self) -> &'static str {
        match self {
            GuardVerdict::Allow => "allow",
            GuardVerdict::Block { .. } => "block",
        }
    }
}

/// Configuration for a single guard rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardRule {
    /// Human-readable name of the rule (e.g., "Recursive root delete")
    pub name: String,
    /// Regex pattern string
    pub pattern: String,
    /// Description of what the rule catches
    pub description: String,
}

/// Decision payload the hook prints as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardDecision {
    /// "accept" or "reject"
    pub decision: String,
    /// Reason for a rejection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<GuardVerdict> for GuardDecision {
    fn from(verdict: GuardVerdict) -> Self {
        match verdict {
            GuardVerdict::Allow => Self {
                decision: "accept".to_string(),
                reason: None,
            },
            GuardVerdict::Block { reason } => Self {
                decision: "reject".to_string(),
                reason: Some(reason),
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
