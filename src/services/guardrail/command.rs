//! Command Guard Rules
//!
//! The built-in destructive-command patterns and the checker that applies
//! them to a single shell invocation.

use regex::Regex;
use tracing::debug;

use super::{GuardRule, GuardVerdict};

/// One compiled rule
struct CompiledRule {
    name: String,
    regex: Regex,
}

/// Stateless shell-invocation checker.
pub struct CommandGuard {
    rules: Vec<CompiledRule>,
}

impl CommandGuard {
    /// Create a guard with the built-in rule set.
    pub fn new() -> Self {
        let mut guard = Self { rules: Vec::new() };
        for rule in Self::builtin_rules() {
            // Built-in patterns are known-good; skip rather than panic on drift
            let _ = guard.add_rule(&rule);
        }
        guard
    }

    /// Create a guard with only the given rules.
    ///
    /// Invalid patterns are skipped; returns the number of rules accepted.
    pub fn with_rules(rules: &[GuardRule]) -> (Self, usize) {
        let mut guard = Self { rules: Vec::new() };
        let accepted = rules.iter().filter(|r| guard.add_rule(r).is_some()).count();
        (guard, accepted)
    }

    /// Add a rule. Returns None if the pattern fails to compile.
    pub fn add_rule(&mut self, rule: &GuardRule) -> Option<()> {
        let regex = Regex::new(&rule.pattern).ok()?;
        self.rules.push(CompiledRule {
            name: rule.name.clone(),
            regex,
        });
        Some(())
    }

    /// Number of active rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Check one shell invocation. First matching rule rejects.
    pub fn check(&self, command: &str) -> GuardVerdict {
        for rule in &self.rules {
            if rule.regex.is_match(command) {
                debug!(rule = %rule.name, "command blocked");
                return GuardVerdict::Block {
                    reason: format!("Command matches rule '{}'", rule.name),
                };
            }
        }
        GuardVerdict::Allow
    }

    /// The built-in destructive-command rule set.
    pub fn builtin_rules() -> Vec<GuardRule> {
        vec![
            GuardRule {
                name: "Recursive root delete".to_string(),
                pattern: r"rm\s+(-[a-zA-Z]*[rR][a-zA-Z]*f[a-zA-Z]*|-[a-zA-Z]*f[a-zA-Z]*[rR][a-zA-Z]*)\s+(/|~|\$HOME)(\s|$)".to_string(),
                description: "rm -rf aimed at the filesystem root or home directory".to_string(),
            },
            GuardRule {
                name: "Raw disk write".to_string(),
                pattern: r"dd\s+[^|;]*of=/dev/(sd|hd|nvme|disk)".to_string(),
                description: "dd writing directly to a block device".to_string(),
            },
            GuardRule {
                name: "Filesystem format".to_string(),
                pattern: r"\bmkfs(\.\w+)?\s".to_string(),
                description: "Formatting a filesystem".to_string(),
            },
            GuardRule {
                name: "World-writable root".to_string(),
                pattern: r"chmod\s+(-[a-zA-Z]*R[a-zA-Z]*\s+)?777\s+/(\s|$)".to_string(),
                description: "Making the filesystem root world-writable".to_string(),
            },
            GuardRule {
                name: "Fork bomb".to_string(),
                pattern: r":\(\)\s*\{\s*:\|:\s*&\s*\}\s*;?\s*:".to_string(),
                description: "Classic shell fork bomb".to_string(),
            },
            GuardRule {
                name: "Pipe download to shell".to_string(),
                pattern: r"(curl|wget)\s+[^|;]*\|\s*(sudo\s+)?(ba)?sh".to_string(),
                description: "Piping a remote script straight into a shell".to_string(),
            },
            GuardRule {
                name: "Force push to protected branch".to_string(),
                pattern: r"git\s+push\s+[^;|&]*(--force|-f)\s+[^;|&]*\b(main|master)\b|git\s+push\s+[^;|&]*\b(main|master)\b[^;|&]*(--force|-f)".to_string(),
                description: "git push --force to main or master".to_string(),
            },
        ]
    }
}

impl Default for CommandGuard {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
