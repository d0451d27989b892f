use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rustc_hash::FxHashSet;

use crate::node::{NodeId, OperatorNode};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// Don't show any diagnostics.
    #[default]
    Off,
    /// Report operators that are invalid or have no shape rule.
    Warn,
    /// Report all inference outcomes.
    Info,
}

impl DiagnosticLevel {
    /// Parse a level from a name such as "warn", or a boolean such as "1"
    /// which means [`Info`](DiagnosticLevel::Info) if true.
    pub fn parse(s: &str) -> Option<DiagnosticLevel> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" => Some(DiagnosticLevel::Off),
            "warn" => Some(DiagnosticLevel::Warn),
            "info" | "all" => Some(DiagnosticLevel::Info),
            other => crate::env::str_as_bool(other).map(|on| {
                if on {
                    DiagnosticLevel::Info
                } else {
                    DiagnosticLevel::Off
                }
            }),
        }
    }
}

/// Diagnostic reporter for shape inference.
///
/// Messages are written to stderr, prefixed with the level and the name of
/// the operator they relate to. Warnings are reported at most once per
/// operator instance until [`reset`](Diagnostics::reset) is called. The
/// reporter can be shared between threads.
pub struct Diagnostics {
    /// Operators against which diagnostics have been reported at the `Warn`
    /// level or higher.
    warned_nodes: Mutex<FxHashSet<NodeId>>,
    level: DiagnosticLevel,
}

impl Diagnostics {
    pub fn new(level: DiagnosticLevel) -> Self {
        Self {
            warned_nodes: Mutex::new(FxHashSet::default()),
            level,
        }
    }

    /// Return true if diagnostic messages are enabled at a given level.
    pub fn enabled(&self, level: DiagnosticLevel) -> bool {
        self.level >= level
    }

    /// Log a diagnostic message for an operator at the [`Info`](DiagnosticLevel::Info) level.
    pub fn info(&self, node: &OperatorNode, message: fmt::Arguments<'_>) {
        if self.level < DiagnosticLevel::Info {
            return;
        }
        self.log(DiagnosticLevel::Info, node, message);
    }

    /// Log a diagnostic message for an operator at the [`Warn`](DiagnosticLevel::Warn) level.
    pub fn warn(&self, node: &OperatorNode, message: fmt::Arguments<'_>) {
        if self.level < DiagnosticLevel::Warn || !self.mark_warned(node.id()) {
            return;
        }
        self.log(DiagnosticLevel::Warn, node, message);
    }

    /// Record that a warning was reported for `node`. Returns false if one
    /// was reported previously.
    fn mark_warned(&self, node: NodeId) -> bool {
        self.lock_warned().insert(node)
    }

    /// Forget which operators have been warned about.
    pub fn reset(&self) {
        self.lock_warned().clear();
    }

    fn lock_warned(&self) -> MutexGuard<'_, FxHashSet<NodeId>> {
        self.warned_nodes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Return true if a warning has been reported for `node`.
    #[cfg(test)]
    pub(crate) fn has_warned(&self, node: NodeId) -> bool {
        self.lock_warned().contains(&node)
    }

    fn log(&self, level: DiagnosticLevel, node: &OperatorNode, message: fmt::Arguments<'_>) {
        let level_char = match level {
            DiagnosticLevel::Warn => 'W',
            DiagnosticLevel::Info => 'I',
            DiagnosticLevel::Off => return,
        };
        eprintln!("{}| {}: {}", level_char, node.display_name(), message);
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(DiagnosticLevel::Off)
    }
}
