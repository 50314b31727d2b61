// Fri Oct 16 2026 - Alex

use crate::fixes::FixError;
use crate::hook::InterceptionPoint;
use std::fmt;

#[derive(Debug)]
pub enum FixOutcome {
    Disabled,
    NotFound,
    Patched { sites: usize },
    Hooked { point: InterceptionPoint },
    /// Some sites were patched and the rest could not be.
    Partial { sites: usize, failures: Vec<FixError> },
    Failed(FixError),
}

impl FixOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::Partial { .. })
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Patched { .. } | Self::Hooked { .. } | Self::Partial { .. })
    }
}

impl fmt::Display for FixOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled"),
            Self::NotFound => write!(f, "pattern not found"),
            Self::Patched { sites } => write!(f, "patched {}", crate::utils::pluralize(*sites, "site", "sites")),
            Self::Hooked { point } => write!(f, "hooked at {}", point.address()),
            Self::Partial { sites, failures } => {
                write!(f, "patched {}, {} failed", crate::utils::pluralize(*sites, "site", "sites"), failures.len())?;
                if let Some(first) = failures.first() {
                    write!(f, ": {}", first)?;
                }
                Ok(())
            }
            Self::Failed(e) => write!(f, "failed: {}", e),
        }
    }
}

#[derive(Debug)]
pub struct FixReportEntry {
    pub name: String,
    pub outcome: FixOutcome,
}

/// Outcome of every fix in the order they ran.
#[derive(Debug, Default)]
pub struct FixReport {
    entries: Vec<FixReportEntry>,
}

impl FixReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str, outcome: FixOutcome) {
        self.entries.push(FixReportEntry {
            name: name.to_string(),
            outcome,
        });
    }

    pub fn entries(&self) -> &[FixReportEntry] {
        &self.entries
    }

    pub fn outcome(&self, name: &str) -> Option<&FixOutcome> {
        self.entries.iter().find(|e| e.name == name).map(|e| &e.outcome)
    }

    pub fn failures(&self) -> impl Iterator<Item = &FixReportEntry> {
        self.entries.iter().filter(|e| e.outcome.is_failure())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn applied_count(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_applied()).count()
    }
}

impl fmt::Display for FixReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{:<12} {}", entry.name, entry.outcome)?;
        }
        Ok(())
    }
}
