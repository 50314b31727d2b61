// Fri Oct 16 2026 - Alex

use log::{error, info};
use parking_lot::Mutex;
use std::fmt;

/// Something worth telling the user while a fix runs.
#[derive(Debug, Clone, PartialEq)]
pub enum FixEvent {
    Enabled(bool),
    Found { pattern: String, offset: usize },
    Patched { pattern: String, bytes: String },
    NotFound { pattern: String },
    Hooked { offset: usize, hook_offset: usize },
    Info(String),
    Failed(String),
}

impl fmt::Display for FixEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled(true) => write!(f, "Fix Enabled"),
            Self::Enabled(false) => write!(f, "Fix Disabled"),
            Self::Found { pattern, offset } => write!(f, "Found '{}' @ 0x{:x}", pattern, offset),
            Self::Patched { pattern, bytes } => write!(f, "Patched '{}' with '{}'", pattern, bytes),
            Self::NotFound { pattern } => write!(f, "Did not find '{}'", pattern),
            Self::Hooked { offset, hook_offset } => write!(
                f,
                "Hooked @ 0x{:x} + 0x{:x} = 0x{:x}",
                offset,
                hook_offset,
                offset + hook_offset
            ),
            Self::Info(message) => write!(f, "{}", message),
            Self::Failed(message) => write!(f, "Fix failed: {}", message),
        }
    }
}

pub trait FixObserver {
    fn on_event(&self, fix: &str, event: &FixEvent);
}

/// Routes events to the `log` facade with the fix name as the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl FixObserver for LogObserver {
    fn on_event(&self, fix: &str, event: &FixEvent) {
        match event {
            FixEvent::Failed(_) => error!(target: fix, "{}", event),
            _ => info!(target: fix, "{}", event),
        }
    }
}

/// Keeps every event, in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<(String, FixEvent)>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(String, FixEvent)> {
        self.events.lock().clone()
    }

    pub fn events_for(&self, fix: &str) -> Vec<FixEvent> {
        self.events
            .lock()
            .iter()
            .filter(|(name, _)| name == fix)
            .map(|(_, event)| event.clone())
            .collect()
    }
}

impl FixObserver for RecordingObserver {
    fn on_event(&self, fix: &str, event: &FixEvent) {
        self.events.lock().push((fix.to_string(), event.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_lines() {
        let found = FixEvent::Found {
            pattern: "F6 41 2C 01 4C".to_string(),
            offset: 0x1a2b,
        };
        assert_eq!(found.to_string(), "Found 'F6 41 2C 01 4C' @ 0x1a2b");
        let hooked = FixEvent::Hooked {
            offset: 0xf7b8b80,
            hook_offset: 8,
        };
        assert_eq!(hooked.to_string(), "Hooked @ 0xf7b8b80 + 0x8 = 0xf7b8b88");
        assert_eq!(FixEvent::Enabled(false).to_string(), "Fix Disabled");
    }

    #[test]
    fn test_recording_observer_filters_by_fix() {
        let observer = RecordingObserver::new();
        observer.on_event("pillarbox", &FixEvent::Enabled(true));
        observer.on_event("fov", &FixEvent::Enabled(false));
        LogObserver.on_event("fov", &FixEvent::Enabled(false));
        assert_eq!(observer.events_for("pillarbox"), vec![FixEvent::Enabled(true)]);
        assert_eq!(observer.events().len(), 2);
    }
}
