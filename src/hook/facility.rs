// Fri Oct 16 2026 - Alex

use crate::hook::{FacilityError, RegisterContext};
use crate::memory::{Address, MemoryRange};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Runs when execution reaches an interception point. May be invoked from any
/// host thread, concurrently with itself, so it must not block.
pub type HookCallback = Arc<dyn Fn(&mut RegisterContext) + Send + Sync + 'static>;

/// The mechanism that physically realizes an interception point: it relocates
/// the instructions under `[target, target + len)`, diverts execution to the
/// callback with the live registers, writes the writable ones back and
/// resumes after the relocated instructions.
pub trait TrampolineFacility: Send {
    fn name(&self) -> &str;

    fn install(&mut self, range: MemoryRange, callback: HookCallback) -> Result<(), FacilityError>;

    /// After this returns the callback is never invoked again. Invocations
    /// already in flight may still be running.
    fn remove(&mut self, target: Address) -> Result<(), FacilityError>;
}

struct Installed {
    len: usize,
    callback: HookCallback,
}

#[derive(Default)]
struct RecordingState {
    installed: BTreeMap<Address, Installed>,
    refuse: Option<String>,
    total_installs: usize,
}

/// A facility that only records what was asked of it. Callbacks run when
/// [`RecordingFacility::fire`] is called, which makes it usable for dry runs
/// against files and for tests.
///
/// Clones share state, so a handle kept outside an adapter sees its installs.
#[derive(Clone, Default)]
pub struct RecordingFacility {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingFacility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later install fail with `reason`.
    pub fn refuse_installs(&self, reason: &str) {
        self.state.lock().refuse = Some(reason.to_string());
    }

    pub fn installed(&self) -> Vec<(Address, usize)> {
        self.state
            .lock()
            .installed
            .iter()
            .map(|(addr, entry)| (*addr, entry.len))
            .collect()
    }

    pub fn total_installs(&self) -> usize {
        self.state.lock().total_installs
    }

    /// Invokes the callback at `target` as if execution had reached it.
    /// Returns false when nothing is installed there.
    pub fn fire(&self, target: Address, ctx: &mut RegisterContext) -> bool {
        let callback = self
            .state
            .lock()
            .installed
            .get(&target)
            .map(|entry| Arc::clone(&entry.callback));
        match callback {
            Some(callback) => {
                ctx.rip = target.as_usize() as u64;
                callback(ctx);
                true
            }
            None => false,
        }
    }
}

impl TrampolineFacility for RecordingFacility {
    fn name(&self) -> &str {
        "recording"
    }

    fn install(&mut self, range: MemoryRange, callback: HookCallback) -> Result<(), FacilityError> {
        let mut state = self.state.lock();
        if let Some(reason) = &state.refuse {
            return Err(FacilityError::Rejected {
                address: range.start(),
                reason: reason.clone(),
            });
        }
        state.installed.insert(
            range.start(),
            Installed {
                len: range.len(),
                callback,
            },
        );
        state.total_installs += 1;
        Ok(())
    }

    fn remove(&mut self, target: Address) -> Result<(), FacilityError> {
        self.state
            .lock()
            .installed
            .remove(&target)
            .map(|_| ())
            .ok_or(FacilityError::NotInstalled(target))
    }
}
