// Fri Oct 16 2026 - Alex

use crate::hook::{HookCallback, HookError, RegisterContext, TrampolineFacility};
use crate::memory::{Address, MemoryRange};
use log::{debug, warn};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Handle to an installed interception point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterceptionPoint {
    id: u64,
    range: MemoryRange,
}

impl InterceptionPoint {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn address(&self) -> Address {
        self.range.start()
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn range(&self) -> MemoryRange {
        self.range
    }
}

impl fmt::Display for InterceptionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.id, self.range)
    }
}

struct AdapterState {
    facility: Box<dyn TrampolineFacility>,
    active: BTreeMap<u64, MemoryRange>,
    next_id: u64,
}

/// Bookkeeping in front of a [`TrampolineFacility`]: refuses overlapping
/// installs and makes sure each point is removed exactly once.
///
/// The lock only guards the adapter's own tables; host memory is never locked.
pub struct InterceptionAdapter {
    state: Mutex<AdapterState>,
}

impl InterceptionAdapter {
    pub fn new<F: TrampolineFacility + 'static>(facility: F) -> Self {
        Self::with_boxed(Box::new(facility))
    }

    pub fn with_boxed(facility: Box<dyn TrampolineFacility>) -> Self {
        Self {
            state: Mutex::new(AdapterState {
                facility,
                active: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    pub fn install<F>(&self, address: Address, len: usize, callback: F) -> Result<InterceptionPoint, HookError>
    where
        F: Fn(&mut RegisterContext) + Send + Sync + 'static,
    {
        self.install_shared(address, len, Arc::new(callback))
    }

    pub fn install_shared(
        &self,
        address: Address,
        len: usize,
        callback: HookCallback,
    ) -> Result<InterceptionPoint, HookError> {
        let range = MemoryRange::new(address, len)?;
        let mut state = self.state.lock();

        if let Some((&existing, existing_range)) = state.active.iter().find(|(_, r)| r.overlaps(&range)) {
            return Err(HookError::Overlap {
                address,
                len,
                existing,
                existing_address: existing_range.start(),
            });
        }

        state.facility.install(range, callback)?;

        let id = state.next_id;
        state.next_id += 1;
        state.active.insert(id, range);
        debug!("Installed interception point #{} at {} via {}", id, range, state.facility.name());
        Ok(InterceptionPoint { id, range })
    }

    pub fn remove(&self, point: InterceptionPoint) -> Result<(), HookError> {
        let mut state = self.state.lock();
        match state.active.get(&point.id) {
            Some(range) if *range == point.range => {}
            _ => return Err(HookError::Removal(point.id)),
        }
        state.facility.remove(point.address())?;
        state.active.remove(&point.id);
        debug!("Removed interception point {}", point);
        Ok(())
    }

    pub fn is_active(&self, point: &InterceptionPoint) -> bool {
        self.state.lock().active.get(&point.id) == Some(&point.range)
    }

    pub fn active_points(&self) -> Vec<InterceptionPoint> {
        self.state
            .lock()
            .active
            .iter()
            .map(|(&id, &range)| InterceptionPoint { id, range })
            .collect()
    }

    /// Removes every active point, continuing past failures.
    pub fn remove_all(&self) -> Vec<HookError> {
        self.active_points()
            .into_iter()
            .filter_map(|point| match self.remove(point) {
                Ok(()) => None,
                Err(e) => {
                    warn!("Failed to remove interception point {}: {}", point, e);
                    Some(e)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::{FacilityError, RecordingFacility};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn adapter() -> (InterceptionAdapter, RecordingFacility) {
        let facility = RecordingFacility::new();
        (InterceptionAdapter::new(facility.clone()), facility)
    }

    #[test]
    fn test_install_and_fire() {
        let (adapter, facility) = adapter();
        let point = adapter
            .install(Address::new(0x1400), 3, |ctx| ctx.xmm_mut(0).set_f32(0, 90.0))
            .unwrap();
        assert_eq!(point.address(), Address::new(0x1400));
        assert_eq!(facility.installed(), vec![(Address::new(0x1400), 3)]);

        let mut ctx = RegisterContext::new();
        assert!(facility.fire(Address::new(0x1400), &mut ctx));
        assert_eq!(ctx.xmm(0).f32(0), 90.0);
        assert_eq!(ctx.rip, 0x1400);
        assert!(!facility.fire(Address::new(0x1401), &mut ctx));
    }

    #[test]
    fn test_overlapping_install_rejected() {
        let (adapter, facility) = adapter();
        let first = adapter.install(Address::new(0x1000), 5, |_| {}).unwrap();

        let err = adapter.install(Address::new(0x1004), 2, |_| {}).unwrap_err();
        assert!(matches!(err, HookError::Overlap { existing, .. } if existing == first.id()));
        assert!(adapter.install(Address::new(0x0FFE), 3, |_| {}).is_err());
        assert_eq!(facility.total_installs(), 1);

        assert!(adapter.install(Address::new(0x1005), 2, |_| {}).is_ok());
        assert!(adapter.install(Address::new(0x0FFE), 2, |_| {}).is_ok());
    }

    #[test]
    fn test_remove_exactly_once() {
        let (adapter, facility) = adapter();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let point = adapter
            .install(Address::new(0x2000), 3, move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        let mut ctx = RegisterContext::new();
        facility.fire(point.address(), &mut ctx);
        adapter.remove(point).unwrap();
        assert!(!adapter.is_active(&point));
        assert!(!facility.fire(point.address(), &mut ctx));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(matches!(adapter.remove(point), Err(HookError::Removal(id)) if id == point.id()));
    }

    #[test]
    fn test_unknown_point_removal() {
        let (other, _) = adapter();
        let (adapter, _) = adapter();
        let foreign = other.install(Address::new(0x3000), 1, |_| {}).unwrap();
        let local = adapter.install(Address::new(0x4000), 1, |_| {}).unwrap();
        assert_eq!(foreign.id(), local.id());
        assert!(matches!(adapter.remove(foreign), Err(HookError::Removal(_))));
        assert!(adapter.is_active(&local));
    }

    #[test]
    fn test_facility_failure_forwarded() {
        let (adapter, facility) = adapter();
        facility.refuse_installs("no trampoline space");
        let err = adapter.install(Address::new(0x5000), 3, |_| {}).unwrap_err();
        assert!(matches!(err, HookError::Facility(FacilityError::Rejected { .. })));
        assert!(adapter.active_points().is_empty());
    }

    #[test]
    fn test_zero_length_rejected() {
        let (adapter, _) = adapter();
        assert!(matches!(
            adapter.install(Address::new(0x5000), 0, |_| {}),
            Err(HookError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_remove_all() {
        let (adapter, facility) = adapter();
        adapter.install(Address::new(0x1000), 3, |_| {}).unwrap();
        adapter.install(Address::new(0x2000), 3, |_| {}).unwrap();
        assert!(adapter.remove_all().is_empty());
        assert!(adapter.active_points().is_empty());
        assert!(facility.installed().is_empty());
    }
}
