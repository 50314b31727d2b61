// Fri Oct 16 2026 - Alex

use crate::config::{FixConfig, Resolution};
use crate::fixes::{FixError, FixEvent, FixObserver, FixOutcome};
use crate::hook::InterceptionAdapter;
use crate::memory::{MemoryRange, PatchMemory};
use crate::patch::{PatchApplier, PatchError, PatchOperation};
use crate::pattern::{compile, BytePattern, PatternScanner, ScanHit};
use crate::utils::bytes_to_string;

/// Aspect ratio the target was built for. Every hard-coded ratio and FOV in
/// it assumes 16:9.
pub const NATIVE_ASPECT_RATIO: f32 = 16.0 / 9.0;

pub trait Fix: Send + Sync {
    fn name(&self) -> &str;

    fn enabled(&self, config: &FixConfig) -> bool;

    fn apply(&self, ctx: &mut FixContext<'_>) -> Result<FixOutcome, FixError>;
}

/// Everything a fix may touch, built once per run.
pub struct FixContext<'a> {
    config: &'a FixConfig,
    resolution: Option<Resolution>,
    memory: &'a mut dyn PatchMemory,
    hooks: &'a InterceptionAdapter,
    observer: &'a dyn FixObserver,
    scanner: PatternScanner,
}

impl<'a> FixContext<'a> {
    pub fn new(
        config: &'a FixConfig,
        resolution: Option<Resolution>,
        memory: &'a mut dyn PatchMemory,
        hooks: &'a InterceptionAdapter,
        observer: &'a dyn FixObserver,
    ) -> Self {
        Self {
            config,
            resolution,
            memory,
            hooks,
            observer,
            scanner: PatternScanner::new(),
        }
    }

    pub fn with_scanner(mut self, scanner: PatternScanner) -> Self {
        self.scanner = scanner;
        self
    }

    pub fn config(&self) -> &FixConfig {
        self.config
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    /// Target aspect ratio, required by every fix that rescales something.
    pub fn aspect_ratio(&self) -> Result<f32, FixError> {
        self.resolution
            .and_then(|r| r.aspect_ratio())
            .ok_or(FixError::NoResolution)
    }

    pub fn hooks(&self) -> &InterceptionAdapter {
        self.hooks
    }

    pub fn image_range(&self) -> MemoryRange {
        self.memory.image().range()
    }

    pub fn notify(&self, fix: &str, event: FixEvent) {
        self.observer.on_event(fix, &event);
    }

    pub fn scan(&self, pattern: &BytePattern) -> Vec<ScanHit> {
        self.scanner.scan(&self.memory.image(), pattern)
    }

    /// Compiles `text`, scans for it and reports each hit, or the absence of
    /// any.
    pub fn find(&self, fix: &str, text: &str) -> Result<Vec<ScanHit>, FixError> {
        let pattern = compile(text)?;
        let hits = self.scan(&pattern);
        if hits.is_empty() {
            self.notify(fix, FixEvent::NotFound { pattern: text.to_string() });
        }
        for hit in &hits {
            self.notify(
                fix,
                FixEvent::Found {
                    pattern: text.to_string(),
                    offset: hit.offset,
                },
            );
        }
        Ok(hits)
    }

    /// Writes `bytes` at `offset` past `hit`, keeping the write inside the
    /// image.
    pub fn patch_at(
        &mut self,
        fix: &str,
        pattern: &str,
        hit: &ScanHit,
        offset: usize,
        bytes: Vec<u8>,
    ) -> Result<(), FixError> {
        let address = hit.relative(offset).ok_or(PatchError::OutOfImage {
            address: hit.address,
            len: bytes.len(),
        })?;
        let op = PatchOperation::within(self.image_range(), address, bytes)?;
        PatchApplier::new(&mut *self.memory).apply(&op)?;
        self.notify(
            fix,
            FixEvent::Patched {
                pattern: pattern.to_string(),
                bytes: bytes_to_string(op.bytes()),
            },
        );
        Ok(())
    }
}
