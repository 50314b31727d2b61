// Fri Oct 16 2026 - Alex

use crate::config::FixConfig;
use crate::display::{resolve_resolution, DisplayQuery};
use crate::fixes::{
    Fix, FixContext, FixEvent, FixObserver, FixOutcome, FixReport, FovFix, PillarboxFix, ResolutionFix,
};
use crate::hook::InterceptionAdapter;
use crate::memory::PatchMemory;
use crate::utils::logging::ScopedTimer;

const MAIN: &str = "main";

/// Runs fixes one after another. A fix that fails is reported and the rest
/// still run.
pub struct Orchestrator {
    fixes: Vec<Box<dyn Fix>>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self { fixes: Vec::new() }
    }

    /// Resolution, pillarbox and FOV, in that order.
    pub fn standard() -> Self {
        Self::new()
            .with_fix(Box::new(ResolutionFix))
            .with_fix(Box::new(PillarboxFix))
            .with_fix(Box::new(FovFix))
    }

    pub fn with_fix(mut self, fix: Box<dyn Fix>) -> Self {
        self.fixes.push(fix);
        self
    }

    pub fn fix_names(&self) -> Vec<&str> {
        self.fixes.iter().map(|f| f.name()).collect()
    }

    pub fn run(&self, ctx: &mut FixContext<'_>) -> FixReport {
        let _timer = ScopedTimer::new("fixes");
        let mut report = FixReport::new();

        for fix in &self.fixes {
            let name = fix.name();
            let enabled = fix.enabled(ctx.config());
            ctx.notify(name, FixEvent::Enabled(enabled));

            let outcome = if !enabled {
                FixOutcome::Disabled
            } else {
                match fix.apply(ctx) {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        ctx.notify(name, FixEvent::Failed(e.to_string()));
                        FixOutcome::Failed(e)
                    }
                }
            };
            report.push(name, outcome);
        }

        report
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::standard()
    }
}

/// Entry point once the module is loaded: resolves the target resolution,
/// reports the configuration, then applies the standard fixes to `memory`.
pub fn run_fixes(
    config: &FixConfig,
    display: &dyn DisplayQuery,
    memory: &mut dyn PatchMemory,
    hooks: &InterceptionAdapter,
    observer: &dyn FixObserver,
) -> FixReport {
    let resolution = resolve_resolution(config.resolution, display);
    let image = memory.image().range();

    let info = |message: String| observer.on_event(MAIN, &FixEvent::Info(message));
    info(format!("Config: {}", config.name));
    if let Some(path) = memory.module_path() {
        if let Some(name) = path.file_name() {
            info(format!("Module Name: {}", name.to_string_lossy()));
        }
        info(format!("Module Path: {}", path.display()));
    }
    info(format!("Module Addr: {} ({} bytes)", image.start(), image.len()));
    info(format!("MasterEnable: {}", config.master_enable));
    info(format!("Fix.Resolution.Enable: {}", config.fixes.resolution.enable));
    info(format!("Fix.Pillarbox.Enable: {}", config.fixes.pillarbox.enable));
    info(format!("Fix.Fov.Enable: {}", config.fixes.fov.enable));
    info(format!("Fix.Fov.Multiplier: {}", config.fixes.fov.multiplier));
    match resolution {
        Some(r) => info(format!("Target resolution: {}", r)),
        None => info("Target resolution: unknown".to_string()),
    }

    let mut ctx = FixContext::new(config, resolution, memory, hooks, observer);
    Orchestrator::standard().run(&mut ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Resolution;
    use crate::display::{FixedDisplay, NoDisplay};
    use crate::fixes::{fov_for_aspect, FixError, RecordingObserver};
    use crate::hook::{RecordingFacility, RegisterContext};
    use crate::memory::{Address, BufferMemory, MemoryRange};

    const BASE: usize = 0x1_4000_0000;
    const RATIO_A: usize = 0x100;
    const RATIO_B: usize = 0x1200;
    const PILLARBOX: usize = 0x400;
    const FOV: usize = 0x1800;

    const RATIO: [u8; 4] = [0x39, 0x8E, 0xE3, 0x3F];
    const PILLARBOX_BYTES: [u8; 5] = [0xF6, 0x41, 0x2C, 0x01, 0x4C];
    const FOV_BYTES: [u8; 14] = [
        0xF3, 0x0F, 0x10, 0x81, 0x9C, 0x03, 0x00, 0x00, 0x0F, 0x57, 0xC9, 0x0F, 0x2F, 0xC1,
    ];

    fn game_image() -> BufferMemory {
        let mut data = vec![0xCCu8; 0x2000];
        data[RATIO_A..RATIO_A + 4].copy_from_slice(&RATIO);
        data[RATIO_B..RATIO_B + 4].copy_from_slice(&RATIO);
        data[PILLARBOX..PILLARBOX + 5].copy_from_slice(&PILLARBOX_BYTES);
        data[FOV..FOV + 14].copy_from_slice(&FOV_BYTES);
        BufferMemory::new(Address::new(BASE), data).unwrap()
    }

    struct Harness {
        memory: BufferMemory,
        facility: RecordingFacility,
        adapter: InterceptionAdapter,
        observer: RecordingObserver,
    }

    impl Harness {
        fn new(memory: BufferMemory) -> Self {
            let facility = RecordingFacility::new();
            Self {
                memory,
                adapter: InterceptionAdapter::new(facility.clone()),
                facility,
                observer: RecordingObserver::new(),
            }
        }

        fn run(&mut self, config: &FixConfig, display: &dyn DisplayQuery) -> FixReport {
            run_fixes(config, display, &mut self.memory, &self.adapter, &self.observer)
        }
    }

    fn ultrawide() -> FixedDisplay {
        FixedDisplay(Resolution::new(5120, 1440))
    }

    #[test]
    fn test_all_fixes_applied() {
        let mut h = Harness::new(game_image());
        let report = h.run(&FixConfig::default(), &ultrawide());

        assert!(!report.has_failures(), "{}", report);
        assert!(matches!(report.outcome("resolution"), Some(FixOutcome::Patched { sites: 2 })));
        assert!(matches!(report.outcome("pillarbox"), Some(FixOutcome::Patched { sites: 1 })));
        assert!(matches!(report.outcome("fov"), Some(FixOutcome::Hooked { .. })));
        assert_eq!(report.applied_count(), 3);

        let data = h.memory.as_slice();
        assert_eq!(&data[RATIO_A..RATIO_A + 4], &[0x39, 0x8E, 0x63, 0x40]);
        assert_eq!(&data[RATIO_B..RATIO_B + 4], &[0x39, 0x8E, 0x63, 0x40]);
        assert_eq!(&data[PILLARBOX..PILLARBOX + 5], &[0xF6, 0x41, 0x2C, 0x00, 0x4C]);
        assert_eq!(&data[FOV..FOV + 14], &FOV_BYTES);

        let hook = Address::new(BASE + FOV + 8);
        assert_eq!(h.facility.installed(), vec![(hook, 3)]);
        let mut regs = RegisterContext::new();
        regs.xmm_mut(0).set_f32(0, 68.0);
        regs.xmm_mut(0).set_f32(1, 7.0);
        assert!(h.facility.fire(hook, &mut regs));
        assert_eq!(regs.xmm(0).f32(0), fov_for_aspect(32.0 / 9.0, 1.0));
        assert_eq!(regs.xmm(0).f32(1), 7.0);
    }

    #[test]
    fn test_log_lines_per_fix() {
        let mut h = Harness::new(game_image());
        h.run(&FixConfig::default(), &ultrawide());

        let pillarbox: Vec<String> = h.observer.events_for("pillarbox").iter().map(|e| e.to_string()).collect();
        assert_eq!(
            pillarbox,
            vec![
                "Fix Enabled".to_string(),
                "Found 'F6 41 2C 01 4C' @ 0x400".to_string(),
                "Patched 'F6 41 2C 01 4C' with 'F6 41 2C 00'".to_string(),
            ]
        );
        assert!(h
            .observer
            .events_for("resolution")
            .contains(&FixEvent::Info("Aspect Ratio: 32:9 3.5555556".to_string())));
        assert!(h.observer.events_for("fov").contains(&FixEvent::Hooked {
            offset: FOV,
            hook_offset: 8
        }));
    }

    #[test]
    fn test_module_details_logged() {
        let path = std::env::temp_dir().join(format!("codevein-fix-{}-CodeVein-Win64-Shipping.exe", std::process::id()));
        std::fs::write(&path, game_image().into_bytes()).unwrap();
        let memory = BufferMemory::load(&path, Address::new(BASE));
        let _ = std::fs::remove_file(&path);

        let mut h = Harness::new(memory.unwrap());
        h.run(&FixConfig::default(), &ultrawide());

        let main: Vec<String> = h.observer.events_for("main").iter().map(|e| e.to_string()).collect();
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(main.contains(&format!("Module Name: {}", name)));
        assert!(main.contains(&format!("Module Path: {}", path.display())));
        assert!(main.contains(&format!("Module Addr: {} (8192 bytes)", Address::new(BASE))));
    }

    #[test]
    fn test_master_disable_skips_everything() {
        let mut h = Harness::new(game_image());
        let before = h.memory.as_slice().to_vec();
        let config = FixConfig {
            master_enable: false,
            ..FixConfig::default()
        };
        let report = h.run(&config, &ultrawide());

        assert!(report.entries().iter().all(|e| matches!(e.outcome, FixOutcome::Disabled)));
        assert_eq!(h.memory.as_slice(), &before[..]);
        assert!(h.facility.installed().is_empty());
    }

    #[test]
    fn test_individual_enable_flags() {
        let mut h = Harness::new(game_image());
        let mut config = FixConfig::default();
        config.fixes.pillarbox.enable = false;
        let report = h.run(&config, &ultrawide());

        assert!(matches!(report.outcome("pillarbox"), Some(FixOutcome::Disabled)));
        assert!(matches!(report.outcome("resolution"), Some(FixOutcome::Patched { .. })));
        assert_eq!(&h.memory.as_slice()[PILLARBOX..PILLARBOX + 5], &PILLARBOX_BYTES);
    }

    #[test]
    fn test_missing_pattern_reports_not_found() {
        let mut data = game_image().into_bytes();
        data[PILLARBOX] = 0x90;
        let mut h = Harness::new(BufferMemory::new(Address::new(BASE), data).unwrap());
        let report = h.run(&FixConfig::default(), &ultrawide());

        assert!(matches!(report.outcome("pillarbox"), Some(FixOutcome::NotFound)));
        assert!(matches!(report.outcome("fov"), Some(FixOutcome::Hooked { .. })));
        assert!(h.observer.events_for("pillarbox").contains(&FixEvent::NotFound {
            pattern: "F6 41 2C 01 4C".to_string()
        }));
    }

    #[test]
    fn test_failed_fix_does_not_stop_others() {
        let mut memory = game_image();
        memory
            .lock_pages(MemoryRange::new(Address::new(BASE + PILLARBOX), 4).unwrap())
            .unwrap();
        let mut h = Harness::new(memory);
        let report = h.run(&FixConfig::default(), &ultrawide());

        // The first page also holds one aspect ratio constant; the second is still patched.
        assert!(matches!(
            report.outcome("resolution"),
            Some(FixOutcome::Partial { sites: 1, failures }) if failures.len() == 1
        ));
        assert_eq!(&h.memory.as_slice()[RATIO_A..RATIO_A + 4], &RATIO);
        assert_eq!(&h.memory.as_slice()[RATIO_B..RATIO_B + 4], &[0x39, 0x8E, 0x63, 0x40]);
        assert!(matches!(report.outcome("pillarbox"), Some(FixOutcome::Failed(FixError::Patch(_)))));
        assert!(matches!(report.outcome("fov"), Some(FixOutcome::Hooked { .. })));
        assert_eq!(report.failures().count(), 2);
        assert_eq!(&h.memory.as_slice()[PILLARBOX..PILLARBOX + 5], &PILLARBOX_BYTES);
    }

    #[test]
    fn test_unknown_resolution_fails_scaling_fixes() {
        let mut h = Harness::new(game_image());
        let report = h.run(&FixConfig::default(), &NoDisplay);

        assert!(matches!(report.outcome("resolution"), Some(FixOutcome::Failed(FixError::NoResolution))));
        assert!(matches!(report.outcome("fov"), Some(FixOutcome::Failed(FixError::NoResolution))));
        assert!(matches!(report.outcome("pillarbox"), Some(FixOutcome::Patched { sites: 1 })));
    }

    #[test]
    fn test_second_run_is_harmless() {
        let mut h = Harness::new(game_image());
        h.run(&FixConfig::default(), &ultrawide());
        let after_first = h.memory.as_slice().to_vec();

        let report = h.run(&FixConfig::default(), &ultrawide());
        assert_eq!(h.memory.as_slice(), &after_first[..]);
        assert!(matches!(report.outcome("resolution"), Some(FixOutcome::NotFound)));
        assert!(matches!(report.outcome("pillarbox"), Some(FixOutcome::NotFound)));
        // The interception point from the first run is still active.
        assert!(matches!(report.outcome("fov"), Some(FixOutcome::Failed(FixError::Hook(_)))));
    }
}
