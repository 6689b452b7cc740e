//! Frame driver
//!
//! One `update` runs the whole pipeline in a fixed order: clock, hierarchy,
//! camera, sink. Everything is single-threaded and owned here.

use crate::camera::CameraPose;
use crate::config::OrreryConfig;
use crate::cycle::FocusCycle;
use crate::error::EngineResult;
use crate::focus::{CameraController, CameraMode, FocusOutcome};
use crate::frame::{CameraSnapshot, FocusSnapshot, FrameSnapshot, RenderSink};
use crate::input::{apply_input, InputEvent};
use orrery_core::Catalog;
use orrery_sim::{SimulationClock, SolarSystem};

pub struct Orrery {
    clock: SimulationClock,
    system: SolarSystem,
    camera: CameraController,
    cycle: FocusCycle,
}

impl Orrery {
    pub fn new(catalog: Catalog, config: &OrreryConfig) -> EngineResult<Self> {
        let mut clock = SimulationClock::at_epoch(config.clock.epoch()?)
            .with_time_scale(config.clock.time_scale);
        if config.clock.paused {
            clock.pause();
        }

        let cycle = FocusCycle::new(&catalog);
        let system = SolarSystem::with_layout(catalog, config.layout.clone());
        let camera = CameraController::new(config.camera.clone());

        tracing::info!(
            "Orrery ready: start {}, {} days/s, {} focus targets",
            clock.start_epoch(),
            clock.time_scale(),
            cycle.len() - 1
        );

        Ok(Self {
            clock,
            system,
            camera,
            cycle,
        })
    }

    /// Built-in catalog with default configuration
    pub fn with_defaults() -> EngineResult<Self> {
        Self::new(Catalog::builtin()?, &OrreryConfig::default())
    }

    /// Advance one frame of `frame_delta_seconds` real time
    pub fn step(&mut self, frame_delta_seconds: f64) {
        let days = self.clock.update(frame_delta_seconds);
        self.system.update(days);
        self.camera.update(&self.system);
    }

    /// Advance one frame and hand the result to `sink`
    pub fn update(&mut self, frame_delta_seconds: f64, sink: &mut impl RenderSink) -> EngineResult<()> {
        self.step(frame_delta_seconds);
        sink.present(&self.snapshot())
    }

    /// State of the last completed frame
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            frame: self.clock.frames(),
            days: self.clock.days(),
            epoch: self.clock.epoch().to_string(),
            time_scale: self.clock.time_scale(),
            paused: self.clock.is_paused(),
            bodies: self.system.snapshot().bodies,
            camera: CameraSnapshot {
                pose: *self.camera.pose(),
                mode: self.camera.mode(),
                controls_enabled: self.camera.controls_enabled(),
            },
            focus: FocusSnapshot {
                target: self.camera.target().map(str::to_string),
                label: self.focus_label().to_string(),
            },
        }
    }

    pub fn set_focus_target(&mut self, target: Option<&str>) -> FocusOutcome {
        let outcome = self.camera.set_focus_target(&self.system, target);
        if outcome != FocusOutcome::Rejected {
            self.cycle.sync(target);
        }
        outcome
    }

    pub fn focus_next(&mut self) -> FocusOutcome {
        let target = self.cycle.next().map(str::to_string);
        self.camera.set_focus_target(&self.system, target.as_deref())
    }

    pub fn focus_previous(&mut self) -> FocusOutcome {
        let target = self.cycle.previous().map(str::to_string);
        self.camera.set_focus_target(&self.system, target.as_deref())
    }

    /// Label of the picker's current entry
    pub fn focus_label(&self) -> &str {
        self.cycle.label(self.system.catalog())
    }

    pub fn is_traversable(&self, name: &str) -> bool {
        self.system.catalog().is_traversable(name)
    }

    pub fn push_input(&mut self, event: InputEvent) -> Option<FocusOutcome> {
        apply_input(self, event)
    }

    pub fn set_time_scale(&mut self, time_scale: f64) {
        self.clock.set_time_scale(time_scale);
    }

    pub fn time_scale(&self) -> f64 {
        self.clock.time_scale()
    }

    pub fn toggle_pause(&mut self) {
        self.clock.toggle_pause();
        tracing::info!("Clock {}", if self.clock.is_paused() { "paused" } else { "running" });
    }

    pub fn mode(&self) -> CameraMode {
        self.camera.mode()
    }

    pub fn pose(&self) -> &CameraPose {
        self.camera.pose()
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn system(&self) -> &SolarSystem {
        &self.system
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraController {
        &mut self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FOCUS_TIME_SCALE;
    use crate::frame::JsonLinesSink;

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn test_frame_pipeline_order() {
        let mut orrery = Orrery::with_defaults().unwrap();
        // Slow enough for the lerp to catch Earth's spinning goal
        orrery.set_time_scale(0.02);
        orrery.set_focus_target(Some("Earth"));

        let mut frames: Vec<FrameSnapshot> = Vec::new();
        for _ in 0..300 {
            orrery.update(DT, &mut frames).unwrap();
        }

        let last = frames.last().unwrap();
        assert_eq!(last.frame, 300);
        assert!((last.days - 300.0 * DT * 0.02).abs() < 1e-12);
        assert_eq!(last.camera.mode, CameraMode::Locked);
        // The camera was updated against this frame's hierarchy
        let earth = last.body("Earth").unwrap();
        assert!((last.camera.pose.target - earth.position).length() < 1e-9);
        assert_eq!(last.focus.target.as_deref(), Some("Earth"));
        assert_eq!(last.focus.label, "地球");
    }

    #[test]
    fn test_time_scale_change_keeps_days() {
        let mut orrery = Orrery::with_defaults().unwrap();
        for _ in 0..60 {
            orrery.step(DT);
        }
        let before = orrery.clock().days();
        orrery.set_time_scale(50.0);
        assert_eq!(orrery.clock().days(), before);
        orrery.step(DT);
        assert!((orrery.clock().days() - before - 50.0 * DT).abs() < 1e-12);
    }

    #[test]
    fn test_paused_clock_still_renders() {
        let mut config = OrreryConfig::default();
        config.clock.paused = true;
        let mut orrery = Orrery::new(Catalog::builtin().unwrap(), &config).unwrap();
        orrery.set_focus_target(Some("Mars"));
        for _ in 0..400 {
            orrery.step(DT);
        }
        assert_eq!(orrery.clock().days(), 0.0);
        assert_eq!(orrery.mode(), CameraMode::Locked);
    }

    #[test]
    fn test_cycle_follows_direct_focus() {
        let mut orrery = Orrery::with_defaults().unwrap();
        assert_eq!(orrery.focus_label(), "View Solar System");
        orrery.set_focus_target(Some("Jupiter"));
        assert_eq!(orrery.focus_next(), FocusOutcome::Retargeted);
        assert_eq!(orrery.camera().target(), Some("Io"));
        assert_eq!(orrery.set_focus_target(Some("Saturn Rings")), FocusOutcome::Rejected);
        assert_eq!(orrery.camera().target(), Some("Io"));
    }

    #[test]
    fn test_fast_rotators_lock_at_focus_time_scale() {
        for name in ["Jupiter", "Neptune"] {
            let mut orrery = Orrery::with_defaults().unwrap();
            orrery.set_time_scale(FOCUS_TIME_SCALE);
            assert_eq!(orrery.set_focus_target(Some(name)), FocusOutcome::Started);
            for _ in 0..600 {
                orrery.step(DT);
                if orrery.mode() == CameraMode::Locked {
                    break;
                }
            }
            assert_eq!(orrery.mode(), CameraMode::Locked, "{} never locked", name);
            let body = orrery.system().body_position(name).unwrap();
            assert!((orrery.pose().target - body).length() < 1e-9);
        }
    }

    #[test]
    fn test_json_lines_sink() {
        let mut orrery = Orrery::with_defaults().unwrap();
        let mut sink = JsonLinesSink::new(Vec::new());
        orrery.update(DT, &mut sink).unwrap();
        orrery.update(DT, &mut sink).unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let value: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(value["frame"], 2);
        assert_eq!(value["camera"]["mode"], "idle");
        assert!(value["bodies"].as_array().unwrap().len() > 10);
    }
}
