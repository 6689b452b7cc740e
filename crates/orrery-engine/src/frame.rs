//! Per-frame output handed to the renderer

use crate::camera::CameraPose;
use crate::error::EngineResult;
use crate::focus::CameraMode;
use orrery_sim::BodyState;
use serde::Serialize;
use std::io::Write;

/// Everything a renderer needs to draw one frame
#[derive(Clone, Debug, Serialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    /// Simulated days since the start epoch
    pub days: f64,
    /// Simulated calendar date
    pub epoch: String,
    pub time_scale: f64,
    pub paused: bool,
    pub bodies: Vec<BodyState>,
    pub camera: CameraSnapshot,
    pub focus: FocusSnapshot,
}

#[derive(Clone, Debug, Serialize)]
pub struct CameraSnapshot {
    #[serde(flatten)]
    pub pose: CameraPose,
    pub mode: CameraMode,
    pub controls_enabled: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct FocusSnapshot {
    pub target: Option<String>,
    /// Label shown by the target picker
    pub label: String,
}

impl FrameSnapshot {
    pub fn body(&self, name: &str) -> Option<&BodyState> {
        self.bodies.iter().find(|b| b.name == name)
    }
}

/// Consumer of finished frames
pub trait RenderSink {
    fn present(&mut self, frame: &FrameSnapshot) -> EngineResult<()>;
}

/// Keeps every frame in memory
impl RenderSink for Vec<FrameSnapshot> {
    fn present(&mut self, frame: &FrameSnapshot) -> EngineResult<()> {
        self.push(frame.clone());
        Ok(())
    }
}

/// Writes one JSON object per frame
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderSink for JsonLinesSink<W> {
    fn present(&mut self, frame: &FrameSnapshot) -> EngineResult<()> {
        serde_json::to_writer(&mut self.writer, frame)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}
