//! Rendering
//!
//! The simulation hands a read-only [`Snapshot`] to a [`FrameSink`] once per
//! tick. The WebGPU sink draws everything in a fragment shader using SDFs.

pub mod scene;
pub mod sdf_pipeline;

pub use scene::SceneLayout;
pub use sdf_pipeline::SdfRenderState;

use thiserror::Error;

use crate::sim::{Flyer, GamePhase, Obstacle};
use crate::tuning::Tuning;

/// Rendering error types
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("device request failed: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface has no supported format")]
    Unsupported,
    #[error("renderer not ready")]
    NotReady,
}

/// Immutable view of everything a frame needs
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub flyer: &'a Flyer,
    pub obstacles: &'a [Obstacle],
    pub score: u64,
    pub best: u64,
    pub phase: GamePhase,
    pub frame: u64,
    pub speed: f32,
    pub tuning: &'a Tuning,
}

/// Consumer of one snapshot per tick
///
/// Errors are reported back only so the host can log them; they never feed
/// into the simulation.
pub trait FrameSink {
    fn present(&mut self, snapshot: &Snapshot<'_>) -> Result<(), RenderError>;
}

/// Sink that draws nothing (headless runs)
#[derive(Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _snapshot: &Snapshot<'_>) -> Result<(), RenderError> {
        Ok(())
    }
}
