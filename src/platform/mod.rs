//! Platform abstraction layer
//!
//! Browser-facing glue kept free of `web_sys` so it runs in native tests:
//! - Input events to simulation triggers (including auto-pause)
//! - Canvas backing-store sizing

pub mod input;
pub mod viewport;

pub use input::{HostCommand, InputEvent, UiAction, map_event};
pub use viewport::canvas_size;
