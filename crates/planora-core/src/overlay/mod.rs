//! UI-space overlays that track canvas objects.

mod scheduler;
mod table_resize;

pub use scheduler::{FrameDebouncer, FrameHandle, FrameScheduler, VirtualScheduler};
pub use table_resize::{OverlayRect, OverlayState, TableResizeOverlay};
