//! Planora Core Library
//!
//! Platform-agnostic document model and layout engine for Planora printable
//! calendars and planners. Elements are described by metadata and compiled
//! into graphics trees that any renderer can draw.

pub mod camera;
pub mod canvas;
pub mod color;
pub mod compiler;
pub mod config;
pub mod dates;
pub mod error;
pub mod graphics;
pub mod holiday;
pub mod metadata;
pub mod object;
pub mod overlay;
pub mod scene;
pub mod shapes;
pub mod storage;
pub mod style;
pub mod template;
pub mod units;

pub use camera::Camera;
pub use canvas::{Alignment, Canvas, CanvasDocument};
pub use color::SerializableColor;
pub use compiler::{compile, compile_object};
pub use config::PlannerConfig;
pub use error::{ConfigError, DocumentError, DocumentResult};
pub use graphics::{GraphicsTree, Primitive, Role};
pub use holiday::{Holiday, HolidayKind, HolidayLookup, HolidayTable, NoHolidays};
pub use metadata::{ElementKind, ElementMetadata};
pub use object::{CanvasObject, ObjectId, ObjectProperties, ObjectType};
pub use overlay::{FrameDebouncer, FrameScheduler, TableResizeOverlay, VirtualScheduler};
pub use scene::{Scene, SceneNode};
pub use storage::{MemoryStorage, Storage, StorageError, StorageResult, open_canvas, save_canvas};
pub use template::{Template, TemplateLayout, build_layout, builtin_templates, find_template};
pub use units::{Orientation, PaperPreset, PaperSize, Unit, find_preset, match_preset};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
