//! In-place editing engine for checklist blocks embedded in a rich-text
//! document: items with inline markup, a checked flag and an indentation
//! level, kept in sync with Enter/Backspace/Tab edits and checkbox clicks.

pub mod caret;
pub mod config;
pub mod engine;
pub mod host;
pub mod markup;
pub mod model;
pub mod render;
pub mod serial;
pub mod theme;

pub use caret::{CaretPlacement, CaretPosition};
pub use config::ToolConfig;
pub use engine::{ClickTarget, Command, EditingEngine, Outcome};
pub use host::{BlockHost, ToolMetadata};
pub use markup::RichText;
pub use model::{ChecklistItem, ChecklistModel, ItemId};
pub use serial::{BlockData, ItemData, SerialError};
