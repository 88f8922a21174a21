//! Core of the storechat widget
//!
//! This crate owns the conversation history, its persistence, the undo-capable
//! clear operation and the send flow. Nothing here touches a display or a network
//! directly: stores, API clients, timers and display surfaces are plugged in through
//! small traits so the same session runs in the browser and in a terminal.

pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod message;
pub mod protocol;
pub mod render;
pub mod session;
pub mod store;
pub mod undo;

// Re-export commonly used types
pub use config::{Labels, WidgetConfig};
pub use controller::ChatController;
pub use error::{ApiError, ConfigError, StoreError};
pub use history::History;
pub use message::{Message, Sender};
pub use protocol::{ChatApi, ChatOutcome, ChatRequest, ChatResponse};
pub use render::{
    render_error, render_history, render_message, BubbleKind, Status, Surface, ViewOp, ViewState,
};
pub use session::{ChatSession, SendOutcome};
pub use store::{KeyValueStore, MemoryStore};
pub use undo::{PendingDeletion, ScheduledTask, Scheduler, UndoController, UndoState, UndoToken};
