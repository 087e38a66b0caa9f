//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod link;
pub mod ui;

pub use link::{link_task, Link};
pub use ui::ui_task;
