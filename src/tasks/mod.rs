//! Background tasks module
//! 
//! This module contains background tasks that run alongside the HTTP server.

pub mod ticker;
pub mod terminal_display;

// Re-export main functions
pub use ticker::tick_task;
pub use terminal_display::terminal_display_task;
