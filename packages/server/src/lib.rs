//! Two-player tic-tac-toe room server library.
//!
//! Players join named rooms over WebSocket, get ready, play a match,
//! chat, and browse the recent results of the room.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
