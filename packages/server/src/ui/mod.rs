//! WebSocket game server.

pub mod event_loop;
mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
