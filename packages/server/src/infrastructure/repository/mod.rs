//! Repository 実装
//!
//! - `inmemory`: プロセス内の Session Registry を使った実装

pub mod inmemory;

pub use inmemory::InMemorySessionRepository;
