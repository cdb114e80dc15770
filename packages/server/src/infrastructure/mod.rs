//! Infrastructure layer
//!
//! ドメイン層の trait（Repository / MessagePusher）の具体的な実装と、
//! ワイヤーフォーマットの DTO を提供する。

pub mod dto;
pub mod message_pusher;
pub mod repository;
