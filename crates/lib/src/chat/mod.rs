//! Client side of the chat: command interpretation, the conversation log,
//! and reply rendering.
//!
//! A [`ChatSession`] owns the active [`FeatureMode`](crate::FeatureMode) and
//! the [`ChatLog`]. Each submitted line is classified locally; only inputs
//! that pass mode gating and parse reach the backend through [`ChatApi`].

pub mod errors;
pub mod http;
pub mod interpreter;
pub mod message;
pub mod render;
pub mod text;

pub use errors::ChatError;
pub use http::HttpChatApi;
pub use interpreter::{ChatApi, ChatSession, Dispatch, Pending, classify, respond};
pub use message::{BlockSnapshot, ChatLog, ChatMessage, Origin};
