//! Chat widget core plus the `/chat` assistant service it talks to.
//!
//! The widget (`widget`, `endpoint`, `terminal`) is UI-agnostic: it renders
//! through a [`widget::surface::Surface`] and reaches the server through a
//! [`endpoint::ChatEndpoint`]. The service side (`routes`, `services`,
//! `llm`, `state`) answers messages with an LLM and hands the rest to a
//! human admin.

pub mod endpoint;
pub mod llm;
pub mod protocol;
pub mod routes;
pub mod services;
pub mod state;
pub mod terminal;
pub mod widget;
