//! Typed client for the Trello REST API.

mod client;
mod error;
mod models;

pub use client::TrelloClient;
pub use error::TrelloError;
pub use models::{ListPosition, Organization, TrelloList};
