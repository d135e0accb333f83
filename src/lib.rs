//! Sprint-close automation for the DevEx Trello organization.
//!
//! At the end of a work cycle, the tool moves the `Done` list from the
//! `Current Sprint` board onto a freshly created archive board, grants the
//! archive the organization's membership, and recreates an empty `Done`
//! list so the next cycle starts clean.
//!
//! # Example
//!
//! ```rust,ignore
//! use sprint_closer::profile::Profile;
//! use sprint_closer::trello::TrelloClient;
//! use sprint_closer::workflow;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let profile = Profile::load("~/.trello.json")?;
//!     let client = TrelloClient::new(profile)?;
//!
//!     let report = workflow::close_sprint(&client).await?;
//!     println!("archived into {}", report.archive_board_name);
//!
//!     Ok(())
//! }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod profile;
pub mod trello;
pub mod workflow;

pub use profile::{Profile, ProfileError};
pub use trello::{ListPosition, TrelloClient, TrelloError, TrelloList};
pub use workflow::{archive_board_name, close_sprint, CloseReport};
