//! NasriChat guest registration server
//!
//! WebSocket backend for the "Continue as Guest" form: username, gender,
//! interest tags, country tags and preferred chat gender. Country tags go
//! through a resolver that maps aliases and partial names onto canonical
//! country names and serves autocomplete suggestions as the guest types.
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `RegistrationServer` is the central actor owning every guest profile
//!   and the canonical country list
//! - Each connection has a `handler` task communicating with the server
//! - The country dataset is loaded in the background and handed to the
//!   server; until then the fallback list is used
//!
//! The resolver in [`country`] is pure and usable on its own.
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use nasrichat_server::{handle_connection, RegistrationServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:5000").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(RegistrationServer::new(cmd_rx).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx));
//!     }
//! }
//! ```

pub mod catalog;
pub mod client;
pub mod config;
pub mod country;
pub mod error;
pub mod handler;
pub mod message;
pub mod profile;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use catalog::{load_countries, parse_countries};
pub use client::Client;
pub use config::ServerConfig;
pub use country::{commit, remove, AliasTable, CountryList, CountryResolver};
pub use error::{AppError, SendError};
pub use handler::handle_connection;
pub use message::{ClientMessage, ErrorCode, ServerMessage};
pub use profile::{GuestProfile, GuestRegistration};
pub use server::{RegistrationServer, ServerCommand};
pub use types::{ClientId, Gender, PreferredGender};
