//! Client struct definition
//!
//! Represents a connected guest with their form state and communication channel.

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::message::ServerMessage;
use crate::profile::GuestProfile;
use crate::types::ClientId;

/// Connected client information
#[derive(Debug)]
pub struct Client {
    /// Unique identifier for this client
    pub id: ClientId,
    /// Registration form state
    pub profile: GuestProfile,
    /// Server → Client message channel
    pub sender: mpsc::Sender<ServerMessage>,
    /// Set once the form has been submitted successfully
    pub registered: bool,
}

impl Client {
    /// Create a new client with the given ID and sender channel
    pub fn new(id: ClientId, sender: mpsc::Sender<ServerMessage>) -> Self {
        Self {
            id,
            profile: GuestProfile::new(),
            sender,
            registered: false,
        }
    }

    /// Send a message to this client
    ///
    /// Returns an error if the channel is closed (client disconnected).
    pub async fn send(&self, msg: ServerMessage) -> Result<(), SendError> {
        self.sender
            .send(msg)
            .await
            .map_err(|_| SendError::ChannelClosed)
    }

    /// Get the display name for this client
    ///
    /// Returns the username if set, otherwise "Guest".
    pub fn display_name(&self) -> &str {
        self.profile.username.as_deref().unwrap_or("Guest")
    }
}
