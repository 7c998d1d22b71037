//! Message protocol definitions
//!
//! JSON-based bidirectional message protocol using Serde's tagged enum
//! for type-safe serialization/deserialization.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::profile::GuestRegistration;
use crate::types::{Gender, PreferredGender};

/// Client → Server message
///
/// All messages from client to server. Uses tagged enum with snake_case naming.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Set username (required before submit)
    SetUsername { username: String },
    SetGender { gender: Gender },
    SetPreferredGender { preferred_gender: PreferredGender },
    /// Add an interest tag
    AddInterest { interest: String },
    RemoveInterest { interest: String },
    /// Country field changed (keystroke); answered with suggestions
    CountryInput { input: String },
    /// Commit a country tag (suggestion picked or Enter pressed)
    AddCountry { country: String },
    RemoveCountry { country: String },
    /// Submit the guest form
    Submit,
}

/// Server → Client message
///
/// All messages from server to client. Uses tagged enum with snake_case naming.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection successful, client ID and quick-picks issued
    Connected {
        client_id: String,
        popular_interests: Vec<String>,
        popular_countries: Vec<String>,
    },
    UsernameSet { username: String },
    GenderSet { gender: Gender },
    PreferredGenderSet { preferred_gender: PreferredGender },
    /// Current interest tags
    InterestsUpdated { interests: Vec<String> },
    /// Autocomplete results for the given input
    CountrySuggestions {
        input: String,
        suggestions: Vec<String>,
    },
    /// Current country tags
    CountriesUpdated { countries: Vec<String> },
    /// Form accepted
    Registered { profile: GuestRegistration },
    /// Error occurred
    Error { code: ErrorCode, message: String },
}

/// Error codes for ServerMessage::Error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Submitted without setting a username
    UsernameRequired,
    /// Blank username, interest or country
    EmptyValue,
    /// Invalid message format
    InvalidMessage,
}

/// Convert AppError to ServerMessage for client notification
impl From<AppError> for ServerMessage {
    fn from(err: AppError) -> Self {
        let (code, message) = match &err {
            AppError::UsernameRequired => {
                (ErrorCode::UsernameRequired, "Username is required".to_string())
            }
            AppError::EmptyValue(field) => {
                (ErrorCode::EmptyValue, format!("The {} must not be empty", field))
            }
            AppError::Json(e) => {
                (ErrorCode::InvalidMessage, format!("Invalid message format: {}", e))
            }
            // Fatal errors are not typically converted (connection closes)
            _ => (ErrorCode::InvalidMessage, "Internal error".to_string()),
        };
        ServerMessage::Error { code, message }
    }
}
