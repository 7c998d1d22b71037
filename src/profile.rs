//! Guest profile
//!
//! The state behind the "Continue as Guest" form: username, gender,
//! interest tags, country tags and the gender the guest wants to chat with.

use serde::Serialize;

use crate::country::{self, CountryResolver};
use crate::error::AppError;
use crate::types::{Gender, PreferredGender};

/// Interest quick-picks offered next to the interest input
pub const POPULAR_INTERESTS: [&str; 10] = [
    "Football",
    "Music",
    "Reading",
    "Gaming",
    "Travel",
    "Cooking",
    "Photography",
    "Art",
    "Technology",
    "Sports",
];

/// In-progress registration form for one guest
#[derive(Debug, Clone, Default)]
pub struct GuestProfile {
    /// Display name (None before set)
    pub username: Option<String>,
    pub gender: Option<Gender>,
    /// Interest tags in insertion order, unique
    pub interests: Vec<String>,
    /// Country tags in insertion order, unique
    pub countries: Vec<String>,
    pub preferred_gender: Option<PreferredGender>,
    /// Country text typed but not yet committed
    pub pending_country: String,
}

/// Snapshot of a completed form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestRegistration {
    pub username: String,
    pub gender: Option<Gender>,
    pub interests: Vec<String>,
    pub countries: Vec<String>,
    pub preferred_gender: Option<PreferredGender>,
}

impl GuestProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the username (trimmed, must not be blank)
    pub fn set_username(&mut self, raw: &str) -> Result<&str, AppError> {
        let username = raw.trim();
        if username.is_empty() {
            return Err(AppError::EmptyValue("username"));
        }
        Ok(self.username.insert(username.to_string()).as_str())
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.gender = Some(gender);
    }

    pub fn set_preferred_gender(&mut self, preferred: PreferredGender) {
        self.preferred_gender = Some(preferred);
    }

    /// Add an interest tag; duplicates are ignored
    pub fn add_interest(&mut self, raw: &str) -> Result<(), AppError> {
        let interest = raw.trim();
        if interest.is_empty() {
            return Err(AppError::EmptyValue("interest"));
        }
        self.interests = country::commit(&self.interests, interest);
        Ok(())
    }

    pub fn remove_interest(&mut self, value: &str) {
        self.interests = country::remove(&self.interests, value);
    }

    /// Record keystroke input for the country field
    pub fn set_pending_country(&mut self, input: &str) {
        self.pending_country = input.to_string();
    }

    /// Commit a country tag
    ///
    /// The raw value is resolved to a canonical name when possible and kept
    /// verbatim otherwise. Returns the stored value if a new tag was added.
    /// The pending input is cleared once a new raw value has been resolved.
    pub fn add_country<S: AsRef<str>>(
        &mut self,
        raw: &str,
        resolver: &CountryResolver,
        list: &[S],
    ) -> Result<Option<String>, AppError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::EmptyValue("country"));
        }
        if self.countries.iter().any(|c| c == raw) {
            return Ok(None);
        }

        let stored = resolver
            .resolve(raw, list)
            .unwrap_or_else(|| raw.to_string());
        self.pending_country.clear();

        if self.countries.contains(&stored) {
            return Ok(None);
        }
        self.countries = country::commit(&self.countries, &stored);
        Ok(Some(stored))
    }

    pub fn remove_country(&mut self, value: &str) {
        self.countries = country::remove(&self.countries, value);
    }

    /// Snapshot the form for submission (username required)
    pub fn registration(&self) -> Result<GuestRegistration, AppError> {
        let username = self.username.clone().ok_or(AppError::UsernameRequired)?;
        Ok(GuestRegistration {
            username,
            gender: self.gender,
            interests: self.interests.clone(),
            countries: self.countries.clone(),
            preferred_gender: self.preferred_gender,
        })
    }
}
