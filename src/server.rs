//! RegistrationServer Actor implementation
//!
//! The central actor that owns all state: connected clients with their
//! guest profiles, the canonical country list and the country resolver.
//! Uses the Actor pattern with mpsc channels for message passing.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::client::Client;
use crate::country::{
    AliasTable, CountryList, CountryResolver, DEFAULT_SUGGESTION_LIMIT, POPULAR_COUNTRIES,
};
use crate::message::ServerMessage;
use crate::profile::POPULAR_INTERESTS;
use crate::types::{ClientId, Gender, PreferredGender};

/// Commands sent to the RegistrationServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New client connected
    Connect {
        client_id: ClientId,
        sender: mpsc::Sender<ServerMessage>,
    },
    /// Client disconnected
    Disconnect {
        client_id: ClientId,
    },
    /// Country dataset finished loading
    CountriesLoaded {
        countries: CountryList,
    },
    SetUsername {
        client_id: ClientId,
        username: String,
    },
    SetGender {
        client_id: ClientId,
        gender: Gender,
    },
    SetPreferredGender {
        client_id: ClientId,
        preferred_gender: PreferredGender,
    },
    AddInterest {
        client_id: ClientId,
        interest: String,
    },
    RemoveInterest {
        client_id: ClientId,
        interest: String,
    },
    /// Keystroke in the country field
    CountryInput {
        client_id: ClientId,
        input: String,
    },
    AddCountry {
        client_id: ClientId,
        country: String,
    },
    RemoveCountry {
        client_id: ClientId,
        country: String,
    },
    /// Submit the guest form
    Submit {
        client_id: ClientId,
    },
}

/// The main RegistrationServer actor
///
/// Starts over the fallback country list; a loaded dataset replaces it
/// through `ServerCommand::CountriesLoaded`.
pub struct RegistrationServer {
    /// All connected clients: ClientId -> Client
    clients: HashMap<ClientId, Client>,
    /// Canonical country list currently in use
    countries: CountryList,
    resolver: CountryResolver,
    suggestion_limit: usize,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl RegistrationServer {
    /// Create a server with the built-in aliases and the fallback country list
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self {
            clients: HashMap::new(),
            countries: CountryList::fallback(),
            resolver: CountryResolver::new(AliasTable::builtin()),
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            receiver,
        }
    }

    pub fn with_resolver(mut self, resolver: CountryResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_countries(mut self, countries: CountryList) -> Self {
        self.countries = countries;
        self
    }

    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    /// Run the RegistrationServer event loop
    ///
    /// Continuously receives and processes commands until all senders are dropped.
    pub async fn run(mut self) {
        info!(
            "RegistrationServer started with {} countries",
            self.countries.len()
        );

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd).await;
        }

        info!("RegistrationServer shutting down");
    }

    /// Process a single command
    async fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect { client_id, sender } => {
                self.handle_connect(client_id, sender).await;
            }
            ServerCommand::Disconnect { client_id } => {
                self.handle_disconnect(client_id);
            }
            ServerCommand::CountriesLoaded { countries } => {
                self.handle_countries_loaded(countries);
            }
            ServerCommand::SetUsername { client_id, username } => {
                self.handle_set_username(client_id, username).await;
            }
            ServerCommand::SetGender { client_id, gender } => {
                self.handle_set_gender(client_id, gender).await;
            }
            ServerCommand::SetPreferredGender {
                client_id,
                preferred_gender,
            } => {
                self.handle_set_preferred_gender(client_id, preferred_gender)
                    .await;
            }
            ServerCommand::AddInterest { client_id, interest } => {
                self.handle_add_interest(client_id, interest).await;
            }
            ServerCommand::RemoveInterest { client_id, interest } => {
                self.handle_remove_interest(client_id, interest).await;
            }
            ServerCommand::CountryInput { client_id, input } => {
                self.handle_country_input(client_id, input).await;
            }
            ServerCommand::AddCountry { client_id, country } => {
                self.handle_add_country(client_id, country).await;
            }
            ServerCommand::RemoveCountry { client_id, country } => {
                self.handle_remove_country(client_id, country).await;
            }
            ServerCommand::Submit { client_id } => {
                self.handle_submit(client_id).await;
            }
        }
    }

    /// Handle new client connection
    async fn handle_connect(&mut self, client_id: ClientId, sender: mpsc::Sender<ServerMessage>) {
        info!("Client {} connected", client_id);
        let client = Client::new(client_id, sender);

        let _ = client
            .send(ServerMessage::Connected {
                client_id: client_id.to_string(),
                popular_interests: POPULAR_INTERESTS.iter().map(|s| s.to_string()).collect(),
                popular_countries: POPULAR_COUNTRIES.iter().map(|s| s.to_string()).collect(),
            })
            .await;

        self.clients.insert(client_id, client);
        debug!("Total clients: {}", self.clients.len());
    }

    /// Handle client disconnection
    fn handle_disconnect(&mut self, client_id: ClientId) {
        if let Some(client) = self.clients.remove(&client_id) {
            info!(
                "Client {} ({}) disconnected",
                client_id,
                client.display_name()
            );
        }
        debug!("Total clients: {}", self.clients.len());
    }

    /// Swap in a freshly loaded country list
    fn handle_countries_loaded(&mut self, countries: CountryList) {
        info!("Country list updated: {} entries", countries.len());
        self.countries = countries;
    }

    async fn handle_set_username(&mut self, client_id: ClientId, username: String) {
        let Some(client) = self.clients.get_mut(&client_id) else {
            return;
        };

        let reply = match client.profile.set_username(&username) {
            Ok(username) => {
                info!("Client {} set username to '{}'", client_id, username);
                ServerMessage::UsernameSet {
                    username: username.to_string(),
                }
            }
            Err(e) => e.into(),
        };
        let _ = client.send(reply).await;
    }

    async fn handle_set_gender(&mut self, client_id: ClientId, gender: Gender) {
        let Some(client) = self.clients.get_mut(&client_id) else {
            return;
        };

        client.profile.set_gender(gender);
        let _ = client.send(ServerMessage::GenderSet { gender }).await;
    }

    async fn handle_set_preferred_gender(
        &mut self,
        client_id: ClientId,
        preferred_gender: PreferredGender,
    ) {
        let Some(client) = self.clients.get_mut(&client_id) else {
            return;
        };

        client.profile.set_preferred_gender(preferred_gender);
        let _ = client
            .send(ServerMessage::PreferredGenderSet { preferred_gender })
            .await;
    }

    async fn handle_add_interest(&mut self, client_id: ClientId, interest: String) {
        let Some(client) = self.clients.get_mut(&client_id) else {
            return;
        };

        let reply = match client.profile.add_interest(&interest) {
            Ok(()) => ServerMessage::InterestsUpdated {
                interests: client.profile.interests.clone(),
            },
            Err(e) => e.into(),
        };
        let _ = client.send(reply).await;
    }

    async fn handle_remove_interest(&mut self, client_id: ClientId, interest: String) {
        let Some(client) = self.clients.get_mut(&client_id) else {
            return;
        };

        client.profile.remove_interest(&interest);
        let _ = client
            .send(ServerMessage::InterestsUpdated {
                interests: client.profile.interests.clone(),
            })
            .await;
    }

    /// Handle a keystroke in the country field
    ///
    /// Every input is answered with its own suggestions; the client drops
    /// replies whose `input` no longer matches the field.
    async fn handle_country_input(&mut self, client_id: ClientId, input: String) {
        let Some(client) = self.clients.get_mut(&client_id) else {
            return;
        };

        client.profile.set_pending_country(&input);
        let suggestions =
            self.resolver
                .suggest(&input, self.countries.as_slice(), self.suggestion_limit);
        debug!(
            "Client {} country input '{}': {} suggestions",
            client_id,
            input,
            suggestions.len()
        );

        let _ = client
            .send(ServerMessage::CountrySuggestions { input, suggestions })
            .await;
    }

    async fn handle_add_country(&mut self, client_id: ClientId, country: String) {
        let Some(client) = self.clients.get_mut(&client_id) else {
            return;
        };

        let result =
            client
                .profile
                .add_country(&country, &self.resolver, self.countries.as_slice());
        let reply = match result {
            Ok(added) => {
                if let Some(stored) = added {
                    debug!(
                        "Client {} added country '{}' as '{}'",
                        client_id, country, stored
                    );
                }
                ServerMessage::CountriesUpdated {
                    countries: client.profile.countries.clone(),
                }
            }
            Err(e) => e.into(),
        };
        let _ = client.send(reply).await;
    }

    async fn handle_remove_country(&mut self, client_id: ClientId, country: String) {
        let Some(client) = self.clients.get_mut(&client_id) else {
            return;
        };

        client.profile.remove_country(&country);
        let _ = client
            .send(ServerMessage::CountriesUpdated {
                countries: client.profile.countries.clone(),
            })
            .await;
    }

    /// Handle form submission
    ///
    /// Nothing is persisted; the registration is logged and echoed back.
    async fn handle_submit(&mut self, client_id: ClientId) {
        let Some(client) = self.clients.get_mut(&client_id) else {
            return;
        };

        let profile = match client.profile.registration() {
            Ok(profile) => profile,
            Err(e) => {
                let _ = client.send(e.into()).await;
                return;
            }
        };

        client.registered = true;
        info!(
            "Client {} registered as '{}' (gender: {:?}, interests: {:?}, countries: {:?}, preferred: {:?})",
            client_id,
            profile.username,
            profile.gender,
            profile.interests,
            profile.countries,
            profile.preferred_gender
        );

        let _ = client.send(ServerMessage::Registered { profile }).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ErrorCode;

    struct Harness {
        cmd_tx: mpsc::Sender<ServerCommand>,
        client_id: ClientId,
        rx: mpsc::Receiver<ServerMessage>,
    }

    impl Harness {
        async fn start(server: fn(mpsc::Receiver<ServerCommand>) -> RegistrationServer) -> Self {
            let (cmd_tx, cmd_rx) = mpsc::channel(16);
            tokio::spawn(server(cmd_rx).run());

            let (tx, rx) = mpsc::channel(16);
            let client_id = ClientId::new();
            cmd_tx
                .send(ServerCommand::Connect {
                    client_id,
                    sender: tx,
                })
                .await
                .unwrap();

            let mut harness = Self {
                cmd_tx,
                client_id,
                rx,
            };
            assert!(matches!(
                harness.recv().await,
                ServerMessage::Connected { .. }
            ));
            harness
        }

        async fn send(&self, cmd: ServerCommand) {
            self.cmd_tx.send(cmd).await.unwrap();
        }

        async fn recv(&mut self) -> ServerMessage {
            self.rx.recv().await.expect("server dropped client channel")
        }
    }

    #[tokio::test]
    async fn test_connect_sends_quick_picks() {
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        tokio::spawn(RegistrationServer::new(cmd_rx).run());

        let (tx, mut rx) = mpsc::channel(4);
        let client_id = ClientId::new();
        cmd_tx
            .send(ServerCommand::Connect {
                client_id,
                sender: tx,
            })
            .await
            .unwrap();

        match rx.recv().await.unwrap() {
            ServerMessage::Connected {
                client_id: id,
                popular_interests,
                popular_countries,
            } => {
                assert_eq!(id, client_id.to_string());
                assert_eq!(popular_interests.len(), 10);
                assert_eq!(popular_countries[0], "United States");
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_country_input_suggests() {
        let mut h = Harness::start(RegistrationServer::new).await;
        let client_id = h.client_id;

        h.send(ServerCommand::CountryInput {
            client_id,
            input: "u".to_string(),
        })
        .await;
        match h.recv().await {
            ServerMessage::CountrySuggestions { input, suggestions } => {
                assert_eq!(input, "u");
                assert!(suggestions.is_empty());
            }
            other => panic!("unexpected message: {:?}", other),
        }

        h.send(ServerCommand::CountryInput {
            client_id,
            input: "united".to_string(),
        })
        .await;
        match h.recv().await {
            ServerMessage::CountrySuggestions { suggestions, .. } => {
                assert_eq!(suggestions, vec!["United Kingdom", "United States"]);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_suggestion_limit_applies() {
        fn limited(rx: mpsc::Receiver<ServerCommand>) -> RegistrationServer {
            RegistrationServer::new(rx).with_suggestion_limit(1)
        }
        let mut h = Harness::start(limited).await;

        h.send(ServerCommand::CountryInput {
            client_id: h.client_id,
            input: "an".to_string(),
        })
        .await;
        match h.recv().await {
            ServerMessage::CountrySuggestions { suggestions, .. } => {
                assert_eq!(suggestions, vec!["Canada"]);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_loaded_countries_replace_fallback() {
        let mut h = Harness::start(RegistrationServer::new).await;
        let client_id = h.client_id;

        h.send(ServerCommand::CountriesLoaded {
            countries: CountryList::new(["Russian Federation", "Rwanda"]),
        })
        .await;
        h.send(ServerCommand::AddCountry {
            client_id,
            country: "russia".to_string(),
        })
        .await;
        match h.recv().await {
            ServerMessage::CountriesUpdated { countries } => {
                assert_eq!(countries, vec!["Russian Federation"]);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_add_and_remove_countries() {
        let mut h = Harness::start(RegistrationServer::new).await;
        let client_id = h.client_id;

        for raw in ["uk", "Atlantis", "britain"] {
            h.send(ServerCommand::AddCountry {
                client_id,
                country: raw.to_string(),
            })
            .await;
        }
        let mut last = Vec::new();
        for _ in 0..3 {
            if let ServerMessage::CountriesUpdated { countries } = h.recv().await {
                last = countries;
            }
        }
        assert_eq!(last, vec!["United Kingdom", "Atlantis"]);

        h.send(ServerCommand::RemoveCountry {
            client_id,
            country: "Atlantis".to_string(),
        })
        .await;
        match h.recv().await {
            ServerMessage::CountriesUpdated { countries } => {
                assert_eq!(countries, vec!["United Kingdom"]);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_injected_resolver_and_countries() {
        fn custom(rx: mpsc::Receiver<ServerCommand>) -> RegistrationServer {
            RegistrationServer::new(rx)
                .with_resolver(CountryResolver::new(
                    AliasTable::new().with_aliases("Netherlands", ["holland"]),
                ))
                .with_countries(CountryList::new(["Netherlands", "Norway"]))
        }
        let mut h = Harness::start(custom).await;
        let client_id = h.client_id;

        h.send(ServerCommand::AddCountry {
            client_id,
            country: "Holland".to_string(),
        })
        .await;
        match h.recv().await {
            ServerMessage::CountriesUpdated { countries } => {
                assert_eq!(countries, vec!["Netherlands"]);
            }
            other => panic!("unexpected message: {:?}", other),
        }

        // Built-in aliases are gone with the replaced resolver
        h.send(ServerCommand::AddCountry {
            client_id,
            country: "usa".to_string(),
        })
        .await;
        match h.recv().await {
            ServerMessage::CountriesUpdated { countries } => {
                assert_eq!(countries, vec!["Netherlands", "usa"]);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_blank_country_is_error() {
        let mut h = Harness::start(RegistrationServer::new).await;

        h.send(ServerCommand::AddCountry {
            client_id: h.client_id,
            country: "   ".to_string(),
        })
        .await;
        assert!(matches!(
            h.recv().await,
            ServerMessage::Error {
                code: ErrorCode::EmptyValue,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_submit_flow() {
        let mut h = Harness::start(RegistrationServer::new).await;
        let client_id = h.client_id;

        h.send(ServerCommand::Submit { client_id }).await;
        assert!(matches!(
            h.recv().await,
            ServerMessage::Error {
                code: ErrorCode::UsernameRequired,
                ..
            }
        ));

        h.send(ServerCommand::SetUsername {
            client_id,
            username: " Nasri ".to_string(),
        })
        .await;
        assert!(matches!(
            h.recv().await,
            ServerMessage::UsernameSet { username } if username == "Nasri"
        ));

        h.send(ServerCommand::SetGender {
            client_id,
            gender: Gender::Male,
        })
        .await;
        assert!(matches!(h.recv().await, ServerMessage::GenderSet { .. }));

        h.send(ServerCommand::SetPreferredGender {
            client_id,
            preferred_gender: PreferredGender::Any,
        })
        .await;
        assert!(matches!(
            h.recv().await,
            ServerMessage::PreferredGenderSet { .. }
        ));

        h.send(ServerCommand::AddInterest {
            client_id,
            interest: "Music".to_string(),
        })
        .await;
        assert!(matches!(
            h.recv().await,
            ServerMessage::InterestsUpdated { .. }
        ));

        h.send(ServerCommand::AddCountry {
            client_id,
            country: "usa".to_string(),
        })
        .await;
        assert!(matches!(
            h.recv().await,
            ServerMessage::CountriesUpdated { .. }
        ));

        h.send(ServerCommand::Submit { client_id }).await;
        match h.recv().await {
            ServerMessage::Registered { profile } => {
                assert_eq!(profile.username, "Nasri");
                assert_eq!(profile.gender, Some(Gender::Male));
                assert_eq!(profile.preferred_gender, Some(PreferredGender::Any));
                assert_eq!(profile.interests, vec!["Music"]);
                assert_eq!(profile.countries, vec!["United States"]);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_disconnect_drops_client_channel() {
        let mut h = Harness::start(RegistrationServer::new).await;

        h.send(ServerCommand::Disconnect {
            client_id: h.client_id,
        })
        .await;
        assert!(h.rx.recv().await.is_none());
    }
}
