//! Matchmaking decisions and the connection notice feed.
//!
//! Transport is external; this only tracks which sessions exist, which one a
//! client joins, and what notices a player should see.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

use crate::error::{PlagueError, Result};

/// Notices shown at once
pub const VISIBLE_NOTICES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Server,
    Client,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionSource {
    /// Listed by the matchmaking service
    Matchmaking,
    /// Found on the local network
    Lan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub scene: String,
    pub source: SessionSource,
}

/// Newest-first list of connection notices
#[derive(Debug, Clone, Default)]
pub struct EventFeed {
    messages: VecDeque<String>,
}

impl EventFeed {
    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push_front(message.into());
    }

    /// At most the latest `VISIBLE_NOTICES` messages, newest first
    pub fn visible(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().take(VISIBLE_NOTICES).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct Lobby {
    pub role: Option<Role>,
    pub hosted: Option<SessionInfo>,
    pub joined: Option<Uuid>,
    pub feed: EventFeed,
}

impl Lobby {
    pub fn new() -> Self {
        Self::default()
    }

    /// Become the server and publish a session under a fresh random name
    pub fn start_server(&mut self, scene: &str) -> Result<&SessionInfo> {
        if self.role.is_some() {
            return Err(PlagueError::Lobby("already started".into()));
        }
        let session = SessionInfo {
            id: Uuid::new_v4(),
            scene: scene.to_string(),
            source: SessionSource::Matchmaking,
        };
        tracing::info!(session = %session.id, scene, "Created matchmaking session");
        self.role = Some(Role::Server);
        let hosted: &SessionInfo = self.hosted.insert(session);
        Ok(hosted)
    }

    pub fn start_client(&mut self) -> Result<()> {
        if self.role.is_some() {
            return Err(PlagueError::Lobby("already started".into()));
        }
        self.role = Some(Role::Client);
        Ok(())
    }

    /// A client received a new session listing; join the first session
    /// published through matchmaking. Returns the joined session, if any.
    pub fn session_list_updated(&mut self, sessions: &[SessionInfo]) -> Option<Uuid> {
        tracing::info!("Session list update: {} total sessions", sessions.len());

        if self.role != Some(Role::Client) || self.joined.is_some() {
            return None;
        }

        let session = sessions.iter().find(|s| s.source == SessionSource::Matchmaking)?;
        tracing::info!(session = %session.id, "Joining session");
        self.joined = Some(session.id);
        self.joined
    }

    /// Server side: announce a new connection to everyone
    pub fn connected(&mut self) {
        if self.role == Some(Role::Server) {
            self.feed.push("A player connected");
        }
    }

    pub fn disconnected(&mut self) {
        if self.role == Some(Role::Server) {
            self.feed.push("A player disconnected");
        }
    }
}
