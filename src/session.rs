use crate::record::Record;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, SystemTime};
use uuid::Uuid;

/// Dashboard roles, lowest to highest privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Fotografo,
    Editor,
    Gestor,
    Admin,
}

impl Role {
    /// Parse the sheet spelling of a role; unknown strings get the lowest
    /// privilege.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "admin" => Self::Admin,
            "gestor" => Self::Gestor,
            "editor" => Self::Editor,
            _ => Self::Fotografo,
        }
    }

    fn rank(self) -> u8 {
        match self {
            Self::Fotografo => 1,
            Self::Editor => 2,
            Self::Gestor => 3,
            Self::Admin => 4,
        }
    }

    /// Role hierarchy check: does `self` meet or exceed `required`?
    pub fn at_least(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }
}

/// An authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Username (the user's email).
    pub user: String,
    /// Display name from the user record.
    pub name: String,
    pub role: Role,
    /// Time when the session expires.
    pub expires_at: SystemTime,
}

lazy_static! {
    /// All active sessions, keyed by token.
    static ref SESSIONS: RwLock<HashMap<String, Session>> = RwLock::new(HashMap::new());
}

/// Validate credentials against the `Usuarios` record set and open a
/// session.
///
/// Credentials are compared in plaintext against the sheet, as the system
/// always has; authentication hardening is explicitly out of scope.
///
/// # Arguments
/// * `users` - The `Usuarios` record set
/// * `email` - Login email, matched case-insensitively
/// * `password` - Plaintext password
/// * `ttl` - Session lifetime
///
/// # Returns
/// * `Option<(String, Session)>` - Token and session on success
pub fn login(users: &[Record], email: &str, password: &str, ttl: Duration) -> Option<(String, Session)> {
    let user = users.iter().find(|u| {
        u.get("Email")
            .map(|e| e.eq_ignore_ascii_case(email.trim()))
            .unwrap_or(false)
            && u.get("Senha") == Some(password)
    })?;

    let session = Session {
        user: user.get("Email").unwrap_or_default().to_string(),
        name: user.get("Nome").unwrap_or_default().to_string(),
        role: Role::parse(user.get("Role").unwrap_or("")),
        expires_at: SystemTime::now() + ttl,
    };
    let token = Uuid::new_v4().to_string();
    SESSIONS
        .write()
        .unwrap()
        .insert(token.clone(), session.clone());
    Some((token, session))
}

/// Look up a session by token, discarding it when expired.
pub fn validate(token: &str) -> Option<Session> {
    let mut sessions = SESSIONS.write().unwrap();
    match sessions.get(token) {
        Some(session) if session.expires_at > SystemTime::now() => Some(session.clone()),
        Some(_) => {
            sessions.remove(token);
            None
        }
        None => None,
    }
}

/// Drop a session; logging out an unknown token is not an error.
pub fn logout(token: &str) {
    SESSIONS.write().unwrap().remove(token);
}

/// Remove every expired session. Called opportunistically from the web
/// layer; there is no background sweeper.
pub fn prune_expired() {
    let now = SystemTime::now();
    SESSIONS
        .write()
        .unwrap()
        .retain(|_, session| session.expires_at > now);
}
