//! Connected-user state.
//!
//! Grounded in the teacher's `state/user.rs`, stripped of the CRDT
//! (`HybridTimestamp`, `to_crdt`/`from_crdt`/`merge_crdt`) and
//! server-to-server fields: a single-server core never needs a logical
//! clock or session UUID to reconcile state with a peer.

use std::collections::HashSet;

use corvid_proto::mode::UserMode;

/// How far through the registration handshake a connection has gotten.
///
/// Mirrors spec.md §4.3's registration-phase transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationPhase {
    /// Neither NICK nor USER has been accepted yet.
    Connecting,
    /// NICK accepted, waiting on USER.
    NickSet,
    /// USER accepted, waiting on NICK.
    UserSet,
    /// Both NICK and USER accepted; welcome burst has been sent.
    Registered,
}

/// A connected client.
#[derive(Debug, Clone)]
pub struct User {
    /// Stable per-connection identifier, independent of nickname.
    pub uid: String,
    pub nick: String,
    pub user: String,
    pub realname: String,
    /// The connecting socket's address, used for I-line/K-line matching.
    pub host: String,
    pub ip: std::net::IpAddr,
    pub phase: RegistrationPhase,
    pub modes: UserModes,
    pub away: Option<String>,
    pub channels: HashSet<String>,
    pub connected_at: i64,
    pub last_activity: i64,
    pub password: Option<String>,
    /// Start of the current flood-accounting window (unix seconds).
    pub flood_window_start: i64,
    /// Cumulative command cost charged within the current window.
    pub lines_in_window: u32,
}

/// The boolean/valued user mode flags tracked per spec.md §3.1.
#[derive(Debug, Clone, Default)]
pub struct UserModes {
    pub invisible: bool,
    pub wallops: bool,
    pub oper: bool,
    pub oper_type: Option<String>,
    pub server_notices: bool,
    pub snomasks: HashSet<char>,
}

impl UserModes {
    /// Render as a `+iow`-style mode string (no snomask detail).
    pub fn as_mode_string(&self) -> String {
        let mut s = String::from("+");
        if self.invisible {
            s.push(UserMode::Invisible.to_string().chars().next().unwrap());
        }
        if self.wallops {
            s.push(UserMode::Wallops.to_string().chars().next().unwrap());
        }
        if self.oper {
            s.push(UserMode::Oper.to_string().chars().next().unwrap());
        }
        if self.server_notices {
            s.push(UserMode::ServerNotices.to_string().chars().next().unwrap());
        }
        if s == "+" {
            String::new()
        } else {
            s
        }
    }

    pub fn has_snomask(&self, mask: char) -> bool {
        self.snomasks.contains(&mask)
    }
}

impl User {
    pub fn new(uid: String, host: String, ip: std::net::IpAddr, connected_at: i64) -> Self {
        User {
            uid,
            nick: "*".to_string(),
            user: String::new(),
            realname: String::new(),
            host,
            ip,
            phase: RegistrationPhase::Connecting,
            modes: UserModes::default(),
            away: None,
            channels: HashSet::new(),
            connected_at,
            last_activity: connected_at,
            password: None,
            flood_window_start: connected_at,
            lines_in_window: 0,
        }
    }

    pub fn is_registered(&self) -> bool {
        matches!(self.phase, RegistrationPhase::Registered)
    }

    pub fn hostmask(&self) -> String {
        format!("{}!{}@{}", self.nick, self.user, self.host)
    }
}

/// A record kept for a short time after QUIT/nick change, for WHOWAS.
#[derive(Debug, Clone)]
pub struct WhowasEntry {
    pub nick: String,
    pub user: String,
    pub host: String,
    pub realname: String,
    pub server: String,
    pub logout_time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        User::new(
            "u1".into(),
            "host.example.org".into(),
            "127.0.0.1".parse().unwrap(),
            0,
        )
    }

    #[test]
    fn new_user_is_unregistered() {
        let u = sample();
        assert!(!u.is_registered());
        assert_eq!(u.phase, RegistrationPhase::Connecting);
    }

    #[test]
    fn mode_string_empty_when_no_modes_set() {
        let u = sample();
        assert_eq!(u.modes.as_mode_string(), "");
    }

    #[test]
    fn mode_string_reflects_set_flags() {
        let mut u = sample();
        u.modes.invisible = true;
        u.modes.oper = true;
        let s = u.modes.as_mode_string();
        assert!(s.starts_with('+'));
        assert!(s.contains('i'));
        assert!(s.contains('o'));
    }

    #[test]
    fn hostmask_format() {
        let mut u = sample();
        u.nick = "alice".into();
        u.user = "alice".into();
        assert_eq!(u.hostmask(), "alice!alice@host.example.org");
    }

    #[test]
    fn snomask_lookup() {
        let mut u = sample();
        u.modes.snomasks.insert('c');
        assert!(u.modes.has_snomask('c'));
        assert!(!u.modes.has_snomask('k'));
    }
}
