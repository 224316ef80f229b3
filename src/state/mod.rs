//! Server state and the single-threaded core event loop.
//!
//! spec.md §9 redesigns the teacher's per-channel actor swarm (each
//! channel a `tokio::spawn`ed task reached over its own mpsc channel,
//! `state/matrix.rs`'s `Matrix` acting as a directory of actor handles)
//! into one `Server` value owned by one task. Every connection task is
//! reduced to a dumb line-in/bytes-out pump (see `network`); this loop
//! is the only code path that ever touches the nick index, channel
//! index, X-line store, or hook registry. That collapses the teacher's
//! cross-actor races (two channel actors independently deciding a nick
//! change is valid) into ordinary sequential mutation.

pub mod channel;
pub mod hooks;
pub mod mode;
pub mod user;
pub mod xline;

use std::collections::{HashMap, VecDeque};
use std::net::IpAddr;

use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::handlers::Registry;
use channel::Channel;
use hooks::HookRegistry;
use user::{User, WhowasEntry};
use xline::XlineStore;

/// An IRC-lowercased string used as a `HashMap` key, so nick and channel
/// lookups are case-insensitive per RFC 1459 §2.2's casemap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaseFold(String);

impl CaseFold {
    pub fn new(s: &str) -> Self {
        CaseFold(corvid_proto::casemap::irc_to_lower(s))
    }
}

impl std::borrow::Borrow<str> for CaseFold {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Work handed to the core loop by connection tasks, the listener, and
/// the ticker. This is the entire interface between I/O and state.
pub enum LoopEvent {
    /// A new connection was accepted; `outbox` delivers lines back to it.
    Accept {
        uid: String,
        addr: IpAddr,
        outbox: mpsc::UnboundedSender<String>,
    },
    /// One line of client input, already stripped of its trailing CRLF.
    Line { uid: String, line: String },
    /// The connection's read half closed or errored.
    Disconnect { uid: String },
    /// A one-second tick: PING timeouts, registration timeouts, X-line
    /// expiry sweeps.
    Tick,
    /// Reverse-DNS lookup for `uid` completed (or timed out).
    DnsResult { uid: String, hostname: Option<String> },
}

/// The entire mutable state of a running server.
pub struct Server {
    pub config: Config,
    pub server_name: String,
    pub created_at: i64,
    pub users: HashMap<String, User>,
    pub nick_index: HashMap<CaseFold, String>,
    pub channels: HashMap<CaseFold, Channel>,
    pub xlines: XlineStore,
    pub hooks: HookRegistry,
    pub whowas: VecDeque<WhowasEntry>,
    pub registry: Registry,
    outboxes: HashMap<String, mpsc::UnboundedSender<String>>,
}

const WHOWAS_CAPACITY: usize = 512;

impl Server {
    pub fn new(config: Config, now: i64) -> Self {
        let server_name = config.server_name.clone();
        let mut xlines = XlineStore::new();
        for seed in &config.xline_seed {
            if let Some(kind) = xline::XlineKind::from_letter(seed.kind.chars().next().unwrap_or('?'))
            {
                xlines.add(xline::XLine {
                    kind,
                    mask: seed.mask.clone(),
                    reason: seed.reason.clone(),
                    set_by: "<config>".to_string(),
                    set_at: now,
                    expires_at: seed.duration_secs.map(|d| now + d as i64),
                });
            } else {
                warn!(kind = %seed.kind, mask = %seed.mask, "ignoring xline_seed with unknown kind");
            }
        }

        Server {
            registry: Registry::new(&config),
            config,
            server_name,
            created_at: now,
            users: HashMap::new(),
            nick_index: HashMap::new(),
            channels: HashMap::new(),
            xlines,
            hooks: HookRegistry::new(),
            whowas: VecDeque::with_capacity(WHOWAS_CAPACITY),
            outboxes: HashMap::new(),
        }
    }

    /// Send one line to a connected client; silently dropped if the
    /// client has already disconnected (the outbox receiver is gone).
    pub fn send_line(&self, uid: &str, line: String) {
        if let Some(outbox) = self.outboxes.get(uid) {
            let _ = outbox.send(line);
        }
    }

    pub fn send_message(&self, uid: &str, msg: &corvid_proto::Message) {
        self.send_line(uid, msg.to_string());
    }

    pub fn user(&self, uid: &str) -> Option<&User> {
        self.users.get(uid)
    }

    pub fn user_mut(&mut self, uid: &str) -> Option<&mut User> {
        self.users.get_mut(uid)
    }

    pub fn find_uid_by_nick(&self, nick: &str) -> Option<&str> {
        self.nick_index
            .get(corvid_proto::casemap::irc_to_lower(nick).as_str())
            .map(String::as_str)
    }

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels
            .get(corvid_proto::casemap::irc_to_lower(name).as_str())
    }

    pub fn channel_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.channels
            .get_mut(corvid_proto::casemap::irc_to_lower(name).as_str())
    }

    pub fn insert_channel(&mut self, channel: Channel) {
        let key = CaseFold::new(&channel.name);
        self.channels.insert(key, channel);
    }

    pub fn remove_channel(&mut self, name: &str) -> Option<Channel> {
        self.channels
            .remove(corvid_proto::casemap::irc_to_lower(name).as_str())
    }

    /// Re-key the nick index after `uid`'s nickname changes.
    pub fn reindex_nick(&mut self, old_nick: &str, new_nick: &str, uid: &str) {
        self.nick_index
            .remove(corvid_proto::casemap::irc_to_lower(old_nick).as_str());
        self.nick_index.insert(CaseFold::new(new_nick), uid.to_string());
    }

    fn record_whowas(&mut self, user: &User) {
        if self.whowas.len() == WHOWAS_CAPACITY {
            self.whowas.pop_front();
        }
        self.whowas.push_back(WhowasEntry {
            nick: user.nick.clone(),
            user: user.user.clone(),
            host: user.host.clone(),
            realname: user.realname.clone(),
            server: self.server_name.clone(),
            logout_time: user.last_activity,
        });
    }

    /// Remove `uid` from every channel it occupied, destroying any
    /// channel left empty, and drop it from the nick index and user
    /// table. Returns the user's hostmask (for the QUIT line's prefix)
    /// and the channels it was on (for QUIT broadcast) — the user
    /// record itself is gone by the time the caller needs either.
    pub fn remove_user(&mut self, uid: &str, reason: &str) -> (String, Vec<String>) {
        let Some(user) = self.users.remove(uid) else {
            return (String::new(), Vec::new());
        };
        let hostmask = user.hostmask();
        self.nick_index
            .remove(corvid_proto::casemap::irc_to_lower(&user.nick).as_str());
        self.outboxes.remove(uid);

        let mut vacated = Vec::new();
        for chan_name in &user.channels {
            let now_empty = match self.channel_mut(chan_name) {
                Some(chan) => {
                    chan.members.remove(uid);
                    vacated.push(chan_name.clone());
                    chan.is_empty()
                }
                None => continue,
            };
            if now_empty {
                self.remove_channel(chan_name);
                self.hooks.notify_channel_destroy(chan_name);
            }
        }
        self.hooks.notify_user_quit(&user, reason);
        self.record_whowas(&user);
        (hostmask, vacated)
    }
}

/// Channel handed to connection tasks when one is accepted, carrying
/// both halves: the line they want delivered to the client and the
/// originating socket's peer address.
pub type EventSender = mpsc::UnboundedSender<LoopEvent>;

/// Build the event channel the listener and ticker feed and the core
/// loop drains. Buffer is generous; backpressure here would stall
/// registration for every other client on the server.
pub fn event_channel() -> (EventSender, mpsc::UnboundedReceiver<LoopEvent>) {
    mpsc::unbounded_channel()
}

/// Drain `events` until the channel closes, applying each to `server`.
/// This is the only task in the process that ever mutates `server`.
#[instrument(skip_all)]
pub async fn run_event_loop(mut server: Server, mut events: mpsc::UnboundedReceiver<LoopEvent>) {
    info!(server = %server.server_name, "core event loop starting");
    while let Some(event) = events.recv().await {
        match event {
            LoopEvent::Accept { uid, addr, outbox } => {
                let now = now_unix();
                if server.users.len() >= server.config.max_clients_soft {
                    let _ = outbox.send("ERROR :No more connections\r\n".to_string());
                    continue;
                }
                if let Some(line) = server.xlines.find_matching(xline::XlineKind::Z, &addr.to_string(), now) {
                    let _ = outbox.send(format!(
                        "ERROR :Closing Link: [Z-Lined: {}]\r\n",
                        line.reason
                    ));
                    continue;
                }
                server.outboxes.insert(uid.clone(), outbox);
                server
                    .users
                    .insert(uid.clone(), User::new(uid, addr.to_string(), addr, now));
            }
            LoopEvent::Line { uid, line } => {
                crate::handlers::dispatch_line(&mut server, &uid, &line);
            }
            LoopEvent::Disconnect { uid } => {
                let (hostmask, vacated) = server.remove_user(&uid, "Connection reset by peer");
                crate::handlers::broadcast_quit(&mut server, &hostmask, &vacated, "Connection reset by peer");
            }
            LoopEvent::Tick => {
                crate::handlers::on_tick(&mut server);
            }
            LoopEvent::DnsResult { uid, hostname } => {
                if let (Some(user), Some(host)) = (server.users.get_mut(&uid), hostname) {
                    user.host = host;
                }
            }
        }
    }
    info!("core event loop shut down: event channel closed");
}

/// Current unix time in seconds. Centralized so swapping the clock
/// source (tests want a fixed clock) only touches one place.
pub fn now_unix() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        toml::from_str(
            r#"
            server_name = "irc.example.org"
            network_name = "ExampleNet"
            bind = ["127.0.0.1:6667"]
            "#,
        )
        .unwrap()
    }

    #[test]
    fn casefold_equates_rfc1459_equivalents() {
        assert_eq!(CaseFold::new("Nick["), CaseFold::new("nick{"));
    }

    #[test]
    fn new_server_seeds_xlines_from_config() {
        let mut config = test_config();
        config.xline_seed.push(crate::config::XlineSeed {
            kind: "K".into(),
            mask: "*@bad.example.org".into(),
            reason: "seeded".into(),
            duration_secs: None,
        });
        let server = Server::new(config, 0);
        assert_eq!(server.xlines.len(), 1);
    }

    #[test]
    fn remove_unknown_user_is_noop() {
        let mut server = Server::new(test_config(), 0);
        let (hostmask, vacated) = server.remove_user("nope", "bye");
        assert!(hostmask.is_empty());
        assert!(vacated.is_empty());
    }
}
