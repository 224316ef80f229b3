//! IRC command types.
//!
//! This module provides type-safe representations of the command set a
//! single-server RFC 1459 / 2812 daemon core needs to parse and dispatch.
//! Unknown commands are captured in the `Raw` variant.
//!
//! # Reference
//! - RFC 1459 / RFC 2812: Internet Relay Chat protocol

use crate::mode::{ChannelMode, Mode, UserMode};
use crate::response::Response;
use smallvec::SmallVec;

/// IRC command with its parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum Command {
    // === Connection Registration (RFC 2812 Section 3.1) ===
    /// `PASS password`
    PASS(String),
    /// `NICK nickname`
    NICK(String),
    /// `USER username mode realname`
    USER(String, String, String),
    /// `OPER name password`
    OPER(String, String),
    /// User MODE command: `MODE nickname [modes]`
    UserMODE(String, Vec<Mode<UserMode>>),
    /// `QUIT [message]`
    QUIT(Option<String>),

    // === Channel Operations (RFC 2812 Section 3.2) ===
    /// `JOIN channels [keys] [realname]`
    JOIN(String, Option<String>, Option<String>),
    /// `PART channels [message]`
    PART(String, Option<String>),
    /// Channel MODE command: `MODE channel [modes]`
    ChannelMODE(String, Vec<Mode<ChannelMode>>),
    /// `TOPIC channel [topic]`
    TOPIC(String, Option<String>),
    /// `NAMES [channels] [target]`
    NAMES(Option<String>, Option<String>),
    /// `LIST [channels] [target]`
    LIST(Option<String>, Option<String>),
    /// `INVITE nickname channel`
    INVITE(String, String),
    /// `KICK channels users [comment]`
    KICK(String, String, Option<String>),

    // === Messaging (RFC 2812 Section 3.3) ===
    /// `PRIVMSG target text`
    PRIVMSG(String, String),
    /// `NOTICE target text`
    NOTICE(String, String),

    // === Server Queries (RFC 2812 Section 3.4, trimmed) ===
    /// `MOTD [target]` — replies from the collaborator-supplied MOTD lines,
    /// never reads or caches a file itself.
    MOTD(Option<String>),

    // === User Queries (RFC 2812 Section 3.6) ===
    /// `WHO [mask] [flags]`
    WHO(Option<String>, Option<String>),
    /// `WHOIS [target] nickmasks`
    WHOIS(Option<String>, String),
    /// `WHOWAS nickname [count] [target]`
    WHOWAS(String, Option<String>, Option<String>),

    // === Miscellaneous (RFC 2812 Section 3.7) ===
    /// `KILL nickname comment`
    KILL(String, String),
    /// `PING server1 [server2]`
    PING(String, Option<String>),
    /// `PONG server1 [server2]`
    PONG(String, Option<String>),
    /// `ERROR message`
    ERROR(String),

    // === Optional Features (RFC 2812 Section 4) ===
    /// `AWAY [message]`
    AWAY(Option<String>),
    /// `REHASH` (no parameters)
    REHASH,
    /// `DIE` (no parameters)
    DIE,
    /// `RESTART` (no parameters)
    RESTART,
    /// `WALLOPS text`
    WALLOPS(String),

    // === X-Line Access-Control Commands ===
    /// `KLINE [time] user@host :reason` — host ban (K)
    KLINE(Option<String>, String, String),
    /// `UNKLINE user@host`
    UNKLINE(String),
    /// `GLINE mask [reason]` — network-wide host ban (G)
    GLINE(String, Option<String>),
    /// `UNGLINE mask`
    UNGLINE(String),
    /// `ZLINE ip [reason]` — IP ban (Z)
    ZLINE(String, Option<String>),
    /// `UNZLINE ip`
    UNZLINE(String),
    /// `QLINE nick [reason]` — nick ban (Q)
    QLINE(String, Option<String>),
    /// `UNQLINE nick`
    UNQLINE(String),
    /// `ELINE mask [reason]` — exception from K/G/Z/Q matches (E)
    ELINE(String, Option<String>),
    /// `UNELINE mask`
    UNELINE(String),

    // === Numeric Response ===
    /// Numeric response from server
    Response(Response, Vec<String>),

    // === Unknown/Raw Commands ===
    /// Unknown command captured as raw
    Raw(String, Vec<String>),
}

/// A borrowed reference to a command.
///
/// Used for zero-copy parsing of IRC messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandRef<'a> {
    /// Command name
    pub name: &'a str,
    /// Command arguments
    pub args: SmallVec<[&'a str; 15]>,
}

impl Command {
    /// Get the command name as a static string.
    ///
    /// Returns the IRC command name (e.g., "PRIVMSG", "NICK", "JOIN").
    /// For `Response` variants, returns "RESPONSE".
    /// For `Raw` variants, this allocates - prefer using `Command::raw_name()` for those.
    ///
    /// # Example
    ///
    /// ```
    /// use corvid_proto::Command;
    ///
    /// let cmd = Command::PRIVMSG("#channel".into(), "Hello".into());
    /// assert_eq!(cmd.name(), "PRIVMSG");
    ///
    /// let cmd = Command::NICK("user".into());
    /// assert_eq!(cmd.name(), "NICK");
    /// ```
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Command::PASS(_) => "PASS",
            Command::NICK(_) => "NICK",
            Command::USER(..) => "USER",
            Command::OPER(..) => "OPER",
            Command::UserMODE(..) => "MODE",
            Command::QUIT(_) => "QUIT",

            Command::JOIN(..) => "JOIN",
            Command::PART(..) => "PART",
            Command::ChannelMODE(..) => "MODE",
            Command::TOPIC(..) => "TOPIC",
            Command::NAMES(..) => "NAMES",
            Command::LIST(..) => "LIST",
            Command::INVITE(..) => "INVITE",
            Command::KICK(..) => "KICK",

            Command::PRIVMSG(..) => "PRIVMSG",
            Command::NOTICE(..) => "NOTICE",

            Command::MOTD(_) => "MOTD",

            Command::WHO(..) => "WHO",
            Command::WHOIS(..) => "WHOIS",
            Command::WHOWAS(..) => "WHOWAS",

            Command::KILL(..) => "KILL",
            Command::PING(..) => "PING",
            Command::PONG(..) => "PONG",
            Command::ERROR(_) => "ERROR",

            Command::AWAY(_) => "AWAY",
            Command::REHASH => "REHASH",
            Command::DIE => "DIE",
            Command::RESTART => "RESTART",
            Command::WALLOPS(_) => "WALLOPS",

            Command::KLINE(..) => "KLINE",
            Command::UNKLINE(_) => "UNKLINE",
            Command::GLINE(..) => "GLINE",
            Command::UNGLINE(_) => "UNGLINE",
            Command::ZLINE(..) => "ZLINE",
            Command::UNZLINE(_) => "UNZLINE",
            Command::QLINE(..) => "QLINE",
            Command::UNQLINE(_) => "UNQLINE",
            Command::ELINE(..) => "ELINE",
            Command::UNELINE(_) => "UNELINE",

            Command::Response(..) => "RESPONSE",

            Command::Raw(..) => "RAW",
        }
    }

    /// Get the raw command name for `Raw` variants.
    ///
    /// Returns `Some(&str)` for `Raw` commands, `None` for typed commands.
    /// Use `name()` for typed commands.
    #[inline]
    pub fn raw_name(&self) -> Option<&str> {
        match self {
            Command::Raw(name, _) => Some(name),
            _ => None,
        }
    }
}

impl<'a> CommandRef<'a> {
    /// Create a new command reference.
    pub fn new(name: &'a str, args: SmallVec<[&'a str; 15]>) -> Self {
        Self { name, args }
    }

    /// Convert this reference to an owned raw command string.
    pub fn to_raw_string(&self) -> String {
        if self.args.is_empty() {
            self.name.to_string()
        } else {
            let capacity =
                self.name.len() + 1 + self.args.iter().map(|a| a.len() + 1).sum::<usize>();
            let mut s = String::with_capacity(capacity);
            s.push_str(self.name);
            s.push(' ');
            s.push_str(&self.args.join(" "));
            s
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_ref_to_raw_string() {
        let cmd = CommandRef::new("PRIVMSG", SmallVec::from(vec!["#channel", "hello"]));
        assert_eq!(cmd.to_raw_string(), "PRIVMSG #channel hello");

        let cmd = CommandRef::new("PING", SmallVec::from(vec![]));
        assert_eq!(cmd.to_raw_string(), "PING");
    }

    #[test]
    fn test_command_equality() {
        let cmd1 = Command::NICK("test".to_string());
        let cmd2 = Command::NICK("test".to_string());
        assert_eq!(cmd1, cmd2);

        let cmd3 = Command::NICK("other".to_string());
        assert_ne!(cmd1, cmd3);
    }
}
