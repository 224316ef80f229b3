//! # corvid-proto
//!
//! A Rust library for parsing and serializing the RFC 1459 / 2812 IRC
//! wire format used by `corvid-ircd`.
//!
//! ## Features
//!
//! - IRC message parsing with prefixes, commands, and parameters
//! - Zero-copy parsing with borrowed message types
//! - User and channel mode parsing
//! - ISUPPORT (RPL_ISUPPORT) parsing
//! - Convenient message construction with builder pattern
//!
//! This crate has no server state and does no I/O: it is a pure
//! wire-format library shared between the daemon's connection pump and
//! its command dispatcher.

#![deny(clippy::all)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ## Quick Start
//!
//! ### Creating IRC Messages
//!
//! ```rust
//! use corvid_proto::{Message, prefix::Prefix};
//!
//! let privmsg = Message::privmsg("#rust", "Hello, world!");
//! let notice = Message::notice("nick", "Server notice");
//! let join = Message::join("#channel");
//!
//! let msg = privmsg.with_prefix(Prefix::new_from_str("bot!bot@example.com"));
//! println!("{}", msg); // Serializes to IRC protocol format
//! ```
//!
//! ### Parsing IRC Messages
//!
//! ```rust
//! use corvid_proto::Message;
//!
//! let raw = ":nick!user@host PRIVMSG #channel :Hello!";
//! let message: Message = raw.parse().expect("Valid IRC message");
//! ```
//!
//! ## Acknowledgments
//!
//! This project was inspired by the architectural patterns established by
//! [Aaron Weiss (aatxe)](https://github.com/aatxe) in the
//! [irc](https://github.com/aatxe/irc) crate. We are grateful for Aaron's
//! foundational work on IRC protocol handling in Rust.

pub mod chan;
pub mod command;
pub mod encode;
pub mod error;
pub mod format;
pub mod isupport;
pub mod message;
pub mod mode;
pub mod nick;
pub mod prefix;
pub mod response;
pub mod util;

pub use self::chan::ChannelExt;
pub use self::command::{Command, CommandRef};
pub use self::encode::IrcEncode;
pub use self::nick::{NickExt, DEFAULT_NICK_MAX_LEN};

pub use self::isupport::{
    ChanModes, Isupport, IsupportBuilder, IsupportEntry, MaxList, PrefixSpec, TargMax,
};
pub use self::message::MessageRef;
pub use self::message::{Message, Tag};
pub use self::mode::{ChannelMode, Mode, UserMode};
pub use self::prefix::Prefix;
pub use self::prefix::PrefixRef;
pub use self::response::Response;

pub mod casemap;
pub use self::casemap::{irc_eq, irc_lower_char, irc_to_lower};

pub use self::util::{matches_hostmask, wildcard_match};
