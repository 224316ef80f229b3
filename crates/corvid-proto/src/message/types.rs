use std::borrow::Cow;

use crate::chan::ChannelExt;
use crate::command::Command;
use crate::error;
use crate::error::MessageParseError;
use crate::prefix::Prefix;

/// An owned IRC message.
///
/// Contains the complete parsed representation of an IRC message including
/// optional IRCv3 tags, optional prefix/source, and the command with parameters.
///
/// # Example
///
/// ```
/// use corvid_proto::Message;
///
/// // Parse a message
/// let msg: Message = ":nick!user@host PRIVMSG #channel :Hello!".parse().unwrap();
///
/// // Construct a message
/// let msg = Message::privmsg("#channel", "Hello!");
/// ```
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// IRCv3 message tags (e.g., `time`, `msgid`).
    pub tags: Option<Vec<Tag>>,
    /// Message prefix/source (e.g., `nick!user@host`).
    pub prefix: Option<Prefix>,
    /// The IRC command and its parameters.
    pub command: Command,
}

impl Message {
    /// Create a new message from raw components.
    #[must_use = "message creation result should be handled"]
    pub fn new(
        prefix: Option<&str>,
        command: &str,
        args: Vec<&str>,
    ) -> Result<Message, MessageParseError> {
        Message::with_tags(None, prefix, command, args)
    }

    /// Create a new message with tags from raw components.
    #[must_use = "message creation result should be handled"]
    pub fn with_tags(
        tags: Option<Vec<Tag>>,
        prefix: Option<&str>,
        command: &str,
        args: Vec<&str>,
    ) -> Result<Message, error::MessageParseError> {
        let parsed_prefix = if let Some(p) = prefix {
            Some(crate::prefix::Prefix::try_from_str(p)?)
        } else {
            None
        };

        Ok(Message {
            tags,
            prefix: parsed_prefix,
            command: Command::new(command, args)?,
        })
    }

    /// Get the nickname from the message prefix, if present.
    pub fn source_nickname(&self) -> Option<&str> {
        self.prefix.as_ref().and_then(|p| match p {
            Prefix::Nickname(name, _, _) => Some(&name[..]),
            _ => None,
        })
    }

    /// Get the appropriate target for a response.
    ///
    /// For channel messages, returns the channel name.
    /// For private messages, returns the sender's nickname.
    pub fn response_target(&self) -> Option<&str> {
        match self.command {
            Command::PRIVMSG(ref target, _) if target.is_channel_name() => Some(target),
            Command::NOTICE(ref target, _) if target.is_channel_name() => Some(target),
            _ => self.source_nickname(),
        }
    }

    /// Get the value of an IRCv3 tag by key.
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags
            .as_ref()?
            .iter()
            .find(|Tag(k, _)| k.as_ref() == key)
            .and_then(|Tag(_, v)| v.as_deref())
    }

    /// Get the server-time tag value.
    pub fn server_time(&self) -> Option<&str> {
        self.tag_value("time")
    }

    /// Get the labeled-response label tag.
    pub fn label(&self) -> Option<&str> {
        self.tag_value("label")
    }

    /// Get the message ID tag.
    pub fn msgid(&self) -> Option<&str> {
        self.tag_value("msgid")
    }

    /// Get the account tag value.
    pub fn account_tag(&self) -> Option<&str> {
        self.tag_value("account")
    }
    /// Create a PRIVMSG message to a target with text
    #[must_use]
    pub fn privmsg<T, M>(target: T, text: M) -> Self
    where
        T: Into<String>,
        M: Into<String>,
    {
        Command::PRIVMSG(target.into(), text.into()).into()
    }

    /// Create a NOTICE message to a target with text
    #[must_use]
    pub fn notice<T, M>(target: T, text: M) -> Self
    where
        T: Into<String>,
        M: Into<String>,
    {
        Command::NOTICE(target.into(), text.into()).into()
    }

    /// Create a JOIN message for a channel
    #[must_use]
    pub fn join<C>(channel: C) -> Self
    where
        C: Into<String>,
    {
        Command::JOIN(channel.into(), None, None).into()
    }

    /// Create a JOIN message for a channel with a key
    #[must_use]
    pub fn join_with_key<C, K>(channel: C, key: K) -> Self
    where
        C: Into<String>,
        K: Into<String>,
    {
        Command::JOIN(channel.into(), Some(key.into()), None).into()
    }

    /// Create a PART message to leave a channel
    #[must_use]
    pub fn part<C>(channel: C) -> Self
    where
        C: Into<String>,
    {
        Command::PART(channel.into(), None).into()
    }

    /// Create a PART message to leave a channel with a message
    #[must_use]
    pub fn part_with_message<C, M>(channel: C, message: M) -> Self
    where
        C: Into<String>,
        M: Into<String>,
    {
        Command::PART(channel.into(), Some(message.into())).into()
    }

    /// Create a NICK message to change nickname
    #[must_use]
    pub fn nick<N>(nickname: N) -> Self
    where
        N: Into<String>,
    {
        Command::NICK(nickname.into()).into()
    }

    /// Create a USER message for registration
    #[must_use]
    pub fn user<U, R>(username: U, realname: R) -> Self
    where
        U: Into<String>,
        R: Into<String>,
    {
        Command::USER(username.into(), "0".into(), realname.into()).into()
    }

    /// Create a PING message to a server
    #[must_use]
    pub fn ping<S>(server: S) -> Self
    where
        S: Into<String>,
    {
        Command::PING(server.into(), None).into()
    }

    /// Create a PONG message in response to a PING
    #[must_use]
    pub fn pong<S>(server: S) -> Self
    where
        S: Into<String>,
    {
        Command::PONG(server.into(), None).into()
    }

    /// Create a PONG message with server name and token
    ///
    /// The proper format is `PONG <server> <token>` where server is the
    /// name of the responding server and token is the value from the PING.
    #[must_use]
    pub fn pong_with_token<S, T>(server: S, token: T) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        Command::PONG(server.into(), Some(token.into())).into()
    }

    /// Create a QUIT message
    #[must_use]
    pub fn quit() -> Self {
        Command::QUIT(None).into()
    }

    /// Create a QUIT message with a quit message
    #[must_use]
    pub fn quit_with_message<M>(message: M) -> Self
    where
        M: Into<String>,
    {
        Command::QUIT(Some(message.into())).into()
    }

    /// Create a KICK message
    #[must_use]
    pub fn kick<C, N>(channel: C, nickname: N) -> Self
    where
        C: Into<String>,
        N: Into<String>,
    {
        Command::KICK(channel.into(), nickname.into(), None).into()
    }

    /// Create a KICK message with a reason
    #[must_use]
    pub fn kick_with_reason<C, N, R>(channel: C, nickname: N, reason: R) -> Self
    where
        C: Into<String>,
        N: Into<String>,
        R: Into<String>,
    {
        Command::KICK(channel.into(), nickname.into(), Some(reason.into())).into()
    }

    /// Create an AWAY message
    #[must_use]
    pub fn away() -> Self {
        Command::AWAY(None).into()
    }

    /// Create an AWAY message with a message
    #[must_use]
    pub fn away_with_message<M>(message: M) -> Self
    where
        M: Into<String>,
    {
        Command::AWAY(Some(message.into())).into()
    }

    /// Add IRCv3 tags to this message
    #[must_use]
    pub fn with_message_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Add a single IRCv3 tag to this message
    #[must_use]
    pub fn with_tag<K, V>(mut self, key: K, value: Option<V>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let tag = Tag::new(key, value.map(|v| v.into()));
        if let Some(ref mut existing_tags) = self.tags {
            existing_tags.push(tag);
        } else {
            self.tags = Some(vec![tag]);
        }
        self
    }

    /// Set the prefix/source of this message
    #[must_use]
    pub fn with_prefix(mut self, prefix: crate::prefix::Prefix) -> Self {
        self.prefix = Some(prefix);
        self
    }
}

impl From<Command> for Message {
    fn from(cmd: Command) -> Message {
        Message {
            tags: None,
            prefix: None,
            command: cmd,
        }
    }
}

/// An IRCv3 message tag.
///
/// Tags are key-value pairs that can be attached to messages.
/// The value is optional (some tags are presence-only flags).
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag(
    /// Tag key (e.g., `time`, `msgid`).
    pub Cow<'static, str>,
    /// Optional tag value.
    pub Option<String>,
);

impl Tag {
    /// Create a new tag with a key and optional value.
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Tag(Cow::Owned(key.into()), value)
    }
}
