//! Error types for command handling and the core event loop.

use corvid_proto::{Command, Message, Prefix, Response};
use thiserror::Error;

/// Errors a command handler can return.
///
/// Most variants map directly to a numeric reply sent back to the
/// originating client; `Quit`/`Internal` are control-flow-only and
/// never themselves produce a reply.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Not enough parameters were supplied for the command.
    #[error("need more params")]
    NeedMoreParams,
    /// PRIVMSG/NOTICE/TOPIC with an empty trailing text.
    #[error("no text to send")]
    NoTextToSend,
    /// Requested nickname is already taken.
    #[error("nickname in use: {0}")]
    NicknameInUse(String),
    /// Requested nickname fails RFC 2812 grammar.
    #[error("erroneous nickname: {0}")]
    ErroneousNickname(String),
    /// Command requires registration, and the client has not registered.
    #[error("not registered")]
    NotRegistered,
    /// Command refused for lack of privilege (oper-only, chanop-only, ...).
    #[error("access denied")]
    AccessDenied,
    /// NICK/USER sent again after registration completed.
    #[error("already registered")]
    AlreadyRegistered,
    /// Command requires a channel the client isn't on.
    #[error("not on channel")]
    NotOnChannel,
    /// Named target does not exist.
    #[error("no such target: {0}")]
    NoSuchTarget(String),
    /// Named channel does not exist.
    #[error("no such channel: {0}")]
    NoSuchChannel(String),
    /// PRIVMSG/NOTICE rejected by `+n`/`+m`/a ban on the target channel.
    #[error("cannot send to channel: {0}")]
    CannotSendToChan(String),
    /// OPER with a name/password that doesn't match any `oper_block`.
    #[error("password mismatch")]
    PasswdMismatch,
    /// OPER from a host not covered by the matching `oper_block`.
    #[error("no oper host")]
    NoOperHost,
    /// WHOWAS found no history for the given nick.
    #[error("was no such nick: {0}")]
    WasNoSuchNick(String),
    /// The connection should be torn down with this QUIT reason.
    #[error("quit: {0:?}")]
    Quit(Option<String>),
    /// Something went wrong that indicates a bug, not client misuse.
    ///
    /// Never shown to the client verbatim; logged with a `*** BUG ***`
    /// marker and the connection continues unless the caller escalates it.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type returned by every command handler.
pub type HandlerResult<T = ()> = Result<T, HandlerError>;

impl HandlerError {
    /// The RFC numeric this error maps to, if any.
    pub fn response(&self) -> Option<Response> {
        match self {
            HandlerError::NeedMoreParams => Some(Response::ERR_NEEDMOREPARAMS),
            HandlerError::NoTextToSend => Some(Response::ERR_NOTEXTTOSEND),
            HandlerError::NicknameInUse(_) => Some(Response::ERR_NICKNAMEINUSE),
            HandlerError::ErroneousNickname(_) => Some(Response::ERR_ERRONEOUSNICKNAME),
            HandlerError::NotRegistered => Some(Response::ERR_NOTREGISTERED),
            HandlerError::AccessDenied => Some(Response::ERR_NOPRIVILEGES),
            HandlerError::AlreadyRegistered => Some(Response::ERR_ALREADYREGISTERED),
            HandlerError::NotOnChannel => Some(Response::ERR_NOTONCHANNEL),
            HandlerError::NoSuchTarget(_) => Some(Response::ERR_NOSUCHNICK),
            HandlerError::NoSuchChannel(_) => Some(Response::ERR_NOSUCHCHANNEL),
            HandlerError::CannotSendToChan(_) => Some(Response::ERR_CANNOTSENDTOCHAN),
            HandlerError::PasswdMismatch => Some(Response::ERR_PASSWDMISMATCH),
            HandlerError::NoOperHost => Some(Response::ERR_NOOPERHOST),
            HandlerError::WasNoSuchNick(_) => Some(Response::ERR_WASNOSUCHNICK),
            HandlerError::Quit(_) | HandlerError::Internal(_) => None,
        }
    }

    /// Build the numeric reply message for this error, if it has one.
    ///
    /// `cmd_name` fills the second parameter required by several 4xx
    /// numerics (e.g. `461 <nick> <command> :Not enough parameters`).
    pub fn to_reply(&self, server_name: &str, nick: &str, cmd_name: &str) -> Option<Message> {
        let response = self.response()?;
        let mut params = vec![nick.to_string()];
        let text = match self {
            HandlerError::NeedMoreParams => {
                params.push(cmd_name.to_string());
                "Not enough parameters".to_string()
            }
            HandlerError::NoTextToSend => "No text to send".to_string(),
            HandlerError::NicknameInUse(n) => {
                params.push(n.clone());
                "Nickname is already in use".to_string()
            }
            HandlerError::ErroneousNickname(n) => {
                params.push(n.clone());
                "Erroneous nickname".to_string()
            }
            HandlerError::NotRegistered => "You have not registered".to_string(),
            HandlerError::AccessDenied => {
                "Permission Denied- You're not an IRC operator".to_string()
            }
            HandlerError::AlreadyRegistered => "You may not reregister".to_string(),
            HandlerError::NotOnChannel => "You're not on that channel".to_string(),
            HandlerError::NoSuchTarget(t) => {
                params.push(t.clone());
                "No such nick/channel".to_string()
            }
            HandlerError::NoSuchChannel(c) => {
                params.push(c.clone());
                "No such channel".to_string()
            }
            HandlerError::CannotSendToChan(c) => {
                params.push(c.clone());
                "Cannot send to channel".to_string()
            }
            HandlerError::PasswdMismatch => "Password incorrect".to_string(),
            HandlerError::NoOperHost => "No O-lines for your host".to_string(),
            HandlerError::WasNoSuchNick(n) => {
                params.push(n.clone());
                "There was no such nickname".to_string()
            }
            HandlerError::Quit(_) | HandlerError::Internal(_) => return None,
        };
        params.push(text);
        Some(Message {
            tags: None,
            prefix: Some(Prefix::ServerName(server_name.to_string())),
            command: Command::Response(response, params),
        })
    }

    /// Log this error with the `*** BUG ***` marker spec.md §7 mandates
    /// for internal/logic errors; a no-op for ordinary client-facing errors.
    pub fn log_if_bug(&self, context: &str) {
        if let HandlerError::Internal(detail) = self {
            tracing::error!(context, detail, "*** BUG ***");
        }
    }
}
