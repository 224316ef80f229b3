//! Channel state.
//!
//! Grounded in the teacher's `state/channel.rs` (`ListEntry`, `Topic`,
//! `MemberModes`), with the CRDT tie-breaking timestamps on each
//! prefix mode (`owner_ts`, `op_ts`, ...) removed — a single server is
//! the sole source of truth for its own channels, so there's nothing to
//! reconcile.

use std::collections::HashMap;

/// A single entry in a list mode (ban, exception, invite-exception).
#[derive(Debug, Clone)]
pub struct ListEntry {
    pub mask: String,
    pub set_by: String,
    pub set_at: i64,
}

/// The current topic, if any.
#[derive(Debug, Clone)]
pub struct Topic {
    pub text: String,
    pub set_by: String,
    pub set_at: i64,
}

/// Per-member channel privilege flags (the status-prefix modes).
#[derive(Debug, Clone, Default)]
pub struct MemberModes {
    pub owner: bool,
    pub admin: bool,
    pub op: bool,
    pub halfop: bool,
    pub voice: bool,
}

impl MemberModes {
    /// The single highest-priority status-prefix character, if any.
    ///
    /// Priority order (highest first): owner `~`, admin `&`, op `@`,
    /// halfop `%`, voice `+`.
    pub fn prefix_char(&self) -> Option<char> {
        if self.owner {
            Some('~')
        } else if self.admin {
            Some('&')
        } else if self.op {
            Some('@')
        } else if self.halfop {
            Some('%')
        } else if self.voice {
            Some('+')
        } else {
            None
        }
    }

    pub fn has_op_or_higher(&self) -> bool {
        self.owner || self.admin || self.op
    }

    pub fn has_halfop_or_higher(&self) -> bool {
        self.has_op_or_higher() || self.halfop
    }

    pub fn has_voice_or_higher(&self) -> bool {
        self.has_halfop_or_higher() || self.voice
    }
}

/// A single user's membership in a channel: their status-prefix modes
/// plus the time they joined, shared identically from both the
/// `User.channels` set and `Channel.members` map per spec.md §9's
/// "handle, not embedded object" guidance for cyclic graphs.
#[derive(Debug, Clone, Default)]
pub struct Membership {
    pub modes: MemberModes,
    pub join_time: i64,
}

/// The boolean channel-mode flags that take no argument.
#[derive(Debug, Clone, Default)]
pub struct ChannelModes {
    pub invite_only: bool,
    pub moderated: bool,
    pub no_external_messages: bool,
    pub secret: bool,
    pub protected_topic: bool,
    pub registered_only: bool,
}

/// A channel and its full state.
#[derive(Debug, Clone)]
pub struct Channel {
    pub name: String,
    pub created_at: i64,
    pub topic: Option<Topic>,
    pub modes: ChannelModes,
    pub key: Option<String>,
    pub limit: Option<usize>,
    pub bans: Vec<ListEntry>,
    pub excepts: Vec<ListEntry>,
    pub invex: Vec<ListEntry>,
    pub members: HashMap<String, Membership>,
}

impl Channel {
    pub fn new(name: String, created_at: i64) -> Self {
        Channel {
            name,
            created_at,
            topic: None,
            modes: ChannelModes::default(),
            key: None,
            limit: None,
            bans: Vec::new(),
            excepts: Vec::new(),
            invex: Vec::new(),
            members: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member(&self, uid: &str) -> Option<&Membership> {
        self.members.get(uid)
    }

    pub fn is_banned(&self, hostmask: &str) -> bool {
        self.bans
            .iter()
            .any(|b| corvid_proto::matches_hostmask(&b.mask, hostmask))
            && !self
                .excepts
                .iter()
                .any(|e| corvid_proto::matches_hostmask(&e.mask, hostmask))
    }

    pub fn is_invited_exempt(&self, hostmask: &str) -> bool {
        self.invex
            .iter()
            .any(|i| corvid_proto::matches_hostmask(&i.mask, hostmask))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_char_priority() {
        let mut m = MemberModes::default();
        m.voice = true;
        m.op = true;
        assert_eq!(m.prefix_char(), Some('@'));
        m.owner = true;
        assert_eq!(m.prefix_char(), Some('~'));
    }

    #[test]
    fn prefix_char_none_when_plain() {
        assert_eq!(MemberModes::default().prefix_char(), None);
    }

    #[test]
    fn halfop_or_higher_includes_op() {
        let mut m = MemberModes::default();
        m.op = true;
        assert!(m.has_halfop_or_higher());
        assert!(!MemberModes::default().has_halfop_or_higher());
    }

    #[test]
    fn ban_except_interaction() {
        let mut chan = Channel::new("#test".into(), 0);
        chan.bans.push(ListEntry {
            mask: "*!*@evil.example.org".into(),
            set_by: "op".into(),
            set_at: 0,
        });
        assert!(chan.is_banned("badguy!user@evil.example.org"));

        chan.excepts.push(ListEntry {
            mask: "*!*@evil.example.org".into(),
            set_by: "op".into(),
            set_at: 0,
        });
        assert!(!chan.is_banned("badguy!user@evil.example.org"));
    }

    #[test]
    fn empty_channel_has_no_members() {
        let chan = Channel::new("#test".into(), 0);
        assert!(chan.is_empty());
    }
}
