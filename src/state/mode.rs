//! Channel mode machine.
//!
//! spec.md §9 asks for the teacher's mode-trait hierarchy to collapse
//! into a flat `{kind, letter, apply_fn}` table; `state/mode_builder.rs`
//! already leans this way (`ChannelModeBuilder`, `parse_mlock`), so this
//! module keeps its redundancy-check discipline (a mode change that
//! would be a no-op is silently dropped, never echoed) but replaces the
//! fluent builder with the table spec.md §4.4 describes directly.

use corvid_proto::mode::{ChannelMode, Mode};

use super::channel::{Channel, ListEntry};

/// The four kinds of channel mode per spec.md §4.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    /// No argument, ever (`+i`, `+m`, `+n`, `+s`, `+t`).
    Boolean,
    /// Takes an argument on set, none on unset (`+k`, `+l`).
    ParamAlways,
    /// Takes an argument on set and on unset (status prefixes: `+o nick`).
    ParamSetOnly,
    /// Multi-valued list mode (`+b`, `+e`, `+I`).
    List,
}

/// Classify a channel mode letter by kind.
pub fn kind_of(mode: &ChannelMode) -> ModeKind {
    match mode {
        ChannelMode::Ban | ChannelMode::Exception | ChannelMode::InviteException => ModeKind::List,
        ChannelMode::Key | ChannelMode::Limit => ModeKind::ParamAlways,
        ChannelMode::Oper | ChannelMode::Halfop | ChannelMode::Voice | ChannelMode::Admin => {
            ModeKind::ParamSetOnly
        }
        _ => ModeKind::Boolean,
    }
}

/// The outcome of applying one mode change: either it took effect and
/// should be echoed, or it was a redundant no-op and was dropped.
pub enum Applied {
    Changed(Mode<ChannelMode>),
    NoOp,
    /// The actor lacks the privilege to use this mode (caller checks
    /// before calling `apply`, but list-mode additions still need the
    /// target mask to validate, so report failures through this too).
    Invalid,
}

/// Apply a single mode change to `channel`, returning whether it
/// actually changed anything. `setter` names the acting nick (used for
/// ban/topic attribution) and `now` is a unix timestamp.
pub fn apply(channel: &mut Channel, change: &Mode<ChannelMode>, setter: &str, now: i64) -> Applied {
    let (is_plus, mode, arg) = match change {
        Mode::Plus(m, a) => (true, m, a.as_deref()),
        Mode::Minus(m, a) => (false, m, a.as_deref()),
        Mode::NoPrefix(_) => return Applied::NoOp,
    };

    match kind_of(mode) {
        ModeKind::Boolean => {
            let flag = match mode {
                ChannelMode::InviteOnly => &mut channel.modes.invite_only,
                ChannelMode::Moderated => &mut channel.modes.moderated,
                ChannelMode::NoExternalMessages => &mut channel.modes.no_external_messages,
                ChannelMode::Secret => &mut channel.modes.secret,
                ChannelMode::ProtectedTopic => &mut channel.modes.protected_topic,
                ChannelMode::RegisteredOnly => &mut channel.modes.registered_only,
                _ => return Applied::Invalid,
            };
            if *flag == is_plus {
                Applied::NoOp
            } else {
                *flag = is_plus;
                Applied::Changed(change.clone())
            }
        }
        ModeKind::ParamAlways => match mode {
            ChannelMode::Key => {
                if is_plus {
                    let Some(key) = arg else { return Applied::Invalid };
                    if channel.key.as_deref() == Some(key) {
                        return Applied::NoOp;
                    }
                    channel.key = Some(key.to_string());
                } else {
                    if channel.key.is_none() {
                        return Applied::NoOp;
                    }
                    channel.key = None;
                }
                Applied::Changed(change.clone())
            }
            ChannelMode::Limit => {
                if is_plus {
                    let Some(limit) = arg.and_then(|a| a.parse::<usize>().ok()) else {
                        return Applied::Invalid;
                    };
                    if channel.limit == Some(limit) {
                        return Applied::NoOp;
                    }
                    channel.limit = Some(limit);
                } else {
                    if channel.limit.is_none() {
                        return Applied::NoOp;
                    }
                    channel.limit = None;
                }
                Applied::Changed(change.clone())
            }
            _ => Applied::Invalid,
        },
        ModeKind::ParamSetOnly => {
            let Some(target_uid) = arg else { return Applied::Invalid };
            let Some(membership) = channel.members.get_mut(target_uid) else {
                return Applied::Invalid;
            };
            let flag = match mode {
                ChannelMode::Oper => &mut membership.modes.op,
                ChannelMode::Halfop => &mut membership.modes.halfop,
                ChannelMode::Voice => &mut membership.modes.voice,
                ChannelMode::Admin => &mut membership.modes.admin,
                _ => return Applied::Invalid,
            };
            if *flag == is_plus {
                Applied::NoOp
            } else {
                *flag = is_plus;
                Applied::Changed(change.clone())
            }
        }
        ModeKind::List => {
            let Some(mask) = arg else { return Applied::Invalid };
            let list = match mode {
                ChannelMode::Ban => &mut channel.bans,
                ChannelMode::Exception => &mut channel.excepts,
                ChannelMode::InviteException => &mut channel.invex,
                _ => return Applied::Invalid,
            };
            if is_plus {
                if list.iter().any(|e| e.mask == mask) {
                    return Applied::NoOp;
                }
                list.push(ListEntry {
                    mask: mask.to_string(),
                    set_by: setter.to_string(),
                    set_at: now,
                });
            } else {
                let before = list.len();
                list.retain(|e| e.mask != mask);
                if list.len() == before {
                    return Applied::NoOp;
                }
            }
            Applied::Changed(change.clone())
        }
    }
}

/// Apply a batch of mode changes in order, returning only the ones that
/// actually changed state (redundant changes are dropped per spec.md
/// §4.4's "MODE changes are idempotent" note).
pub fn apply_all(
    channel: &mut Channel,
    changes: &[Mode<ChannelMode>],
    setter: &str,
    now: i64,
) -> Vec<Mode<ChannelMode>> {
    let mut applied = Vec::new();
    for change in changes {
        if let Applied::Changed(m) = apply(channel, change, setter, now) {
            applied.push(m);
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chan() -> Channel {
        Channel::new("#test".into(), 0)
    }

    #[test]
    fn setting_invite_only_twice_is_noop_second_time() {
        let mut c = chan();
        let change = Mode::plus(ChannelMode::InviteOnly, None);
        let first = apply_all(&mut c, std::slice::from_ref(&change), "op", 0);
        assert_eq!(first.len(), 1);
        let second = apply_all(&mut c, std::slice::from_ref(&change), "op", 0);
        assert!(second.is_empty());
    }

    #[test]
    fn ban_add_then_remove_round_trips() {
        let mut c = chan();
        let add = Mode::plus(ChannelMode::Ban, Some("*!*@bad.example.org"));
        let applied = apply_all(&mut c, &[add], "op", 0);
        assert_eq!(applied.len(), 1);
        assert_eq!(c.bans.len(), 1);

        let remove = Mode::minus(ChannelMode::Ban, Some("*!*@bad.example.org"));
        let applied = apply_all(&mut c, &[remove], "op", 0);
        assert_eq!(applied.len(), 1);
        assert!(c.bans.is_empty());
    }

    #[test]
    fn duplicate_ban_is_noop() {
        let mut c = chan();
        let add = Mode::plus(ChannelMode::Ban, Some("*!*@bad.example.org"));
        apply_all(&mut c, std::slice::from_ref(&add), "op", 0);
        let second = apply_all(&mut c, &[add], "op", 0);
        assert!(second.is_empty());
    }

    #[test]
    fn key_set_and_unset() {
        let mut c = chan();
        let set = Mode::plus(ChannelMode::Key, Some("hunter2"));
        apply_all(&mut c, &[set], "op", 0);
        assert_eq!(c.key.as_deref(), Some("hunter2"));

        let unset = Mode::minus(ChannelMode::Key, None);
        apply_all(&mut c, &[unset], "op", 0);
        assert_eq!(c.key, None);
    }

    #[test]
    fn op_toggle_requires_member() {
        let mut c = chan();
        let grant = Mode::plus(ChannelMode::Oper, Some("uid1"));
        let result = apply_all(&mut c, &[grant], "op", 0);
        assert!(result.is_empty());

        c.members.insert("uid1".into(), Default::default());
        let grant = Mode::plus(ChannelMode::Oper, Some("uid1"));
        let result = apply_all(&mut c, &[grant], "op", 0);
        assert_eq!(result.len(), 1);
        assert!(c.members["uid1"].modes.op);
    }
}
