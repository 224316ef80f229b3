//! Channel commands: JOIN, PART, ChannelMODE, TOPIC, NAMES, LIST,
//! INVITE, KICK.
//!
//! Grounded in the teacher's per-channel actor handlers
//! (`handlers/channel/join.rs`, `part.rs`, `mode.rs`, ...), collapsed
//! from "send a request to the channel's actor and await its reply"
//! into direct synchronous mutation of `server.channels`, since this
//! core loop already holds exclusive access.

use std::collections::HashSet;

use corvid_proto::{ChannelExt, Command, Message, Mode, Prefix, Response};

use crate::error::{HandlerError, HandlerResult};
use crate::state::channel::{Channel, Membership};
use crate::state::hooks::HookDecision;
use crate::state::mode::apply_all;
use crate::state::Server;

use super::connection::send_numeric;

pub fn join(server: &mut Server, uid: &str, cmd: Command) -> HandlerResult {
    let Command::JOIN(chan_names, key, _) = cmd else {
        return Ok(());
    };
    for chan_name in chan_names.split(',') {
        join_one(server, uid, chan_name, key.as_deref())?;
    }
    Ok(())
}

fn join_one(server: &mut Server, uid: &str, chan_name: &str, key: Option<&str>) -> HandlerResult {
    if !chan_name.is_channel_name() {
        return Err(HandlerError::NoSuchChannel(chan_name.to_string()));
    }
    let user = server.user(uid).ok_or(HandlerError::NotRegistered)?;
    let hostmask = user.hostmask();
    let nick = user.nick.clone();

    if server.hooks.check_before_join(user, chan_name) == HookDecision::Deny {
        return Err(HandlerError::AccessDenied);
    }

    let now = crate::state::now_unix();
    let existed = server.channel(chan_name).is_some();
    if !existed {
        server.insert_channel(Channel::new(chan_name.to_string(), now));
    }

    {
        let chan = server.channel(chan_name).expect("just inserted or already present");
        let rejection = if chan.is_banned(&hostmask) && !chan.is_invited_exempt(&hostmask) {
            Some(Response::err_bannedfromchan(&nick, chan_name))
        } else if chan.modes.invite_only && !chan.is_invited_exempt(&hostmask) {
            Some(Response::err_inviteonlychan(&nick, chan_name))
        } else if chan.key.as_deref().is_some_and(|required| key != Some(required)) {
            Some(Response::err_badchannelkey(&nick, chan_name))
        } else if chan.limit.is_some_and(|limit| chan.members.len() >= limit) {
            Some(Response::err_channelisfull(&nick, chan_name))
        } else {
            None
        };
        if let Some(reply) = rejection {
            server.send_message(uid, &reply.with_prefix(Prefix::ServerName(server.server_name.clone())));
            if !existed {
                server.remove_channel(chan_name);
            }
            return Ok(());
        }
    }

    let first_member = server.channel(chan_name).map(|c| c.is_empty()).unwrap_or(true);
    let chan = server.channel_mut(chan_name).unwrap();
    let mut membership = Membership {
        join_time: now,
        ..Default::default()
    };
    if first_member {
        membership.modes.op = true;
    }
    chan.members.insert(uid.to_string(), membership);
    let chan_key = chan.name.clone();

    if let Some(u) = server.user_mut(uid) {
        u.channels.insert(chan_key);
    }

    let join_line = format!(":{hostmask} JOIN :{chan_name}\r\n");
    let members: Vec<String> = server.channel(chan_name).unwrap().members.keys().cloned().collect();
    for member_uid in &members {
        server.send_line(member_uid, join_line.clone());
    }

    send_topic(server, uid, chan_name, false);
    send_names(server, uid, chan_name);
    Ok(())
}

pub fn part(server: &mut Server, uid: &str, cmd: Command) -> HandlerResult {
    let Command::PART(chan_names, reason) = cmd else {
        return Ok(());
    };
    for chan_name in chan_names.split(',') {
        part_one(server, uid, chan_name, reason.as_deref())?;
    }
    Ok(())
}

fn part_one(server: &mut Server, uid: &str, chan_name: &str, reason: Option<&str>) -> HandlerResult {
    let user = server.user(uid).ok_or(HandlerError::NotRegistered)?;
    let hostmask = user.hostmask();
    let chan = server
        .channel(chan_name)
        .ok_or_else(|| HandlerError::NoSuchChannel(chan_name.to_string()))?;
    if chan.member(uid).is_none() {
        return Err(HandlerError::NotOnChannel);
    }

    let reason_text = reason.unwrap_or("");
    let part_line = format!(":{hostmask} PART {chan_name} :{reason_text}\r\n");
    let members: Vec<String> = chan.members.keys().cloned().collect();
    for member_uid in &members {
        server.send_line(member_uid, part_line.clone());
    }

    let now_empty = server
        .channel_mut(chan_name)
        .map(|chan| {
            chan.members.remove(uid);
            chan.is_empty()
        })
        .unwrap_or(false);
    if now_empty {
        server.remove_channel(chan_name);
        server.hooks.notify_channel_destroy(chan_name);
    }
    if let Some(u) = server.user_mut(uid) {
        u.channels.remove(chan_name);
    }
    Ok(())
}

pub fn channel_mode(server: &mut Server, uid: &str, cmd: Command) -> HandlerResult {
    let Command::ChannelMODE(chan_name, changes) = cmd else {
        return Ok(());
    };
    let Some(chan) = server.channel(&chan_name) else {
        return Err(HandlerError::NoSuchChannel(chan_name));
    };

    if changes.is_empty() {
        send_numeric(
            server,
            uid,
            Response::RPL_CHANNELMODEIS,
            vec![nick_of(server, uid), chan_name.clone(), mode_string(chan)],
        );
        return Ok(());
    }

    let is_op = chan.member(uid).map(|m| m.modes.has_op_or_higher()).unwrap_or(false);
    let is_oper = server.user(uid).map(|u| u.modes.oper).unwrap_or(false);
    if !is_op && !is_oper {
        return Err(HandlerError::AccessDenied);
    }

    let now = crate::state::now_unix();
    let nick = nick_of(server, uid);
    let resolved = resolve_prefix_mode_targets(server, &changes);
    let chan = server.channel_mut(&chan_name).unwrap();
    let applied = apply_all(chan, &resolved, &nick, now);
    if applied.is_empty() {
        return Ok(());
    }

    let display = restore_prefix_mode_targets(server, &applied);
    let mode_str = render_mode_changes(&display);
    let chan = server.channel(&chan_name).unwrap();
    let line = format!(":{nick} MODE {chan_name} {mode_str}\r\n");
    let members: Vec<String> = chan.members.keys().cloned().collect();
    for member_uid in &members {
        server.send_line(member_uid, line.clone());
    }
    server.hooks.notify_channel_update(server.channel(&chan_name).unwrap());
    Ok(())
}

/// Status-prefix modes (`+o`/`+h`/`+v`/`+a`) arrive over the wire naming a
/// nickname, but `Channel::members` is keyed by uid; swap the argument
/// before handing changes to `apply_all`. Any change naming a nick that
/// isn't on the channel is dropped rather than passed through.
fn resolve_prefix_mode_targets(
    server: &Server,
    changes: &[Mode<corvid_proto::ChannelMode>],
) -> Vec<Mode<corvid_proto::ChannelMode>> {
    changes
        .iter()
        .filter_map(|change| {
            if crate::state::mode::kind_of(change.mode()) != crate::state::mode::ModeKind::ParamSetOnly {
                return Some(change.clone());
            }
            let nick = change.arg()?;
            let target_uid = server.find_uid_by_nick(nick)?;
            Some(if change.is_plus() {
                Mode::plus(change.mode().clone(), Some(target_uid))
            } else {
                Mode::minus(change.mode().clone(), Some(target_uid))
            })
        })
        .collect()
}

/// Inverse of `resolve_prefix_mode_targets`, run on the changes that
/// actually took effect so the MODE line echoed to the channel names
/// the target by nick rather than uid.
fn restore_prefix_mode_targets(
    server: &Server,
    changes: &[Mode<corvid_proto::ChannelMode>],
) -> Vec<Mode<corvid_proto::ChannelMode>> {
    changes
        .iter()
        .map(|change| {
            if crate::state::mode::kind_of(change.mode()) != crate::state::mode::ModeKind::ParamSetOnly {
                return change.clone();
            }
            let Some(target_uid) = change.arg() else {
                return change.clone();
            };
            let nick = server.user(target_uid).map(|u| u.nick.clone()).unwrap_or_else(|| target_uid.to_string());
            if change.is_plus() {
                Mode::plus(change.mode().clone(), Some(&nick))
            } else {
                Mode::minus(change.mode().clone(), Some(&nick))
            }
        })
        .collect()
}

fn render_mode_changes(changes: &[Mode<corvid_proto::ChannelMode>]) -> String {
    let mut flags = String::new();
    let mut args = Vec::new();
    let mut last_plus: Option<bool> = None;
    for change in changes {
        let plus = change.is_plus();
        if last_plus != Some(plus) {
            flags.push(if plus { '+' } else { '-' });
            last_plus = Some(plus);
        }
        flags.push_str(&change.mode().to_string());
        if let Some(arg) = change.arg() {
            args.push(arg.to_string());
        }
    }
    if args.is_empty() {
        flags
    } else {
        format!("{flags} {}", args.join(" "))
    }
}

fn mode_string(chan: &Channel) -> String {
    let mut s = String::from("+");
    if chan.modes.invite_only {
        s.push('i');
    }
    if chan.modes.moderated {
        s.push('m');
    }
    if chan.modes.no_external_messages {
        s.push('n');
    }
    if chan.modes.secret {
        s.push('s');
    }
    if chan.modes.protected_topic {
        s.push('t');
    }
    if chan.modes.registered_only {
        s.push('r');
    }
    if chan.key.is_some() {
        s.push('k');
    }
    if chan.limit.is_some() {
        s.push('l');
    }
    s
}

pub fn topic(server: &mut Server, uid: &str, cmd: Command) -> HandlerResult {
    let Command::TOPIC(chan_name, new_topic) = cmd else {
        return Ok(());
    };
    let chan = server
        .channel(&chan_name)
        .ok_or_else(|| HandlerError::NoSuchChannel(chan_name.clone()))?;
    if chan.member(uid).is_none() {
        return Err(HandlerError::NotOnChannel);
    }

    let Some(new_topic) = new_topic else {
        send_topic(server, uid, &chan_name, true);
        return Ok(());
    };

    let is_op = chan.member(uid).map(|m| m.modes.has_op_or_higher()).unwrap_or(false);
    if chan.modes.protected_topic && !is_op {
        return Err(HandlerError::AccessDenied);
    }

    let nick = nick_of(server, uid);
    let hostmask = server.user(uid).map(|u| u.hostmask()).unwrap_or_default();
    let now = crate::state::now_unix();
    let chan = server.channel_mut(&chan_name).unwrap();
    chan.topic = Some(crate::state::channel::Topic {
        text: new_topic.clone(),
        set_by: nick.clone(),
        set_at: now,
    });
    let members: Vec<String> = chan.members.keys().cloned().collect();
    let line = format!(":{hostmask} TOPIC {chan_name} :{new_topic}\r\n");
    for member_uid in &members {
        server.send_line(member_uid, line.clone());
    }
    Ok(())
}

fn send_topic(server: &Server, uid: &str, chan_name: &str, send_notopic: bool) {
    let nick = nick_of(server, uid);
    let Some(chan) = server.channel(chan_name) else {
        return;
    };
    match &chan.topic {
        Some(topic) => {
            send_numeric(
                server,
                uid,
                Response::RPL_TOPIC,
                vec![nick.clone(), chan_name.to_string(), topic.text.clone()],
            );
            send_numeric(
                server,
                uid,
                Response::RPL_TOPICWHOTIME,
                vec![
                    nick,
                    chan_name.to_string(),
                    topic.set_by.clone(),
                    topic.set_at.to_string(),
                ],
            );
        }
        None if send_notopic => {
            send_numeric(
                server,
                uid,
                Response::RPL_NOTOPIC,
                vec![nick, chan_name.to_string(), "No topic is set".to_string()],
            );
        }
        None => {}
    }
}

pub fn names(server: &mut Server, uid: &str, cmd: Command) -> HandlerResult {
    let Command::NAMES(chan_name, _) = cmd else {
        return Ok(());
    };
    if let Some(chan_name) = chan_name {
        for name in chan_name.split(',') {
            send_names(server, uid, name);
        }
    }
    Ok(())
}

fn send_names(server: &Server, uid: &str, chan_name: &str) {
    let nick = nick_of(server, uid);
    let Some(chan) = server.channel(chan_name) else {
        return;
    };
    let mut names: Vec<String> = chan
        .members
        .iter()
        .filter_map(|(member_uid, membership)| {
            let member_nick = server.user(member_uid)?.nick.clone();
            Some(match membership.modes.prefix_char() {
                Some(c) => format!("{c}{member_nick}"),
                None => member_nick,
            })
        })
        .collect();
    names.sort();
    send_numeric(
        server,
        uid,
        Response::RPL_NAMREPLY,
        vec!["=".to_string(), chan_name.to_string(), names.join(" ")],
    );
    send_numeric(
        server,
        uid,
        Response::RPL_ENDOFNAMES,
        vec![nick, chan_name.to_string(), "End of /NAMES list".to_string()],
    );
}

pub fn list(server: &mut Server, uid: &str, cmd: Command) -> HandlerResult {
    let Command::LIST(filter, _) = cmd else {
        return Ok(());
    };
    let wanted: Option<HashSet<String>> = filter.map(|f| {
        f.split(',')
            .map(|s| corvid_proto::casemap::irc_to_lower(s))
            .collect()
    });
    let mut entries: Vec<(String, usize, String)> = server
        .channels
        .values()
        .filter(|c| !c.modes.secret)
        .filter(|c| {
            wanted
                .as_ref()
                .map(|w| w.contains(&corvid_proto::casemap::irc_to_lower(&c.name)))
                .unwrap_or(true)
        })
        .map(|c| {
            (
                c.name.clone(),
                c.members.len(),
                c.topic.as_ref().map(|t| t.text.clone()).unwrap_or_default(),
            )
        })
        .collect();
    entries.sort();
    for (name, count, topic) in entries {
        send_numeric(
            server,
            uid,
            Response::RPL_LIST,
            vec![nick_of(server, uid), name, count.to_string(), topic],
        );
    }
    send_numeric(
        server,
        uid,
        Response::RPL_LISTEND,
        vec![nick_of(server, uid), "End of /LIST".to_string()],
    );
    Ok(())
}

pub fn invite(server: &mut Server, uid: &str, cmd: Command) -> HandlerResult {
    let Command::INVITE(target_nick, chan_name) = cmd else {
        return Ok(());
    };
    let chan = server
        .channel(&chan_name)
        .ok_or_else(|| HandlerError::NoSuchChannel(chan_name.clone()))?;
    if chan.member(uid).is_none() {
        return Err(HandlerError::NotOnChannel);
    }
    let is_op = chan.member(uid).map(|m| m.modes.has_op_or_higher()).unwrap_or(false);
    if chan.modes.invite_only && !is_op {
        return Err(HandlerError::AccessDenied);
    }
    let target_uid = server
        .find_uid_by_nick(&target_nick)
        .ok_or_else(|| HandlerError::NoSuchTarget(target_nick.clone()))?
        .to_string();

    let nick = nick_of(server, uid);
    server.send_line(
        &target_uid,
        format!(":{nick} INVITE {target_nick} :{chan_name}\r\n"),
    );
    let target_hostmask = server.users.get(&target_uid).map(|u| u.hostmask());
    if let Some(mask) = target_hostmask {
        if let Some(chan) = server.channel_mut(&chan_name) {
            chan.invex.push(crate::state::channel::ListEntry {
                mask,
                set_by: nick.clone(),
                set_at: crate::state::now_unix(),
            });
        }
    }
    send_numeric(
        server,
        uid,
        Response::RPL_INVITING,
        vec![nick, target_nick, chan_name],
    );
    Ok(())
}

pub fn kick(server: &mut Server, uid: &str, cmd: Command) -> HandlerResult {
    let Command::KICK(chan_name, target_nick, reason) = cmd else {
        return Ok(());
    };
    let chan = server
        .channel(&chan_name)
        .ok_or_else(|| HandlerError::NoSuchChannel(chan_name.clone()))?;
    let is_op = chan.member(uid).map(|m| m.modes.has_op_or_higher()).unwrap_or(false);
    if !is_op {
        return Err(HandlerError::AccessDenied);
    }
    let target_uid = server
        .find_uid_by_nick(&target_nick)
        .ok_or_else(|| HandlerError::NoSuchTarget(target_nick.clone()))?
        .to_string();
    if server.channel(&chan_name).unwrap().member(&target_uid).is_none() {
        return Err(HandlerError::NotOnChannel);
    }

    let nick = nick_of(server, uid);
    let reason_text = reason.unwrap_or_else(|| nick.clone());
    let line = format!(":{nick} KICK {chan_name} {target_nick} :{reason_text}\r\n");
    let members: Vec<String> = server.channel(&chan_name).unwrap().members.keys().cloned().collect();
    for member_uid in &members {
        server.send_line(member_uid, line.clone());
    }

    let now_empty = server
        .channel_mut(&chan_name)
        .map(|chan| {
            chan.members.remove(&target_uid);
            chan.is_empty()
        })
        .unwrap_or(false);
    if now_empty {
        server.remove_channel(&chan_name);
        server.hooks.notify_channel_destroy(&chan_name);
    }
    if let Some(u) = server.user_mut(&target_uid) {
        u.channels.remove(&chan_name);
    }
    Ok(())
}

fn nick_of(server: &Server, uid: &str) -> String {
    server.user(uid).map(|u| u.nick.clone()).unwrap_or_else(|| "*".to_string())
}
