//! The extension hook surface.
//!
//! Grounded in the teacher's `state/observer.rs::StateObserver`: a
//! single-slot trait of `on_*` methods invoked after state already
//! changed. spec.md §6 widens this to an ordered multi-slot registry so
//! more than one extension can see the same event, and lets the
//! highest-priority hook veto a mutation before it happens rather than
//! only observe it afterward.

use std::sync::Arc;

use super::channel::Channel;
use super::user::User;
use super::xline::XLine;

/// What a veto-capable hook decided about a proposed mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookDecision {
    /// Let the mutation proceed; give later hooks a chance to veto too.
    Allow,
    /// Block the mutation outright; no further hooks are consulted.
    Deny,
    /// This hook has no opinion; defer to the next one in priority order.
    PassThrough,
}

/// Extension points a hook may implement.
///
/// Every method has a default no-op/advisory body, so a hook only needs
/// to override the events it cares about. Veto hooks (`before_*`) return
/// a `HookDecision`; the rest are advisory notifications fired after the
/// fact and cannot affect the outcome.
pub trait Hook: Send + Sync {
    /// A human-readable name, used in tracing spans and `STATS H`.
    fn name(&self) -> &'static str;

    fn before_join(&self, _user: &User, _channel: &str) -> HookDecision {
        HookDecision::PassThrough
    }

    fn before_nick_change(&self, _user: &User, _new_nick: &str) -> HookDecision {
        HookDecision::PassThrough
    }

    fn after_user_update(&self, _user: &User) {}

    fn after_user_quit(&self, _user: &User, _reason: &str) {}

    fn after_channel_update(&self, _channel: &Channel) {}

    fn after_channel_destroy(&self, _name: &str) {}

    fn after_xline_add(&self, _line: &XLine) {}

    fn after_xline_remove(&self, _kind: char, _mask: &str) {}
}

/// An ordered collection of hooks, consulted in ascending priority order
/// (lower numbers run first). Registration sorts eagerly so dispatch
/// never needs to re-sort on the hot path.
#[derive(Default)]
pub struct HookRegistry {
    hooks: Vec<(i32, Arc<dyn Hook>)>,
}

impl HookRegistry {
    pub fn new() -> Self {
        HookRegistry { hooks: Vec::new() }
    }

    /// Register a hook at the given priority. Lower priorities are
    /// consulted first; ties keep insertion order (stable sort).
    pub fn register(&mut self, priority: i32, hook: Arc<dyn Hook>) {
        self.hooks.push((priority, hook));
        self.hooks.sort_by_key(|(p, _)| *p);
    }

    /// Ask every hook in priority order whether `user` may join
    /// `channel`. The first `Deny` short-circuits; if every hook either
    /// passes through or allows, the join proceeds.
    pub fn check_before_join(&self, user: &User, channel: &str) -> HookDecision {
        for (_, hook) in &self.hooks {
            match hook.before_join(user, channel) {
                HookDecision::Deny => return HookDecision::Deny,
                HookDecision::Allow | HookDecision::PassThrough => continue,
            }
        }
        HookDecision::Allow
    }

    pub fn check_before_nick_change(&self, user: &User, new_nick: &str) -> HookDecision {
        for (_, hook) in &self.hooks {
            match hook.before_nick_change(user, new_nick) {
                HookDecision::Deny => return HookDecision::Deny,
                HookDecision::Allow | HookDecision::PassThrough => continue,
            }
        }
        HookDecision::Allow
    }

    pub fn notify_user_update(&self, user: &User) {
        for (_, hook) in &self.hooks {
            hook.after_user_update(user);
        }
    }

    pub fn notify_user_quit(&self, user: &User, reason: &str) {
        for (_, hook) in &self.hooks {
            hook.after_user_quit(user, reason);
        }
    }

    pub fn notify_channel_update(&self, channel: &Channel) {
        for (_, hook) in &self.hooks {
            hook.after_channel_update(channel);
        }
    }

    pub fn notify_channel_destroy(&self, name: &str) {
        for (_, hook) in &self.hooks {
            hook.after_channel_destroy(name);
        }
    }

    pub fn notify_xline_add(&self, line: &XLine) {
        for (_, hook) in &self.hooks {
            hook.after_xline_add(line);
        }
    }

    pub fn notify_xline_remove(&self, kind: char, mask: &str) {
        for (_, hook) in &self.hooks {
            hook.after_xline_remove(kind, mask);
        }
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct DenyAll;
    impl Hook for DenyAll {
        fn name(&self) -> &'static str {
            "deny-all"
        }
        fn before_join(&self, _user: &User, _channel: &str) -> HookDecision {
            HookDecision::Deny
        }
    }

    struct PassThroughHook;
    impl Hook for PassThroughHook {
        fn name(&self) -> &'static str {
            "passthrough"
        }
    }

    struct RecordingHook(Arc<AtomicBool>);
    impl Hook for RecordingHook {
        fn name(&self) -> &'static str {
            "recording"
        }
        fn after_user_quit(&self, _user: &User, _reason: &str) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    fn sample_user() -> User {
        User::new(
            "u1".into(),
            "host.example.org".into(),
            "127.0.0.1".parse().unwrap(),
            0,
        )
    }

    #[test]
    fn no_hooks_allows_everything() {
        let registry = HookRegistry::new();
        let user = sample_user();
        assert_eq!(
            registry.check_before_join(&user, "#test"),
            HookDecision::Allow
        );
    }

    #[test]
    fn deny_short_circuits() {
        let mut registry = HookRegistry::new();
        registry.register(10, Arc::new(PassThroughHook));
        registry.register(5, Arc::new(DenyAll));
        let user = sample_user();
        assert_eq!(
            registry.check_before_join(&user, "#test"),
            HookDecision::Deny
        );
    }

    #[test]
    fn priority_order_is_ascending() {
        let mut registry = HookRegistry::new();
        registry.register(10, Arc::new(DenyAll));
        registry.register(1, Arc::new(PassThroughHook));
        assert_eq!(registry.hooks[0].1.name(), "passthrough");
        assert_eq!(registry.hooks[1].1.name(), "deny-all");
    }

    #[test]
    fn advisory_hooks_all_fire() {
        let mut registry = HookRegistry::new();
        let fired = Arc::new(AtomicBool::new(false));
        registry.register(0, Arc::new(RecordingHook(fired.clone())));
        registry.notify_user_quit(&sample_user(), "bye");
        assert!(fired.load(Ordering::SeqCst));
    }
}
