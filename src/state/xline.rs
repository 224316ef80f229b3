//! X-line (ban) store.
//!
//! Grounded in the teacher's `handlers/bans/xlines.rs` K/G/Z/Q/E-line
//! handlers, generalized away from their SQLite-backed persistence: this
//! store is in-memory only (spec.md §5's explicit non-goal), so adding
//! and removing a line is synchronous and infallible.

use corvid_proto::matches_hostmask;

/// Which X-line kind a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XlineKind {
    /// K-line: local ban on `user@host`.
    K,
    /// G-line: network-wide ban on `user@host`.
    G,
    /// Z-line: ban on raw IP, checked before DNS/ident resolves.
    Z,
    /// Q-line: reserved/forbidden nickname pattern.
    Q,
    /// E-line: exemption, overrides K/G/Z for a matching mask.
    E,
}

impl XlineKind {
    pub fn letter(self) -> char {
        match self {
            XlineKind::K => 'K',
            XlineKind::G => 'G',
            XlineKind::Z => 'Z',
            XlineKind::Q => 'Q',
            XlineKind::E => 'E',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'K' => Some(XlineKind::K),
            'G' => Some(XlineKind::G),
            'Z' => Some(XlineKind::Z),
            'Q' => Some(XlineKind::Q),
            'E' => Some(XlineKind::E),
            _ => None,
        }
    }
}

/// A single access-control line.
#[derive(Debug, Clone)]
pub struct XLine {
    pub kind: XlineKind,
    pub mask: String,
    pub reason: String,
    pub set_by: String,
    pub set_at: i64,
    /// `None` means permanent; `Some(t)` is a unix timestamp.
    pub expires_at: Option<i64>,
}

impl XLine {
    pub fn is_expired(&self, now: i64) -> bool {
        matches!(self.expires_at, Some(t) if t <= now)
    }
}

/// The lines tracked for a single X-line kind: a permanent list plus a
/// temporary vector kept sorted ascending by `expires_at`, per spec.md
/// §3.1/§4.6's "permanent list and a duration-sorted vector of temporary
/// entries keyed by `set_time + duration`" model. Sorted order turns
/// expiry sweeping into a pop-from-front instead of a full scan, and
/// satisfies spec.md §8.1's ordering invariant directly (it can't not
/// hold, since every insertion preserves it).
#[derive(Debug, Default)]
struct KindLines {
    permanent: Vec<XLine>,
    temporary: Vec<XLine>,
}

impl KindLines {
    /// Insert `line`, replacing any existing line with the same mask.
    fn insert(&mut self, line: XLine) {
        self.remove(&line.mask);
        match line.expires_at {
            None => self.permanent.push(line),
            Some(expiry) => {
                let pos = self.temporary.partition_point(|l| l.expires_at.unwrap() <= expiry);
                self.temporary.insert(pos, line);
            }
        }
    }

    fn remove(&mut self, mask: &str) -> bool {
        let before = self.permanent.len() + self.temporary.len();
        self.permanent.retain(|l| l.mask != mask);
        self.temporary.retain(|l| l.mask != mask);
        self.permanent.len() + self.temporary.len() != before
    }

    /// Pop every entry whose expiry has passed off the front of the
    /// sorted temporary vector.
    fn sweep_expired(&mut self, now: i64) -> Vec<XLine> {
        let split = self.temporary.partition_point(|l| l.is_expired(now));
        self.temporary.drain(..split).collect()
    }

    fn iter(&self) -> impl Iterator<Item = &XLine> {
        self.permanent.iter().chain(self.temporary.iter())
    }

    fn len(&self) -> usize {
        self.permanent.len() + self.temporary.len()
    }
}

/// All active X-lines, one permanent-list-plus-sorted-temporary-vector
/// pair per kind.
#[derive(Debug, Default)]
pub struct XlineStore {
    k: KindLines,
    g: KindLines,
    z: KindLines,
    q: KindLines,
    e: KindLines,
}

impl XlineStore {
    pub fn new() -> Self {
        XlineStore::default()
    }

    fn kind_lines(&self, kind: XlineKind) -> &KindLines {
        match kind {
            XlineKind::K => &self.k,
            XlineKind::G => &self.g,
            XlineKind::Z => &self.z,
            XlineKind::Q => &self.q,
            XlineKind::E => &self.e,
        }
    }

    fn kind_lines_mut(&mut self, kind: XlineKind) -> &mut KindLines {
        match kind {
            XlineKind::K => &mut self.k,
            XlineKind::G => &mut self.g,
            XlineKind::Z => &mut self.z,
            XlineKind::Q => &mut self.q,
            XlineKind::E => &mut self.e,
        }
    }

    /// Add a line, replacing any existing line of the same kind and mask.
    pub fn add(&mut self, line: XLine) {
        self.kind_lines_mut(line.kind).insert(line);
    }

    /// Remove a line by kind and mask; returns true if one was removed.
    pub fn remove(&mut self, kind: XlineKind, mask: &str) -> bool {
        self.kind_lines_mut(kind).remove(mask)
    }

    /// Drop every line of every kind whose `expires_at` has passed.
    pub fn sweep_expired(&mut self, now: i64) -> Vec<XLine> {
        [XlineKind::K, XlineKind::G, XlineKind::Z, XlineKind::Q, XlineKind::E]
            .into_iter()
            .flat_map(|kind| self.kind_lines_mut(kind).sweep_expired(now))
            .collect()
    }

    /// Find the first non-expired line of `kind` whose mask matches
    /// `subject` (a `user@host`, raw IP, or nickname depending on kind),
    /// skipping any mask also covered by an E-line exemption.
    pub fn find_matching(&self, kind: XlineKind, subject: &str, now: i64) -> Option<&XLine> {
        if self
            .kind_lines(XlineKind::E)
            .iter()
            .any(|l| !l.is_expired(now) && matches_hostmask(&l.mask, subject))
        {
            return None;
        }
        self.kind_lines(kind)
            .iter()
            .filter(|l| !l.is_expired(now))
            .find(|l| matches_hostmask(&l.mask, subject))
    }

    pub fn list(&self, kind: XlineKind) -> impl Iterator<Item = &XLine> {
        self.kind_lines(kind).iter()
    }

    pub fn len(&self) -> usize {
        [XlineKind::K, XlineKind::G, XlineKind::Z, XlineKind::Q, XlineKind::E]
            .into_iter()
            .map(|kind| self.kind_lines(kind).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(kind: XlineKind, mask: &str, expires_at: Option<i64>) -> XLine {
        XLine {
            kind,
            mask: mask.to_string(),
            reason: "test".to_string(),
            set_by: "oper".to_string(),
            set_at: 0,
            expires_at,
        }
    }

    #[test]
    fn add_and_match() {
        let mut store = XlineStore::new();
        store.add(line(XlineKind::K, "*@evil.example.org", None));
        let found = store.find_matching(XlineKind::K, "guy@evil.example.org", 100);
        assert!(found.is_some());
        assert!(store
            .find_matching(XlineKind::K, "guy@good.example.org", 100)
            .is_none());
    }

    #[test]
    fn exemption_overrides_kline() {
        let mut store = XlineStore::new();
        store.add(line(XlineKind::K, "*@evil.example.org", None));
        store.add(line(XlineKind::E, "*@evil.example.org", None));
        assert!(store
            .find_matching(XlineKind::K, "guy@evil.example.org", 100)
            .is_none());
    }

    #[test]
    fn expired_lines_do_not_match() {
        let mut store = XlineStore::new();
        store.add(line(XlineKind::G, "*@evil.example.org", Some(50)));
        assert!(store
            .find_matching(XlineKind::G, "guy@evil.example.org", 100)
            .is_none());
    }

    #[test]
    fn sweep_removes_only_expired() {
        let mut store = XlineStore::new();
        store.add(line(XlineKind::Z, "1.2.3.4", Some(50)));
        store.add(line(XlineKind::Z, "5.6.7.8", None));
        let swept = store.sweep_expired(100);
        assert_eq!(swept.len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn temporary_lines_stay_sorted_ascending_by_expiry() {
        let mut store = XlineStore::new();
        store.add(line(XlineKind::K, "*@c.example.org", Some(300)));
        store.add(line(XlineKind::K, "*@a.example.org", Some(100)));
        store.add(line(XlineKind::K, "*@b.example.org", Some(200)));

        let expiries: Vec<i64> = store
            .list(XlineKind::K)
            .map(|l| l.expires_at.unwrap())
            .collect();
        assert_eq!(expiries, vec![100, 200, 300]);
        assert!(expiries.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn sweep_pops_only_expired_prefix_of_sorted_temporaries() {
        let mut store = XlineStore::new();
        store.add(line(XlineKind::K, "*@a.example.org", Some(50)));
        store.add(line(XlineKind::K, "*@b.example.org", Some(75)));
        store.add(line(XlineKind::K, "*@c.example.org", Some(150)));

        let swept = store.sweep_expired(100);
        assert_eq!(swept.len(), 2);
        let remaining: Vec<&str> = store.list(XlineKind::K).map(|l| l.mask.as_str()).collect();
        assert_eq!(remaining, vec!["*@c.example.org"]);
    }

    #[test]
    fn re_adding_same_mask_replaces() {
        let mut store = XlineStore::new();
        store.add(line(XlineKind::Q, "badnick", None));
        store.add(line(XlineKind::Q, "badnick", Some(50)));
        assert_eq!(store.list(XlineKind::Q).count(), 1);
    }

    #[test]
    fn remove_reports_whether_anything_was_removed() {
        let mut store = XlineStore::new();
        store.add(line(XlineKind::K, "*@evil.example.org", None));
        assert!(store.remove(XlineKind::K, "*@evil.example.org"));
        assert!(!store.remove(XlineKind::K, "*@evil.example.org"));
    }
}
