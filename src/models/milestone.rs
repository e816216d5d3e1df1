//! One-shot trial milestones and their emitted flags

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Time-boundary crossings that fire exactly once per trial record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Milestone {
    /// 24 hours or less remain
    HoursLeft24,
    /// The window has closed
    Expired,
}

impl Milestone {
    pub const ALL: [Milestone; 2] = [Milestone::HoursLeft24, Milestone::Expired];

    /// Key used in the persisted milestone set
    pub fn key(&self) -> &'static str {
        match self {
            Milestone::HoursLeft24 => "24h_left",
            Milestone::Expired => "expired",
        }
    }
}

/// Persisted map of milestone key to "already emitted"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MilestoneSet {
    flags: BTreeMap<String, bool>,
}

impl MilestoneSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_emitted(&self, milestone: Milestone) -> bool {
        self.flags.get(milestone.key()).copied().unwrap_or(false)
    }

    /// Set the flag. Returns `true` if it was not set before.
    pub fn mark(&mut self, milestone: Milestone) -> bool {
        let was_set = self.is_emitted(milestone);
        self.flags.insert(milestone.key().to_string(), true);
        !was_set
    }

    /// Flag everything `other` has flagged
    pub fn merge(&mut self, other: &MilestoneSet) {
        for milestone in other.emitted() {
            self.mark(milestone);
        }
    }

    /// Milestones currently flagged as emitted
    pub fn emitted(&self) -> Vec<Milestone> {
        Milestone::ALL
            .into_iter()
            .filter(|m| self.is_emitted(*m))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_is_one_shot() {
        let mut set = MilestoneSet::new();
        assert!(!set.is_emitted(Milestone::HoursLeft24));

        assert!(set.mark(Milestone::HoursLeft24));
        assert!(!set.mark(Milestone::HoursLeft24));

        assert!(set.is_emitted(Milestone::HoursLeft24));
        assert!(!set.is_emitted(Milestone::Expired));
        assert_eq!(set.emitted(), vec![Milestone::HoursLeft24]);
    }

    #[test]
    fn test_merge_is_a_union() {
        let mut persisted = MilestoneSet::new();
        persisted.mark(Milestone::Expired);

        let mut session = MilestoneSet::new();
        session.mark(Milestone::HoursLeft24);

        persisted.merge(&session);
        assert_eq!(persisted.emitted(), vec![Milestone::HoursLeft24, Milestone::Expired]);

        persisted.merge(&MilestoneSet::new());
        assert_eq!(persisted.emitted().len(), 2);
    }

    #[test]
    fn test_persisted_shape() {
        let mut set = MilestoneSet::new();
        set.mark(Milestone::Expired);

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"expired":true}"#);

        let parsed: MilestoneSet = serde_json::from_str(r#"{"24h_left":true,"expired":false}"#).unwrap();
        assert!(parsed.is_emitted(Milestone::HoursLeft24));
        assert!(!parsed.is_emitted(Milestone::Expired));
    }
}
