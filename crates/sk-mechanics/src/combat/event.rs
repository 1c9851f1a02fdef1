//! The combat log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::participant::{ParticipantId, RollPurpose};

/// Something that happened during combat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CombatEventKind {
    /// Combat began with this many participants.
    CombatStarted {
        /// Roster size at the start.
        participants: usize,
    },
    /// A participant joined mid-combat.
    Joined {
        /// The participant's initiative.
        initiative: i32,
    },
    /// A participant left combat.
    Left,
    /// A new round began.
    RoundStarted,
    /// A participant's turn began.
    TurnStarted,
    /// Damage was applied.
    Damaged {
        /// Amount of damage.
        amount: i32,
        /// Hit points afterwards.
        hp: i32,
    },
    /// Healing was applied.
    Healed {
        /// Amount of healing.
        amount: i32,
        /// Hit points afterwards.
        hp: i32,
    },
    /// A condition was added.
    ConditionAdded {
        /// The condition label.
        condition: String,
    },
    /// A condition was removed.
    ConditionRemoved {
        /// The condition label.
        condition: String,
    },
    /// A roll was made and recorded.
    Rolled {
        /// What the roll was for.
        purpose: RollPurpose,
        /// The roll's total.
        total: i32,
    },
    /// Initiative was changed by the caller.
    InitiativeSet {
        /// The new initiative.
        initiative: i32,
    },
}

impl std::fmt::Display for CombatEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CombatStarted { participants } => {
                write!(f, "combat started with {participants} participants")
            }
            Self::Joined { initiative } => write!(f, "joined at initiative {initiative}"),
            Self::Left => write!(f, "left combat"),
            Self::RoundStarted => write!(f, "round started"),
            Self::TurnStarted => write!(f, "turn started"),
            Self::Damaged { amount, hp } => write!(f, "took {amount} damage ({hp} HP left)"),
            Self::Healed { amount, hp } => write!(f, "healed {amount} ({hp} HP)"),
            Self::ConditionAdded { condition } => write!(f, "is now {condition}"),
            Self::ConditionRemoved { condition } => write!(f, "is no longer {condition}"),
            Self::Rolled { purpose, total } => write!(f, "rolled {purpose}: {total}"),
            Self::InitiativeSet { initiative } => write!(f, "initiative set to {initiative}"),
        }
    }
}

/// A recorded combat event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatEvent {
    /// Which round this happened in.
    pub round: u32,
    /// The participant the event is about, if any.
    pub actor: Option<ParticipantId>,
    /// What happened.
    pub kind: CombatEventKind,
    /// When it was recorded.
    pub at: DateTime<Utc>,
}

impl std::fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.actor {
            Some(actor) => write!(f, "[round {}] {actor} {}", self.round, self.kind),
            None => write!(f, "[round {}] {}", self.round, self.kind),
        }
    }
}

/// An append-only event log with an optional size cap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatLog {
    events: Vec<CombatEvent>,
    max_events: usize,
}

impl CombatLog {
    /// Create a log keeping at most `max_events` entries (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event stamped with the current time, dropping the oldest
    /// entry if the log is full.
    pub fn record(&mut self, round: u32, actor: Option<ParticipantId>, kind: CombatEventKind) {
        if self.max_events > 0 && self.events.len() >= self.max_events {
            self.events.remove(0);
        }
        self.events.push(CombatEvent {
            round,
            actor,
            kind,
            at: Utc::now(),
        });
    }

    /// All events, oldest first.
    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    /// Events about one participant.
    pub fn for_actor(&self, actor: ParticipantId) -> impl Iterator<Item = &CombatEvent> {
        self.events.iter().filter(move |e| e.actor == Some(actor))
    }

    /// Number of events held.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_filter() {
        let mut log = CombatLog::new(0);
        assert!(log.is_empty());
        log.record(1, None, CombatEventKind::CombatStarted { participants: 2 });
        log.record(1, Some(ParticipantId(1)), CombatEventKind::TurnStarted);
        log.record(1, Some(ParticipantId(2)), CombatEventKind::Left);
        assert_eq!(log.len(), 3);
        assert_eq!(log.for_actor(ParticipantId(1)).count(), 1);
    }

    #[test]
    fn cap_drops_oldest() {
        let mut log = CombatLog::new(2);
        log.record(1, None, CombatEventKind::RoundStarted);
        log.record(2, None, CombatEventKind::RoundStarted);
        log.record(3, None, CombatEventKind::RoundStarted);
        let rounds: Vec<u32> = log.events().iter().map(|e| e.round).collect();
        assert_eq!(rounds, vec![2, 3]);
    }

    #[test]
    fn display() {
        let mut log = CombatLog::new(0);
        log.record(
            2,
            Some(ParticipantId(1)),
            CombatEventKind::Damaged { amount: 7, hp: 3 },
        );
        log.record(2, None, CombatEventKind::RoundStarted);
        assert_eq!(
            log.events()[0].to_string(),
            "[round 2] #1 took 7 damage (3 HP left)"
        );
        assert_eq!(log.events()[1].to_string(), "[round 2] round started");
    }

    #[test]
    fn kind_display() {
        let kind = CombatEventKind::ConditionAdded {
            condition: "prone".to_string(),
        };
        assert_eq!(kind.to_string(), "is now prone");
        let kind = CombatEventKind::Rolled {
            purpose: RollPurpose::Initiative,
            total: 14,
        };
        assert_eq!(kind.to_string(), "rolled initiative: 14");
    }
}
