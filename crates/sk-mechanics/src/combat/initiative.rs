//! Initiative order and turn advancement.
//!
//! Turn order is a pure function of the roster: initiative descending,
//! ties broken by ascending participant id. Nothing here keeps state; the
//! controller stores the order and the active id and calls in to move them.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use super::participant::{CombatParticipant, ParticipantId};

/// The result of advancing the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnChange {
    /// The participant whose turn it now is.
    pub active: ParticipantId,
    /// The round number after advancing.
    pub round: u32,
    /// True if advancing wrapped around and started a new round.
    pub new_round: bool,
}

/// Sort participants into turn order.
pub fn turn_order<'a>(
    participants: impl IntoIterator<Item = &'a CombatParticipant>,
) -> Vec<ParticipantId> {
    let mut keyed: Vec<(Reverse<i32>, ParticipantId)> = participants
        .into_iter()
        .map(|p| (Reverse(p.initiative), p.id))
        .collect();
    keyed.sort_unstable();
    keyed.into_iter().map(|(_, id)| id).collect()
}

/// Move from `active` to the next participant in `order`.
///
/// Wrapping past the end returns to the first participant and bumps the
/// round by one. With no active participant the first in order starts
/// without a new round. Returns `None` for an empty order.
pub fn advance(
    order: &[ParticipantId],
    active: Option<ParticipantId>,
    round: u32,
) -> Option<TurnChange> {
    let first = *order.first()?;
    let position = active.and_then(|id| order.iter().position(|&o| o == id));

    let Some(position) = position else {
        return Some(TurnChange {
            active: first,
            round,
            new_round: false,
        });
    };

    match order.get(position + 1) {
        Some(&next) => Some(TurnChange {
            active: next,
            round,
            new_round: false,
        }),
        None => Some(TurnChange {
            active: first,
            round: round + 1,
            new_round: true,
        }),
    }
}

/// Who takes over when `removed` leaves while it is their turn: the
/// participant after them, wrapping to the first without a new round.
///
/// `order` is the order before removal. Returns `None` if nobody is left.
pub fn successor_after_removal(
    order: &[ParticipantId],
    removed: ParticipantId,
) -> Option<ParticipantId> {
    let remaining: Vec<ParticipantId> = order
        .iter()
        .copied()
        .filter(|&id| id != removed)
        .collect();
    if remaining.is_empty() {
        return None;
    }
    let position = order.iter().position(|&id| id == removed).unwrap_or(0);
    Some(remaining[position % remaining.len()])
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::combat::ParticipantSpec;

    fn roster(initiatives: &[i32]) -> Vec<CombatParticipant> {
        initiatives
            .iter()
            .enumerate()
            .map(|(i, &init)| {
                ParticipantSpec::new(format!("P{i}"), 10)
                    .with_initiative(init)
                    .into_participant(ParticipantId(i as u32 + 1))
            })
            .collect()
    }

    fn ids(raw: &[u32]) -> Vec<ParticipantId> {
        raw.iter().map(|&n| ParticipantId(n)).collect()
    }

    #[test]
    fn order_by_initiative_descending() {
        let order = turn_order(&roster(&[15, 10, 20]));
        assert_eq!(order, ids(&[3, 1, 2]));
    }

    #[test]
    fn ties_broken_by_id() {
        let order = turn_order(&roster(&[12, 18, 12, 18]));
        assert_eq!(order, ids(&[2, 4, 1, 3]));
    }

    #[test]
    fn empty_order() {
        assert!(turn_order(&Vec::<CombatParticipant>::new()).is_empty());
        assert_eq!(advance(&[], None, 1), None);
    }

    #[test]
    fn advance_within_round() {
        let order = ids(&[3, 1, 2]);
        let change = advance(&order, Some(ParticipantId(3)), 1).unwrap();
        assert_eq!(change.active, ParticipantId(1));
        assert_eq!(change.round, 1);
        assert!(!change.new_round);
    }

    #[test]
    fn advance_wraps_to_new_round() {
        let order = ids(&[3, 1, 2]);
        let change = advance(&order, Some(ParticipantId(2)), 4).unwrap();
        assert_eq!(change.active, ParticipantId(3));
        assert_eq!(change.round, 5);
        assert!(change.new_round);
    }

    #[test]
    fn advance_without_active_starts_first() {
        let order = ids(&[3, 1]);
        let change = advance(&order, None, 2).unwrap();
        assert_eq!(change.active, ParticipantId(3));
        assert_eq!(change.round, 2);
        assert!(!change.new_round);
    }

    #[test]
    fn single_participant_wraps_every_turn() {
        let order = ids(&[7]);
        let change = advance(&order, Some(ParticipantId(7)), 1).unwrap();
        assert_eq!(change.active, ParticipantId(7));
        assert_eq!(change.round, 2);
    }

    #[test]
    fn successor_is_next_in_order() {
        let order = ids(&[3, 1, 2]);
        assert_eq!(
            successor_after_removal(&order, ParticipantId(1)),
            Some(ParticipantId(2))
        );
        assert_eq!(
            successor_after_removal(&order, ParticipantId(3)),
            Some(ParticipantId(1))
        );
    }

    #[test]
    fn successor_wraps_when_last_removed() {
        let order = ids(&[3, 1, 2]);
        assert_eq!(
            successor_after_removal(&order, ParticipantId(2)),
            Some(ParticipantId(3))
        );
    }

    #[test]
    fn successor_none_when_empty() {
        assert_eq!(successor_after_removal(&ids(&[4]), ParticipantId(4)), None);
    }

    proptest! {
        #[test]
        fn order_is_sorted_and_stable(initiatives in prop::collection::vec(-5i32..30, 0..12)) {
            let participants = roster(&initiatives);
            let order = turn_order(&participants);
            prop_assert_eq!(order.len(), participants.len());

            let init_of = |id: ParticipantId| participants[(id.0 - 1) as usize].initiative;
            for pair in order.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                prop_assert!(init_of(a) > init_of(b) || (init_of(a) == init_of(b) && a < b));
            }
            prop_assert_eq!(turn_order(&participants), order);
        }

        #[test]
        fn full_cycle_advances_one_round(count in 1u32..10, round in 1u32..50) {
            let order: Vec<ParticipantId> = (1..=count).map(ParticipantId).collect();
            let mut active = order[0];
            let mut current_round = round;
            for _ in 0..count {
                let change = advance(&order, Some(active), current_round).unwrap();
                active = change.active;
                current_round = change.round;
            }
            prop_assert_eq!(active, order[0]);
            prop_assert_eq!(current_round, round + 1);
        }
    }
}
