//! Combat state machine and participant management.
//!
//! A [`CombatController`] is either idle or running a single combat
//! session. The session owns the participants (keyed by id), the cached
//! turn order, the round counter, the active participant, and a log of
//! combat events. Every operation validates before it mutates, so a
//! rejected call leaves the session untouched.

pub mod event;
pub mod initiative;
pub mod participant;

pub use event::{CombatEvent, CombatEventKind, CombatLog};
pub use initiative::TurnChange;
pub use participant::{CombatParticipant, LastRoll, ParticipantId, ParticipantSpec, RollPurpose};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::abilities::Ability;
use crate::attack::{self, AttackResolution, table};
use crate::conditions;
use crate::config::CombatConfig;
use crate::dice::{DiceEngine, DiceSource, Die};
use crate::error::{CombatError, CombatResult};

/// Whether a combat is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatStatus {
    /// No combat session exists.
    Idle,
    /// A combat session is running.
    InCombat,
}

impl CombatStatus {
    fn describe(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::InCombat => "in combat",
        }
    }
}

impl std::fmt::Display for CombatStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// A read-only snapshot of the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatState {
    /// Idle or in combat.
    pub status: CombatStatus,
    /// Id of the running session, if any.
    pub session_id: Option<Uuid>,
    /// Current round (0 when idle).
    pub round: u32,
    /// The participant whose turn it is.
    pub active: Option<ParticipantId>,
    /// Participants in turn order.
    pub participants: Vec<CombatParticipant>,
    /// Combat log, oldest first.
    pub log: Vec<CombatEvent>,
}

impl CombatState {
    fn idle() -> Self {
        Self {
            status: CombatStatus::Idle,
            session_id: None,
            round: 0,
            active: None,
            participants: Vec::new(),
            log: Vec::new(),
        }
    }

    /// Look up a participant by id.
    pub fn participant(&self, id: ParticipantId) -> Option<&CombatParticipant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// The participant whose turn it is.
    pub fn active_participant(&self) -> Option<&CombatParticipant> {
        self.active.and_then(|id| self.participant(id))
    }

    /// True if it is this participant's turn.
    pub fn is_active(&self, id: ParticipantId) -> bool {
        self.active == Some(id)
    }

    /// Participant ids in turn order.
    pub fn turn_order(&self) -> Vec<ParticipantId> {
        self.participants.iter().map(|p| p.id).collect()
    }
}

#[derive(Debug)]
struct Session {
    id: Uuid,
    participants: BTreeMap<ParticipantId, CombatParticipant>,
    order: Vec<ParticipantId>,
    active: Option<ParticipantId>,
    round: u32,
    next_id: u32,
    log: CombatLog,
}

impl Session {
    fn get(&self, id: ParticipantId) -> CombatResult<&CombatParticipant> {
        self.participants.get(&id).ok_or(CombatError::NotFound(id))
    }

    fn get_mut(&mut self, id: ParticipantId) -> CombatResult<&mut CombatParticipant> {
        self.participants
            .get_mut(&id)
            .ok_or(CombatError::NotFound(id))
    }

    fn reorder(&mut self) {
        self.order = initiative::turn_order(self.participants.values());
    }

    fn insert(&mut self, participant: CombatParticipant) {
        self.participants.insert(participant.id, participant);
    }

    fn allocate_id(&mut self) -> ParticipantId {
        self.next_id += 1;
        ParticipantId(self.next_id)
    }

    fn record(&mut self, actor: Option<ParticipantId>, kind: CombatEventKind) {
        self.log.record(self.round, actor, kind);
    }
}

fn running<'a>(
    session: &'a mut Option<Session>,
    operation: &'static str,
) -> CombatResult<&'a mut Session> {
    session.as_mut().ok_or(CombatError::InvalidState {
        operation,
        state: CombatStatus::Idle.describe(),
    })
}

fn running_ref<'a>(
    session: &'a Option<Session>,
    operation: &'static str,
) -> CombatResult<&'a Session> {
    session.as_ref().ok_or(CombatError::InvalidState {
        operation,
        state: CombatStatus::Idle.describe(),
    })
}

fn check_amount(amount: i32) -> CombatResult<()> {
    if amount <= 0 {
        return Err(CombatError::InvalidAmount(amount));
    }
    Ok(())
}

/// Runs combat: owns the session, the dice, and every state change.
#[derive(Debug)]
pub struct CombatController {
    config: CombatConfig,
    dice: DiceEngine,
    session: Option<Session>,
}

impl CombatController {
    /// Create an idle controller with dice seeded from `config.seed`.
    pub fn new(config: CombatConfig) -> Self {
        let dice = DiceEngine::seeded(config.seed);
        Self {
            config,
            dice,
            session: None,
        }
    }

    /// Create an idle controller rolling from the given source.
    pub fn with_source(config: CombatConfig, source: impl DiceSource + 'static) -> Self {
        Self {
            config,
            dice: DiceEngine::new(source),
            session: None,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Idle or in combat.
    pub fn status(&self) -> CombatStatus {
        if self.session.is_some() {
            CombatStatus::InCombat
        } else {
            CombatStatus::Idle
        }
    }

    /// True while a combat session is running.
    pub fn is_in_combat(&self) -> bool {
        self.session.is_some()
    }

    /// Start a new combat with the given participants.
    ///
    /// Participants without a fixed initiative roll d20 + DEX. The first
    /// in turn order becomes active and the round is set to 1. Returns the
    /// active participant, or `None` for an empty roster.
    pub fn start_combat(
        &mut self,
        participants: Vec<ParticipantSpec>,
    ) -> CombatResult<Option<ParticipantId>> {
        if self.session.is_some() {
            return Err(CombatError::InvalidState {
                operation: "start combat",
                state: CombatStatus::InCombat.describe(),
            });
        }
        for spec in &participants {
            spec.validate()?;
        }

        let mut session = Session {
            id: Uuid::new_v4(),
            participants: BTreeMap::new(),
            order: Vec::new(),
            active: None,
            round: 1,
            next_id: 0,
            log: CombatLog::new(self.config.max_log_events),
        };

        let count = participants.len();
        for spec in participants {
            let id = session.allocate_id();
            let participant = self.build_participant(spec, id);
            session.insert(participant);
        }
        session.reorder();
        session.active = session.order.first().copied();

        tracing::info!(session = %session.id, participants = count, "combat started");
        session.record(None, CombatEventKind::CombatStarted { participants: count });
        if let Some(active) = session.active {
            session.record(Some(active), CombatEventKind::TurnStarted);
        }

        let active = session.active;
        self.session = Some(session);
        Ok(active)
    }

    /// End the current combat and discard the session.
    ///
    /// Returns the final state, or `None` if the controller was already idle.
    pub fn end_combat(&mut self) -> Option<CombatState> {
        let final_state = self.get_state();
        let session = self.session.take()?;
        tracing::info!(session = %session.id, rounds = session.round, "combat ended");
        Some(final_state)
    }

    /// Add a participant to the running combat.
    ///
    /// The newcomer is slotted into turn order by initiative without
    /// changing whose turn it is, unless nobody was active yet.
    pub fn add_participant(&mut self, spec: ParticipantSpec) -> CombatResult<ParticipantId> {
        running_ref(&self.session, "add a participant")?;
        spec.validate()?;

        let initiative = self.initiative_for(&spec);
        let session = running(&mut self.session, "add a participant")?;
        let id = session.allocate_id();
        let participant = ParticipantSpec {
            initiative: Some(initiative),
            ..spec
        }
        .into_participant(id);

        tracing::info!(%id, name = %participant.name, initiative, "participant joined");
        session.insert(participant);
        session.reorder();
        session.record(Some(id), CombatEventKind::Joined { initiative });
        if session.active.is_none() {
            session.active = Some(id);
            session.record(Some(id), CombatEventKind::TurnStarted);
        }
        Ok(id)
    }

    /// Remove a participant from the running combat.
    ///
    /// If it was their turn, the next participant in order takes over
    /// without advancing the round.
    pub fn remove_participant(&mut self, id: ParticipantId) -> CombatResult<CombatParticipant> {
        let session = running(&mut self.session, "remove a participant")?;
        session.get(id)?;

        let successor = if session.active == Some(id) {
            initiative::successor_after_removal(&session.order, id)
        } else {
            session.active
        };

        session.record(Some(id), CombatEventKind::Left);
        let removed = session
            .participants
            .remove(&id)
            .ok_or(CombatError::NotFound(id))?;
        session.reorder();

        if session.active != successor {
            session.active = successor;
            if let Some(next) = successor {
                session.record(Some(next), CombatEventKind::TurnStarted);
            }
        }

        tracing::info!(%id, name = %removed.name, "participant left");
        Ok(removed)
    }

    /// Advance to the next participant's turn.
    pub fn next_turn(&mut self) -> CombatResult<TurnChange> {
        let session = running(&mut self.session, "advance the turn")?;
        let change = initiative::advance(&session.order, session.active, session.round)
            .ok_or(CombatError::NoActiveParticipant)?;

        session.active = Some(change.active);
        session.round = change.round;
        if change.new_round {
            tracing::info!(round = change.round, "new round");
            session.record(None, CombatEventKind::RoundStarted);
        }
        session.record(Some(change.active), CombatEventKind::TurnStarted);
        tracing::debug!(active = %change.active, round = change.round, "turn advanced");
        Ok(change)
    }

    /// Reduce a participant's hit points, stopping at zero. Returns the new
    /// hit points.
    pub fn apply_damage(&mut self, id: ParticipantId, amount: i32) -> CombatResult<i32> {
        let session = running(&mut self.session, "apply damage")?;
        check_amount(amount)?;
        let participant = session.get_mut(id)?;

        let hp = participant.adjust_hp(-amount);
        tracing::debug!(%id, amount, hp, "damage applied");
        session.record(Some(id), CombatEventKind::Damaged { amount, hp });
        Ok(hp)
    }

    /// Restore a participant's hit points, stopping at their maximum.
    /// Returns the new hit points.
    pub fn apply_healing(&mut self, id: ParticipantId, amount: i32) -> CombatResult<i32> {
        let session = running(&mut self.session, "apply healing")?;
        check_amount(amount)?;
        let participant = session.get_mut(id)?;

        let hp = participant.adjust_hp(amount);
        tracing::debug!(%id, amount, hp, "healing applied");
        session.record(Some(id), CombatEventKind::Healed { amount, hp });
        Ok(hp)
    }

    /// Add a condition label. Returns false if it was already present.
    pub fn add_condition(&mut self, id: ParticipantId, name: &str) -> CombatResult<bool> {
        let session = running(&mut self.session, "add a condition")?;
        let participant = session.get_mut(id)?;

        let added = conditions::add_condition(participant, name);
        if added {
            session.record(
                Some(id),
                CombatEventKind::ConditionAdded {
                    condition: name.to_string(),
                },
            );
        }
        Ok(added)
    }

    /// Remove a condition label. Returns false if it was not present.
    pub fn remove_condition(&mut self, id: ParticipantId, name: &str) -> CombatResult<bool> {
        let session = running(&mut self.session, "remove a condition")?;
        let participant = session.get_mut(id)?;

        let removed = conditions::remove_condition(participant, name);
        if removed {
            session.record(
                Some(id),
                CombatEventKind::ConditionRemoved {
                    condition: name.to_string(),
                },
            );
        }
        Ok(removed)
    }

    /// Override a participant's initiative and re-sort turn order. Whose
    /// turn it is does not change.
    pub fn set_initiative(&mut self, id: ParticipantId, initiative: i32) -> CombatResult<()> {
        let session = running(&mut self.session, "set initiative")?;
        session.get_mut(id)?.initiative = initiative;
        session.reorder();
        session.record(Some(id), CombatEventKind::InitiativeSet { initiative });
        Ok(())
    }

    /// Make a roll for a participant and store it as their last roll.
    ///
    /// Attack rolls use the equipped weapon (unarmed if none) and also
    /// roll damage unless the die shows a natural 1. Initiative rolls are
    /// recorded only; use [`set_initiative`](Self::set_initiative) to apply
    /// one.
    pub fn roll_for_participant(
        &mut self,
        id: ParticipantId,
        purpose: RollPurpose,
    ) -> CombatResult<LastRoll> {
        let selection = self.config.ability_selection;
        let session = running(&mut self.session, "roll")?;
        let participant = session.get(id)?;
        let armament = table::lookup(
            participant
                .equipped_weapon
                .as_deref()
                .unwrap_or(table::UNARMED),
        )?;
        let dice = &mut self.dice;

        let roll = match purpose {
            RollPurpose::Attack => {
                let attack = attack::compute_attack_roll(dice, participant, armament, selection)?;
                let damage = (!attack.fumble).then(|| {
                    attack::compute_damage_roll(
                        dice,
                        participant,
                        armament,
                        selection,
                        attack.critical,
                    )
                });
                LastRoll {
                    critical: attack.critical,
                    damage,
                    ..LastRoll::from_check(purpose, &attack.check)
                }
            }
            RollPurpose::Save { ability } => {
                let check = dice.roll_check(Die::D20.sides(), participant.modifier(ability), 0)?;
                LastRoll::from_check(purpose, &check)
            }
            RollPurpose::Damage { critical } => LastRoll::from_damage(attack::compute_damage_roll(
                dice,
                participant,
                armament,
                selection,
                critical,
            )),
            RollPurpose::Initiative => {
                let modifier = participant.modifier(Ability::Dexterity);
                let check = dice.roll_check(Die::D20.sides(), modifier, 0)?;
                LastRoll::from_check(purpose, &check)
            }
        };

        tracing::debug!(%id, %purpose, total = roll.total, "roll recorded");
        session.get_mut(id)?.last_roll = Some(roll.clone());
        session.record(
            Some(id),
            CombatEventKind::Rolled {
                purpose,
                total: roll.total,
            },
        );
        Ok(roll)
    }

    /// Roll an attack from `attacker` against `target` without changing
    /// any state. Apply the damage afterwards with
    /// [`apply_damage`](Self::apply_damage).
    ///
    /// `armament` defaults to the attacker's equipped weapon, then to an
    /// unarmed strike.
    pub fn resolve_attack(
        &mut self,
        attacker: ParticipantId,
        target: ParticipantId,
        armament: Option<&str>,
    ) -> CombatResult<AttackResolution> {
        let selection = self.config.ability_selection;
        let session = running_ref(&self.session, "resolve an attack")?;
        let attacker = session.get(attacker)?;
        let target = session.get(target)?;
        let armament = table::lookup(
            armament
                .or(attacker.equipped_weapon.as_deref())
                .unwrap_or(table::UNARMED),
        )?;

        attack::resolve_attack(&mut self.dice, attacker, target, armament, selection)
    }

    /// Look up a participant in the running combat.
    pub fn participant(&self, id: ParticipantId) -> CombatResult<&CombatParticipant> {
        running_ref(&self.session, "look up a participant")?.get(id)
    }

    /// The participant whose turn it is.
    pub fn active_participant(&self) -> Option<&CombatParticipant> {
        let session = self.session.as_ref()?;
        session.active.and_then(|id| session.participants.get(&id))
    }

    /// Current round, or `None` when idle.
    pub fn round(&self) -> Option<u32> {
        self.session.as_ref().map(|s| s.round)
    }

    /// Participant ids in turn order (empty when idle).
    pub fn turn_order(&self) -> &[ParticipantId] {
        self.session
            .as_ref()
            .map(|s| s.order.as_slice())
            .unwrap_or_default()
    }

    /// The combat log of the running session.
    pub fn log(&self) -> Option<&CombatLog> {
        self.session.as_ref().map(|s| &s.log)
    }

    /// Snapshot the controller for display or serialization.
    pub fn get_state(&self) -> CombatState {
        let Some(session) = &self.session else {
            return CombatState::idle();
        };
        CombatState {
            status: CombatStatus::InCombat,
            session_id: Some(session.id),
            round: session.round,
            active: session.active,
            participants: session
                .order
                .iter()
                .filter_map(|id| session.participants.get(id).cloned())
                .collect(),
            log: session.log.events().to_vec(),
        }
    }

    fn initiative_for(&mut self, spec: &ParticipantSpec) -> i32 {
        spec.initiative.unwrap_or_else(|| {
            let dex = spec
                .ability_scores
                .as_ref()
                .map_or(0, |scores| scores.modifier(Ability::Dexterity));
            self.dice.roll(Die::D20) as i32 + dex
        })
    }

    fn build_participant(
        &mut self,
        spec: ParticipantSpec,
        id: ParticipantId,
    ) -> CombatParticipant {
        let initiative = self.initiative_for(&spec);
        ParticipantSpec {
            initiative: Some(initiative),
            ..spec
        }
        .into_participant(id)
    }
}

impl Default for CombatController {
    fn default() -> Self {
        Self::new(CombatConfig::default())
    }
}
