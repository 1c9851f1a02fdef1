use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use serde::Deserialize;

use sk_mechanics::{
    AttackResolution, CombatConfig, CombatController, CombatParticipant, CombatState,
    ParticipantId, ParticipantSpec,
};

const DOWNED: &str = "unconscious";

/// An encounter file: participants plus optional engine settings.
#[derive(Deserialize)]
struct Encounter {
    #[serde(default)]
    config: CombatConfig,
    participants: Vec<ParticipantSpec>,
}

pub fn run(path: &Path, seed: Option<u64>, rounds: u32, verbose: bool) -> Result<(), String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let encounter: Encounter =
        serde_json::from_str(&text).map_err(|e| format!("invalid encounter file: {e}"))?;
    if encounter.participants.is_empty() {
        return Err("encounter has no participants".to_string());
    }

    let mut config = encounter.config;
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    let seed = config.seed;
    tracing::info!(
        path = %path.display(),
        participants = encounter.participants.len(),
        seed,
        "encounter loaded"
    );

    let mut combat = CombatController::new(config);
    combat
        .start_combat(encounter.participants)
        .map_err(|e| e.to_string())?;

    let mut attacks = Vec::new();
    loop {
        let state = combat.get_state();
        if state.round > rounds || outcome(&state).is_some() {
            break;
        }
        if let Some(resolution) = take_turn(&mut combat, &state)? {
            attacks.push((state.round, resolution));
        }
        combat.next_turn().map_err(|e| e.to_string())?;
    }

    let final_state = combat
        .end_combat()
        .ok_or_else(|| "combat ended unexpectedly".to_string())?;
    let fought = final_state.round.min(rounds);

    println!(
        "  {} {}",
        "Encounter".bold(),
        format!("({fought} rounds, seed={seed})").dimmed()
    );
    match outcome(&final_state) {
        Some(Side::Players) => println!("  {}", "Players win".green().bold()),
        Some(Side::Enemies) => println!("  {}", "Enemies win".red().bold()),
        None => println!("  {}", format!("No winner after {rounds} rounds").yellow()),
    }
    println!();

    if verbose {
        println!("  {}", "Attacks".bold().underline());
        println!();
        for (round, resolution) in &attacks {
            let label = format!("[round {round:>2}]").dimmed();
            println!("  {label} {}", describe_attack(&final_state, resolution));
        }
        if attacks.is_empty() {
            println!("  {}", "(no attacks)".dimmed());
        }
        println!();

        println!("  {}", "Combat Log".bold().underline());
        println!();
        for event in &final_state.log {
            println!("  {event}");
        }
        println!();
    }

    println!("  {}", "Participant Status".bold().underline());
    println!();
    println!("{}", status_table(&final_state));
    println!();

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Players,
    Enemies,
}

/// The winning side, once the other has nobody standing.
///
/// `None` while both sides still stand, or when nobody does.
fn outcome(state: &CombatState) -> Option<Side> {
    let standing = |enemy: bool| {
        state
            .participants
            .iter()
            .any(|p| p.is_enemy == enemy && !p.is_down())
    };
    match (standing(false), standing(true)) {
        (true, false) => Some(Side::Players),
        (false, true) => Some(Side::Enemies),
        (true, true) | (false, false) => None,
    }
}

/// The first standing opponent in turn order that can be targeted.
fn pick_target(state: &CombatState, attacker: &CombatParticipant) -> Option<ParticipantId> {
    state
        .participants
        .iter()
        .find(|p| p.is_enemy != attacker.is_enemy && !p.is_down() && p.ac.is_some())
        .map(|p| p.id)
}

fn take_turn(
    combat: &mut CombatController,
    state: &CombatState,
) -> Result<Option<AttackResolution>, String> {
    let Some(attacker) = state.active_participant() else {
        return Ok(None);
    };
    if attacker.is_down() {
        return Ok(None);
    }
    let Some(target) = pick_target(state, attacker) else {
        return Ok(None);
    };

    let resolution = combat
        .resolve_attack(attacker.id, target, None)
        .map_err(|e| e.to_string())?;

    if let Some(damage) = resolution.damage.as_ref().filter(|d| d.total > 0) {
        let hp = combat
            .apply_damage(target, damage.total)
            .map_err(|e| e.to_string())?;
        if hp == 0 {
            combat
                .add_condition(target, DOWNED)
                .map_err(|e| e.to_string())?;
        }
    }

    Ok(Some(resolution))
}

fn name_of(state: &CombatState, id: ParticipantId) -> String {
    state
        .participant(id)
        .map_or_else(|| id.to_string(), |p| p.name.clone())
}

fn describe_attack(state: &CombatState, resolution: &AttackResolution) -> String {
    let attacker = name_of(state, resolution.attacker);
    let target = name_of(state, resolution.target);
    let roll = format!("{} vs AC {}", resolution.attack.check, resolution.target_ac);

    match &resolution.damage {
        Some(damage) if resolution.attack.critical => format!(
            "{attacker} {} {target} with {} ({roll}): {damage}",
            "CRITS".red().bold(),
            resolution.armament
        ),
        Some(damage) => format!(
            "{attacker} hits {target} with {} ({roll}): {damage}",
            resolution.armament
        ),
        None => format!(
            "{attacker} {} {target} with {} ({roll})",
            "misses".dimmed(),
            resolution.armament
        ),
    }
}

fn status_table(state: &CombatState) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Name", "Side", "Init", "HP", "AC", "Conditions"]);

    for p in &state.participants {
        let side = if p.is_enemy { "enemy" } else { "player" };
        let ac = p.ac.map_or_else(|| "--".to_string(), |ac| ac.to_string());
        let conditions = if p.conditions.is_empty() {
            "--".to_string()
        } else {
            p.conditions.iter().cloned().collect::<Vec<_>>().join(", ")
        };
        table.add_row(vec![
            p.id.to_string(),
            p.name.clone(),
            side.to_string(),
            p.initiative.to_string(),
            format_hp(p),
            ac,
            conditions,
        ]);
    }
    table
}

fn format_hp(p: &CombatParticipant) -> String {
    let hp = format!("{}/{}", p.hp, p.max_hp);
    let fraction = p.hp_fraction();
    if fraction <= 0.0 {
        hp.red().bold().to_string()
    } else if fraction <= 0.5 {
        hp.yellow().to_string()
    } else {
        hp.green().to_string()
    }
}
