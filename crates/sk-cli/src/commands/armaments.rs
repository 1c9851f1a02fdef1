use comfy_table::{ContentArrangement, Table};
use sk_mechanics::ArmamentKind;
use sk_mechanics::attack::table;

pub fn run(spells: bool, weapons: bool) -> Result<(), String> {
    let wanted = match (spells, weapons) {
        (true, false) => Some(ArmamentKind::Spell),
        (false, true) => Some(ArmamentKind::Weapon),
        _ => None,
    };

    let entries: Vec<_> = table::all()
        .iter()
        .filter(|a| wanted.is_none_or(|kind| a.kind == kind))
        .collect();

    let mut out = Table::new();
    out.set_content_arrangement(ContentArrangement::Dynamic);
    out.set_header(vec!["Id", "Name", "Kind", "Damage", "Type", "Ability"]);

    for armament in &entries {
        let kind = match armament.kind {
            ArmamentKind::Weapon => "weapon",
            ArmamentKind::Spell => "spell",
        };
        out.add_row(vec![
            armament.id.to_string(),
            armament.name.to_string(),
            kind.to_string(),
            armament.dice.to_string(),
            armament.damage_type.to_string(),
            armament.attack_ability.to_string(),
        ]);
    }

    println!("{out}");
    println!();
    println!("  {} armaments", entries.len());

    Ok(())
}
