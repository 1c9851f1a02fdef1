use colored::Colorize;
use sk_mechanics::DiceEngine;

pub fn run(sides: u32, modifier: i32, proficiency: i32, seed: Option<u64>) -> Result<(), String> {
    let seed = seed.unwrap_or_else(rand::random);
    let mut dice = DiceEngine::seeded(seed);
    let roll = dice
        .roll_check(sides, modifier, proficiency)
        .map_err(|e| e.to_string())?;

    let note = if sides == 20 && roll.is_natural_max() {
        " natural 20!".green().bold().to_string()
    } else if sides == 20 && roll.is_natural_one() {
        " natural 1".red().bold().to_string()
    } else {
        String::new()
    };

    println!("  {}{note}", roll.to_string().bold());
    println!("  {}", format!("(seed={seed})").dimmed());
    Ok(())
}
