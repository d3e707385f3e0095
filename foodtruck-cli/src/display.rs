use colored::{ColoredString, Colorize};
use std::io::{self, Write};

use foodtruck_game::constants::MAX_TURNS;
use foodtruck_game::{Choice, EndReason, GameState, ResourceEffects, Resources, Scenario};

const LOW_LEVEL: i32 = 20;
const MID_LEVEL: i32 = 50;

/// Red below 20, yellow below 50, green otherwise.
fn level_color(value: i32, text: String) -> ColoredString {
    if value < LOW_LEVEL {
        text.bright_red()
    } else if value < MID_LEVEL {
        text.yellow()
    } else {
        text.green()
    }
}

fn delta_color(delta: i32, text: String) -> ColoredString {
    if delta > 0 { text.green() } else { text.bright_red() }
}

fn signed(delta: i32) -> String {
    if delta > 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}

pub fn money(value: i32) -> ColoredString {
    level_color(value, format!("💰 Money: ${value}"))
}

pub fn reputation(value: i32) -> ColoredString {
    level_color(value, format!("⭐ Reputation: {value}%"))
}

pub fn energy(value: i32) -> ColoredString {
    level_color(value, format!("⚡ Energy: {value}%"))
}

pub fn title(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", "🚚 FOOD TRUCK MANAGER 🚚".cyan().bold())?;
    writeln!(out, "{}", "========================".cyan())?;
    writeln!(out, "Manage your food truck through {MAX_TURNS} days of business!")?;
    writeln!(
        out,
        "{}",
        "Make smart decisions to keep your money, reputation, and energy balanced.".dimmed()
    )?;
    writeln!(out)
}

pub fn help(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", "📖 HOW TO PLAY:".blue().bold())?;
    writeln!(out, "• Manage your food truck for {MAX_TURNS} days")?;
    writeln!(out, "• Balance three resources: Money, Reputation, Energy")?;
    writeln!(out, "• Avoid running out of energy, reputation, or money")?;
    writeln!(out, "• Survive all {MAX_TURNS} days to win!")?;
    writeln!(out)?;
    writeln!(out, "{}", "💡 TIPS:".yellow().bold())?;
    writeln!(out, "{}", "• Keep all resources balanced".dimmed())?;
    writeln!(out, "{}", "• Later days have bigger stakes".dimmed())?;
    writeln!(out, "{}", "• Don't overwork yourself".dimmed())?;
    writeln!(out)
}

/// Compact one-line status shown before and after every turn.
pub fn stats_bar(out: &mut dyn Write, state: &GameState) -> io::Result<()> {
    let separator = " | ".dimmed();
    writeln!(
        out,
        "{}{separator}{}{separator}{}{separator}{}",
        format!("Day {:>2}/{MAX_TURNS}", state.turn).bright_yellow(),
        money(state.resources.money),
        reputation(state.resources.reputation),
        energy(state.resources.energy),
    )?;
    writeln!(out, "{}", "─".repeat(65).dimmed())
}

/// Compact effect hint such as `(💰-$15, ⭐+5%)`, empty for a no-op.
pub fn effects_hint(effects: &ResourceEffects) -> String {
    let mut parts = Vec::new();
    let money = effects.money_delta();
    if money != 0 {
        let sign = if money > 0 { "+" } else { "-" };
        parts.push(delta_color(money, format!("💰{sign}${}", money.unsigned_abs())).to_string());
    }
    let reputation = effects.reputation_delta();
    if reputation != 0 {
        parts.push(delta_color(reputation, format!("⭐{}%", signed(reputation))).to_string());
    }
    let energy = effects.energy_delta();
    if energy != 0 {
        parts.push(delta_color(energy, format!("⚡{}%", signed(energy))).to_string());
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("({})", parts.join(", "))
    }
}

pub fn scenario(out: &mut dyn Write, scenario: &Scenario) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", format!("🎯 {}", scenario.title).yellow().bold())?;
    writeln!(
        out,
        "{}",
        "─".repeat(scenario.title.chars().count() + 4).yellow()
    )?;
    writeln!(out, "{}", scenario.text)?;
    writeln!(out)?;
    writeln!(out, "{}", "Your options:".cyan().bold())?;
    for (idx, choice) in scenario.choices.iter().enumerate() {
        let hint = effects_hint(&choice.effects);
        if hint.is_empty() {
            writeln!(out, "{}. {}", idx + 1, choice.label)?;
        } else {
            writeln!(out, "{}. {} {}", idx + 1, choice.label, hint)?;
        }
    }
    Ok(())
}

fn change_line(label: &str, unit: &str, before: i32, after: i32, delta: i32) -> String {
    let (prefix, suffix) = if unit == "$" { ("$", "") } else { ("", unit) };
    format!(
        "{label}: {prefix}{before}{suffix} → {prefix}{after}{suffix} {}",
        delta_color(delta, format!("({})", signed(delta)))
    )
}

pub fn choice_result(
    out: &mut dyn Write,
    choice: &Choice,
    before: &Resources,
    after: &Resources,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", format!("✅ You chose: {}", choice.label).green().bold())?;
    let effects = &choice.effects;
    let mut changes = Vec::new();
    if effects.money_delta() != 0 {
        changes.push(change_line(
            "💰 Money",
            "$",
            before.money,
            after.money,
            effects.money_delta(),
        ));
    }
    if effects.reputation_delta() != 0 {
        changes.push(change_line(
            "⭐ Reputation",
            "%",
            before.reputation,
            after.reputation,
            effects.reputation_delta(),
        ));
    }
    if effects.energy_delta() != 0 {
        changes.push(change_line(
            "⚡ Energy",
            "%",
            before.energy,
            after.energy,
            effects.energy_delta(),
        ));
    }
    if !changes.is_empty() {
        writeln!(out, "{}", "Changes:".cyan())?;
        for change in changes {
            writeln!(out, "  {change}")?;
        }
    }
    Ok(())
}

fn ending_banner(reason: Option<EndReason>) -> ColoredString {
    match reason {
        Some(reason) if reason.is_victory() => reason.message().green().bold(),
        Some(reason) => reason.message().red().bold(),
        None => "🏁 Game Over".red().bold(),
    }
}

pub fn game_over(out: &mut dyn Write, state: &GameState) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(50).dimmed())?;
    writeln!(out, "{}", ending_banner(state.end_reason))?;
    writeln!(out)?;
    writeln!(out, "{}", "Final Status:".cyan().bold())?;
    writeln!(out, "{}", money(state.resources.money))?;
    writeln!(out, "{}", reputation(state.resources.reputation))?;
    writeln!(out, "{}", energy(state.resources.energy))?;
    if let Some(score) = state.score {
        writeln!(out)?;
        writeln!(out, "{}", format!("🏆 Final Score: {score}").yellow().bold())?;
    }
    if !state.achievements.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", "Achievements unlocked:".cyan().bold())?;
        for achievement in &state.achievements {
            writeln!(
                out,
                "  🏅 {} ({}) - {}",
                achievement.name, achievement.category, achievement.description
            )?;
        }
    }
    writeln!(out, "{}", "=".repeat(50).dimmed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodtruck_game::{Difficulty, catalog};

    fn plain() {
        colored::control::set_override(false);
    }

    fn render(f: impl FnOnce(&mut dyn Write) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn effect_hints_are_signed_and_sparse() {
        plain();
        assert_eq!(
            effects_hint(&ResourceEffects::new(-15, 5, -2)),
            "(💰-$15, ⭐+5%, ⚡-2%)"
        );
        assert_eq!(
            effects_hint(&ResourceEffects {
                money: Some(8),
                reputation: None,
                energy: Some(0),
            }),
            "(💰+$8)"
        );
        assert_eq!(effects_hint(&ResourceEffects::default()), "");
    }

    #[test]
    fn scenario_lists_numbered_choices() {
        plain();
        let scenario = &catalog().tier(Difficulty::Early)[0];
        let text = render(|out| super::scenario(out, scenario));
        assert!(text.contains(&scenario.title));
        for (idx, choice) in scenario.choices.iter().enumerate() {
            assert!(text.contains(&format!("{}. {}", idx + 1, choice.label)));
        }
    }

    #[test]
    fn stats_bar_shows_all_resources() {
        plain();
        let state = GameState::create_new(None, None);
        let text = render(|out| stats_bar(out, &state));
        assert!(text.contains("Day  0/15"));
        assert!(text.contains("💰 Money: $100"));
        assert!(text.contains("⭐ Reputation: 50%"));
        assert!(text.contains("⚡ Energy: 80%"));
    }

    #[test]
    fn choice_result_lists_only_changed_resources() {
        plain();
        let choice = Choice {
            id: "rest".to_string(),
            label: "Rest".to_string(),
            effects: ResourceEffects {
                money: Some(-5),
                reputation: None,
                energy: Some(10),
            },
            risk_level: None,
        };
        let before = Resources::starting();
        let after = before.apply(&choice.effects);
        let text = render(|out| choice_result(out, &choice, &before, &after));
        assert!(text.contains("You chose: Rest"));
        assert!(text.contains("💰 Money: $100 → $95 (-5)"));
        assert!(text.contains("⚡ Energy: 80% → 90% (+10)"));
        assert!(!text.contains("Reputation"));
    }

    #[test]
    fn game_over_shows_reason_and_score() {
        plain();
        let mut state = GameState::create_new(None, None);
        state.game_over = true;
        state.end_reason = Some(EndReason::Burnout);
        state.score = Some(123);
        let text = render(|out| game_over(out, &state));
        assert!(text.contains(EndReason::Burnout.message()));
        assert!(text.contains("Final Score: 123"));
    }

    #[test]
    fn victory_banner_uses_the_engine_message() {
        plain();
        let mut state = GameState::create_new(None, None);
        state.game_over = true;
        state.end_reason = Some(EndReason::Victory);
        let text = render(|out| game_over(out, &state));
        assert!(text.contains("🎉 Victory! You successfully managed your food truck for 15 days!"));
        assert!(!text.contains("Final Score"));
    }
}
