use anyhow::Result;
use colored::Colorize;
use std::io::Write;

use crate::simulate::SimulationReport;

pub fn generate_console_report(out: &mut dyn Write, report: &SimulationReport) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Simulation Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "=====================".cyan())?;

    let total = report.runs.len();
    let passed = report.runs.iter().filter(|r| r.passed).count();
    writeln!(out, "Total runs: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out)?;

    for aggregate in &report.aggregates {
        writeln!(out, "{}", aggregate.strategy.label().bold())?;
        writeln!(
            out,
            "   Victories: {}/{} ({:.1}%)",
            aggregate.victories,
            aggregate.runs,
            aggregate.win_rate * 100.0
        )?;
        writeln!(out, "   Average score: {:.1}", aggregate.average_score)?;
        writeln!(out, "   Average turns: {:.1}", aggregate.average_turns)?;
        let endings: Vec<String> = aggregate
            .end_reasons
            .iter()
            .map(|(reason, count)| format!("{reason} {count}"))
            .collect();
        writeln!(out, "   Endings: {}", endings.join(", "))?;
        writeln!(out)?;
    }

    let failing: Vec<_> = report.runs.iter().filter(|r| !r.passed).collect();
    if !failing.is_empty() {
        writeln!(out, "{}", "❌ Failing runs".bright_red().bold())?;
        for run in failing {
            writeln!(out, "{} seed {}", run.strategy.label().bold(), run.seed)?;
            for failure in &run.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }

    if let Some(best) = report
        .aggregates
        .iter()
        .max_by(|a, b| a.average_score.total_cmp(&b.average_score))
    {
        writeln!(out, "{}", "🏆 Best Strategy".bright_yellow().bold())?;
        writeln!(out, "{}", "===============".yellow())?;
        writeln!(
            out,
            "{} (average score {:.1})",
            best.strategy.label().green(),
            best.average_score
        )?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, report: &SimulationReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, report: &SimulationReport) -> Result<()> {
    writeln!(out, "# Food Truck Manager Simulation Results\n")?;

    let total = report.runs.len();
    let passed = report.runs.iter().filter(|r| r.passed).count();
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total runs**: {total}")?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}\n", total - passed)?;

    writeln!(out, "## Strategies\n")?;
    writeln!(
        out,
        "| Strategy | Runs | Win rate | Avg score | Avg turns | Endings |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|")?;
    for aggregate in &report.aggregates {
        let endings: Vec<String> = aggregate
            .end_reasons
            .iter()
            .map(|(reason, count)| format!("{reason}: {count}"))
            .collect();
        writeln!(
            out,
            "| {} | {} | {:.1}% | {:.1} | {:.1} | {} |",
            aggregate.strategy.label(),
            aggregate.runs,
            aggregate.win_rate * 100.0,
            aggregate.average_score,
            aggregate.average_turns,
            endings.join(", ")
        )?;
    }

    let failing: Vec<_> = report.runs.iter().filter(|r| !r.passed).collect();
    if !failing.is_empty() {
        writeln!(out, "\n## Failures\n")?;
        for run in failing {
            writeln!(out, "### ❌ {} seed `{}`\n", run.strategy.label(), run.seed)?;
            for failure in &run.failures {
                writeln!(out, "- {failure}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}
