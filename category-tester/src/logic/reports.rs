use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use super::ScenarioResult;
use super::playability::{PlayabilityAggregate, PlayabilityRecord};

pub fn generate_console_report(
    out: &mut impl Write,
    results: &[ScenarioResult],
    aggregates: &[PlayabilityAggregate],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Logic Test Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==============================".cyan())?;

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();
    let failed_tests = total_tests - passed_tests;

    writeln!(out, "Total scenarios: {total_tests}")?;
    writeln!(out, "Passed: {}", passed_tests.to_string().green())?;
    writeln!(out, "Failed: {}", failed_tests.to_string().red())?;
    writeln!(out, "Success rate: {:.1}%", success_rate(passed_tests, total_tests))?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };

        writeln!(out, "{} {}", status, result.scenario_name.bold())?;
        writeln!(
            out,
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "   Average time: {:?}", result.average_duration)?;

        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }

    if let (Some(fastest), Some(slowest)) = (
        results.iter().min_by_key(|r| r.average_duration),
        results.iter().max_by_key(|r| r.average_duration),
    ) {
        writeln!(out, "{}", "⚡ Performance Summary".bright_yellow().bold())?;
        writeln!(out, "{}", "=====================".yellow())?;
        writeln!(
            out,
            "Fastest: {} ({:?})",
            fastest.scenario_name.green(),
            fastest.average_duration
        )?;
        writeln!(
            out,
            "Slowest: {} ({:?})",
            slowest.scenario_name.yellow(),
            slowest.average_duration
        )?;
        writeln!(out)?;
    }

    if !aggregates.is_empty() {
        writeln!(out, "{}", "🎯 Playability Summary".bright_magenta().bold())?;
        writeln!(out, "{}", "=====================".magenta())?;
        writeln!(
            out,
            "{:<14} {:>5} {:>9} {:>9} {:>8} {:>8} {:>8} {:>10} {:>10} {:>8} {:>8}",
            "strategy",
            "runs",
            "decisions",
            "complete",
            "won",
            "bankrupt",
            "commod",
            "mean cash",
            "std cash",
            "brand",
            "std"
        )?;
        for agg in aggregates {
            writeln!(
                out,
                "{:<14} {:>5} {:>9.1} {:>8.1}% {:>7.1}% {:>7.1}% {:>7.1}% {:>10.0} {:>10.0} {:>8.1} {:>8.1}",
                agg.strategy.label(),
                agg.iterations,
                agg.mean_decisions,
                agg.completion_rate * 100.0,
                agg.win_rate * 100.0,
                agg.bankrupt_rate * 100.0,
                agg.commoditized_rate * 100.0,
                agg.mean_final_cash,
                agg.std_final_cash,
                agg.mean_final_brand,
                agg.std_final_brand
            )?;
            if agg.min_final_cash <= 0 {
                writeln!(
                    out,
                    "   {} lowest final cash {}",
                    "⚠".yellow(),
                    agg.min_final_cash
                )?;
            }
        }
    }
    Ok(())
}

pub fn generate_json_report(out: &mut impl Write, results: &[ScenarioResult]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut impl Write, results: &[ScenarioResult]) -> Result<()> {
    writeln!(out, "# Category of One Logic Test Results\n")?;

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();
    let failed_tests = total_tests - passed_tests;

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total scenarios**: {total_tests}")?;
    writeln!(out, "- **Passed**: {passed_tests}")?;
    writeln!(out, "- **Failed**: {failed_tests}")?;
    writeln!(
        out,
        "- **Success rate**: {:.1}%\n",
        success_rate(passed_tests, total_tests)
    )?;

    writeln!(out, "## Detailed Results\n")?;

    for result in results {
        let status = if result.passed { "✅" } else { "❌" };

        writeln!(out, "### {} {}\n", status, result.scenario_name)?;
        writeln!(
            out,
            "- **Iterations**: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "- **Average time**: {:?}", result.average_duration)?;

        if !result.failures.is_empty() {
            writeln!(out, "- **Failures**:")?;
            for failure in &result.failures {
                writeln!(out, "  - {failure}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn generate_csv_report(out: &mut impl Write, records: &[PlayabilityRecord]) -> Result<()> {
    writeln!(
        out,
        "scenario,strategy,seed,decisions,final_stage,final_cash,final_brand,peak_cash,lowest_cash,peak_brand,ending,status"
    )?;
    for record in records {
        let m = &record.metrics;
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{},{}",
            csv_field(&record.scenario_name),
            csv_field(record.strategy.label()),
            record.seed,
            m.decisions_made,
            m.final_stage,
            m.final_cash,
            m.final_brand,
            m.peak_cash,
            m.lowest_cash,
            m.peak_brand,
            csv_field(&m.ending_type),
            record.status
        )?;
    }
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[allow(clippy::cast_precision_loss)]
fn success_rate(passed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (passed as f64 / total as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, passed: bool, millis: u64) -> ScenarioResult {
        ScenarioResult {
            scenario_name: name.to_string(),
            passed,
            iterations_run: 2,
            successful_iterations: if passed { 2 } else { 1 },
            failures: if passed {
                Vec::new()
            } else {
                vec!["went bankrupt".to_string()]
            },
            average_duration: Duration::from_millis(millis),
            performance_data: vec![Duration::from_millis(millis)],
        }
    }

    #[test]
    fn markdown_lists_failures() {
        let mut buf = Vec::new();
        generate_markdown_report(&mut buf, &[result("Smoke", true, 1), result("Edge", false, 2)])
            .expect("markdown");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("# Category of One Logic Test Results"));
        assert!(text.contains("- **Failed**: 1"));
        assert!(text.contains("  - went bankrupt"));
    }

    #[test]
    fn console_reports_fastest_and_slowest() {
        let mut buf = Vec::new();
        generate_console_report(
            &mut buf,
            &[result("Quick", true, 1), result("Slow", true, 9)],
            &[],
            Duration::from_millis(10),
        )
        .expect("console");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("Performance Summary"));
        assert!(text.contains("Quick"));
        assert!(!text.contains("Playability Summary"));
    }

    #[test]
    fn csv_fields_are_quoted_when_needed() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn success_rate_handles_empty_input() {
        assert!((success_rate(0, 0)).abs() < f64::EPSILON);
        assert!((success_rate(1, 4) - 25.0).abs() < f64::EPSILON);
    }
}
