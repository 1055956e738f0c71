mod common;
mod logic;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use common::scenario::{get_scenario, list_scenarios};
use common::split_csv;
use logic::{
    ConsultantMode, GameTester, GameplayStrategy, LogicTester, PlayabilityAggregate,
    PlayabilityRecord, SeedInfo, aggregate_playability, narrate_playthrough, resolve_seed_inputs,
    run_playability_analysis, validate_playability_targets,
};

#[derive(Debug, Parser)]
#[command(name = "category-tester", version = "0.1.0")]
#[command(about = "Automated playthroughs and balance checks for the Category of One stage engine")]
struct Args {
    /// Scenarios to run (comma-separated, `all` for every scenario)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated; decimal or 0x hex)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Narrate one Category King run with consultant commentary
    #[arg(long, value_enum, default_value_t = ConsultantMode::Off)]
    consultant: ConsultantMode,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let scenarios = expand_scenarios(&args.scenarios);
    let seed_tokens = split_csv(&args.seeds);
    let seed_infos = resolve_seed_inputs(&seed_tokens)?;
    let logic_seeds: Vec<u64> = seed_infos.iter().map(|s| s.seed).collect();
    let game_tester = GameTester::new(args.verbose);

    let all_results = run_logic_scenarios(&args, &scenarios, &logic_seeds, game_tester);

    let (playability_records, playability_aggregates) =
        gather_playability(&args, &game_tester, &seed_infos)?;

    run_narration(&args, &seed_infos).await?;

    write_reports(
        &args,
        &all_results,
        playability_records.as_deref(),
        playability_aggregates.as_deref(),
        start_time,
    )?;

    if let Some(aggregates) = playability_aggregates.as_ref() {
        let record_slice = playability_records.as_deref().unwrap_or(&[]);
        validate_playability_targets(aggregates, record_slice)?;
    }

    if all_results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:25} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "📈 Category of One Automated Tester".bright_cyan().bold());
    println!("{}", "===================================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s.eq_ignore_ascii_case("all")) {
        scenarios.retain(|s| !s.eq_ignore_ascii_case("all"));
        for (key, _) in list_scenarios() {
            if !scenarios.iter().any(|s| s == key) {
                scenarios.push(key.to_string());
            }
        }
    }
    scenarios
}

fn run_logic_scenarios(
    args: &Args,
    scenarios: &[String],
    logic_seeds: &[u64],
    game_tester: GameTester,
) -> Vec<logic::ScenarioResult> {
    println!("{}", "🧠 Running Logic Tests".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let logic_tester = LogicTester::new(game_tester);
    let mut results = Vec::new();

    for scenario_name in scenarios {
        if let Some(scenario) = get_scenario(scenario_name) {
            results.extend(logic_tester.run_scenario(&scenario, logic_seeds, args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }

    results
}

type PlayabilitySummary = (
    Option<Vec<PlayabilityRecord>>,
    Option<Vec<PlayabilityAggregate>>,
);

fn gather_playability(
    args: &Args,
    game_tester: &GameTester,
    seed_infos: &[SeedInfo],
) -> Result<PlayabilitySummary> {
    if !matches!(args.report.as_str(), "console" | "csv") {
        return Ok((None, None));
    }
    let records = run_playability_analysis(game_tester, seed_infos, args.iterations)?;
    let aggregates = aggregate_playability(&records);
    Ok((Some(records), Some(aggregates)))
}

async fn run_narration(args: &Args, seed_infos: &[SeedInfo]) -> Result<()> {
    let Some(advisor) = args.consultant.advisor()? else {
        return Ok(());
    };
    let seed = seed_infos.first().map_or(logic::seeds::DEFAULT_SEED, |s| s.seed);
    let mut out = stdout();
    let report =
        narrate_playthrough(&mut out, advisor, GameplayStrategy::CategoryKing, seed).await?;
    log::info!(
        "narration via {} accepted {}/{} consultant replies, ending {}",
        report.advisor_id,
        report.replies_accepted,
        report.decisions,
        report
            .result
            .as_ref()
            .map_or("in progress", |summary| summary.headline.as_str())
    );
    log::debug!("final consultant message: {}", report.final_message);
    Ok(())
}

fn write_reports(
    args: &Args,
    results: &[logic::ScenarioResult],
    playability_records: Option<&[PlayabilityRecord]>,
    playability_aggregates: Option<&[PlayabilityAggregate]>,
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => {
            if results.is_empty() {
                writeln!(&mut output_target, "[]")?;
            } else {
                logic::reports::generate_json_report(&mut output_target, results)?;
            }
        }
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Category of One Logic Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        "csv" => {
            if let Some(records) = playability_records {
                logic::reports::generate_csv_report(&mut output_target, records)?;
            } else {
                writeln!(&mut output_target, "[]")?;
            }
        }
        _ => {
            let duration = start_time.elapsed();
            if results.is_empty() {
                writeln!(&mut output_target, "No logic scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    playability_aggregates.unwrap_or(&[]),
                    duration,
                )?;
            }
        }
    }

    if matches!(args.report.as_str(), "console" | "markdown") {
        let duration = start_time.elapsed();
        writeln!(&mut output_target)?;
        writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "category-tester-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    fn base_args() -> Args {
        Args {
            scenarios: "smoke".to_string(),
            list_scenarios: false,
            seeds: "1337".to_string(),
            iterations: 1,
            report: "json".to_string(),
            verbose: false,
            output: None,
            consultant: ConsultantMode::Off,
        }
    }

    #[test]
    fn args_parse_defaults() {
        let args = Args::parse_from(["category-tester"]);
        assert_eq!(args.scenarios, "smoke");
        assert_eq!(args.seeds, "1337");
        assert_eq!(args.iterations, 10);
        assert_eq!(args.report, "console");
        assert_eq!(args.consultant, ConsultantMode::Off);
    }

    #[test]
    fn args_reject_unknown_report() {
        assert!(Args::try_parse_from(["category-tester", "--report", "xml"]).is_err());
        let args = Args::parse_from(["category-tester", "--consultant", "offline", "-v"]);
        assert_eq!(args.consultant, ConsultantMode::Offline);
        assert!(args.verbose);
    }

    #[test]
    fn expand_scenarios_handles_all() {
        let scenarios = expand_scenarios("smoke, ALL");
        assert_eq!(scenarios.first().map(String::as_str), Some("smoke"));
        assert_eq!(scenarios.len(), list_scenarios().len());
        assert!(scenarios.iter().any(|s| s == "hunt-budget"));
    }

    #[test]
    fn logic_scenarios_skip_unknown_names() {
        let args = base_args();
        let results = run_logic_scenarios(
            &args,
            &["smoke".to_string(), "bogus".to_string()],
            &[1, 2],
            GameTester::new(false),
        );
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.passed));
    }

    #[test]
    fn playability_only_runs_for_console_and_csv() {
        let tester = GameTester::new(false);
        let seeds = vec![SeedInfo::from_numeric(1)];
        let (records, aggregates) =
            gather_playability(&base_args(), &tester, &seeds).expect("json");
        assert!(records.is_none() && aggregates.is_none());

        let mut args = base_args();
        args.report = "csv".to_string();
        let (records, aggregates) = gather_playability(&args, &tester, &seeds).expect("csv");
        assert_eq!(
            records.map(|r| r.len()),
            Some(GameplayStrategy::ALL.len())
        );
        assert_eq!(aggregates.map(|a| a.len()), Some(GameplayStrategy::ALL.len()));
    }

    #[test]
    fn write_reports_to_file() {
        let tester = GameTester::new(false);
        let results = run_logic_scenarios(&base_args(), &["smoke".to_string()], &[3], tester);

        let mut args = base_args();
        args.report = "markdown".to_string();
        let path = temp_path("markdown");
        args.output = Some(path.clone());
        write_reports(&args, &results, None, None, Instant::now()).expect("write markdown");
        let content = std::fs::read_to_string(&path).expect("read markdown");
        assert!(content.contains("# Category of One Logic Test Results"));
        assert!(content.contains("Smoke Test"));
        let _ = std::fs::remove_file(path);

        let mut args = base_args();
        let path = temp_path("json");
        args.output = Some(path.clone());
        write_reports(&args, &results, None, None, Instant::now()).expect("write json");
        let content = std::fs::read_to_string(&path).expect("read json");
        let parsed: serde_json::Value = serde_json::from_str(&content).expect("valid json");
        assert_eq!(parsed[0]["scenario_name"], "Smoke Test");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn empty_results_still_produce_reports() {
        let mut args = base_args();
        args.report = "console".to_string();
        let path = temp_path("console");
        args.output = Some(path.clone());
        write_reports(&args, &[], None, None, Instant::now()).expect("write console");
        let content = std::fs::read_to_string(&path).expect("read console");
        assert!(content.contains("No logic scenarios executed."));
        let _ = std::fs::remove_file(path);
    }
}
