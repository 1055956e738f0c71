use anyhow::{Context, Result, ensure};
use std::collections::BTreeMap;

use crate::common::scenario::full_game::{full_game_expectation, full_game_plan};
use crate::logic::seeds::SeedInfo;
use crate::logic::{GameTester, GameplayStrategy, PlayabilityMetrics};

#[derive(Debug, Clone)]
pub struct PlayabilityRecord {
    pub scenario_name: String,
    pub strategy: GameplayStrategy,
    pub seed_code: String,
    pub seed: u64,
    pub status: String,
    pub metrics: PlayabilityMetrics,
}

#[derive(Debug, Clone)]
pub struct PlayabilityAggregate {
    pub scenario_name: String,
    pub strategy: GameplayStrategy,
    pub iterations: usize,
    pub mean_decisions: f64,
    pub mean_final_cash: f64,
    pub std_final_cash: f64,
    pub mean_final_brand: f64,
    pub std_final_brand: f64,
    pub completion_rate: f64,
    pub win_rate: f64,
    pub bankrupt_rate: f64,
    pub commoditized_rate: f64,
    pub min_final_cash: i64,
}

/// Play every strategy against every seed and collect per-run metrics.
pub fn run_playability_analysis(
    tester: &GameTester,
    seeds: &[SeedInfo],
    iterations: usize,
) -> Result<Vec<PlayabilityRecord>> {
    let iterations = iterations.max(1);
    let mut records =
        Vec::with_capacity(seeds.len() * GameplayStrategy::ALL.len() * iterations);

    for strategy in GameplayStrategy::ALL {
        for seed in seeds {
            for iteration in 0..iterations {
                let iteration_offset = u64::try_from(iteration).unwrap_or(0);
                let iteration_seed = seed.seed.wrapping_add(iteration_offset);
                let plan = full_game_plan(strategy).with_expectation(full_game_expectation(strategy));
                let summary = tester.run_plan(&plan, iteration_seed);
                for expectation in &plan.expectations {
                    expectation.evaluate(&summary).with_context(|| {
                        format!(
                            "Playability expectation failed for strategy {strategy}, seed {} (iteration {})",
                            seed.display_code(),
                            iteration + 1
                        )
                    })?;
                }

                records.push(PlayabilityRecord {
                    scenario_name: format!("Full Game - {strategy}"),
                    strategy,
                    seed_code: seed.display_code(),
                    seed: iteration_seed,
                    status: summary.final_state.status.to_string(),
                    metrics: summary.metrics,
                });
            }
        }
    }

    Ok(records)
}

pub fn aggregate_playability(records: &[PlayabilityRecord]) -> Vec<PlayabilityAggregate> {
    let mut aggregates: BTreeMap<String, AggregateBuilder> = BTreeMap::new();

    for record in records {
        aggregates
            .entry(record.scenario_name.clone())
            .or_insert_with(|| AggregateBuilder::new(record))
            .ingest(&record.metrics);
    }

    aggregates
        .into_values()
        .map(AggregateBuilder::finish)
        .collect()
}

/// Balance targets for the built-in strategies.
pub fn validate_playability_targets(
    aggregates: &[PlayabilityAggregate],
    records: &[PlayabilityRecord],
) -> Result<()> {
    for record in records {
        match record.strategy {
            GameplayStrategy::CategoryKing => ensure!(
                record.metrics.reached_close && !record.metrics.bankrupt,
                "{} seed {} should survive to the close, stopped on stage {}",
                record.scenario_name,
                record.seed_code,
                record.metrics.final_stage
            ),
            GameplayStrategy::Commodity => ensure!(
                record.metrics.bankrupt || record.metrics.commoditized,
                "{} seed {} should not survive, ended {}",
                record.scenario_name,
                record.seed_code,
                record.status
            ),
            _ => {}
        }
    }

    for aggregate in aggregates {
        ensure!(
            aggregate.win_rate <= aggregate.completion_rate,
            "{} reports more wins than completed runs",
            aggregate.scenario_name
        );
    }
    Ok(())
}

struct AggregateBuilder {
    scenario_name: String,
    strategy: GameplayStrategy,
    iterations: u32,
    decisions_sum: u64,
    stats_cash: RunningStats,
    stats_brand: RunningStats,
    completed: u32,
    won: u32,
    bankrupt: u32,
    commoditized: u32,
    min_final_cash: i64,
}

impl AggregateBuilder {
    fn new(record: &PlayabilityRecord) -> Self {
        Self {
            scenario_name: record.scenario_name.clone(),
            strategy: record.strategy,
            iterations: 0,
            decisions_sum: 0,
            stats_cash: RunningStats::default(),
            stats_brand: RunningStats::default(),
            completed: 0,
            won: 0,
            bankrupt: 0,
            commoditized: 0,
            min_final_cash: i64::MAX,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn ingest(&mut self, metrics: &PlayabilityMetrics) {
        self.iterations += 1;
        self.decisions_sum = self
            .decisions_sum
            .saturating_add(u64::from(metrics.decisions_made));
        self.stats_cash.add(metrics.final_cash as f64);
        self.stats_brand.add(metrics.final_brand as f64);
        if metrics.reached_close && !metrics.bankrupt && !metrics.commoditized {
            self.completed += 1;
        }
        if metrics.won {
            self.won += 1;
        }
        if metrics.bankrupt {
            self.bankrupt += 1;
        }
        if metrics.commoditized {
            self.commoditized += 1;
        }
        self.min_final_cash = self.min_final_cash.min(metrics.final_cash);
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(self) -> PlayabilityAggregate {
        let denom = f64::from(self.iterations.max(1));
        PlayabilityAggregate {
            scenario_name: self.scenario_name,
            strategy: self.strategy,
            iterations: usize::try_from(self.iterations).unwrap_or(usize::MAX),
            mean_decisions: self.decisions_sum as f64 / denom,
            mean_final_cash: self.stats_cash.mean(),
            std_final_cash: self.stats_cash.std_dev(),
            mean_final_brand: self.stats_brand.mean(),
            std_final_brand: self.stats_brand.std_dev(),
            completion_rate: f64::from(self.completed) / denom,
            win_rate: f64::from(self.won) / denom,
            bankrupt_rate: f64::from(self.bankrupt) / denom,
            commoditized_rate: f64::from(self.commoditized) / denom,
            min_final_cash: if self.iterations == 0 {
                0
            } else {
                self.min_final_cash
            },
        }
    }
}

#[derive(Debug, Default, Clone)]
struct RunningStats {
    count: u32,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    fn add(&mut self, value: f64) {
        self.count += 1;
        let count = f64::from(self.count);
        let delta = value - self.mean;
        self.mean += delta / count;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    const fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.mean }
    }

    fn std_dev(&self) -> f64 {
        if self.count > 1 {
            (self.m2 / f64::from(self.count - 1)).sqrt()
        } else {
            0.0
        }
    }
}
