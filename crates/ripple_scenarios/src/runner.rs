//! Scenario runner
//!
//! Collects suites, runs each case against a fresh [`ScenarioContext`] and
//! reports outcomes.

use std::time::{Duration, Instant};

use indexmap::IndexMap;
use ripple_events::{EventManagerConfig, EventTreeType};

use crate::context::ScenarioContext;

type ScenarioFn = Box<dyn FnOnce(&mut ScenarioContext) -> anyhow::Result<()>>;

/// A single scripted scenario
pub struct ScenarioCase {
    pub name: String,
    pub suite: String,
    /// Manager settings the case starts from
    pub config: EventManagerConfig,
    pub run: ScenarioFn,
}

impl ScenarioCase {
    pub fn new<F>(name: &str, suite: &str, config: EventManagerConfig, run: F) -> Self
    where
        F: FnOnce(&mut ScenarioContext) -> anyhow::Result<()> + 'static,
    {
        Self {
            name: name.to_string(),
            suite: suite.to_string(),
            config,
            run: Box::new(run),
        }
    }
}

pub struct ScenarioSuite {
    pub name: String,
    pub cases: Vec<ScenarioCase>,
}

impl ScenarioSuite {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cases: Vec::new(),
        }
    }

    /// Add a case running on the standard configuration.
    pub fn add<F>(&mut self, name: &str, run: F) -> &mut Self
    where
        F: FnOnce(&mut ScenarioContext) -> anyhow::Result<()> + 'static,
    {
        self.add_with_config(name, EventManagerConfig::standard(), run)
    }

    pub fn add_with_config<F>(&mut self, name: &str, config: EventManagerConfig, run: F) -> &mut Self
    where
        F: FnOnce(&mut ScenarioContext) -> anyhow::Result<()> + 'static,
    {
        self.cases.push(ScenarioCase::new(name, &self.name, config, run));
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ScenarioOutcome {
    Passed,
    Failed { reason: String },
}

/// Result of running one case
#[derive(Debug)]
pub struct ScenarioRun {
    pub name: String,
    pub suite: String,
    pub outcome: ScenarioOutcome,
    pub duration: Duration,
    /// Touch event tree at the end of a failed case, indented by depth
    pub dump: Vec<String>,
}

impl ScenarioRun {
    pub fn is_passed(&self) -> bool {
        self.outcome == ScenarioOutcome::Passed
    }
}

#[derive(Default)]
pub struct ScenarioRunner {
    suites: Vec<ScenarioSuite>,
    /// Substring matched against case and suite names (None = run all)
    filter: Option<String>,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_suite(&mut self, suite: ScenarioSuite) -> &mut Self {
        self.suites.push(suite);
        self
    }

    pub fn filter(&mut self, pattern: &str) -> &mut Self {
        self.filter = Some(pattern.to_string());
        self
    }

    fn selected(&self, case: &ScenarioCase) -> bool {
        match &self.filter {
            Some(pattern) => case.name.contains(pattern) || case.suite.contains(pattern),
            None => true,
        }
    }

    /// Run every selected case, each on a fresh context.
    pub fn run(&mut self) -> RunReport {
        let start = Instant::now();
        let mut runs = Vec::new();

        for suite in std::mem::take(&mut self.suites) {
            tracing::info!("Running suite: {}", suite.name);

            for case in suite.cases {
                if !self.selected(&case) {
                    continue;
                }
                tracing::debug!("Running scenario: {}::{}", case.suite, case.name);

                let case_start = Instant::now();
                let mut ctx = ScenarioContext::new(case.config);
                let outcome = match (case.run)(&mut ctx) {
                    Ok(()) => ScenarioOutcome::Passed,
                    Err(err) => ScenarioOutcome::Failed {
                        reason: format!("{err:#}"),
                    },
                };
                let duration = case_start.elapsed();
                let dump = match &outcome {
                    ScenarioOutcome::Passed => Vec::new(),
                    ScenarioOutcome::Failed { .. } => ctx
                        .manager()
                        .dump_event(EventTreeType::Touch)
                        .into_iter()
                        .map(|(depth, line)| format!("{}{}", "  ".repeat(depth.max(0) as usize), line))
                        .collect(),
                };

                match &outcome {
                    ScenarioOutcome::Passed => tracing::info!("  ✓ {} ({:?})", case.name, duration),
                    ScenarioOutcome::Failed { reason } => {
                        tracing::error!("  ✗ {} ({:?}): {}", case.name, duration, reason)
                    }
                }

                runs.push(ScenarioRun {
                    name: case.name,
                    suite: case.suite,
                    outcome,
                    duration,
                    dump,
                });
            }
        }

        RunReport {
            runs,
            duration: start.elapsed(),
        }
    }
}

pub struct RunReport {
    pub runs: Vec<ScenarioRun>,
    pub duration: Duration,
}

impl RunReport {
    pub fn passed(&self) -> usize {
        self.runs.iter().filter(|run| run.is_passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    pub fn total(&self) -> usize {
        self.runs.len()
    }

    pub fn all_passed(&self) -> bool {
        self.runs.iter().all(ScenarioRun::is_passed)
    }

    /// Runs grouped by suite, in the order suites ran
    pub fn by_suite(&self) -> IndexMap<&str, Vec<&ScenarioRun>> {
        let mut map: IndexMap<&str, Vec<&ScenarioRun>> = IndexMap::new();
        for run in &self.runs {
            map.entry(run.suite.as_str()).or_default().push(run);
        }
        map
    }

    pub fn print_summary(&self) {
        println!("\n════════════════════════════════════════════");
        println!("                 SUMMARY");
        println!("════════════════════════════════════════════");

        for (suite, runs) in self.by_suite() {
            let passed = runs.iter().filter(|run| run.is_passed()).count();
            println!("\n  {} ({}/{})", suite, passed, runs.len());
            for run in runs {
                match &run.outcome {
                    ScenarioOutcome::Passed => println!("    ✓ {}", run.name),
                    ScenarioOutcome::Failed { reason } => {
                        println!("    ✗ {}: {}", run.name, reason);
                        for line in &run.dump {
                            println!("        {}", line);
                        }
                    }
                }
            }
        }

        println!("\n────────────────────────────────────────────");
        println!(
            "  Passed: {}  Failed: {}  Total: {}  ({:?})",
            self.passed(),
            self.failed(),
            self.total(),
            self.duration
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_suite() -> ScenarioSuite {
        let mut suite = ScenarioSuite::new("sample");
        suite
            .add("ok", |_| Ok(()))
            .add("broken", |_| anyhow::bail!("expected click"))
            .add_with_config("legacy_ok", EventManagerConfig::legacy(), |ctx| {
                anyhow::ensure!(!ctx.manager().config().uses_hover_cursor(), "legacy config lost");
                Ok(())
            });
        suite
    }

    #[test]
    fn test_run_collects_outcomes() {
        let mut runner = ScenarioRunner::new();
        runner.add_suite(sample_suite());
        let report = runner.run();

        assert_eq!(report.total(), 3);
        assert_eq!(report.passed(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.all_passed());
        assert!(report.runs[0].dump.is_empty());
        assert_eq!(
            report.runs[1].outcome,
            ScenarioOutcome::Failed {
                reason: "expected click".to_string()
            }
        );
    }

    #[test]
    fn test_filter_matches_case_or_suite() {
        let mut runner = ScenarioRunner::new();
        runner.add_suite(sample_suite()).filter("ok");
        let report = runner.run();
        assert_eq!(report.total(), 2);
        assert!(report.all_passed());

        let mut runner = ScenarioRunner::new();
        runner.add_suite(sample_suite()).filter("sample");
        assert_eq!(runner.run().total(), 3);
    }

    #[test]
    fn test_by_suite_keeps_order() {
        let mut runner = ScenarioRunner::new();
        let mut other = ScenarioSuite::new("other");
        other.add("ok", |_| Ok(()));
        runner.add_suite(other).add_suite(sample_suite());
        let report = runner.run();
        let suites: Vec<&str> = report.by_suite().keys().copied().collect();
        assert_eq!(suites, vec!["other", "sample"]);
    }
}
