use std::fmt::Display;
use std::time::Instant;

use clap::Parser;
use coalign::{AlignConfig, AlignmentEngine, AlignmentSet, Dedup, GapPenalties, UniformScoring};
use sysinfo::{get_current_pid, ProcessRefreshKind, System};

/// Time the co-optimal search on growing inputs and check every run against
/// an independent reference. Progress goes to stderr, CSV rows to stdout.
#[derive(Parser, Debug)]
#[command(name = "scale_probe", about, long_about = None)]
struct Options {
    /// Longest input whose best score is checked against the Gotoh table
    #[arg(long, default_value_t = 256)]
    verify_limit: usize,
    /// Frontier bound passed to the engine in every scenario
    #[arg(long, default_value_t = 1 << 20)]
    max_frontier: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Skipped,
    Passed,
    Failed,
    Aborted,
}

impl Verdict {
    fn label(self) -> &'static str {
        match self {
            Verdict::Skipped => "not_checked",
            Verdict::Passed => "passed",
            Verdict::Failed => "failed",
            Verdict::Aborted => "aborted",
        }
    }
}

/// What a run is checked against.
#[derive(Clone, Copy)]
enum Reference {
    /// Best score equals the three-state Gotoh optimum.
    BestScore,
    /// Number of alignments equals the number of grid walks.
    PathCount,
}

struct Scenario {
    name: &'static str,
    about: &'static str,
    sizes: &'static [usize],
    /// Rotation of the second input relative to the first.
    shift: usize,
    scoring: UniformScoring,
    config: AlignConfig,
    reference: Reference,
}

struct Row {
    scenario: &'static str,
    len: usize,
    wall_s: f64,
    rss_delta_kib: u64,
    alignments: usize,
    best_score: Option<i64>,
    verdict: Verdict,
    detail: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();
    let options = Options::parse();

    let scenarios = [
        Scenario {
            name: "linear_gap",
            about: "shifted repeats, linear gaps",
            // Tied gap placements multiply quickly on repeats; keep these short.
            sizes: &[8, 16, 24, 32, 40, 48],
            shift: 1,
            scoring: UniformScoring::new(2, -1),
            config: AlignConfig {
                gaps: GapPenalties::new(-2, -2),
                ..AlignConfig::default()
            },
            reference: Reference::BestScore,
        },
        Scenario {
            name: "affine_gap",
            about: "shifted repeats, affine gaps",
            sizes: &[16, 32, 64, 128, 256],
            shift: 2,
            scoring: UniformScoring::new(2, -1),
            config: AlignConfig {
                gaps: GapPenalties::new(-3, -1),
                ..AlignConfig::default()
            },
            reference: Reference::BestScore,
        },
        Scenario {
            name: "all_ties",
            about: "zero-cost scoring, every walk ties",
            sizes: &[2, 3, 4, 5, 6, 7],
            shift: 3,
            scoring: UniformScoring::new(0, 0),
            config: AlignConfig {
                gaps: GapPenalties::new(0, 0),
                dedup: Dedup::ByPositions,
                max_frontier: None,
            },
            reference: Reference::PathCount,
        },
    ];

    let mut meter = Meter::new();
    let mut rows = Vec::new();
    for (idx, scenario) in scenarios.iter().enumerate() {
        eprintln!("[{}/{}] {}", idx + 1, scenarios.len(), scenario.about);
        for &len in scenario.sizes {
            let row = meter.run(scenario, len, &options);
            eprintln!(
                "      len={len} alignments={} time={:.3}s status={}",
                row.alignments,
                row.wall_s,
                row.verdict.label()
            );
            rows.push(row);
        }
    }

    println!("scenario,len,wall_s,rss_delta_kib,alignments,best_score,status,detail");
    for row in &rows {
        println!(
            "{},{},{:.3},{},{},{},{},\"{}\"",
            row.scenario,
            row.len,
            row.wall_s,
            row.rss_delta_kib,
            row.alignments,
            row.best_score.map(|s| s.to_string()).unwrap_or_default(),
            row.verdict.label(),
            row.detail.replace('"', "'")
        );
    }

    let failed = rows.iter().filter(|r| r.verdict == Verdict::Failed).count();
    if failed > 0 {
        eprintln!("{failed} run(s) disagree with their reference");
        std::process::exit(1);
    }
}

/// Runs one scenario size and samples resident memory around it.
struct Meter {
    sys: System,
}

impl Meter {
    fn new() -> Self {
        Self { sys: System::new() }
    }

    fn rss_kib(&mut self) -> u64 {
        self.sys.refresh_processes_specifics(ProcessRefreshKind::new());
        get_current_pid()
            .ok()
            .and_then(|pid| self.sys.process(pid))
            .map_or(0, |process| process.memory() / 1024)
    }

    fn run(&mut self, scenario: &Scenario, len: usize, options: &Options) -> Row {
        let seq_a = shifted_dna(len, 0);
        let seq_b = shifted_dna(len, scenario.shift);
        let config = AlignConfig {
            max_frontier: Some(options.max_frontier),
            ..scenario.config
        };
        let engine = AlignmentEngine::new(scenario.scoring, config);

        let before = self.rss_kib();
        let start = Instant::now();
        let result = engine.align(&seq_a, &seq_b);
        let wall_s = start.elapsed().as_secs_f64();
        let rss_delta_kib = self.rss_kib().saturating_sub(before);

        let (alignments, best_score, verdict, detail) = match result {
            Ok(set) => {
                let (verdict, detail) =
                    verify(scenario, &seq_a, &seq_b, &set, options.verify_limit);
                (set.len(), Some(set.best_score), verdict, detail)
            }
            Err(err) => (0, None, Verdict::Aborted, err.to_string()),
        };
        Row {
            scenario: scenario.name,
            len,
            wall_s,
            rss_delta_kib,
            alignments,
            best_score,
            verdict,
            detail,
        }
    }
}

fn verify(
    scenario: &Scenario,
    seq_a: &[u8],
    seq_b: &[u8],
    set: &AlignmentSet,
    verify_limit: usize,
) -> (Verdict, String) {
    match scenario.reference {
        Reference::BestScore if seq_a.len().max(seq_b.len()) > verify_limit => {
            (Verdict::Skipped, String::new())
        }
        Reference::BestScore => compare(
            set.best_score,
            gotoh_score(seq_a, seq_b, scenario.scoring, scenario.config.gaps),
        ),
        Reference::PathCount => compare(set.len() as u64, delannoy(seq_a.len(), seq_b.len())),
    }
}

fn compare<T: PartialEq + Display>(got: T, expected: T) -> (Verdict, String) {
    if got == expected {
        (Verdict::Passed, String::new())
    } else {
        (Verdict::Failed, format!("expected {expected}, got {got}"))
    }
}

/// `ACGT` repeated, rotated left by `shift`.
fn shifted_dna(len: usize, shift: usize) -> Vec<u8> {
    const ALPHABET: &[u8] = b"ACGT";
    (0..len)
        .map(|i| ALPHABET[(i + shift) % ALPHABET.len()])
        .collect()
}

/// Number of monotone paths from (0,0) to (m,n) with unit, right and
/// diagonal steps.
fn delannoy(m: usize, n: usize) -> u64 {
    let mut d = vec![vec![1u64; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            d[i][j] = d[i - 1][j] + d[i][j - 1] + d[i - 1][j - 1];
        }
    }
    d[m][n]
}

/// Three-state Gotoh optimum. A run of k gaps in one sequence costs
/// `open + (k - 1) * extend`, and switching sides opens a new run. With
/// `open == extend` this is plain Needleman-Wunsch.
fn gotoh_score(s: &[u8], t: &[u8], scoring: UniformScoring, gaps: GapPenalties) -> i64 {
    let (n, m) = (s.len(), t.len());
    let (open, extend) = (i64::from(gaps.open), i64::from(gaps.extend));
    let neg_inf = i64::MIN / 4;
    let mut diag = vec![vec![neg_inf; m + 1]; n + 1];
    let mut up = vec![vec![neg_inf; m + 1]; n + 1];
    let mut left = vec![vec![neg_inf; m + 1]; n + 1];
    diag[0][0] = 0;
    for j in 1..=m {
        left[0][j] = open + (j as i64 - 1) * extend;
    }
    for i in 1..=n {
        up[i][0] = open + (i as i64 - 1) * extend;
    }
    for i in 1..=n {
        for j in 1..=m {
            let pair = i64::from(if s[i - 1] == t[j - 1] {
                scoring.matched
            } else {
                scoring.mismatched
            });
            diag[i][j] = diag[i - 1][j - 1]
                .max(up[i - 1][j - 1])
                .max(left[i - 1][j - 1])
                + pair;
            up[i][j] = (diag[i - 1][j].max(left[i - 1][j]) + open).max(up[i - 1][j] + extend);
            left[i][j] = (diag[i][j - 1].max(up[i][j - 1]) + open).max(left[i][j - 1] + extend);
        }
    }
    diag[n][m].max(up[n][m]).max(left[n][m])
}
