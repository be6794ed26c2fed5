use std::time::{Duration, Instant};

use anyhow::Context as _;
use serde_json::json;

#[derive(Clone, Debug)]
struct BenchArgs {
    warmup: u32,
    repeats: u32,
    points: usize,
    low: f64,
    high: f64,
}

#[derive(Clone, Debug, Default)]
struct RunMetrics {
    per_degree_total: Duration,
    max_degree: Duration,
    convergence: Duration,
    wall_total: Duration,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let args = parse_args()?;

    if args.repeats == 0 {
        anyhow::bail!("--repeats must be > 0");
    }
    if args.points < 2 {
        anyhow::bail!("--points must be >= 2");
    }
    let domain = fourierline::Domain::new(args.low, args.high)?;
    let target = fourierline::reference_function()?;
    let schedule = fourierline::DegreeSchedule::reference();

    eprintln!(
        "bench: {repeats} run(s) ({profile} build), schedule of {steps} degrees up to {max}, {points} points",
        repeats = args.repeats,
        profile = if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
        steps = schedule.degrees().len(),
        max = schedule.max_degree(),
        points = args.points,
    );

    for _ in 0..args.warmup {
        run_once(&args, &target, &schedule, domain)?;
    }

    let mut runs = Vec::<RunMetrics>::with_capacity(args.repeats as usize);
    for _ in 0..args.repeats {
        runs.push(run_once(&args, &target, &schedule, domain)?);
    }

    let report = report_percentiles(&runs);
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "repeats": args.repeats,
            "points": args.points,
            "schedule": schedule.degrees(),
            "stages": report,
        }))
        .context("serialize bench report")?
    );
    Ok(())
}

fn run_once(
    args: &BenchArgs,
    target: &fourierline::PiecewiseFunction,
    schedule: &fourierline::DegreeSchedule,
    domain: fourierline::Domain,
) -> anyhow::Result<RunMetrics> {
    let mut m = RunMetrics::default();
    let wall = Instant::now();

    let t = Instant::now();
    for &degree in schedule.degrees() {
        let c = fourierline::compute_coefficients(target, degree, domain.low, domain.high)
            .with_context(|| format!("coefficients at degree {degree}"))?;
        std::hint::black_box(c);
    }
    m.per_degree_total = t.elapsed();

    let t = Instant::now();
    let c = fourierline::compute_coefficients(
        target,
        schedule.max_degree(),
        domain.low,
        domain.high,
    )?;
    std::hint::black_box(c);
    m.max_degree = t.elapsed();

    let t = Instant::now();
    let steps = fourierline::build_convergence(
        target,
        schedule,
        domain,
        args.points,
        &fourierline::QuadratureOpts::default(),
    )?;
    std::hint::black_box(steps);
    m.convergence = t.elapsed();

    m.wall_total = wall.elapsed();
    Ok(m)
}

fn parse_args() -> anyhow::Result<BenchArgs> {
    let mut args = std::env::args().skip(1);

    let mut out = BenchArgs {
        warmup: 1,
        repeats: 20,
        points: 401,
        low: 0.0,
        high: fourierline::REFERENCE_PERIOD,
    };

    while let Some(a) = args.next() {
        match a.as_str() {
            "--warmup" => out.warmup = parse_value(args.next(), "--warmup")?,
            "--repeats" => out.repeats = parse_value(args.next(), "--repeats")?,
            "--points" => out.points = parse_value(args.next(), "--points")?,
            "--low" => out.low = parse_value(args.next(), "--low")?,
            "--high" => out.high = parse_value(args.next(), "--high")?,
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => anyhow::bail!("unknown arg '{a}' (try --help)"),
        }
    }

    Ok(out)
}

fn print_help() {
    eprintln!(
        r#"fourierline-bench

Computes reference-function coefficients over the reference degree schedule repeatedly
and reports p50/p90/p99 per stage (JSON on stdout).

Usage:
  cargo run -q --release
  cargo run -q --release -- --repeats 50 --points 1000

Args:
  --warmup N   (default 1)
  --repeats N  (default 20)
  --points N   (default 401; samples per convergence step)
  --low X      (default 0)
  --high X     (default 400)
"#
    );
}

fn parse_value<T>(v: Option<String>, flag: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let v = v.ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))?;
    v.parse::<T>()
        .with_context(|| format!("parse {flag} value '{v}'"))
}

fn report_percentiles(runs: &[RunMetrics]) -> serde_json::Value {
    type Getter = fn(&RunMetrics) -> Duration;
    type Field = (&'static str, Getter);

    fn collect(runs: &[RunMetrics], f: Getter) -> Vec<Duration> {
        let mut v = runs.iter().map(f).collect::<Vec<_>>();
        v.sort_by_key(|d| d.as_nanos());
        v
    }

    fn p(v: &[Duration], p: f64) -> Duration {
        if v.is_empty() {
            return Duration::ZERO;
        }
        let n = v.len();
        let rank = (p * (n as f64)).ceil().clamp(1.0, n as f64) as usize;
        v[rank - 1]
    }

    fn ms(d: Duration) -> f64 {
        d.as_secs_f64() * 1000.0
    }

    let fields: &[Field] = &[
        ("per_degree_total", |m| m.per_degree_total),
        ("max_degree", |m| m.max_degree),
        ("convergence", |m| m.convergence),
        ("wall_total", |m| m.wall_total),
    ];

    let mut report = serde_json::Map::new();
    eprintln!("\npercentiles across runs (p50/p90/p99):");
    for (name, getter) in fields {
        let v = collect(runs, *getter);
        let (p50, p90, p99) = (ms(p(&v, 0.50)), ms(p(&v, 0.90)), ms(p(&v, 0.99)));
        eprintln!("  {name:18} p50={p50:>9.3}ms  p90={p90:>9.3}ms  p99={p99:>9.3}ms");
        report.insert(
            (*name).to_string(),
            json!({ "p50_ms": p50, "p90_ms": p90, "p99_ms": p99 }),
        );
    }
    serde_json::Value::Object(report)
}
