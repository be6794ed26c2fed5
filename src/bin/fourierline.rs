use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "fourierline", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute Fourier coefficients and print them as JSON.
    Coeffs(CoeffsArgs),
    /// Sample the truncated series on an inclusive grid and print JSON.
    Sample(SampleArgs),
    /// Plot one or two approximations as a PNG chart.
    Plot(PlotArgs),
    /// Render the degree-by-degree convergence timeline as numbered PNG frames.
    Animate(AnimateArgs),
}

#[derive(Parser, Debug)]
struct CoeffsArgs {
    /// Number of harmonics.
    #[arg(long)]
    degree: usize,

    /// Function to approximate.
    #[arg(long, value_enum, default_value_t = TargetChoice::Reference)]
    target: TargetChoice,

    /// Lower domain limit.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    low: f64,

    /// Upper domain limit; the period is `high - low`.
    #[arg(long, default_value_t = 400.0, allow_hyphen_values = true)]
    high: f64,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Number of harmonics.
    #[arg(long)]
    degree: usize,

    /// Number of sample points, endpoints included.
    #[arg(long, default_value_t = 1000)]
    points: usize,

    /// Function to approximate.
    #[arg(long, value_enum, default_value_t = TargetChoice::Reference)]
    target: TargetChoice,

    /// Lower domain limit.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    low: f64,

    /// Upper domain limit; the period is `high - low`.
    #[arg(long, default_value_t = 400.0, allow_hyphen_values = true)]
    high: f64,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PlotArgs {
    /// Number of harmonics.
    #[arg(long)]
    degree: usize,

    /// Function to approximate.
    #[arg(long, value_enum, default_value_t = TargetChoice::Reference)]
    target: TargetChoice,

    /// Second function, approximated to the same degree and drawn alongside.
    #[arg(long, value_enum)]
    compare: Option<TargetChoice>,

    /// Number of sample points per curve.
    #[arg(long, default_value_t = 1000)]
    points: usize,

    /// Lower domain limit.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    low: f64,

    /// Upper domain limit; the period is `high - low`.
    #[arg(long, default_value_t = 400.0, allow_hyphen_values = true)]
    high: f64,

    /// Chart width in pixels.
    #[arg(long, default_value_t = fourierline::DEFAULT_WIDTH)]
    width: u32,

    /// Chart height in pixels.
    #[arg(long, default_value_t = fourierline::DEFAULT_HEIGHT)]
    height: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct AnimateArgs {
    /// Directory receiving `frame_00000.png`, `frame_00001.png`, ...
    #[arg(long)]
    out_dir: PathBuf,

    /// Animation config JSON; every field is optional.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Function to approximate.
    #[arg(long, value_enum, default_value_t = TargetChoice::Reference)]
    target: TargetChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TargetChoice {
    Reference,
    Square,
    Sawtooth,
}

impl From<TargetChoice> for fourierline::TargetPreset {
    fn from(choice: TargetChoice) -> Self {
        match choice {
            TargetChoice::Reference => Self::Reference,
            TargetChoice::Square => Self::Square,
            TargetChoice::Sawtooth => Self::Sawtooth,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(default)]
struct AnimationConfig {
    schedule: fourierline::DegreeSchedule,
    num_points: usize,
    low: f64,
    high: f64,
    timeline: fourierline::TimelineSettings,
    chart: fourierline::ChartSettings,
    quadrature: fourierline::QuadratureOpts,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            schedule: fourierline::DegreeSchedule::reference(),
            num_points: 401,
            low: 0.0,
            high: fourierline::REFERENCE_PERIOD,
            timeline: fourierline::TimelineSettings::default(),
            chart: fourierline::ChartSettings::default(),
            quadrature: fourierline::QuadratureOpts::default(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Coeffs(args) => cmd_coeffs(args),
        Command::Sample(args) => cmd_sample(args),
        Command::Plot(args) => cmd_plot(args),
        Command::Animate(args) => cmd_animate(args),
    }
}

fn build_target(
    choice: TargetChoice,
    low: f64,
    high: f64,
) -> anyhow::Result<fourierline::PiecewiseFunction> {
    let domain = fourierline::Domain::new(low, high)?;
    let preset = fourierline::TargetPreset::from(choice);
    preset
        .build(domain.period())
        .with_context(|| format!("build target {preset:?}"))
}

fn read_config(path: &Path) -> anyhow::Result<AnimationConfig> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let r = BufReader::new(f);
    let config: AnimationConfig =
        serde_json::from_reader(r).with_context(|| "parse animation config JSON")?;
    Ok(config)
}

fn write_json(value: &impl serde::Serialize, out: Option<&Path>) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output JSON")?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(path, text + "\n")
                .with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}").context("write stdout")?;
        }
    }
    Ok(())
}

fn cmd_coeffs(args: CoeffsArgs) -> anyhow::Result<()> {
    let target = build_target(args.target, args.low, args.high)?;
    let coeffs = fourierline::compute_coefficients(&target, args.degree, args.low, args.high)?;
    write_json(&coeffs, args.out.as_deref())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let target = build_target(args.target, args.low, args.high)?;
    let coeffs = fourierline::compute_coefficients(&target, args.degree, args.low, args.high)?;
    let samples = fourierline::sample_series(
        &coeffs,
        args.degree,
        args.high - args.low,
        args.low,
        args.high,
        args.points,
    )?;
    let report = serde_json::json!({
        "degree": args.degree,
        "low": args.low,
        "high": args.high,
        "samples": samples,
    });
    write_json(&report, args.out.as_deref())
}

fn cmd_plot(args: PlotArgs) -> anyhow::Result<()> {
    let target = build_target(args.target, args.low, args.high)?;
    let compare = args
        .compare
        .map(|c| build_target(c, args.low, args.high))
        .transpose()?;

    let comparison = fourierline::comparison_samples(
        &target,
        compare.as_ref(),
        args.degree,
        args.low,
        args.high,
        args.points,
        &fourierline::QuadratureOpts::default(),
    )?;

    let mut curves = vec![fourierline::Curve::new(
        comparison.primary,
        fourierline::CURVE_COLORS[0],
    )];
    if let Some(secondary) = comparison.secondary {
        curves.push(fourierline::Curve::new(
            secondary,
            fourierline::CURVE_COLORS[1],
        ));
    }

    let settings = fourierline::ChartSettings {
        width: args.width,
        height: args.height,
        ..fourierline::ChartSettings::default()
    };
    let frame = fourierline::render_chart(&curves, &settings)?;
    fourierline::write_png(&frame, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_animate(args: AnimateArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => AnimationConfig::default(),
    };
    let domain = fourierline::Domain::new(config.low, config.high)?;
    let target = build_target(args.target, domain.low, domain.high)?;

    let steps = fourierline::build_convergence(
        &target,
        &config.schedule,
        domain,
        config.num_points,
        &config.quadrature,
    )?;
    let timeline = fourierline::Timeline::new(&steps, config.timeline)?;

    let backdrop = fourierline::Curve::new(
        fourierline::sample_target(&target, domain.low, domain.high, config.num_points),
        fourierline::CURVE_COLORS[2],
    );

    // Keep the axes still: one y range for the whole run.
    let mut chart = config.chart.clone();
    if chart.y_range.is_none() {
        let mut all = vec![backdrop.clone()];
        all.extend(
            steps
                .iter()
                .map(|s| fourierline::Curve::new(s.samples.clone(), fourierline::CURVE_COLORS[0])),
        );
        let b = fourierline::ChartBounds::from_curves(&all, None)?;
        chart.y_range = Some((b.y0, b.y1));
    }

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut written = 0u64;
    for frame in timeline.frames() {
        let frame = frame?;
        let curves = [
            backdrop.clone(),
            fourierline::Curve::new(frame.samples, fourierline::CURVE_COLORS[0]),
        ];
        let pixels = fourierline::render_chart(&curves, &chart)?;
        let path = args.out_dir.join(format!("frame_{:05}.png", frame.frame.0));
        fourierline::write_png(&pixels, &path)?;
        written += 1;
    }

    eprintln!(
        "wrote {written} frames ({:.2}s at {} fps) to {}",
        timeline.duration_s(),
        timeline.settings().fps,
        args.out_dir.display()
    );
    Ok(())
}
