//! camera-recenter CLI: re-center an image on a chosen pixel.

use camera_recenter::config::{RecenterConfig, RecenterReport, DEFAULT_FOCAL_PX};
use camera_recenter::io::{load_image, save_image, ColorMode};
use camera_recenter::logging;
use camera_recenter::{
    recenter_image_with, recentering_homography, BorderMode, Image, PinholeIntrinsics,
    RecenterParams,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "camera-recenter")]
#[command(about = "Rotate a pinhole camera virtually so a chosen pixel becomes the image center")]
#[command(version)]
struct Cli {
    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Emit log events as JSON lines.
    #[cfg(feature = "tracing")]
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run from a JSON config file.
    Run {
        /// Path to the JSON config.
        #[arg(long)]
        config: PathBuf,
    },

    /// Re-center an image given on the command line.
    Apply(ApplyArgs),

    /// Print rotation, new intrinsics and homography as JSON without reading pixels.
    Homography(HomographyArgs),
}

#[derive(Debug, Clone, Args)]
struct CameraArgs {
    /// Target pixel x in the source image.
    #[arg(long, allow_hyphen_values = true)]
    target_x: f64,

    /// Target pixel y in the source image.
    #[arg(long, allow_hyphen_values = true)]
    target_y: f64,

    /// Focal length along x in pixels.
    #[arg(long, default_value_t = DEFAULT_FOCAL_PX)]
    fx: f64,

    /// Focal length along y in pixels (defaults to fx).
    #[arg(long)]
    fy: Option<f64>,

    /// Principal point x (defaults to the source center).
    #[arg(long)]
    cx: Option<f64>,

    /// Principal point y (defaults to the source center).
    #[arg(long)]
    cy: Option<f64>,

    /// Output width (defaults to the source width).
    #[arg(long)]
    out_width: Option<usize>,

    /// Output height (defaults to the source height).
    #[arg(long)]
    out_height: Option<usize>,
}

impl CameraArgs {
    fn intrinsics(&self, width: usize, height: usize) -> PinholeIntrinsics {
        let centered = PinholeIntrinsics::centered(self.fx, width, height);
        PinholeIntrinsics::new(
            self.fx,
            self.fy.unwrap_or(self.fx),
            self.cx.unwrap_or(centered.cx),
            self.cy.unwrap_or(centered.cy),
        )
    }

    fn output_size(&self, width: usize, height: usize) -> [usize; 2] {
        [
            self.out_width.unwrap_or(width),
            self.out_height.unwrap_or(height),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorArg {
    Gray,
    Rgb,
    Rgba,
}

impl From<ColorArg> for ColorMode {
    fn from(value: ColorArg) -> Self {
        match value {
            ColorArg::Gray => ColorMode::Gray,
            ColorArg::Rgb => ColorMode::Rgb,
            ColorArg::Rgba => ColorMode::Rgba,
        }
    }
}

#[derive(Debug, Clone, Args)]
struct ApplyArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    /// Path to write the re-centered image.
    #[arg(long)]
    out: PathBuf,

    /// Path to write a JSON report.
    #[arg(long)]
    report: Option<PathBuf>,

    #[command(flatten)]
    camera: CameraArgs,

    /// Fill value for pixels that see outside the source.
    #[arg(long, default_value_t = 0, conflicts_with = "replicate")]
    border_value: u8,

    /// Clamp to the nearest edge pixel instead of filling.
    #[arg(long)]
    replicate: bool,

    /// Channel layout used for decoding.
    #[arg(long, value_enum, default_value_t = ColorArg::Rgb)]
    color: ColorArg,
}

#[derive(Debug, Clone, Args)]
struct HomographyArgs {
    /// Source image width.
    #[arg(long)]
    width: usize,

    /// Source image height.
    #[arg(long)]
    height: usize,

    #[command(flatten)]
    camera: CameraArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    init_logging(&cli);

    match cli.command {
        Commands::Run { config } => run_config(&config),
        Commands::Apply(args) => run_apply(args),
        Commands::Homography(args) => run_homography(args),
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli) {
    logging::init(logging::verbosity(cli.verbose, cli.quiet));
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli) {
    logging::init_tracing(logging::verbosity(cli.verbose, cli.quiet), cli.log_json);
}

fn run_config(path: &Path) -> CliResult<()> {
    let cfg = RecenterConfig::load_json(path)?;
    execute(&cfg, ColorMode::Rgb)
}

fn run_apply(args: ApplyArgs) -> CliResult<()> {
    let border = if args.replicate {
        BorderMode::Replicate
    } else {
        BorderMode::Constant(args.border_value)
    };
    let mut cfg = RecenterConfig::new(
        args.image.to_string_lossy(),
        args.camera.target_x,
        args.camera.target_y,
    );
    cfg.border = border;
    cfg.output_path = Some(args.out.to_string_lossy().into_owned());
    cfg.report_path = args.report.map(|p| p.to_string_lossy().into_owned());

    // Principal point defaults depend on the source size, resolved after decoding.
    let src = load_image(&cfg.image_path, args.color.into())?;
    cfg.intrinsics = Some(args.camera.intrinsics(src.width, src.height));
    cfg.output_size = Some(args.camera.output_size(src.width, src.height));
    execute_loaded(&cfg, src)
}

fn execute(cfg: &RecenterConfig, mode: ColorMode) -> CliResult<()> {
    let src = load_image(&cfg.image_path, mode)?;
    execute_loaded(cfg, src)
}

fn execute_loaded(cfg: &RecenterConfig, src: Image) -> CliResult<()> {
    let params = cfg.build_params(src.width, src.height);
    let res = recenter_image_with(&src.view(), &params)?;

    let out_path = cfg.output_path();
    save_image(&out_path, &res.image)?;
    log::info!(
        "re-centered {} on ({:.1}, {:.1}) -> {} ({}x{})",
        cfg.image_path,
        params.target[0],
        params.target[1],
        out_path.display(),
        res.image.width,
        res.image.height
    );

    if let Some(report_path) = &cfg.report_path {
        RecenterReport::new([src.width, src.height], &params, &res.geometry)
            .with_paths(
                Some(cfg.image_path.clone()),
                Some(out_path.to_string_lossy().into_owned()),
            )
            .write_json(report_path)?;
        log::info!("report written to {report_path}");
    }
    Ok(())
}

fn run_homography(args: HomographyArgs) -> CliResult<()> {
    let k = args.camera.intrinsics(args.width, args.height);
    let [out_w, out_h] = args.camera.output_size(args.width, args.height);
    let geometry = recentering_homography(
        args.camera.target_x,
        args.camera.target_y,
        &k.matrix(),
        out_w,
        out_h,
    )?;
    let params = RecenterParams::new(args.camera.target_x, args.camera.target_y, k.matrix())
        .with_output_size(out_w, out_h);
    let report = RecenterReport::new([args.width, args.height], &params, &geometry);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
