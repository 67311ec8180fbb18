use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use watershed_core::cloud::synthetic::{rolling_hills, Jitter, Layout};
use watershed_core::cloud::write_samples;
use watershed_core::{
    ingest, render_height_map, render_water_overlay, FlowSimulator, Grid, IngestOptions,
    PixelEncoder, PointCloud, SimulationConfig, SimulationParams,
};

mod encoder;

use encoder::ImageEncoder;

/// Point-cloud watershed simulator
#[derive(Parser, Debug)]
#[command(name = "watershed")]
#[command(about = "Grid terrain samples, route surface water and render the result", long_about = None)]
struct Cli {
    /// Reject sample streams whose header count does not match the data
    #[arg(long, global = true)]
    strict_count: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print elevation statistics and the inferred grid shape
    Stats {
        input: PathBuf,
    },
    /// Render the terrain as a grayscale height map
    Display {
        input: PathBuf,
        #[arg(short, long, default_value = "out.gif")]
        output: PathBuf,
        /// Image side in pixels
        #[arg(long, default_value_t = 800)]
        size: usize,
    },
    /// Run the watershed simulation and write water overlay frames
    Simulate(SimulateArgs),
    /// Write a synthetic rolling-hills sample stream
    Generate {
        output: PathBuf,
        #[arg(long, default_value_t = 1000)]
        cols: usize,
        #[arg(long, default_value_t = 1000)]
        rows: usize,
        /// Amplitude of uniform height noise (0 = none)
        #[arg(long, default_value_t = 0.0)]
        jitter: f64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Drop samples with negative heights
    Clean {
        input: PathBuf,
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
struct SimulateArgs {
    input: PathBuf,
    /// JSON file with a `SimulationConfig`; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(short = 'n', long)]
    iterations: Option<usize>,
    /// Water depth added to every cell before the first step
    #[arg(short = 'w', long)]
    initial_water: Option<f64>,
    /// Flow coefficient (0.0-0.2)
    #[arg(long)]
    flow_coef: Option<f64>,
    /// Evaporation coefficient (0.9-1.0)
    #[arg(long)]
    evap_coef: Option<f64>,
    /// Frames are written as `<BASE><step>.gif`, or `<BASE>.gif` for a single final frame
    #[arg(short, long)]
    output_base: String,
    /// Write a frame every N steps plus the last step (0 = final frame only)
    #[arg(long)]
    snapshot_every: Option<usize>,
    /// Image side in pixels
    #[arg(long)]
    size: Option<usize>,
    /// Water depth rendered as pure blue (default: twice the initial water)
    #[arg(long)]
    water_scale: Option<f64>,
}

impl SimulateArgs {
    fn resolve_config(&self) -> Result<SimulationConfig> {
        let mut config = self
            .config
            .as_deref()
            .map(load_config)
            .transpose()?
            .unwrap_or_default();
        if let Some(n) = self.iterations {
            config.iterations = n;
        }
        if let Some(w) = self.initial_water {
            config.initial_water = w;
        }
        if self.flow_coef.is_some() || self.evap_coef.is_some() {
            config.params = SimulationParams::new(
                self.flow_coef.unwrap_or(config.params.flow_coef()),
                self.evap_coef.unwrap_or(config.params.evap_coef()),
            )?;
        }
        if let Some(s) = self.snapshot_every {
            config.snapshot_every = s;
        }
        if let Some(size) = self.size {
            config.image_size = size;
        }
        if self.water_scale.is_some() {
            config.water_scale = self.water_scale;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let options = IngestOptions {
        strict_count: cli.strict_count,
    };

    match &cli.command {
        Command::Stats { input } => stats(input, options),
        Command::Display {
            input,
            output,
            size,
        } => display(input, output, *size, options),
        Command::Simulate(args) => simulate(args, options),
        Command::Generate {
            output,
            cols,
            rows,
            jitter,
            seed,
        } => generate(output, *cols, *rows, *jitter, *seed),
        Command::Clean { input, output } => clean(input, output, options),
    }
}

fn read_cloud(path: &Path, options: IngestOptions) -> Result<PointCloud> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let cloud = ingest(BufReader::new(file), options)
        .with_context(|| format!("reading samples from {}", path.display()))?;
    info!("Read {} samples from {}", cloud.samples.len(), path.display());
    Ok(cloud)
}

fn load_config(path: &Path) -> Result<SimulationConfig> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing config {}", path.display()))
}

fn snapshot_path(base: &str, step: Option<usize>) -> PathBuf {
    let suffix = step.map(|i| i.to_string()).unwrap_or_default();
    PathBuf::from(format!("{base}{suffix}.gif"))
}

fn stats(input: &Path, options: IngestOptions) -> Result<()> {
    let cloud = read_cloud(input, options)?;
    let s = &cloud.statistics;
    println!(
        "Minimum height: {:.2} at grid location ({:.1}, {:.1})",
        s.min_height, s.min_location.0, s.min_location.1
    );
    println!(
        "Maximum height: {:.2} at grid location ({:.1}, {:.1})",
        s.max_height, s.max_location.0, s.max_location.1
    );
    println!("Average height of all data points: {:.2}", s.avg_height);

    match cloud.into_grid() {
        Ok(grid) => println!("\n{}", grid.summary()),
        Err(e) => warn!("Samples do not form a regular grid: {}", e),
    }
    Ok(())
}

fn display(input: &Path, output: &Path, size: usize, options: IngestOptions) -> Result<()> {
    let cloud = read_cloud(input, options)?;
    let image = render_height_map(&cloud.samples, size, size).context("rendering height map")?;
    ImageEncoder.encode(&image, output)?;
    info!("Saved height map to {}", output.display());
    Ok(())
}

fn simulate(args: &SimulateArgs, options: IngestOptions) -> Result<()> {
    let config = args.resolve_config()?;
    let cloud = read_cloud(&args.input, options)?;
    let mut grid = cloud.into_grid().context("building grid")?;
    info!("{}", grid.summary());

    FlowSimulator::add_uniform_water(&mut grid, config.initial_water);
    let mut sim = FlowSimulator::new(config.params);
    let scale = config.effective_water_scale();
    let size = config.image_size;

    // A failed snapshot is logged and skipped; the simulation keeps running.
    let mut failed_frames = 0usize;
    sim.run(&mut grid, config.iterations, |i, g| {
        if config.is_snapshot_step(i) {
            let path = snapshot_path(&args.output_base, Some(i));
            match write_frame(g, &path, scale, size) {
                Ok(()) => info!("Step {}: wrote {}", i, path.display()),
                Err(e) => {
                    failed_frames += 1;
                    warn!("Step {}: skipped frame {}: {}", i, path.display(), e);
                }
            }
        }
        Ok(())
    })
    .context("running simulation")?;
    if failed_frames > 0 {
        warn!("{} snapshot frames could not be written", failed_frames);
    }

    if config.snapshot_every == 0 || config.iterations == 0 {
        // The final frame is the only output here, so its failure is fatal
        let path = snapshot_path(&args.output_base, None);
        write_frame(&grid, &path, scale, size)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Saved final frame to {}", path.display());
    }
    info!(
        "Finished {} steps, total water {:.3}, deepest cell {:.3}",
        sim.steps_taken(),
        grid.total_water(),
        grid.max_water()
    );
    Ok(())
}

fn write_frame(grid: &Grid, path: &Path, scale: f64, size: usize) -> watershed_core::Result<()> {
    ImageEncoder.encode(&render_water_overlay(grid, scale, size, size)?, path)
}

fn generate(output: &Path, cols: usize, rows: usize, jitter: f64, seed: u64) -> Result<()> {
    if cols < 2 || rows < 2 {
        bail!("a grid needs at least 2 rows and 2 columns, got {rows}x{cols}");
    }
    let layout = Layout {
        cols,
        rows,
        ..Layout::default()
    };
    let jitter = (jitter > 0.0).then_some(Jitter {
        amplitude: jitter,
        seed,
    });
    let samples = rolling_hills(&layout, jitter);
    let file = File::create(output).with_context(|| format!("creating {}", output.display()))?;
    write_samples(BufWriter::new(file), &samples)?;
    info!("Wrote {} samples to {}", samples.len(), output.display());
    Ok(())
}

fn clean(input: &Path, output: &Path, options: IngestOptions) -> Result<()> {
    let mut cloud = read_cloud(input, options)?;
    let removed = cloud.discard_negative_heights()?;
    let file = File::create(output).with_context(|| format!("creating {}", output.display()))?;
    cloud.write_to(BufWriter::new(file))?;
    println!(
        "Kept {} samples, removed {} with negative heights",
        cloud.samples.len(),
        removed
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_snapshot_names() {
        assert_eq!(snapshot_path("run", Some(12)), PathBuf::from("run12.gif"));
        assert_eq!(snapshot_path("out/frame_", None), PathBuf::from("out/frame_.gif"));
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "watershed",
            "simulate",
            "terrain.txt",
            "--iterations",
            "20",
            "--initial-water",
            "0.5",
            "--flow-coef",
            "0.05",
            "--output-base",
            "frame",
        ]);
        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        let config = args.resolve_config().unwrap();
        assert_eq!(config.iterations, 20);
        assert_eq!(config.params.flow_coef(), 0.05);
        assert_eq!(config.params.evap_coef(), 0.95);
        assert_eq!(config.effective_water_scale(), 1.0);
    }

    #[test]
    fn test_unwritable_snapshots_do_not_stop_the_run() {
        use watershed_core::cloud::synthetic::flat;

        let dir = std::env::temp_dir().join(format!("watershed-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("terrain.txt");
        write_samples(File::create(&input).unwrap(), &flat(&Layout::square(4), 1.0)).unwrap();
        let base = dir.join("missing").join("frame");

        let input_arg = input.to_string_lossy().into_owned();
        let base_arg = base.to_string_lossy().into_owned();
        let cli = Cli::parse_from([
            "watershed",
            "simulate",
            input_arg.as_str(),
            "--iterations",
            "3",
            "--snapshot-every",
            "1",
            "--output-base",
            base_arg.as_str(),
        ]);
        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        let result = simulate(&args, IngestOptions::default());
        std::fs::remove_dir_all(&dir).unwrap();
        result.unwrap();
    }

    #[test]
    fn test_out_of_range_flag_is_rejected() {
        let cli = Cli::parse_from([
            "watershed",
            "simulate",
            "terrain.txt",
            "--evap-coef",
            "0.5",
            "--output-base",
            "frame",
        ]);
        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        assert!(args.resolve_config().is_err());
    }
}
