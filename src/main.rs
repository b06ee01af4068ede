use clap::Parser;
use serial_framegrab::config::{ConfigLoader, LogFormat};
use serial_framegrab::output::{load_dump, show_image, write_png};
use serial_framegrab::pipeline::format_device_list;
use serial_framegrab::{
    logging, AppError, AppResult, CancellationToken, Completion, Config, DeviceHandle,
    LogProgress, Pipeline, RunSummary, SerialPortOpener,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::signal;
use tracing::{error, info, warn};

// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Capture a raster frame streamed over a serial port.",
    long_about = "Finds a serial device, reads one frame of raw pixel bytes from it (row-major, one byte per channel), and saves the frame as a nested JSON dump and a PNG. Press Ctrl+C to stop early and keep what has arrived."
)]
struct Args {
    /// Configuration file (otherwise the standard locations are searched).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial device to use instead of auto-discovery.
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate of the transmitter.
    #[arg(short, long)]
    baud: Option<u32>,

    /// Frame height in rows.
    #[arg(long)]
    height: Option<usize>,

    /// Frame width in pixels.
    #[arg(long)]
    width: Option<usize>,

    /// Where to write the nested JSON dump.
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Where to write the PNG.
    #[arg(long)]
    image_out: Option<PathBuf>,

    /// Open the image in the desktop viewer when done.
    #[arg(long)]
    show: bool,

    /// Log format: pretty, compact or json.
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Print the devices that pass the probe and exit.
    #[arg(long)]
    list: bool,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    dump_config: bool,

    /// Re-render the PNG from an existing JSON dump without touching any device.
    #[arg(long, value_name = "DUMP")]
    replay: Option<PathBuf>,
}

impl Args {
    fn load_config(&self) -> AppResult<ConfigLoader> {
        let mut loader = match &self.config {
            Some(path) => ConfigLoader::load_from(path)?,
            None => ConfigLoader::load()?,
        };
        self.apply(loader.config_mut());
        Ok(loader)
    }

    fn apply(&self, config: &mut Config) {
        if let Some(port) = &self.port {
            config.serial.port = Some(port.clone());
        }
        if let Some(baud) = self.baud {
            config.serial.baud_rate = baud;
        }
        if let Some(height) = self.height {
            config.capture.height = height;
        }
        if let Some(width) = self.width {
            config.capture.width = width;
        }
        if let Some(path) = &self.json_out {
            config.output.json_path = path.clone();
        }
        if let Some(path) = &self.image_out {
            config.output.image_path = path.clone();
        }
        if self.show {
            config.output.show = true;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
    }
}

// --- Main Application Entry Point ---
#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let loader = match args.load_config() {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Error: {e}");
            return exit_code(&e);
        }
    };
    logging::init(&loader.config().logging);
    if let Some(path) = &loader.config_path {
        info!("Loaded configuration from {}", path.display());
    }

    match run(&args, loader).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            exit_code(&e)
        }
    }
}

async fn run(args: &Args, loader: ConfigLoader) -> AppResult<()> {
    if args.dump_config {
        print!("{}", loader.to_toml()?);
        return Ok(());
    }

    let config = loader.into_config();

    if let Some(dump) = &args.replay {
        let grid = load_dump(dump)?;
        write_png(&grid, &config.output.image_path)?;
        println!("Rendered {} to {}", dump.display(), config.output.image_path.display());
        if config.output.show {
            show_image(&config.output.image_path);
        }
        return Ok(());
    }

    if args.list {
        let devices = tokio::task::spawn_blocking(move || discover_blocking(config))
            .await
            .map_err(join_error)??;
        println!("{}", format_device_list(&devices));
        return Ok(());
    }

    let token = CancellationToken::new();
    let interrupt = token.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping capture");
            interrupt.cancel();
        }
    });

    let summary = tokio::task::spawn_blocking(move || capture_blocking(config, &token))
        .await
        .map_err(join_error)??;

    match summary.completion {
        Completion::Full => info!("Captured full frame from {}", summary.device),
        Completion::Partial => warn!(
            "Partial frame from {}: {} complete rows, {} bytes",
            summary.device, summary.rows_completed, summary.bytes_read
        ),
    }
    Ok(())
}

fn discover_blocking(config: Config) -> AppResult<Vec<DeviceHandle>> {
    let opener = SerialPortOpener;
    let pipeline = Pipeline::new(config, &opener);
    let devices = pipeline.discover()?;
    Ok(devices)
}

/// Resolve the device, print the device set and the choice, then capture.
fn capture_blocking(config: Config, token: &CancellationToken) -> AppResult<RunSummary> {
    let opener = SerialPortOpener;
    let pipeline = Pipeline::new(config, &opener);
    pipeline.config().validate()?;

    let (discovered, device) = pipeline.resolve_device()?;
    if pipeline.config().serial.port.is_none() {
        println!("{}", format_device_list(&discovered));
    }
    println!("Using port {device}.");

    let summary = pipeline.capture(discovered, device, token, &mut LogProgress::new())?;
    Ok(summary)
}

fn join_error(e: tokio::task::JoinError) -> AppError {
    AppError::Task(e.to_string())
}

fn exit_code(e: &AppError) -> ExitCode {
    ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
}
