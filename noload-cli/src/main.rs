//! Command-line interface for the NoLoad NVMe vendor plugin

use clap::{Parser, Subcommand, ValueEnum};
use noload::render::{json, text, Mode, OutputFormat};
use noload::transport::DEFAULT_DEV_ROOT;
use noload::{NoloadError, Result};

#[derive(Parser)]
#[command(name = "noload-nvme")]
#[command(version = noload::VERSION)]
#[command(about = "Eideticom NoLoad vendor-specific identify decoder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Device directory to scan for the list command
    #[arg(long, default_value = DEFAULT_DEV_ROOT)]
    dev_root: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Retrieve basic information for any Eideticom namespaces in the system
    List {
        /// Output format
        #[arg(short = 'o', long, value_enum, default_value_t = Format::Normal)]
        output_format: Format,
    },

    /// Send Identify Controller to the given device and decode the vendor
    /// specific properties; fails on non-Eideticom devices
    IdCtrl {
        /// Device node, e.g. /dev/nvme0
        device: String,

        /// Show infos in readable format
        #[arg(short = 'H', long)]
        human_readable: bool,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value_t = Format::Normal)]
        output_format: Format,
    },

    /// Send Identify Namespace to the given device and decode the vendor
    /// specific properties; fails on non-Eideticom devices
    IdNs {
        /// Device node, e.g. /dev/nvme0n1
        device: String,

        /// Identifier of the desired namespace
        #[arg(short = 'n', long)]
        namespace_id: Option<u32>,

        /// Show infos in readable format
        #[arg(short = 'H', long)]
        human_readable: bool,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value_t = Format::Normal)]
        output_format: Format,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    Normal,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Normal => OutputFormat::Normal,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn mode_for(human_readable: bool) -> Mode {
    if human_readable {
        Mode::Verbose
    } else {
        Mode::Plain
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        eprintln!("{err}");
        std::process::exit(exit_code(&err));
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::List { output_format } => {
            if *output_format == Format::Json {
                return Err(NoloadError::Usage(
                    "json not yet supported for list".to_string(),
                ));
            }
            let entries = noload::list_controllers(&cli.dev_root)?;
            if !entries.is_empty() {
                print!("{}", text::render_list(&entries));
            }
        }

        Commands::IdCtrl {
            device,
            human_readable,
            output_format,
        } => {
            let report = noload::controller_report(device)?;
            let mode = mode_for(*human_readable);
            match OutputFormat::from(*output_format) {
                OutputFormat::Normal => print!("{}", text::render_ctrl(&report.record, mode)),
                OutputFormat::Json => {
                    println!("{}", serde_pretty(&json::ctrl_json(&report.record, mode))?)
                }
            }
        }

        Commands::IdNs {
            device,
            namespace_id,
            human_readable,
            output_format,
        } => {
            let report = noload::namespace_report(device, *namespace_id)?;
            let mode = mode_for(*human_readable);
            match OutputFormat::from(*output_format) {
                OutputFormat::Normal => {
                    print!("{}", text::render_ns(&report.record, report.nsid, mode))
                }
                OutputFormat::Json => {
                    println!("{}", serde_pretty(&json::ns_json(&report.record, mode))?)
                }
            }
        }
    }

    Ok(())
}

fn serde_pretty(value: &serde_json::Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Map the error taxonomy to process exit codes in one place
fn exit_code(err: &NoloadError) -> i32 {
    match err {
        NoloadError::Usage(_) => 2,
        NoloadError::VendorMismatch { .. } => 1,
        NoloadError::NvmeStatus { status, .. } => (*status).clamp(1, 255) as i32,
        NoloadError::Io(io_err) => io_err.raw_os_error().unwrap_or(1),
        _ => 1,
    }
}
