use clap::{Parser, Subcommand};
use dsss_stego::cli::{
    embed_into_wav, extract_from_wav, show_info, EmbedOptions, ExtractOptions, MessageSource,
};
use dsss_stego::geometry::{NominalRates, DEFAULT_BIT_RATE, DEFAULT_CHIP_RATE};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Version info from build.rs
const VERSION: &str = env!("DSSS_STEGO_VERSION");
const BUILD: &str = env!("DSSS_STEGO_BUILD");
const PROFILE: &str = env!("DSSS_STEGO_PROFILE");
const GIT_HASH: &str = env!("DSSS_STEGO_GIT_HASH");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} {} build {} ({})", PROFILE, VERSION, BUILD, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "dsss-stego")]
#[command(author, about = "Hide text in audio with direct-sequence spread spectrum", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed a message into a WAV carrier
    #[command(alias = "e")]
    Embed {
        /// Carrier WAV file
        carrier: PathBuf,

        /// Output stego WAV file
        #[arg(default_value = "stego.wav")]
        output: PathBuf,

        /// Message text to hide
        #[arg(long, conflicts_with = "message_file", required_unless_present = "message_file")]
        message: Option<String>,

        /// File holding the message to hide (surrounding whitespace is trimmed)
        #[arg(long)]
        message_file: Option<PathBuf>,

        /// Spread signal amplitude relative to the normalized carrier
        #[arg(long, default_value_t = 0.05)]
        scaling_factor: f64,

        /// Spreading key output
        #[arg(long, default_value = "embed_params.json")]
        params: PathBuf,

        /// Metadata report output
        #[arg(long, default_value = "stego_info.json")]
        report: PathBuf,

        /// Skip writing the metadata report
        #[arg(long)]
        no_report: bool,

        /// Also write the message bit string to this file
        #[arg(long)]
        bits_out: Option<PathBuf>,

        /// Nominal bit rate (bits/s)
        #[arg(long, default_value_t = DEFAULT_BIT_RATE)]
        bit_rate: f64,

        /// Nominal chip rate (chips/s)
        #[arg(long, default_value_t = DEFAULT_CHIP_RATE)]
        chip_rate: f64,
    },

    /// Extract a message from a stego WAV file
    #[command(alias = "x")]
    Extract {
        /// Stego WAV file
        #[arg(default_value = "stego.wav")]
        input: PathBuf,

        /// Spreading key written at embed time
        #[arg(long, default_value = "embed_params.json")]
        params: PathBuf,

        /// File to save the recovered message to
        #[arg(long, default_value = "extracted_message.txt")]
        output: PathBuf,

        /// Only print the message, do not write it to a file
        #[arg(long)]
        no_output: bool,
    },

    /// Show capacity of a WAV carrier
    #[command(alias = "i")]
    Info {
        /// WAV file to inspect
        file: PathBuf,

        /// Also summarise this spreading key
        #[arg(long)]
        params: Option<PathBuf>,

        /// Nominal bit rate (bits/s)
        #[arg(long, default_value_t = DEFAULT_BIT_RATE)]
        bit_rate: f64,

        /// Nominal chip rate (chips/s)
        #[arg(long, default_value_t = DEFAULT_CHIP_RATE)]
        chip_rate: f64,
    },
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("dsss-stego {}", get_version());
        return ExitCode::SUCCESS;
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            let _ = Cli::command().print_help();
            println!();
            return ExitCode::SUCCESS;
        }
    };

    init_logging(cli.verbose);

    let result = match command {
        Commands::Embed {
            carrier,
            output,
            message,
            message_file,
            scaling_factor,
            params,
            report,
            no_report,
            bits_out,
            bit_rate,
            chip_rate,
        } => {
            let Some(source) = message
                .map(MessageSource::Text)
                .or(message_file.map(MessageSource::File))
            else {
                eprintln!("Error: one of --message or --message-file is required");
                return ExitCode::FAILURE;
            };
            let options = EmbedOptions {
                scaling_factor,
                rates: NominalRates {
                    bit_rate,
                    chip_rate,
                },
                params_path: params,
                report_path: if no_report { None } else { Some(report) },
                bits_path: bits_out,
            };

            embed_into_wav(&carrier, &source, &output, &options).map(|info| {
                println!(
                    "Embedded {} bits into {} (SNR {})",
                    info.message_length_bits,
                    output.display(),
                    match info.snr_db {
                        Some(snr) => format!("{:.2} dB", snr),
                        None => "inf dB".to_string(),
                    }
                );
                println!("Spreading key written to {}", options.params_path.display());
                if let Some(path) = &options.report_path {
                    println!("Report written to {}", path.display());
                }
            })
        }

        Commands::Extract {
            input,
            params,
            output,
            no_output,
        } => {
            let options = ExtractOptions {
                output_path: if no_output { None } else { Some(output) },
            };

            extract_from_wav(&input, &params, &options).map(|extracted| {
                if extracted.bits.len() != extracted.expected_bits {
                    eprintln!(
                        "Warning: extracted {} of {} bits",
                        extracted.bits.len(),
                        extracted.expected_bits
                    );
                }
                println!("Extracted message: {}", extracted.message);
                if let Some(path) = &options.output_path {
                    println!("Saved to {}", path.display());
                }
            })
        }

        Commands::Info {
            file,
            params,
            bit_rate,
            chip_rate,
        } => {
            let rates = NominalRates {
                bit_rate,
                chip_rate,
            };
            show_info(&file, params.as_deref(), rates).map(|info| print!("{}", info))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
