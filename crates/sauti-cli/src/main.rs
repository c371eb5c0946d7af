//! Sauti CLI - inspect models and audio files from the terminal.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sauti_core::audio::{f32_to_i16, read_wav, resample_linear, write_wav};
use sauti_core::catalog;
use sauti_core::Result;

/// Sauti - on-device speech and text inference
///
/// Examples:
///   sauti models list             # List the model catalog
///   sauti wav info audio.wav      # Show WAV file details
///   sauti wav resample in.wav out.wav --rate 16000
#[derive(Parser)]
#[command(
    name = "sauti",
    about = "On-device speech and text inference",
    version = env!("CARGO_PKG_VERSION"),
    arg_required_else_help = true,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the model catalog
    #[command(subcommand)]
    Models(ModelsCommand),

    /// Inspect and convert WAV audio
    #[command(subcommand)]
    Wav(WavCommand),
}

#[derive(Subcommand)]
enum ModelsCommand {
    /// List all catalog models
    List {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one catalog model by id
    Show { id: String },
}

#[derive(Subcommand)]
enum WavCommand {
    /// Print sample rate, sample count and duration
    Info { path: PathBuf },
    /// Resample a mono WAV file to a new rate
    Resample {
        input: PathBuf,
        output: PathBuf,
        /// Target sample rate in Hz
        #[arg(long, default_value_t = 16_000)]
        rate: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Models(ModelsCommand::List { json }) => models_list(json),
        Commands::Models(ModelsCommand::Show { id }) => models_show(&id),
        Commands::Wav(WavCommand::Info { path }) => wav_info(&path),
        Commands::Wav(WavCommand::Resample {
            input,
            output,
            rate,
        }) => wav_resample(&input, &output, rate),
    }
}

fn models_list(json: bool) -> Result<()> {
    let models = catalog::all();
    if json {
        let rendered = serde_json::to_string_pretty(models)
            .map_err(|e| sauti_core::Error::Inference(format!("catalog serialization: {e}")))?;
        println!("{rendered}");
        return Ok(());
    }

    println!("{:<28} {:<24} {:>6} {:>8}", "ID", "NAME", "PARAMS", "SIZE");
    for model in models {
        println!(
            "{:<28} {:<24} {:>6} {:>6.1}GB",
            model.id,
            model.name,
            model.parameters,
            model.size_gb()
        );
    }
    Ok(())
}

fn models_show(id: &str) -> Result<()> {
    let model = catalog::find(id)
        .ok_or_else(|| sauti_core::Error::InvalidInput(format!("unknown model id: {id}")))?;
    println!("id:           {}", model.id);
    println!("name:         {}", model.name);
    println!("repo:         {}", model.repo_id);
    println!("file:         {}", model.filename);
    println!("quantization: {}", model.quantization);
    println!("parameters:   {}", model.parameters);
    println!("size:         {:.1} GB", model.size_gb());
    println!("{}", model.description);
    Ok(())
}

fn wav_info(path: &PathBuf) -> Result<()> {
    let (samples, sample_rate) = read_wav(path)?;
    let duration_ms = (samples.len() as u64 * 1000) / sample_rate as u64;
    println!("file:        {}", path.display());
    println!("sample rate: {sample_rate} Hz");
    println!("samples:     {}", samples.len());
    println!("duration:    {duration_ms} ms");
    Ok(())
}

fn wav_resample(input: &PathBuf, output: &PathBuf, rate: u32) -> Result<()> {
    if rate == 0 {
        return Err(sauti_core::Error::InvalidInput(
            "target rate must be non-zero".into(),
        ));
    }
    let (samples, source_rate) = read_wav(input)?;
    let resampled = resample_linear(&samples, source_rate, rate);
    write_wav(output, &f32_to_i16(&resampled), rate)?;
    println!(
        "{} ({source_rate} Hz, {} samples) -> {} ({rate} Hz, {} samples)",
        input.display(),
        samples.len(),
        output.display(),
        resampled.len()
    );
    Ok(())
}
