use anyhow::{Context, Result};
use clap::Parser;
use cvdrop::{
    config::Config,
    logging::init_logging,
    response::{upload_success, ErrorBody},
    UploadPipeline, UploadedFile,
};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cvdrop")]
#[command(about = "Validate a CV file and print its text preview as JSON")]
#[command(version)]
struct Cli {
    /// CV file to process
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Config file (defaults to config/settings.toml or ~/.config/cvdrop/settings.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Filename to report instead of the file's own name
    #[arg(long)]
    name: Option<String>,

    /// Directory for stored copies (overrides config)
    #[arg(long)]
    storage_dir: Option<String>,

    /// Maximum file size in MB (overrides config)
    #[arg(long)]
    max_size_mb: Option<u64>,

    /// Preview length in characters (overrides config)
    #[arg(long)]
    preview_chars: Option<usize>,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?.with_env_overrides(|key| std::env::var(key).ok()),
        None => Config::load()?,
    };
    if let Some(dir) = cli.storage_dir {
        config.upload.storage_dir = dir;
    }
    if let Some(max) = cli.max_size_mb.filter(|max| *max > 0) {
        config.upload.max_file_size_mb = max;
    }
    if let Some(chars) = cli.preview_chars {
        config.upload.preview_chars = chars;
    }

    let filename = match cli.name {
        Some(name) => name,
        None => cli
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    let reader = File::open(&cli.file)
        .with_context(|| format!("Failed to open file: {}", cli.file.display()))?;
    let mut upload = UploadedFile::new(filename, reader);

    let pipeline = UploadPipeline::new(&config.upload);
    match pipeline.process(&mut upload) {
        Ok(outcome) => {
            println!("{}", serde_json::to_string_pretty(&upload_success(&outcome))?);
            Ok(())
        }
        Err(err) => {
            println!("{}", serde_json::to_string_pretty(&ErrorBody::from(&err))?);
            std::process::exit(1);
        }
    }
}
