//! CLI command implementations

use std::path::PathBuf;
use std::sync::Arc;

use clap::Subcommand;
use reelvault_core::config::ReelvaultConfig;
use reelvault_core::editing::{EditOrchestrator, FfmpegMediaEngine, MediaEngine, Segment};
use reelvault_core::library::VideoLibrary;
use reelvault_core::{ReelvaultError, Result};
use reelvault_web::run_server;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
        /// Library root directory to serve files from
        #[arg(short, long, default_value = "videos")]
        library: PathBuf,
        /// Maximum concurrent edit workers
        #[arg(long)]
        workers: Option<usize>,
        /// Directory of static frontend assets to serve
        #[arg(long)]
        assets: Option<PathBuf>,
    },
    /// List a library directory
    List {
        /// Library-relative path to list (defaults to the root)
        path: Option<String>,
        /// Library root directory
        #[arg(short, long, default_value = "videos")]
        library: PathBuf,
    },
    /// Trim and concatenate segments of a video
    Edit {
        /// Library-relative path of the source video
        file: String,
        /// Segment to retain as start:end in seconds (repeatable, in order)
        #[arg(short, long = "segment", required = true)]
        segments: Vec<String>,
        /// Library root directory
        #[arg(short, long, default_value = "videos")]
        library: PathBuf,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands) -> std::result::Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Serve {
            host,
            port,
            library,
            workers,
            assets,
        } => serve(host, port, library, workers, assets).await,
        Commands::List { path, library } => {
            list_directory(path, library).await?;
            Ok(())
        }
        Commands::Edit {
            file,
            segments,
            library,
        } => {
            run_edit(file, segments, library).await?;
            Ok(())
        }
    }
}

/// Start the web server for library browsing and editing
async fn serve(
    host: String,
    port: u16,
    library: PathBuf,
    workers: Option<usize>,
    assets: Option<PathBuf>,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut config = ReelvaultConfig::from_env();
    config.server.host = host;
    config.server.port = port;
    config.library.root_dir = library;
    if let Some(workers) = workers {
        config.editing.max_workers = workers.max(1);
    }
    if assets.is_some() {
        config.server.assets_dir = assets;
    }

    tracing::info!(
        "Serving library {} with {} edit workers",
        config.library.root_dir.display(),
        config.editing.max_workers
    );

    println!("Starting Reelvault server...");
    println!("Library: {}", config.library.root_dir.display());
    println!("URL: http://{}", config.server.bind_address());
    println!("{:-<50}", "");
    println!("Press Ctrl+C to stop the server");

    run_server(config).await
}

/// Print one directory level of the library
async fn list_directory(path: Option<String>, library_root: PathBuf) -> Result<()> {
    let config = ReelvaultConfig {
        library: reelvault_core::config::LibraryConfig {
            root_dir: library_root,
            ..Default::default()
        },
        ..Default::default()
    };

    let library = VideoLibrary::new(&config.library)?;
    let path = path.unwrap_or_else(|| "/".to_string());
    let entries = library.list_directory(&path).await?;

    if entries.is_empty() {
        println!("{path} is empty.");
        return Ok(());
    }

    println!("{:<40} {:>12}  {}", "NAME", "SIZE", "MODIFIED");
    println!("{:-<70}", "");
    for entry in entries {
        let name = if entry.is_directory {
            format!("{}/", entry.name)
        } else {
            entry.name.clone()
        };
        println!(
            "{:<40} {:>12}  {}",
            name,
            entry.size,
            entry.modified_time.format("%Y-%m-%d %H:%M:%S")
        );
    }

    Ok(())
}

/// Run a single edit through the real ffmpeg engine
async fn run_edit(file: String, segment_args: Vec<String>, library_root: PathBuf) -> Result<()> {
    let mut config = ReelvaultConfig::from_env();
    config.library.root_dir = library_root;

    let segments = segment_args
        .iter()
        .map(|arg| parse_segment(arg))
        .collect::<Result<Vec<_>>>()?;

    let library = Arc::new(VideoLibrary::new(&config.library)?);
    let engine: Arc<dyn MediaEngine> =
        Arc::new(FfmpegMediaEngine::new(config.editing.ffmpeg_binary.clone()));
    if !engine.is_available() {
        return Err(ReelvaultError::Configuration {
            reason: format!(
                "ffmpeg not available at {}",
                config.editing.ffmpeg_binary.display()
            ),
        });
    }

    let orchestrator = EditOrchestrator::new(library, engine, &config.editing);

    println!("Editing {file} ({} segments)...", segments.len());
    let outcome = orchestrator.submit_edit(&file, segments).await?;

    println!(
        "Wrote {} ({} bytes in {:.2}s)",
        outcome.output_path.display(),
        outcome.report.output_size,
        outcome.report.processing_time
    );

    Ok(())
}

/// Parse a `start:end` segment argument into a [`Segment`]
fn parse_segment(arg: &str) -> Result<Segment> {
    let invalid = || ReelvaultError::Configuration {
        reason: format!("Invalid segment '{arg}': expected start:end in seconds"),
    };

    let (start, end) = arg.split_once(':').ok_or_else(invalid)?;
    if start.parse::<f64>().is_err() || end.parse::<f64>().is_err() {
        return Err(invalid());
    }

    Ok(Segment::new(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_segment_valid() {
        let segment = parse_segment("12.5:30").unwrap();
        assert_eq!(segment, Segment::new("12.5", "30"));
    }

    #[test]
    fn test_parse_segment_missing_separator() {
        assert!(parse_segment("12.5").is_err());
    }

    #[test]
    fn test_parse_segment_non_numeric() {
        assert!(parse_segment("start:end").is_err());
        assert!(parse_segment("1::2").is_err());
    }

    #[tokio::test]
    async fn test_list_directory_empty_root() {
        let dir = tempfile::tempdir().unwrap();
        let result = list_directory(None, dir.path().to_path_buf()).await;
        assert!(result.is_ok());
    }
}
