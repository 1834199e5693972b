mod cli;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use vs_core::config::Config;
use vs_server::AppContext;

/// Load the config file (or defaults) and apply environment overrides.
fn load_config(path: Option<&Path>) -> Config {
    let mut config = Config::load_or_default(path);
    config.apply_env_overrides();
    config
}

async fn start_server(
    config_path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
    video_dir: Option<std::path::PathBuf>,
) -> Result<()> {
    let mut config = load_config(config_path);

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(dir) = video_dir {
        config.library.video_dir = dir;
    }

    tracing::info!("Starting vidshelf");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    vs_server::start(config).await?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick defaults from the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "vidshelf=trace,vs_server=trace,vs_catalog=trace,vs_db=debug,vs_core=debug,tower_http=debug".to_string()
        } else {
            "vidshelf=debug,vs_server=info,vs_catalog=info,vs_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start {
            host,
            port,
            video_dir,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(cli.config.as_deref(), host, port, video_dir))
        }
        Commands::Stats { json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(print_stats(cli.config.as_deref(), json))
        }
        Commands::Generate { files, json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(generate(cli.config.as_deref(), &files, json))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("vidshelf {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn build_context(config_path: Option<&Path>) -> Result<AppContext> {
    let config = load_config(config_path);
    let backend = vs_db::open_backend(&config.overlay)?;
    Ok(AppContext::from_config(config, backend))
}

async fn print_stats(config_path: Option<&Path>, json: bool) -> Result<()> {
    let ctx = build_context(config_path)?;
    let stats = ctx.catalog.stats().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Directory: {}", ctx.source().root().display());
    println!("Files: {}", stats.total_files);
    println!(
        "Total size: {} ({} bytes)",
        stats.total_size_formatted, stats.total_size
    );
    for (ext, count) in &stats.type_count {
        println!("  {ext}: {count}");
    }
    if let Some(generated) = ctx.catalog.overlay().generated_count() {
        println!("Generated content: {generated}");
    }

    Ok(())
}

async fn generate(config_path: Option<&Path>, files: &[String], json: bool) -> Result<()> {
    let ctx = build_context(config_path)?;
    let results = ctx.generator.generate_bulk(files).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            if result.success {
                println!(
                    "✓ {} -> {}",
                    result.filename,
                    result.title.as_deref().unwrap_or("")
                );
            } else {
                println!(
                    "✗ {}: {}",
                    result.filename,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }

    let failed = results.iter().filter(|r| !r.success).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} files failed", results.len());
    }
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let contents = std::fs::read_to_string(p)?;
            let mut config = Config::from_json(&contents)?;
            config.apply_env_overrides();
            println!("✓ Configuration parses");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            load_config(None)
        }
    };

    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Video directory: {}", config.library.video_dir.display());
    println!("  Extensions: {}", config.normalized_extensions().join(", "));
    println!("  Overlay backend: {:?}", config.overlay.backend);

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("✓ No warnings");
    } else {
        for warning in &warnings {
            println!("⚠ {warning}");
        }
    }

    Ok(())
}
