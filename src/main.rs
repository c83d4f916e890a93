mod cli;

use splitkit::{open_split_file, report};
use splitkit_core::{Config, ParseMode, ProgramId};
use splitkit_parser::{FormatRegistry, ParseCoordinator};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "splitkit=trace,splitkit_parser=trace,splitkit_core=debug".to_string()
        } else {
            "splitkit=info,splitkit_parser=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Parse {
            file,
            mode,
            program,
            json,
        } => {
            let config = Config::load_or_default(cli.config.as_deref());
            parse_file(&file, &config, mode, program, json)
        }
        Commands::Detect { files } => {
            let config = Config::load_or_default(cli.config.as_deref());
            detect_files(&files, &config)
        }
        Commands::Programs => list_programs(),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
    }
}

fn parse_file(
    path: &Path,
    config: &Config,
    mode: Option<ParseMode>,
    program: Option<ProgramId>,
    json: bool,
) -> Result<()> {
    let mode = mode.unwrap_or(config.parse.default_mode);
    let program = program.or(config.parse.forced_program);

    let mut file = open_split_file(path, config)?;
    tracing::info!("Parsing {} ({} bytes, {} mode)", path.display(), file.len(), mode);

    let run = ParseCoordinator::standard().parse(&mut file, mode, program)?;
    if run.is_empty() {
        anyhow::bail!("No supported split file format recognised in {}", path.display());
    }

    if json {
        println!("{}", report::to_json(&run, config.output.pretty_json)?);
    } else {
        print!("{}", report::summary(&run));
    }

    Ok(())
}

fn detect_files(paths: &[std::path::PathBuf], config: &Config) -> Result<()> {
    let coordinator = ParseCoordinator::standard();

    for path in paths {
        let mut file = open_split_file(path, config)?;
        let run = coordinator
            .parse(&mut file, ParseMode::Fast, None)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        let program = run.program.map(|p| p.as_str()).unwrap_or("unknown");
        println!("{}\t{}", path.display(), program);
    }

    Ok(())
}

fn list_programs() -> Result<()> {
    for program in FormatRegistry::standard().supported_programs() {
        println!(
            "{:<18} {:<20} .{}",
            program.as_str(),
            program.display_name(),
            program.file_extension()
        );
    }
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let contents = std::fs::read_to_string(p)
                .with_context(|| format!("failed to read {}", p.display()))?;
            let config = Config::from_json(&contents)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Default mode: {}", config.parse.default_mode);
    println!(
        "  Forced program: {}",
        config
            .parse
            .forced_program
            .map(|p| p.as_str())
            .unwrap_or("none")
    );
    println!("  Max file size: {} bytes", config.parse.max_file_size);
    println!("  Pretty JSON: {}", config.output.pretty_json);

    let warnings = config.validate();
    for warning in &warnings {
        tracing::warn!("{warning}");
        println!("  ⚠ {warning}");
    }

    Ok(())
}
