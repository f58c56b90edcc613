mod builtin;
mod cli;
mod core;

use anyhow::{Context, Result};
use cli::commands::{KindsCommand, RunCommand, ValidateCommand};
use cli::output::*;
use cli::{Cli, Command};
use core::catalog::Catalog;
use core::config::StepConfig;
use core::record::Record;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    match &cli.command {
        Command::Run(cmd) => run_pipeline(cmd)?,
        Command::Validate(cmd) => validate_pipeline(cmd)?,
        Command::Kinds(cmd) => list_kinds(cmd)?,
    }

    Ok(())
}

fn run_pipeline(cmd: &RunCommand) -> Result<()> {
    // Load pipeline config
    let config = StepConfig::from_file(&cmd.file).context("Failed to load pipeline config")?;

    println!(
        "{} Loaded pipeline: {}",
        INFO,
        style(config.instance_name()).bold()
    );

    // Assemble the catalog and check the config against it before building
    let catalog = Catalog::with_builtins();
    config.validate(&catalog)?;

    let step = catalog.build_step(&config)?;
    let input = load_input(cmd)?;

    println!(
        "{} Running {} with {} input field(s)",
        ROCKET,
        style(step.name()).bold(),
        style(input.len()).cyan()
    );

    match step.invoke(&input) {
        Ok(result) => {
            println!(
                "\n{} {} completed {}",
                CHECK,
                style(step.name()).bold(),
                style("successfully").green()
            );
            println!("{}", format_record(&result, cmd.compact));
            Ok(())
        }
        Err(e) => {
            println!(
                "\n{} {} {}",
                CROSS,
                style(step.name()).bold(),
                style("failed").red()
            );
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}

/// Parse the initial data record from --input / --input-file, default `{}`
fn load_input(cmd: &RunCommand) -> Result<Record> {
    let text = if let Some(inline) = &cmd.input {
        inline.clone()
    } else if let Some(path) = &cmd.input_file {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?
    } else {
        "{}".to_string()
    };

    let value: serde_json::Value =
        serde_json::from_str(&text).context("Input must be valid JSON")?;
    Ok(core::record::wrap(value))
}

fn validate_pipeline(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating pipeline...", INFO);

    let catalog = Catalog::with_builtins();
    let result = StepConfig::from_file(&cmd.file).and_then(|config| {
        config.validate(&catalog)?;
        Ok(config)
    });

    match result {
        Ok(config) => {
            println!("{} Pipeline configuration is valid!", CHECK);
            println!("  Name: {}", style(config.instance_name()).bold());
            println!(
                "  Pre-hooks: {}",
                style(config.forward_pre_hook.len()).cyan()
            );
            println!(
                "  Post-hooks: {}",
                style(config.forward_post_hook.len()).cyan()
            );

            if cmd.json {
                let json = serde_json::to_string_pretty(&config)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}

fn list_kinds(cmd: &KindsCommand) -> Result<()> {
    let catalog = Catalog::with_builtins();

    if cmd.json {
        let data = serde_json::json!({
            "steps": catalog.steps.names(),
            "hooks": catalog.hooks.names(),
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    println!("{} Registered step kinds:", INFO);
    for name in catalog.steps.names() {
        println!("  {}", style(name).bold());
    }

    println!("{} Registered hook kinds:", INFO);
    for name in catalog.hooks.names() {
        println!("  {}", style(name).cyan());
    }

    Ok(())
}
