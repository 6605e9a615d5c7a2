use anyhow::Context;
use clap::Parser;
use config::Config;
use emitrend::{cli::Cli, export::write_projection};
use inventory::CsvInventoryLoader;
use projection::{JsonReporter, ProjectionEngine, Reporter, Services, TextReporter};
use std::io::{self, Write};
use tracing::{debug, info};
use tracing_log::AsTrace;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity.log_level_filter().as_trace())
        .with_writer(io::stderr)
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    debug!(config = ?cli);

    let mut stdout = io::stdout().lock();

    if cli.print_default_config {
        stdout.write_all(Config::template().to_toml_string()?.as_bytes())?;
        return Ok(());
    }

    let conffile = cli
        .conffile
        .context("a configuration file is required")?;
    let config = Config::load(&conffile)
        .with_context(|| format!("loading {}", conffile.display()))?;

    let reporter: Box<dyn Reporter + Send + Sync> = if cli.json {
        Box::new(JsonReporter)
    } else {
        Box::new(TextReporter::new(&config.report))
    };
    let services = Services {
        loader: Box::new(CsvInventoryLoader::new()),
        reporter,
    };

    let mut engine = ProjectionEngine::new(config, services);
    if let Some(dir) = conffile.parent() {
        engine = engine.with_base_dir(dir);
    }

    let report = engine.run()?;
    info!(
        target_year = report.extrapolation.target_year,
        adjustments = report.adjustments.len(),
        "projection finished"
    );

    if let Some(path) = &cli.output {
        write_projection(path, &report.projected)?;
    }

    engine.render(&report, &mut stdout)?;
    Ok(())
}
