use anyhow::{anyhow, bail, Context, Result};
use mileage_tracker::{
    format_event, ConfigurationManager, DistanceAccumulator, FixEvent, ReplaySource, ReportFormat,
    StatusSummary, TrackingDriver,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

const REPLAY_SOURCE_ID: u8 = 1;

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    fix_log: Option<String>,
    config_path: Option<String>,
    format: ReportFormat,
    label: Option<String>,
    write_default_config: Option<String>,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {0} <fixes.json> [--config <file>] [--format text|json] [--label <name>]\n   or: {0} --write-default-config <file>",
        program
    )
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let program = args.first().map_or("mileage-tracker", |s| s.as_str());
    let mut parsed = CliArgs::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| anyhow!("{} requires a value\n{}", flag, usage(program)))
        };

        match arg.as_str() {
            "--config" => parsed.config_path = Some(value("--config")?),
            "--format" => {
                parsed.format = value("--format")?.parse().map_err(|e: String| anyhow!(e))?;
            }
            "--label" => parsed.label = Some(value("--label")?),
            "--write-default-config" => {
                parsed.write_default_config = Some(value("--write-default-config")?)
            }
            "-h" | "--help" => bail!(usage(program)),
            flag if flag.starts_with("--") => bail!("unknown option {}\n{}", flag, usage(program)),
            path => {
                if parsed.fix_log.is_some() {
                    bail!("only one fix log may be given\n{}", usage(program));
                }
                parsed.fix_log = Some(path.to_string());
            }
        }
    }

    if parsed.fix_log.is_none() && parsed.write_default_config.is_none() {
        bail!(usage(program));
    }
    Ok(parsed)
}

fn init_logging(debug_logging: bool) {
    let default_level = if debug_logging { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cli = parse_args(&args)?;

    if let Some(path) = &cli.write_default_config {
        let mut manager = ConfigurationManager::new();
        manager
            .save_to_file(path)
            .with_context(|| format!("writing default configuration to {}", path))?;
        println!("Default configuration written to {}", path);
        if cli.fix_log.is_none() {
            return Ok(());
        }
    }

    let manager = match &cli.config_path {
        Some(path) => ConfigurationManager::from_file(path)
            .with_context(|| format!("loading configuration from {}", path))?,
        None => ConfigurationManager::new(),
    };
    let config = manager.config().clone();
    init_logging(config.debug_logging);

    let fix_log = cli.fix_log.as_deref().ok_or_else(|| anyhow!(usage(&args[0])))?;
    let mut source = ReplaySource::from_file(REPLAY_SOURCE_ID, fix_log)?;

    let mut accumulator = DistanceAccumulator::from_config(&config);
    let format = cli.format;
    let unit = config.display_unit;
    accumulator.subscribe(Box::new(move |event: &FixEvent| {
        match format_event(event, format, unit) {
            Ok(line) => println!("{}", line),
            Err(error) => warn!(%error, sequence = event.sequence, "failed to format event"),
        }
    }));

    match cli.label {
        Some(label) => accumulator.start_with_label(label),
        None => accumulator.start(),
    }

    let mut driver = TrackingDriver::new(accumulator);
    let stats = driver.run_to_end(&mut source)?;
    driver.accumulator_mut().stop();

    let session = driver.accumulator().current_state();
    if format == ReportFormat::Text {
        println!();
        println!("{}", StatusSummary::for_session(&session, unit));
        println!(
            "Fixes: {} read, {} accepted, {} ignored | Total: {:.3} {} ({} model)",
            stats.polled,
            session.fixes_accepted,
            stats.ignored,
            session.total_in(unit),
            unit,
            driver.accumulator().strategy_name()
        );
    }

    Ok(())
}
