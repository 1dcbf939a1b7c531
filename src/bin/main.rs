use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "pagewatch")]
#[command(about = "Config-based page watching over WebDriver")]
#[command(version)]
struct Cli {
    /// Config file to run
    config: PathBuf,

    /// Run in headless mode (overrides config)
    #[arg(long)]
    headless: bool,

    /// Set a parameter (can be used multiple times)
    #[arg(short = 'P', long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Validate config without running
    #[arg(long)]
    check: bool,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> pagewatch::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    // Parse parameters
    let params = pagewatch::Params::from_args(&cli.params)?;

    // Load and validate config with parameters
    let mut config = pagewatch::Config::load_with_params(&cli.config, &params)?;

    if cli.check {
        println!("Config valid: {}", config.name);
        println!("  Target: {}", config.target.url);
        if let Some(ref login) = config.login {
            let landing = login
                .landing
                .as_ref()
                .map(|l| format!(", then {}", l))
                .unwrap_or_default();
            println!("  Login: {} via {}{}", login.username_field, login.submit, landing);
        }
        if let Some(ref watch) = config.watch {
            println!(
                "  Watch: {} x{} every {}ms",
                watch.field, watch.iterations, watch.interval_ms
            );
        }
        if let Some(ref log) = config.log {
            println!("  Log: {}", log.path);
        }
        if !config.params.is_empty() {
            println!("  Parameters: {}", config.params.len());
            for (name, def) in &config.params {
                let req = if def.required { " (required)" } else { "" };
                let desc = def.description.as_deref().unwrap_or("");
                println!("    - {}{}: {}", name, req, desc);
            }
        }
        return Ok(());
    }

    // Override headless if specified
    if cli.headless {
        config.browser.headless = true;
    }

    println!("Running: {}", config.name);

    let runner = pagewatch::Runner::new(&config.browser).await?;
    let result = runner.run(&config).await?;

    // Print result
    println!();
    if result.success {
        println!("✓ Success");
    } else {
        println!("✗ Failed");
        if let Some(ref error) = result.error {
            println!("  Error: {}", error);
        }
    }
    println!("  Readings: {}", result.values.len());
    println!("  Duration: {}ms", result.duration_ms);
    println!("  Final URL: {}", result.final_url);

    if !result.success {
        std::process::exit(1);
    }

    Ok(())
}
