// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mix_estimate::config::{DEFAULT_BRAND, DEFAULT_LOG_FILE};
use mix_estimate::{format_amount, Cart, Catalog, Estimate, Exporter, Settings};

#[derive(Parser)]
#[command(name = "mix-estimate", version, about = "Mixing & mastering price estimator")]
struct Cli {
    /// JSON catalog to use instead of the built-in menu
    #[arg(long, env = "MIX_ESTIMATE_CATALOG", global = true)]
    catalog: Option<PathBuf>,

    /// Directory exported estimates are written to
    #[arg(long, env = "MIX_ESTIMATE_OUTPUT_DIR", default_value = ".", global = true)]
    output_dir: PathBuf,

    /// Brand printed on estimates
    #[arg(long, env = "MIX_ESTIMATE_BRAND", default_value = DEFAULT_BRAND, global = true)]
    brand: String,

    /// Log file used while the terminal UI is running
    #[arg(long, default_value = DEFAULT_LOG_FILE, global = true)]
    log_file: PathBuf,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive terminal UI (default)
    Ui,
    /// List services and options
    Catalog,
    /// Print an estimate for the given selection
    Quote {
        #[command(flatten)]
        cart: CartArgs,

        /// Emit the estimate as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a PDF estimate for the given selection
    Export {
        #[command(flatten)]
        cart: CartArgs,
    },
}

#[derive(Args)]
struct CartArgs {
    /// Base service id (e.g. full_mix)
    #[arg(long)]
    base: Option<String>,

    /// Option id with optional quantity, repeatable (e.g. add_track=2)
    #[arg(long = "option", value_name = "ID[=QTY]", value_parser = parse_option)]
    options: Vec<(String, i32)>,

    /// Enable commercial use pricing
    #[arg(long)]
    commercial: bool,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            brand: self.brand.clone(),
            output_dir: self.output_dir.clone(),
            catalog_path: self.catalog.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings();

    match cli.command.unwrap_or(Command::Ui) {
        Command::Ui => {
            init_logging(cli.verbose, Some(&settings.log_file))?;
            run_ui_mode(&settings)?;
        }
        Command::Catalog => {
            init_logging(cli.verbose, None)?;
            run_catalog(&settings)?;
        }
        Command::Quote { cart, json } => {
            init_logging(cli.verbose, None)?;
            run_quote(&settings, &cart, json)?;
        }
        Command::Export { cart } => {
            init_logging(cli.verbose, None)?;
            run_export(&settings, &cart)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("mix_estimate=debug")
        } else {
            EnvFilter::new("mix_estimate=info")
        }
    });

    let layer = tracing_subscriber::fmt::layer().with_target(false).compact();

    match log_file {
        // The terminal belongs to the UI, so logs go to a file
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {:?}", path))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer.with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}

fn parse_option(value: &str) -> std::result::Result<(String, i32), String> {
    match value.split_once('=') {
        Some((id, qty)) => {
            let qty: i32 = qty
                .parse()
                .map_err(|_| format!("invalid quantity in '{}'", value))?;
            if qty <= 0 {
                return Err(format!("quantity must be positive in '{}'", value));
            }
            Ok((id.to_string(), qty))
        }
        None => Ok((value.to_string(), 1)),
    }
}

fn build_cart(catalog: &Catalog, args: &CartArgs) -> Result<Cart> {
    let mut cart = Cart::new();

    if let Some(base) = &args.base {
        cart.select_base_service(catalog, base)
            .with_context(|| format!("Cannot select base service '{}'", base))?;
    }
    for (id, qty) in &args.options {
        cart.adjust_quantity(catalog, id, *qty)
            .with_context(|| format!("Cannot add option '{}'", id))?;
    }
    if args.commercial {
        cart.toggle_commercial();
    }

    Ok(cart)
}

fn run_catalog(settings: &Settings) -> Result<()> {
    let catalog = settings.load_catalog()?;

    println!("🎚️  {} - Services", settings.brand);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for entry in catalog.entries() {
        let price = if entry.is_included() {
            "INCLUDED".to_string()
        } else {
            format!("₩{}", format_amount(entry.price))
        };
        println!(
            "{:<8} {:<20} {:<32} {:>10} {}",
            entry.kind.as_str(),
            entry.id,
            entry.name,
            price,
            entry.unit
        );
    }
    println!(
        "{:<8} {:<20} {:<32} {:>10}",
        catalog.commercial.kind.as_str(),
        catalog.commercial.id,
        catalog.commercial.name,
        catalog.commercial.unit
    );

    Ok(())
}

fn run_quote(settings: &Settings, args: &CartArgs, json: bool) -> Result<()> {
    let catalog = settings.load_catalog()?;
    let cart = build_cart(&catalog, args)?;
    let estimate = Estimate::snapshot(&cart, &catalog, settings.brand.clone(), Utc::now());

    if json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
        return Ok(());
    }

    println!("🧾 {} - Estimate", estimate.brand);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    if estimate.is_empty() {
        println!("YOUR CART IS EMPTY");
    }
    for line in &estimate.lines {
        println!(
            "{:<32} x{:<4} ₩{:>12}",
            line.name,
            line.quantity,
            format_amount(line.amount)
        );
    }
    if let Some(commercial) = &estimate.commercial {
        println!(
            "{:<32} {:<5} +₩{:>11}",
            commercial.name,
            commercial.unit,
            format_amount(commercial.amount)
        );
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Total Tracks: {}", estimate.totals.total_tracks);
    println!("Total:        ₩{} (VAT included)", format_amount(estimate.totals.total));

    Ok(())
}

fn run_export(settings: &Settings, args: &CartArgs) -> Result<()> {
    let catalog = settings.load_catalog()?;
    let cart = build_cart(&catalog, args)?;
    let estimate = Estimate::snapshot(&cart, &catalog, settings.brand.clone(), Utc::now());

    let exporter = Exporter::pdf(&settings.output_dir);
    let path = exporter
        .export(&estimate)
        .with_context(|| format!("Estimate export to {:?} failed", exporter.output_dir()))?;

    println!("✅ Estimate saved: {}", path.display());
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(settings: &Settings) -> Result<()> {
    let catalog = settings.load_catalog()?;
    let exporter = Exporter::pdf(&settings.output_dir);
    tracing::info!(
        brand = %settings.brand,
        output_dir = %exporter.output_dir().display(),
        "starting terminal UI"
    );
    let mut app = mix_estimate::App::new(catalog, exporter, settings.brand.clone());

    ui::run_ui(&mut app)?;
    tracing::info!("terminal UI closed");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_settings: &Settings) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: mix-estimate quote --base full_mix");
    std::process::exit(1);
}
