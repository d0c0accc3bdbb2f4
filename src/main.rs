mod calc;
mod config;
mod error;
mod format;
mod invoice_gen;
mod models;
mod state;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::calc::{compute_line, PriceBasis};
use crate::config::Config;
use crate::invoice_gen::InvoiceGenerator;
use crate::models::{Currency, LineDraft, LineItem, PricingMode, ServiceType, DEFAULT_FEE_PERCENT};
use crate::state::InvoiceState;
use crate::ui::invoice_screen::{
    handle_input, render_invoice_screen, InvoiceScreenAction, InvoiceScreenState,
};

#[derive(Parser)]
#[command(name = "invoice-creator", about = "Build an invoice line by line in the terminal")]
struct Cli {
    /// Where exported invoices are written (overrides INVOICE_EXPORT_DIR)
    #[arg(long)]
    export_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Price a single line and print its figures without starting the UI
    Quote(QuoteArgs),
}

#[derive(Args)]
struct QuoteArgs {
    #[arg(long, value_enum)]
    service: ServiceType,

    #[arg(long, value_enum)]
    pricing: PricingMode,

    /// People or hours; ignored for fixed prices
    #[arg(long, default_value_t = 1)]
    quantity: u32,

    /// Customer price per unit
    #[arg(long)]
    price: f64,

    #[arg(long, value_enum, default_value_t = Currency::Euro)]
    currency: Currency,

    #[arg(long, default_value_t = 0)]
    discount: u32,

    #[arg(long, default_value_t = DEFAULT_FEE_PERCENT)]
    fee: f64,

    /// The price already includes VAT
    #[arg(long)]
    vat_included: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // One-shot quotes print and exit without touching the log file
    if let Some(Command::Quote(args)) = cli.command {
        print!("{}", quote(&args)?);
        return Ok(());
    }

    // Load configuration
    let config = Config::load()?;
    init_tracing(&config)?;

    let export_dir = cli.export_dir.unwrap_or_else(|| PathBuf::from(&config.export_dir));
    let generator = InvoiceGenerator::new(&export_dir)?;
    info!(export_dir = %export_dir.display(), "starting invoice creator");

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut screen = InvoiceScreenState::new(InvoiceState::default(), config.recipient());

    let result = run_app(&mut terminal, &mut screen, &generator);

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(error = %err, "invoice creator stopped");
        println!("Error: {}", err);
    }

    Ok(())
}

fn init_tracing(config: &Config) -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter)?)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    screen: &mut InvoiceScreenState,
    generator: &InvoiceGenerator,
) -> Result<()> {
    loop {
        terminal.draw(|f| render_invoice_screen(f, screen))?;

        match handle_input(screen)? {
            Some(InvoiceScreenAction::Quit) => break,
            Some(InvoiceScreenAction::Export) => {
                match generator.generate_invoice(screen.invoice(), screen.recipient()) {
                    Ok(exported) => {
                        let path = exported.pdf.unwrap_or(exported.markdown);
                        screen.set_status(format!("exported to {}", path.display()));
                    }
                    Err(err) => {
                        error!(error = %err, "export failed");
                        screen.set_error(err.to_string());
                    }
                }
            }
            None => {}
        }
    }

    Ok(())
}

fn quote(args: &QuoteArgs) -> Result<String> {
    let draft = LineDraft {
        quantity: args.quantity,
        unit_price: args.price,
        currency: args.currency,
        discount_percent: args.discount,
        fee_percent: args.fee,
    };
    let item = LineItem::new(args.service, args.pricing, &draft)?;
    let result = compute_line(&item, PriceBasis::from_vat_included(args.vat_included));
    let currency = item.currency();

    let mut out = String::new();
    out.push_str(&format!("{}\n", format::line_caption(&item)));
    out.push_str(&format!("  {}\n", format::line_detail(&item, &result)));
    for (label, value) in [
        ("Processing fee", result.platform_fee),
        ("Provider payout", result.provider_payout),
        ("Subtotal", result.subtotal),
        ("VAT", result.vat_amount),
        ("Total", result.total),
    ] {
        out.push_str(&format!("{:>16}: {}\n", label, format::amount(value, currency)));
    }
    Ok(out)
}
