//! Ochag CLI - the pizzeria cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the menu
//! ochag menu
//!
//! # Put two Margheritas and a Diavola in the cart
//! ochag add 1
//! ochag inc 1
//! ochag add 4
//!
//! # Show the cart, then order
//! ochag show
//! ochag checkout
//! ```
//!
//! The cart is saved as `ochag_cart.json` in `--data-dir`
//! (`OCHAG_DATA_DIR`, default `.ochag`), so it survives between runs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use ochag_core::ProductId;
use ochag_storefront::cart::PriceFormat;
use ochag_storefront::catalog::Catalog;
use ochag_storefront::page::CartAction;

mod commands;
mod surface;

use commands::{CliError, cart};

#[derive(Parser)]
#[command(name = "ochag")]
#[command(author, version, about = "Ochag pizzeria cart")]
struct Cli {
    /// Directory the cart is saved in
    #[arg(long, env = "OCHAG_DATA_DIR", default_value = ".ochag")]
    data_dir: PathBuf,

    /// JSON menu replacing the built-in one
    #[arg(long, env = "OCHAG_MENU_PATH")]
    menu: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the menu
    Menu,
    /// Show the cart
    Show,
    /// Add a pizza from the menu
    Add { id: i32 },
    /// Increase a row's quantity by one
    Inc { id: i32 },
    /// Decrease a row's quantity by one, removing it at zero
    Dec { id: i32 },
    /// Remove a row
    Remove { id: i32 },
    /// Empty the cart
    Clear,
    /// Place the order
    Checkout,
}

fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so they never mix with command output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli, &mut std::io::stdout().lock()) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    let catalog = match &cli.menu {
        Some(path) => Catalog::from_json_file(path)?,
        None => Catalog::menu(),
    };
    let format = PriceFormat::default();

    if matches!(cli.command, Commands::Menu) {
        return commands::menu::list(&catalog, &format, out);
    }

    let mut store = cart::open(&cli.data_dir, Arc::new(catalog), format);

    match cli.command {
        Commands::Menu => Ok(()),
        Commands::Show => cart::show(&store, out),
        Commands::Add { id } => cart::apply(&mut store, CartAction::Add(ProductId::new(id)), out),
        Commands::Inc { id } => {
            cart::apply(&mut store, CartAction::Increment(ProductId::new(id)), out)
        }
        Commands::Dec { id } => {
            cart::apply(&mut store, CartAction::Decrement(ProductId::new(id)), out)
        }
        Commands::Remove { id } => {
            cart::apply(&mut store, CartAction::Remove(ProductId::new(id)), out)
        }
        Commands::Clear => cart::clear(&mut store, out),
        Commands::Checkout => cart::checkout(&mut store, out).map(|_| ()),
    }
}
