//! serum-slab - order book account dump inspector
//!
//! Reads a bids account and an asks account from local files, decodes
//! them, and prints the slab counters and the top of the book. With a
//! market account and the mints' decimals, prices and sizes are printed
//! as decimals instead of lots.
//!
//! ```bash
//! serum-slab bids.bin asks.bin --depth 10
//! serum-slab bids.bin asks.bin --market market.bin --base-decimals 9 --quote-decimals 6
//! RUST_LOG=serum_slab=debug serum-slab bids.bin asks.bin
//! ```

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use serum_slab::{
    BookSide, DecodeConfig, MarketParams, MarketState, OrderBook, PriceLevel, Side,
    MAX_ACCOUNT_LEN,
};

/// Decode and print Serum order book account dumps
#[derive(Debug, Parser)]
#[command(name = "serum-slab", version, about)]
struct Cli {
    /// Bids account data file
    bids: PathBuf,

    /// Asks account data file
    asks: PathBuf,

    /// Market account data file, enables decimal prices
    #[arg(long, requires_all = ["base_decimals", "quote_decimals"])]
    market: Option<PathBuf>,

    /// Decimals of the base mint
    #[arg(long)]
    base_decimals: Option<u8>,

    /// Decimals of the quote mint
    #[arg(long)]
    quote_decimals: Option<u8>,

    /// Price levels to print per side
    #[arg(long, default_value_t = 10)]
    depth: usize,

    /// Only walk the tree, skip free list and slot accounting checks
    #[arg(long)]
    no_validate: bool,

    /// Accept buffers without the `serum` magic prefix
    #[arg(long)]
    no_verify_magic: bool,

    /// Reject buffers larger than this many bytes
    #[arg(long, default_value_t = MAX_ACCOUNT_LEN)]
    max_len: usize,
}

impl Cli {
    fn config(&self) -> DecodeConfig {
        DecodeConfig::default()
            .with_max_account_len(self.max_len)
            .with_validate(!self.no_validate)
            .with_verify_magic(!self.no_verify_magic)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn read(path: &Path) -> Result<Vec<u8>, Box<dyn Error>> {
    std::fs::read(path).map_err(|err| format!("{}: {err}", path.display()).into())
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = cli.config();

    let params = match (&cli.market, cli.base_decimals, cli.quote_decimals) {
        (Some(path), Some(base), Some(quote)) => {
            let market = MarketState::decode(&read(path)?, &config)?;
            println!("market      {}", market.own_address);
            println!("  bids      {}", market.bids);
            println!("  asks      {}", market.asks);
            println!(
                "  lots      base {} / quote {}, fee {} bps",
                market.base_lot_size, market.quote_lot_size, market.fee_rate_bps
            );
            Some(market.params(base, quote))
        }
        _ => None,
    };

    let bids = BookSide::decode(&read(&cli.bids)?, Side::Bid, &config)?;
    let asks = BookSide::decode(&read(&cli.asks)?, Side::Ask, &config)?;
    for side in [&bids, &asks] {
        print_counters(side);
    }

    let book = OrderBook::new(bids, asks)?;
    println!();
    print_levels("asks", &book.depth(Side::Ask, cli.depth), params.as_ref(), true);
    match book.spread() {
        Some(spread) => println!("  ---- spread {} ----", format_price(spread, params.as_ref())),
        None => println!("  ---- no spread ----"),
    }
    print_levels("bids", &book.depth(Side::Bid, cli.depth), params.as_ref(), false);

    println!();
    println!("orders      {} bids, {} asks", book.bids().len(), book.asks().len());
    println!("fingerprint {}", book.fingerprint());
    Ok(())
}

fn print_counters(side: &BookSide) {
    let header = side.slab().header();
    println!(
        "{:<4} flags {:#06x}  bump {}  free {} (head {})  root {}  leaves {}",
        side.side(),
        side.flags().bits(),
        header.bump_index,
        header.free_list_len,
        header.free_list_head,
        header.root,
        header.leaf_count,
    );
}

/// Print levels so that the best prices of both sides meet in the middle
fn print_levels(label: &str, levels: &[PriceLevel], params: Option<&MarketParams>, reverse: bool) {
    let rows: Vec<&PriceLevel> = if reverse {
        levels.iter().rev().collect()
    } else {
        levels.iter().collect()
    };

    for level in rows {
        println!(
            "  {label} {:>20} {:>20} ({})",
            format_price(level.price, params),
            format_size(level.total_quantity, params),
            level.order_count
        );
    }
}

fn format_price(lots: u64, params: Option<&MarketParams>) -> String {
    match params.and_then(|p| p.price_to_decimal(lots)) {
        Some(price) => price.to_string(),
        None => lots.to_string(),
    }
}

fn format_size(lots: u64, params: Option<&MarketParams>) -> String {
    match params.and_then(|p| p.size_to_decimal(lots)) {
        Some(size) => size.to_string(),
        None => lots.to_string(),
    }
}
