use anyhow::Result;
use clap::Parser;
use magicport_scraper::driver::{run_scraper, ScrapeOptions};
use magicport_scraper::models::TerminationPolicy;
use magicport_scraper::session::Session;
use magicport_scraper::{log_error, log_info, logger};
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(author, version, about = "MagicPort fishing vessel scraper")]
struct Args {
    /// Path to output CSV file (defaults to vessels.csv, or
    /// vessels_desc_final.csv when --target-count is set)
    #[clap(short, long)]
    output: Option<String>,

    /// File holding the Cookie header value exported from the browser
    #[clap(short, long, default_value = "cookies.txt")]
    cookies: String,

    /// Scrape only the first 3 pages and save to test_vessels.csv
    #[clap(short, long)]
    test: bool,

    /// Stop after collecting this many vessels (uses descending sort)
    #[clap(short = 'n', long)]
    target_count: Option<usize>,

    /// Delay between page requests in seconds
    #[clap(short, long, default_value = "2")]
    delay: u64,

    /// Base URL of the site
    #[clap(long, default_value = "https://magicport.ai")]
    base_url: String,

    /// Enable debug output
    #[clap(long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();
    logger::set_debug(args.debug);

    if let Err(e) = run(args) {
        log_error!("Scraping failed: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let policy = match args.target_count {
        Some(target) => TerminationPolicy::UntilCount(target),
        None => TerminationPolicy::SweepAll,
    };

    let output_file = args.output.unwrap_or_else(|| {
        match policy {
            TerminationPolicy::UntilCount(_) => "vessels_desc_final.csv",
            TerminationPolicy::SweepAll => "vessels.csv",
        }
        .to_string()
    });

    let session = Session::new(&args.base_url, Some(&args.cookies))?;
    let options = ScrapeOptions {
        output_file,
        test_mode: args.test,
        page_delay: Duration::from_secs(args.delay),
        ..ScrapeOptions::default()
    };

    let records = run_scraper(&session, policy, &options)?;
    log_info!("Collected {} vessels", records.len());
    Ok(())
}
