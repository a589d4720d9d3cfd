use crate::error::ScrapeError;
use crate::models::{ScrapeSession, SortOrder, TerminationPolicy, VesselRecord};
use crate::{debug_println, detail, listing, log_error, log_info, log_warn, report, storage};
use anyhow::Result;
use chrono::Local;
use std::time::Duration;

const TEST_PAGES: usize = 3;
const TEST_OUTPUT: &str = "test_vessels.csv";

/// Source of listing and detail page markup. The HTTP session implements
/// this; tests drive the pagination logic with canned pages.
pub trait VesselSource {
    fn base_url(&self) -> &str;
    fn check_access(&self) -> Result<(), ScrapeError>;
    fn listing_page(&self, page: usize, sort: SortOrder) -> Result<String, ScrapeError>;
    fn vessel_page(&self, url: &str) -> Result<String, ScrapeError>;
}

#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub output_file: String,
    pub test_mode: bool,
    /// Politeness delay between listing pages.
    pub page_delay: Duration,
    /// Periodic snapshot interval in pages for target-count runs; zero
    /// disables checkpoints.
    pub checkpoint_interval: usize,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            output_file: "vessels.csv".to_string(),
            test_mode: false,
            page_delay: Duration::from_secs(2),
            checkpoint_interval: 20,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PageOutcome {
    Continue,
    TargetReached,
}

/// Runs a full scrape against `source` under the given termination policy.
/// Returns the accumulated records; the same records are also persisted to
/// the configured output file.
pub fn run_scraper<S: VesselSource>(
    source: &S,
    policy: TerminationPolicy,
    options: &ScrapeOptions,
) -> Result<Vec<VesselRecord>> {
    source.check_access()?;
    log_info!("Successfully accessed vessels page");

    let (sort, target) = match policy {
        TerminationPolicy::SweepAll => (SortOrder::Ascending, None),
        TerminationPolicy::UntilCount(target) => (SortOrder::Descending, Some(target)),
    };
    let mut session = ScrapeSession::new(target, sort);
    let mut records = Vec::new();

    if options.test_mode {
        run_test_mode(source, &mut session, &mut records, options)?;
        return Ok(records);
    }

    match policy {
        TerminationPolicy::SweepAll => {
            sweep_all(source, &mut session, &mut records, options)?;
        }
        TerminationPolicy::UntilCount(target) => {
            until_count(source, &mut session, &mut records, target, options)?;
        }
    }

    Ok(records)
}

/// Scrapes just the first few pages to verify selectors and cookies
/// before committing to a long run.
fn run_test_mode<S: VesselSource>(
    source: &S,
    session: &mut ScrapeSession,
    records: &mut Vec<VesselRecord>,
    options: &ScrapeOptions,
) -> Result<()> {
    log_info!("Running in test mode - will scrape first {} pages", TEST_PAGES);
    for page in 1..=TEST_PAGES {
        session.page = page;
        log_info!("Scraping test page {}", page);
        if let Err(e) = scrape_page(source, page, session, records) {
            log_error!("Error scraping test page {}: {}", page, e);
        }
        throttle(options.page_delay);
    }
    storage::save_to_csv(records, TEST_OUTPUT, false)?;
    log_info!("Test scraping completed");
    Ok(())
}

/// Full ascending sweep: discovers the page count once, then visits every
/// page. A failed page is logged and skipped.
fn sweep_all<S: VesselSource>(
    source: &S,
    session: &mut ScrapeSession,
    records: &mut Vec<VesselRecord>,
    options: &ScrapeOptions,
) -> Result<()> {
    let first_page = source.listing_page(1, SortOrder::Ascending)?;
    let total = listing::total_pages(&first_page)?;
    log_info!("Starting scrape of {} pages", total);

    for page in 1..=total {
        session.page = page;
        log_info!("Scraping page {} of {}", page, total);
        if let Err(e) = scrape_page(source, page, session, records) {
            log_error!("Error scraping page {}: {}", page, e);
            continue;
        }
        throttle(options.page_delay);
    }

    storage::save_to_csv(records, &options.output_file, false)?;
    log_info!("Scraping completed");
    Ok(())
}

/// Descending sweep that stops once `target` vessels have been collected.
/// The threshold is checked per card, so the last page may be consumed
/// only partially. A failed page ends the run here instead of being
/// skipped, since with a fixed target there is no point leaving gaps.
fn until_count<S: VesselSource>(
    source: &S,
    session: &mut ScrapeSession,
    records: &mut Vec<VesselRecord>,
    target: usize,
    options: &ScrapeOptions,
) -> Result<()> {
    log_info!("Starting descending scrape to collect {} vessels", target);

    let mut page = 1;
    loop {
        session.page = page;
        match scrape_page(source, page, session, records) {
            Ok(PageOutcome::TargetReached) => break,
            Ok(PageOutcome::Continue) => {}
            Err(e) => {
                log_error!("Error scraping page {}: {}", page, e);
                break;
            }
        }

        page += 1;
        throttle(options.page_delay);

        if options.checkpoint_interval > 0 && page % options.checkpoint_interval == 0 {
            storage::save_to_csv(records, &checkpoint_filename(page), true)?;
        }
    }

    log_info!(
        "{}",
        report::final_summary(session.collected, session.start_time, Local::now())
    );
    storage::save_to_csv(records, &options.output_file, true)?;
    Ok(())
}

pub fn checkpoint_filename(page: usize) -> String {
    format!("vessels_desc_progress_page{}.csv", page)
}

/// Visits one listing page and every vessel card on it. Detail failures
/// are vessel-granular: logged and skipped without failing the page.
fn scrape_page<S: VesselSource>(
    source: &S,
    page: usize,
    session: &mut ScrapeSession,
    records: &mut Vec<VesselRecord>,
) -> Result<PageOutcome, ScrapeError> {
    let html = source.listing_page(page, session.sort)?;
    let links = listing::vessel_links(&html, source.base_url());
    if links.is_empty() {
        return Err(ScrapeError::MissingStructure("vessel cards"));
    }
    debug_println!("Found {} vessel links on page {}", links.len(), page);

    let mut vessels_on_page = 0;
    for url in links {
        if session.target_reached() {
            return Ok(PageOutcome::TargetReached);
        }

        let detail_html = match source.vessel_page(&url) {
            Ok(html) => html,
            Err(e) => {
                log_error!("Error scraping vessel details from {}: {}", url, e);
                continue;
            }
        };

        match detail::extract_vessel(&detail_html, &url) {
            Some(record) => {
                debug_println!("Scraped vessel: {}", record.name());
                records.push(record);
                session.record_vessel();
                vessels_on_page += 1;
            }
            None => {
                log_warn!("Could not find general information table for {}", url);
            }
        }
    }

    match session.target_count {
        Some(target) => {
            let estimate = report::completion_estimate(
                session.collected,
                target,
                session.start_time,
                Local::now(),
            );
            log_info!(
                "Page {}: Added {} vessels. Total: {}/{}. {}",
                page,
                vessels_on_page,
                session.collected,
                target,
                estimate
            );
        }
        None => {
            log_info!("Page {}: Added {} vessels. Total: {}", page, vessels_on_page, session.collected);
        }
    }

    Ok(PageOutcome::Continue)
}

fn throttle(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}
