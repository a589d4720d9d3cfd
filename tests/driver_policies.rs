use magicport_scraper::driver::{run_scraper, ScrapeOptions, VesselSource};
use magicport_scraper::error::ScrapeError;
use magicport_scraper::models::{SortOrder, TerminationPolicy};
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const BASE: &str = "https://magicport.ai";

/// Serves canned listing and detail pages and records which listing
/// pages were requested.
struct FakeSite {
    cards_per_page: usize,
    /// Pages that fail with a structural error when requested.
    broken_pages: Vec<usize>,
    /// Total page count advertised in the pagination strip of page 1.
    total_pages: usize,
    requested_pages: RefCell<Vec<usize>>,
}

impl FakeSite {
    fn new(cards_per_page: usize, total_pages: usize) -> Self {
        Self {
            cards_per_page,
            broken_pages: Vec::new(),
            total_pages,
            requested_pages: RefCell::new(Vec::new()),
        }
    }

    fn requested(&self) -> Vec<usize> {
        self.requested_pages.borrow().clone()
    }

    fn listing_html(&self, page: usize) -> String {
        let mut html = String::from("<html><body>");
        for card in 1..=self.cards_per_page {
            html.push_str(&format!(
                r#"<div class="card--vessel"><a title=" Vessel" href="/vessels/p{}-v{}">V</a></div>"#,
                page, card
            ));
        }
        if page == 1 {
            html.push_str(r#"<ul class="pagination">"#);
            for n in 1..=self.total_pages {
                html.push_str(&format!(
                    r##"<li><a class="pagination__item-link" href="#">{}</a></li>"##,
                    n
                ));
            }
            html.push_str(r##"<li><a class="pagination__item-link" href="#">Locked</a></li></ul>"##);
        }
        html.push_str("</body></html>");
        html
    }
}

impl VesselSource for FakeSite {
    fn base_url(&self) -> &str {
        BASE
    }

    fn check_access(&self) -> Result<(), ScrapeError> {
        Ok(())
    }

    fn listing_page(&self, page: usize, _sort: SortOrder) -> Result<String, ScrapeError> {
        self.requested_pages.borrow_mut().push(page);
        if self.broken_pages.contains(&page) {
            return Err(ScrapeError::MissingStructure("vessel cards"));
        }
        Ok(self.listing_html(page))
    }

    fn vessel_page(&self, url: &str) -> Result<String, ScrapeError> {
        let name = url.rsplit('/').next().unwrap_or("unknown").to_uppercase();
        Ok(format!(
            r#"<html><body>
                <h1>{}</h1>
                <table class="table--prop">
                    <tr><th>IMO</th><td>1234567</td></tr>
                    <tr><th>Gross Tonnage</th><td>812</td></tr>
                </table>
            </body></html>"#,
            name
        ))
    }
}

struct LockedSite;

impl VesselSource for LockedSite {
    fn base_url(&self) -> &str {
        BASE
    }

    fn check_access(&self) -> Result<(), ScrapeError> {
        Err(ScrapeError::AuthRequired)
    }

    fn listing_page(&self, _page: usize, _sort: SortOrder) -> Result<String, ScrapeError> {
        unreachable!("listing must not be fetched when access is denied")
    }

    fn vessel_page(&self, _url: &str) -> Result<String, ScrapeError> {
        unreachable!("details must not be fetched when access is denied")
    }
}

fn temp_output(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("magicport_driver_{}_{}", std::process::id(), name))
}

fn options(output: &PathBuf) -> ScrapeOptions {
    ScrapeOptions {
        output_file: output.to_string_lossy().into_owned(),
        test_mode: false,
        page_delay: Duration::ZERO,
        checkpoint_interval: 0,
    }
}

#[test]
fn until_count_stops_mid_page_at_target() {
    // 12 vessels per page, target 25: page 2 ends at 24 collected, so the
    // driver must request page 3 and stop on its second card.
    let site = FakeSite::new(12, 100);
    let output = temp_output("until_count.csv");
    let records = run_scraper(&site, TerminationPolicy::UntilCount(25), &options(&output)).unwrap();

    assert_eq!(records.len(), 25);
    assert_eq!(site.requested(), vec![1, 2, 3]);

    let contents = fs::read_to_string(&output).unwrap();
    // Header plus one row per vessel, never more than the target.
    assert_eq!(contents.lines().count(), 26);
    fs::remove_file(&output).unwrap();
}

#[test]
fn until_count_output_is_sorted_by_name() {
    let site = FakeSite::new(3, 100);
    let output = temp_output("sorted.csv");
    let records = run_scraper(&site, TerminationPolicy::UntilCount(5), &options(&output)).unwrap();
    assert_eq!(records.len(), 5);

    let contents = fs::read_to_string(&output).unwrap();
    let names: Vec<&str> = contents
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap())
        .collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    fs::remove_file(&output).unwrap();
}

#[test]
fn until_count_writes_periodic_checkpoints() {
    // 3 vessels per page, checkpoints every 2 pages, run ended by a broken
    // page 5. The page counter increments before the cadence check, so the
    // first snapshot lands after page 1 completes, under the page-2 name.
    let mut site = FakeSite::new(3, 100);
    site.broken_pages = vec![5];
    let output = temp_output("checkpointed.csv");
    let checkpoint2 = PathBuf::from(magicport_scraper::driver::checkpoint_filename(2));
    let checkpoint4 = PathBuf::from(magicport_scraper::driver::checkpoint_filename(4));
    let _ = fs::remove_file(&checkpoint2);
    let _ = fs::remove_file(&checkpoint4);

    let records = run_scraper(
        &site,
        TerminationPolicy::UntilCount(500),
        &ScrapeOptions {
            checkpoint_interval: 2,
            ..options(&output)
        },
    )
    .unwrap();
    assert_eq!(records.len(), 12);

    // Snapshot holds exactly what had been collected at that point.
    let contents = fs::read_to_string(&checkpoint2).unwrap();
    assert_eq!(contents.lines().count(), 4);
    let contents = fs::read_to_string(&checkpoint4).unwrap();
    assert_eq!(contents.lines().count(), 10);

    fs::remove_file(&checkpoint2).unwrap();
    fs::remove_file(&checkpoint4).unwrap();
    fs::remove_file(&output).unwrap();
}

#[test]
fn until_count_stops_when_a_page_breaks() {
    let mut site = FakeSite::new(10, 100);
    site.broken_pages = vec![3];
    let output = temp_output("broken_desc.csv");
    let records = run_scraper(&site, TerminationPolicy::UntilCount(500), &options(&output)).unwrap();

    // Two good pages before the break; page 4 is never requested.
    assert_eq!(records.len(), 20);
    assert_eq!(site.requested(), vec![1, 2, 3]);
    fs::remove_file(&output).unwrap();
}

#[test]
fn sweep_all_skips_a_failed_page_and_continues() {
    let mut site = FakeSite::new(5, 4);
    site.broken_pages = vec![2];
    let output = temp_output("sweep.csv");
    let records = run_scraper(&site, TerminationPolicy::SweepAll, &options(&output)).unwrap();

    // Page count discovery fetches page 1 once before the sweep itself.
    assert_eq!(site.requested(), vec![1, 1, 2, 3, 4]);
    // Pages 1, 3 and 4 contribute; page 2 is skipped.
    assert_eq!(records.len(), 15);
    fs::remove_file(&output).unwrap();
}

#[test]
fn denied_access_aborts_the_run() {
    let output = temp_output("denied.csv");
    let result = run_scraper(&LockedSite, TerminationPolicy::SweepAll, &options(&output));
    assert!(result.is_err());
    assert!(!output.exists());
}

#[test]
fn test_mode_covers_three_pages() {
    let site = FakeSite::new(2, 100);
    let output = temp_output("ignored.csv");
    let records = run_scraper(
        &site,
        TerminationPolicy::SweepAll,
        &ScrapeOptions {
            test_mode: true,
            ..options(&output)
        },
    )
    .unwrap();

    assert_eq!(site.requested(), vec![1, 2, 3]);
    assert_eq!(records.len(), 6);
    // Test mode writes its own fixed file, not the configured output.
    assert!(!output.exists());
    let _ = fs::remove_file("test_vessels.csv");
}
