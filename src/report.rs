use chrono::{DateTime, Duration, Local};

// Below this many vessels the rate is too noisy to project from.
const MIN_SAMPLE: usize = 10;

/// Linear throughput projection for a target-count run. Pure function of
/// the counters so it can be exercised with a fixed clock.
pub fn completion_estimate(
    collected: usize,
    target: usize,
    start_time: DateTime<Local>,
    now: DateTime<Local>,
) -> String {
    if collected < MIN_SAMPLE {
        return "Calculating...".to_string();
    }

    let elapsed_secs = (now - start_time).num_seconds().max(1) as f64;
    let per_minute = collected as f64 / elapsed_secs * 60.0;

    let remaining = target.saturating_sub(collected) as f64;
    let estimated_minutes = if per_minute > 0.0 {
        remaining / per_minute
    } else {
        0.0
    };

    let completion = now + Duration::seconds((estimated_minutes * 60.0) as i64);

    format!(
        "Rate: {:.1} vessels/min, Est. completion: {}, Est. time remaining: {} minutes",
        per_minute,
        completion.format("%H:%M:%S"),
        estimated_minutes as i64
    )
}

/// End-of-run summary line: total minutes and the overall rate.
pub fn final_summary(collected: usize, start_time: DateTime<Local>, now: DateTime<Local>) -> String {
    let elapsed_secs = (now - start_time).num_seconds().max(1) as f64;
    let minutes = elapsed_secs / 60.0;
    let rate = collected as f64 / elapsed_secs * 60.0;

    format!(
        "Scraping completed. Total time: {} minutes, Final rate: {:.1} vessels/min",
        minutes as i64, rate
    )
}
