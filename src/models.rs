use chrono::{DateTime, Local};

/// Listing sort order. The site defaults to ascending; descending is
/// requested with an explicit query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn query_suffix(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "",
            SortOrder::Descending => "&sort_type=desc",
        }
    }
}

/// When the pagination driver stops: after a full sweep of every listing
/// page, or as soon as a fixed number of vessels has been collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationPolicy {
    SweepAll,
    UntilCount(usize),
}

/// A flat vessel record. Keys are whatever labels the detail page exposes,
/// so there is no fixed schema; insertion order is preserved because it
/// drives the CSV column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VesselRecord {
    fields: Vec<(String, String)>,
}

impl VesselRecord {
    pub fn new(url: &str) -> Self {
        let mut record = Self::default();
        record.insert("url", url);
        record
    }

    /// Inserts a field, overwriting an existing key in place so the key
    /// keeps its original position.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.fields.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn name(&self) -> &str {
        self.get("name").unwrap_or("Unknown")
    }
}

/// Mutable run state carried through the pagination driver. Counters only
/// ever move forward; `collected` always equals the length of the
/// accumulated record collection.
#[derive(Debug, Clone)]
pub struct ScrapeSession {
    pub target_count: Option<usize>,
    pub collected: usize,
    pub start_time: DateTime<Local>,
    pub page: usize,
    pub sort: SortOrder,
}

impl ScrapeSession {
    pub fn new(target_count: Option<usize>, sort: SortOrder) -> Self {
        Self {
            target_count,
            collected: 0,
            start_time: Local::now(),
            page: 1,
            sort,
        }
    }

    pub fn record_vessel(&mut self) {
        self.collected += 1;
    }

    pub fn target_reached(&self) -> bool {
        self.target_count.is_some_and(|target| self.collected >= target)
    }
}
