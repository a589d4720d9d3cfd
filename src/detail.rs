use crate::models::VesselRecord;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

const COUNTRY_MISSING: &str = "-";

/// Extracts a flat record from a vessel detail page. Returns `None` when
/// the general information table is absent, which is the one structure a
/// valid vessel page always carries. Everything else degrades gracefully:
/// missing captions or voyage labels just leave fields out.
pub fn extract_vessel(html: &str, url: &str) -> Option<VesselRecord> {
    let document = Html::parse_document(html);
    let mut record = VesselRecord::new(url);

    let table_selector = Selector::parse("table.table--prop").unwrap();
    let table = document.select(&table_selector).next()?;

    let row_selector = Selector::parse("tr").unwrap();
    let header_selector = Selector::parse("th").unwrap();
    let data_selector = Selector::parse("td").unwrap();
    for row in table.select(&row_selector) {
        let header = row.select(&header_selector).next();
        let data = row.select(&data_selector).next();
        if let (Some(header), Some(data)) = (header, data) {
            let key = normalize_field_name(&element_text(&header));
            if !key.is_empty() {
                record.insert(&key, element_text(&data));
            }
        }
    }

    let heading_selector = Selector::parse("h1").unwrap();
    if let Some(heading) = document.select(&heading_selector).next() {
        record.insert("name", element_text(&heading));
    }

    record.insert("country", extract_country(&document));

    extract_voyage_info(&document, &mut record);

    Some(record)
}

/// Turns a property table label into a record key: lowercased, with runs
/// of spaces and slashes collapsed to a single underscore.
pub fn normalize_field_name(label: &str) -> String {
    label
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '/')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// The country lives in a caption like "... sails under the flag of
/// PANAMA ...". Takes the first run of ALL-CAPS words after the phrase
/// and title-cases it; falls back to "-" when the caption or the run is
/// missing.
fn extract_country(document: &Html) -> String {
    let caption_selector =
        Selector::parse("p.text-style.questions__item-content-message").unwrap();
    let phrase = Regex::new(r"(?i)flag of").unwrap();
    let capitals = Regex::new(r"[A-Z]+(?:\s+[A-Z]+)*").unwrap();

    for caption in document.select(&caption_selector) {
        let text = element_text(&caption);
        let Some(found) = phrase.find(&text) else {
            continue;
        };
        let after_phrase = &text[found.end()..];
        return match capitals.find(after_phrase) {
            Some(country) => title_case(country.as_str()),
            None => COUNTRY_MISSING.to_string(),
        };
    }

    COUNTRY_MISSING.to_string()
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Voyage data sits in a block headed by a literal "Voyage Information"
/// div; each label's value is the text of its next sibling element. Any
/// missing label is simply left out of the record.
fn extract_voyage_info(document: &Html, record: &mut VesselRecord) {
    const LABELS: [(&str, &str); 3] = [
        ("Reported Destination", "reported_destination"),
        ("Latitude / Longitude", "position"),
        ("Position Received", "position_received"),
    ];

    let div_selector = Selector::parse("div").unwrap();
    let Some(heading) = document
        .select(&div_selector)
        .find(|el| element_text(el) == "Voyage Information")
    else {
        return;
    };
    let Some(section) = heading.parent().and_then(ElementRef::wrap) else {
        return;
    };

    for (label, key) in LABELS {
        if let Some(value) = sibling_value(&section, &div_selector, label) {
            record.insert(key, value);
        }
    }
}

fn sibling_value(section: &ElementRef, div_selector: &Selector, label: &str) -> Option<String> {
    let label_element = section
        .select(div_selector)
        .find(|el| element_text(el) == label)?;
    let value_element = label_element.next_siblings().find_map(ElementRef::wrap)?;
    Some(element_text(&value_element))
}
