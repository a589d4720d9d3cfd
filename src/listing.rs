use crate::error::ScrapeError;
use scraper::{Html, Selector};

/// Extracts detail page URLs from a listing page, one per vessel card.
/// Cards without the expected anchor are skipped silently since the site
/// mixes promotional cards into the grid.
pub fn vessel_links(html: &str, base_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse("div.card--vessel").unwrap();
    // The anchor title really does start with a space on the live site.
    let link_selector = Selector::parse(r#"a[title=" Vessel"]"#).unwrap();

    let mut links = Vec::new();
    for card in document.select(&card_selector) {
        if let Some(anchor) = card.select(&link_selector).next() {
            if let Some(href) = anchor.value().attr("href") {
                links.push(resolve_href(base_url, href));
            }
        }
    }
    links
}

fn resolve_href(base_url: &str, href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), href)
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), href)
    }
}

/// Reads the total page count from the pagination strip: the last link
/// whose label parses as a number. Locked pages and ellipsis entries have
/// non-numeric labels and are passed over.
pub fn total_pages(html: &str) -> Result<usize, ScrapeError> {
    let document = Html::parse_document(html);
    let pagination_selector = Selector::parse("ul.pagination").unwrap();
    let link_selector = Selector::parse("a.pagination__item-link").unwrap();

    let pagination = document
        .select(&pagination_selector)
        .next()
        .ok_or(ScrapeError::MissingStructure("pagination"))?;

    let links: Vec<_> = pagination.select(&link_selector).collect();
    for link in links.iter().rev() {
        let label = link.text().collect::<String>();
        if let Ok(number) = label.trim().parse::<usize>() {
            return Ok(number);
        }
    }

    Err(ScrapeError::MissingStructure("numbered pagination link"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://magicport.ai";

    fn card(inner: &str) -> String {
        format!(r#"<div class="card--vessel">{}</div>"#, inner)
    }

    #[test]
    fn extracts_one_link_per_card() {
        let html = format!(
            "<html><body>{}{}{}</body></html>",
            card(r#"<a title=" Vessel" href="/vessels/tuna-1">SEA QUEEN</a>"#),
            card(r#"<a title=" Vessel" href="https://magicport.ai/vessels/tuna-2">OCEAN STAR</a>"#),
            card(r#"<a href="/vessels/tuna-3">no title attribute</a>"#),
        );

        let links = vessel_links(&html, BASE);
        assert_eq!(
            links,
            vec![
                "https://magicport.ai/vessels/tuna-1",
                "https://magicport.ai/vessels/tuna-2",
            ]
        );
    }

    #[test]
    fn links_never_exceed_cards_and_are_absolute() {
        let html = format!(
            "<html><body>{}{}</body></html>",
            card(r#"<a title=" Vessel" href="/vessels/a">A</a>"#),
            card("<span>locked</span>"),
        );

        let links = vessel_links(&html, BASE);
        assert!(links.len() <= 2);
        assert!(links.iter().all(|l| l.starts_with("http")));
    }

    #[test]
    fn total_pages_takes_last_numeric_link() {
        let html = r##"
            <ul class="pagination">
                <li><a class="pagination__item-link" href="#">1</a></li>
                <li><a class="pagination__item-link" href="#">2</a></li>
                <li><a class="pagination__item-link" href="#">57</a></li>
                <li><a class="pagination__item-link" href="#">Locked</a></li>
                <li><a class="pagination__item-link" href="#">&raquo;</a></li>
            </ul>"##;

        assert_eq!(total_pages(html).unwrap(), 57);
    }

    #[test]
    fn total_pages_fails_without_pagination() {
        let err = total_pages("<html><body></body></html>").unwrap_err();
        assert!(matches!(err, ScrapeError::MissingStructure(_)));
    }
}
