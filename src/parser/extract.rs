use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, ReviewError};
use crate::settings::SelectorSettings;

/// One review exactly as found in the page, before any normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawReview {
    pub recommendation: String,
    pub hours: String,
    pub date: String,
    /// Inner markup of the content node, with the date node cut out.
    pub content_html: String,
}

pub struct ReviewSelectors {
    review: Selector,
    title: Selector,
    hours: Selector,
    date: Selector,
    content: Selector,
}

impl ReviewSelectors {
    pub fn from_settings(s: &SelectorSettings) -> Result<Self> {
        Ok(ReviewSelectors {
            review: parse_selector(&s.review)?,
            title: parse_selector(&s.title)?,
            hours: parse_selector(&s.hours)?,
            date: parse_selector(&s.date)?,
            content: parse_selector(&s.content)?,
        })
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ReviewError::Selector {
        selector: css.to_string(),
        reason: format!("{:?}", e),
    })
}

/// Lazily walk the review nodes of `doc` in document order.
///
/// Every matched node yields a `RawReview`, missing parts come back empty.
/// A document without review nodes is `ReviewError::NoReviewsFound`.
pub fn extract_reviews<'a>(
    doc: &'a Html,
    selectors: &'a ReviewSelectors,
) -> Result<impl Iterator<Item = RawReview> + 'a> {
    let mut nodes = doc.select(&selectors.review).peekable();
    if nodes.peek().is_none() {
        return Err(ReviewError::NoReviewsFound);
    }
    Ok(nodes.map(move |node| read_review(node, selectors)))
}

fn read_review(node: ElementRef<'_>, selectors: &ReviewSelectors) -> RawReview {
    let recommendation = first_text(node, &selectors.title);
    let hours = first_text(node, &selectors.hours);
    let date = first_text(node, &selectors.date);

    let content_html = node
        .select(&selectors.content)
        .next()
        .map(|content| {
            let inner = content.inner_html();
            // The date sits inside the content block; keep it out of the text.
            match content.select(&selectors.date).next() {
                Some(date_node) => inner.replacen(&date_node.html(), "", 1),
                None => inner,
            }
        })
        .unwrap_or_default();

    RawReview {
        recommendation,
        hours,
        date,
        content_html,
    }
}

fn first_text(node: ElementRef<'_>, selector: &Selector) -> String {
    node.select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn selectors() -> ReviewSelectors {
        ReviewSelectors::from_settings(&SelectorSettings::default()).unwrap()
    }

    fn fixture(name: &str) -> Html {
        let html = std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap();
        Html::parse_document(&html)
    }

    #[test]
    fn page_fixture_in_document_order() {
        let doc = fixture("reviews_page");
        let sel = selectors();
        let reviews: Vec<_> = extract_reviews(&doc, &sel).unwrap().collect();
        assert_eq!(reviews.len(), 4);

        assert_eq!(reviews[0].recommendation, "Recommended");
        assert_eq!(reviews[0].hours, "127,3 hrs on record");
        assert_eq!(reviews[0].date, "Posted 11 February");
        assert!(reviews[0].content_html.contains("Great game"));
        assert!(!reviews[0].content_html.contains("date_posted"));
        assert!(!reviews[0].content_html.contains("Posted 11 February"));

        assert_eq!(reviews[1].recommendation, "Recomendado");
        assert_eq!(reviews[2].recommendation, "Not Recommended");
        assert!(reviews[2].content_html.contains("很好玩"));
    }

    #[test]
    fn bare_review_node_yields_defaults() {
        let doc = fixture("reviews_page");
        let sel = selectors();
        let last = extract_reviews(&doc, &sel).unwrap().last().unwrap();
        assert_eq!(last, RawReview::default());
    }

    #[test]
    fn no_review_nodes() {
        let doc = fixture("no_reviews");
        let sel = selectors();
        assert!(matches!(extract_reviews(&doc, &sel), Err(ReviewError::NoReviewsFound)));
    }

    #[test]
    fn date_outside_content_still_read() {
        let doc = Html::parse_document(
            r#"<div class="apphub_UserReviewCardContent">
                 <div class="date_posted">Posted 3 March</div>
                 <div class="apphub_CardTextContent">Solid<br>fun</div>
               </div>"#,
        );
        let sel = selectors();
        let r = extract_reviews(&doc, &sel).unwrap().next().unwrap();
        assert_eq!(r.date, "Posted 3 March");
        assert_eq!(r.content_html, "Solid<br>fun");
    }

    #[test]
    fn invalid_selector_reported() {
        let bad = SelectorSettings {
            review: "div[".into(),
            ..SelectorSettings::default()
        };
        assert!(matches!(
            ReviewSelectors::from_settings(&bad),
            Err(ReviewError::Selector { .. })
        ));
    }
}
