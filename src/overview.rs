//! Review tally and rough sales estimate for a captured page.
//!
//! Copies are estimated as a fixed multiple of the review count; revenue
//! applies the refund and store-share rates to the launch price.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::error::{Result, ReviewError};
use crate::output::write_file;
use crate::parser::hours::parse_decimal;
use crate::pipeline::read_input;
use crate::settings::Settings;

const THUMB: &str = "div.thumb";
const THUMB_UP: &str = "img[src*='icon_thumbsUp']";
const THUMB_DOWN: &str = "img[src*='icon_thumbsDown']";
const APP_NAME: &str = "div.apphub_AppName";

pub const OVERVIEW_FILE: &str = "app_data_overview.md";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewTally {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
}

/// Figures typed in by the user; all optional.
#[derive(Debug, Clone, Default)]
pub struct LaunchInfo {
    pub app_id: Option<u32>,
    pub price: Option<String>,
    pub discount: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Estimates {
    pub copies: f64,
    pub revenue: f64,
}

#[derive(Debug)]
pub struct Overview {
    pub app_name: Option<String>,
    pub tally: ReviewTally,
    pub estimates: Estimates,
    pub launch: LaunchInfo,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ReviewError::Selector {
        selector: css.to_string(),
        reason: format!("{:?}", e),
    })
}

/// Count thumbs icons. A thumb block with neither icon is ignored.
pub fn tally_reviews(doc: &Html) -> Result<ReviewTally> {
    let thumb = selector(THUMB)?;
    let up = selector(THUMB_UP)?;
    let down = selector(THUMB_DOWN)?;

    let mut tally = ReviewTally::default();
    for node in doc.select(&thumb) {
        if node.select(&up).next().is_some() {
            tally.positive += 1;
        } else if node.select(&down).next().is_some() {
            tally.negative += 1;
        } else {
            continue;
        }
        tally.total += 1;
    }
    Ok(tally)
}

pub fn app_name(doc: &Html) -> Result<Option<String>> {
    let sel = selector(APP_NAME)?;
    Ok(doc
        .select(&sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|name| !name.is_empty()))
}

/// Currency noise is ignored; an unreadable or missing price gives zero revenue.
pub fn estimate(tally: &ReviewTally, launch_price: Option<&str>, settings: &Settings) -> Estimates {
    let copies = tally.total as f64 * settings.copies_per_review;
    let price = launch_price.and_then(parse_decimal).unwrap_or(0.0);
    let revenue = if price > 0.0 {
        copies * settings.refund_keep_rate * settings.store_share * price
    } else {
        0.0
    };
    debug!(copies, price, revenue, "estimates computed");
    Estimates { copies, revenue }
}

pub fn build_overview(html_path: &Path, launch: LaunchInfo, settings: &Settings) -> Result<Overview> {
    let html = read_input(html_path)?;
    let doc = Html::parse_document(&html);
    let tally = tally_reviews(&doc)?;
    let estimates = estimate(&tally, launch.price.as_deref(), settings);
    Ok(Overview {
        app_name: app_name(&doc)?,
        tally,
        estimates,
        launch,
    })
}

impl fmt::Display for Overview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let na = "No disponible";
        writeln!(f, "# AppData Overview\n")?;
        writeln!(f, "- [Nombre]:                {}", self.app_name.as_deref().unwrap_or(na))?;

        if let Some(id) = self.launch.app_id {
            writeln!(f, "- [AppID]:                 {}", id)?;
            writeln!(f, "- [Página de Steam]:       https://store.steampowered.com/app/{}/", id)?;
            writeln!(f, "\n## Bases de Datos Externas\n")?;
            writeln!(f, "- [SteamDB]:               https://steamdb.info/app/{}/", id)?;
            writeln!(f, "- [SteamSpy]:              https://steamspy.com/app/{}", id)?;
            writeln!(f, "- [SteamCharts]:           https://steamcharts.com/app/{}", id)?;
        }

        writeln!(f, "\n## Información de Reseñas\n")?;
        writeln!(f, "- [Total reviews]:         {}", self.tally.total)?;
        writeln!(f, "- [Positivas]:             {}", self.tally.positive)?;
        writeln!(f, "- [Negativas]:             {}", self.tally.negative)?;

        writeln!(f, "\n## Estimaciones\n")?;
        writeln!(f, "- [Precio lanzamiento]:    {} USD", self.launch.price.as_deref().unwrap_or(na))?;
        writeln!(f, "- [Descuento lanzamiento]: {}%", self.launch.discount.as_deref().unwrap_or(na))?;
        writeln!(f, "- [Copias vendidas]:       ~{:.0}", self.estimates.copies)?;
        writeln!(f, "- [Revenue estimado]:      ~{:.2} USD", self.estimates.revenue)?;
        writeln!(f, "\n---")
    }
}

pub fn render_markdown(o: &Overview) -> String {
    o.to_string()
}

/// Write the summary to `out_dir/app_data_overview.md`.
pub fn write_overview(out_dir: &Path, o: &Overview) -> Result<PathBuf> {
    fs::create_dir_all(out_dir).map_err(|source| ReviewError::Serialization {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let path = out_dir.join(OVERVIEW_FILE);
    let md = render_markdown(o);
    write_file(&path, |w| w.write_all(md.as_bytes()))?;
    info!(path = %path.display(), total = o.tally.total, "overview written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "tests/fixtures/reviews_page.html";

    #[test]
    fn tally_fixture() {
        let html = std::fs::read_to_string(PAGE).unwrap();
        let doc = Html::parse_document(&html);
        assert_eq!(
            tally_reviews(&doc).unwrap(),
            ReviewTally { total: 3, positive: 2, negative: 1 }
        );
        assert_eq!(app_name(&doc).unwrap().as_deref(), Some("Example Game"));
    }

    #[test]
    fn thumb_without_icon_is_skipped() {
        let doc = Html::parse_document(r#"<div class="thumb"><img src="avatar.png"></div>"#);
        assert_eq!(tally_reviews(&doc).unwrap(), ReviewTally::default());
    }

    #[test]
    fn estimates_from_price() {
        let tally = ReviewTally { total: 100, positive: 90, negative: 10 };
        let s = Settings::default();

        let e = estimate(&tally, Some("$19,99"), &s);
        assert_eq!(e.copies, 3000.0);
        assert!((e.revenue - 3000.0 * 0.9 * 0.7 * 19.99).abs() < 1e-6);

        assert_eq!(estimate(&tally, None, &s).revenue, 0.0);
        assert_eq!(estimate(&tally, Some("free"), &s).revenue, 0.0);
    }

    #[test]
    fn markdown_with_app_links() {
        let launch = LaunchInfo {
            app_id: Some(440),
            price: Some("10".into()),
            discount: Some("15".into()),
        };
        let o = build_overview(Path::new(PAGE), launch, &Settings::default()).unwrap();
        let md = render_markdown(&o);
        assert!(md.contains("- [Total reviews]:         3"));
        assert!(md.contains("https://steamdb.info/app/440/"));
        assert!(md.contains("- [Copias vendidas]:       ~90"));
        assert!(md.contains("- [Revenue estimado]:      ~567.00 USD"));
        assert!(md.contains("- [Descuento lanzamiento]: 15%"));
        assert!(md.starts_with("# AppData Overview\n"));
        assert!(md.ends_with("\n---\n"));
    }

    #[test]
    fn written_to_out_dir() {
        let dir = tempfile::tempdir().unwrap();
        let o = build_overview(Path::new(PAGE), LaunchInfo::default(), &Settings::default()).unwrap();
        let path = write_overview(&dir.path().join("out"), &o).unwrap();
        let md = std::fs::read_to_string(path).unwrap();
        assert!(!md.contains("steamdb"));
        assert!(md.contains("No disponible USD"));
    }
}
