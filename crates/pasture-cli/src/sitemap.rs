//! XML sitemap and path listing, driven entirely by the location catalog.

use std::io::Write;

use chrono::NaiveDate;
use pasture_core::{LocationCatalog, SeoPageKind};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFreq {
    fn as_str(self) -> &'static str {
        match self {
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
        }
    }
}

const STATIC_PAGES: &[(&str, f32, ChangeFreq)] = &[
    ("/", 1.0, ChangeFreq::Daily),
    ("/map", 0.8, ChangeFreq::Daily),
    ("/submit", 0.7, ChangeFreq::Monthly),
    ("/about", 0.6, ChangeFreq::Monthly),
    ("/faq", 0.6, ChangeFreq::Monthly),
    ("/services", 0.7, ChangeFreq::Monthly),
];

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SitemapEntry {
    pub loc: String,
    pub lastmod: NaiveDate,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

fn landing_page_weight(kind: SeoPageKind) -> (f32, ChangeFreq) {
    match kind {
        SeoPageKind::State => (0.8, ChangeFreq::Weekly),
        SeoPageKind::StateService => (0.7, ChangeFreq::Monthly),
        SeoPageKind::City => (0.6, ChangeFreq::Monthly),
        SeoPageKind::CityService => (0.9, ChangeFreq::Weekly),
    }
}

/// Static pages first, then every catalog landing page in enumeration order.
pub(crate) fn sitemap_entries(
    catalog: &LocationCatalog,
    base_url: &str,
    lastmod: NaiveDate,
) -> Vec<SitemapEntry> {
    let base = base_url.trim_end_matches('/');
    let statics = STATIC_PAGES
        .iter()
        .map(|&(path, priority, changefreq)| (path.to_string(), priority, changefreq));
    let landing = catalog.enumerate_pages().into_iter().map(|page| {
        let (priority, changefreq) = landing_page_weight(page.kind);
        (page.path, priority, changefreq)
    });

    statics
        .chain(landing)
        .map(|(path, priority, changefreq)| SitemapEntry {
            loc: format!("{base}{path}"),
            lastmod,
            changefreq,
            priority,
        })
        .collect()
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> anyhow::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Serialise `entries` as a sitemaps.org `urlset` document.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub(crate) fn write_sitemap<W: Write>(out: W, entries: &[SitemapEntry]) -> anyhow::Result<()> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NS));
    writer.write_event(Event::Start(urlset))?;

    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        write_text_element(&mut writer, "loc", &entry.loc)?;
        write_text_element(
            &mut writer,
            "lastmod",
            &entry.lastmod.format("%Y-%m-%d").to_string(),
        )?;
        write_text_element(&mut writer, "changefreq", entry.changefreq.as_str())?;
        write_text_element(&mut writer, "priority", &format!("{:.1}", entry.priority))?;
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;
    let mut out = writer.into_inner();
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

pub(crate) fn run_paths(catalog: &LocationCatalog) {
    let pages = catalog.enumerate_pages();
    println!("{:<14}PATH", "KIND");
    for page in &pages {
        let kind = match page.kind {
            SeoPageKind::State => "state",
            SeoPageKind::StateService => "state+service",
            SeoPageKind::City => "city",
            SeoPageKind::CityService => "city+service",
        };
        println!("{kind:<14}{}", page.path);
    }
    println!("{} paths", pages.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    #[test]
    fn static_pages_come_first_with_fixed_weights() {
        let entries = sitemap_entries(&LocationCatalog::us(), "https://example.com/", day());
        assert_eq!(entries[0].loc, "https://example.com/");
        assert!((entries[0].priority - 1.0).abs() < f32::EPSILON);
        assert_eq!(entries[0].changefreq, ChangeFreq::Daily);
        assert_eq!(entries[5].loc, "https://example.com/services");
        assert_eq!(entries[6].loc, "https://example.com/alabama");
    }

    #[test]
    fn landing_pages_are_weighted_by_kind() {
        let entries = sitemap_entries(&LocationCatalog::us(), "https://example.com", day());
        let find = |loc: &str| {
            entries
                .iter()
                .find(|e| e.loc == format!("https://example.com{loc}"))
                .unwrap_or_else(|| panic!("missing {loc}"))
        };

        assert_eq!(find("/texas").changefreq, ChangeFreq::Weekly);
        assert!((find("/texas/austin/dead-horse-removal").priority - 0.9).abs() < f32::EPSILON);
        assert!((find("/texas/austin").priority - 0.6).abs() < f32::EPSILON);
        assert_eq!(find("/texas/dead-horse-removal").changefreq, ChangeFreq::Monthly);
    }

    #[test]
    fn entry_count_is_static_pages_plus_catalog() {
        let catalog = LocationCatalog::us();
        let entries = sitemap_entries(&catalog, "https://example.com", day());
        assert_eq!(
            entries.len(),
            STATIC_PAGES.len() + catalog.enumerate_all_paths().len()
        );
    }

    #[test]
    fn write_sitemap_emits_urlset_document() {
        let entries = vec![SitemapEntry {
            loc: "https://example.com/a?x=1&y=2".to_string(),
            lastmod: day(),
            changefreq: ChangeFreq::Weekly,
            priority: 0.8,
        }];
        let mut buf = Vec::new();
        write_sitemap(&mut buf, &entries).unwrap();
        let xml = String::from_utf8(buf).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(&format!("<urlset xmlns=\"{SITEMAP_NS}\">")));
        assert!(xml.contains("<loc>https://example.com/a?x=1&amp;y=2</loc>"));
        assert!(xml.contains("<lastmod>2025-03-01</lastmod>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains("<priority>0.8</priority>"));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }
}
