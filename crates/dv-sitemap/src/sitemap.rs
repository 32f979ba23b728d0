//! `sitemap.xml` rendering.
//!
//! Entry order: one `.txt` entry per LLM bundle first, then every route of
//! the compiled route set except excluded ones (such as `/404`).

use chrono::NaiveDate;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::blog::{BLOG_ROUTE, BlogDates};
use crate::error::SitemapError;
use crate::routes::RouteSet;

/// XML namespace of the sitemap protocol.
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// `<changefreq>` values in use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
}

impl ChangeFreq {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

/// One `<url>` element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: NaiveDate,
    pub changefreq: ChangeFreq,
}

/// Sitemap under construction.
#[derive(Clone, Debug)]
pub struct Sitemap {
    site_url: String,
    today: NaiveDate,
    entries: Vec<SitemapEntry>,
}

impl Sitemap {
    /// Start a sitemap for `site_url` (e.g. `https://mirascope.com`).
    ///
    /// `today` is the default `lastmod`.
    #[must_use]
    pub fn new(site_url: &str, today: NaiveDate) -> Self {
        Self {
            site_url: site_url.trim_end_matches('/').to_owned(),
            today,
            entries: Vec::new(),
        }
    }

    /// Add the plain-text artifact of a bundle (`<route>.txt`).
    pub fn add_text_variant(&mut self, route: &str) {
        let loc = format!("{}{route}.txt", self.site_url);
        self.push(loc, self.today, ChangeFreq::Daily);
    }

    /// Add a page route.
    ///
    /// Blog posts (`/blog/<slug>`) use the post's date and change weekly;
    /// the blog listing uses the newest post date. Everything else is dated
    /// today and changes daily.
    pub fn add_route(&mut self, route: &str, blog: &BlogDates) {
        let (lastmod, changefreq) = if route == BLOG_ROUTE {
            (blog.latest().unwrap_or(self.today), ChangeFreq::Daily)
        } else if let Some(slug) = route
            .strip_prefix(BLOG_ROUTE)
            .and_then(|rest| rest.strip_prefix('/'))
        {
            (blog.post(slug).unwrap_or(self.today), ChangeFreq::Weekly)
        } else {
            (self.today, ChangeFreq::Daily)
        };
        let loc = format!("{}{route}", self.site_url);
        self.push(loc, lastmod, changefreq);
    }

    /// Add every route of `routes` not listed in `exclude`.
    pub fn add_routes<S: AsRef<str>>(&mut self, routes: &RouteSet, exclude: &[S], blog: &BlogDates) {
        for route in routes.iter() {
            if exclude.iter().any(|e| e.as_ref() == route) {
                continue;
            }
            self.add_route(route, blog);
        }
    }

    fn push(&mut self, loc: String, lastmod: NaiveDate, changefreq: ChangeFreq) {
        self.entries.push(SitemapEntry {
            loc,
            lastmod,
            changefreq,
        });
    }

    #[must_use]
    pub fn entries(&self) -> &[SitemapEntry] {
        &self.entries
    }

    /// Render the `<urlset>` document.
    pub fn to_xml(&self) -> Result<String, SitemapError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        write(
            &mut writer,
            Event::Start(BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NAMESPACE)])),
        )?;

        for entry in &self.entries {
            let lastmod = entry.lastmod.format("%Y-%m-%d").to_string();
            write(&mut writer, Event::Start(BytesStart::new("url")))?;
            write_text_element(&mut writer, "loc", &entry.loc)?;
            write_text_element(&mut writer, "lastmod", &lastmod)?;
            write_text_element(&mut writer, "changefreq", entry.changefreq.as_str())?;
            write(&mut writer, Event::End(BytesEnd::new("url")))?;
        }

        write(&mut writer, Event::End(BytesEnd::new("urlset")))?;

        let mut xml =
            String::from_utf8(writer.into_inner()).map_err(|e| SitemapError::Xml(e.to_string()))?;
        xml.push('\n');
        Ok(xml)
    }
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), SitemapError> {
    writer
        .write_event(event)
        .map_err(|e| SitemapError::Xml(e.to_string()))
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), SitemapError> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}
