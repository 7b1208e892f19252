//! APA and MLA reference formatting
//!
//! Missing fields are skipped rather than rejected, so a partially filled
//! form still yields a usable reference.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CitationStyle {
    #[default]
    Apa,
    Mla,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Book,
    Article,
    Website,
    Youtube,
}

/// Form fields for a source; dates are `YYYY-MM-DD`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationData {
    #[serde(default)]
    pub style: CitationStyle,
    #[serde(rename = "type")]
    pub source_type: SourceType,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub journal: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default)]
    pub issue: Option<String>,
    #[serde(default)]
    pub pages: Option<String>,
    #[serde(default)]
    pub website_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub date_accessed: Option<String>,
    #[serde(default)]
    pub channel_name: Option<String>,
    #[serde(default)]
    pub video_title: Option<String>,
    #[serde(default)]
    pub upload_date: Option<String>,
}

impl CitationData {
    pub fn new(style: CitationStyle, source_type: SourceType) -> Self {
        Self {
            style,
            source_type,
            author: None,
            year: None,
            title: None,
            publisher: None,
            journal: None,
            volume: None,
            issue: None,
            pages: None,
            website_name: None,
            url: None,
            date_accessed: None,
            channel_name: None,
            video_title: None,
            upload_date: None,
        }
    }
}

/// Blank strings count as absent
fn field(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// "March 5, 2024", or the raw text if it is not a date
fn long_date(value: &str) -> String {
    parse_date(value).map_or_else(|| value.to_string(), |d| d.format("%B %-d, %Y").to_string())
}

pub fn generate_citation(data: &CitationData) -> String {
    match (data.style, data.source_type) {
        (CitationStyle::Apa, SourceType::Book) => apa_book(data),
        (CitationStyle::Apa, SourceType::Article) => apa_article(data),
        (CitationStyle::Apa, SourceType::Website) => apa_website(data),
        (CitationStyle::Apa, SourceType::Youtube) => apa_youtube(data),
        (CitationStyle::Mla, SourceType::Book) => mla_book(data),
        (CitationStyle::Mla, SourceType::Article) => mla_article(data),
        (CitationStyle::Mla, SourceType::Website) => mla_website(data),
        (CitationStyle::Mla, SourceType::Youtube) => mla_youtube(data),
    }
}

// ============================================================================
// APA: elements separated by ". " with a closing period
// ============================================================================

fn apa_join(parts: Vec<String>) -> String {
    format!("{}.", parts.join(". "))
}

fn apa_book(data: &CitationData) -> String {
    let mut parts = Vec::new();
    if let Some(author) = field(&data.author) {
        parts.push(author.to_string());
    }
    if let Some(year) = field(&data.year) {
        parts.push(format!("({})", year));
    }
    if let Some(title) = field(&data.title) {
        parts.push(title.to_string());
    }
    if let Some(publisher) = field(&data.publisher) {
        parts.push(publisher.to_string());
    }
    apa_join(parts)
}

fn apa_article(data: &CitationData) -> String {
    let mut parts = Vec::new();
    if let Some(author) = field(&data.author) {
        parts.push(author.to_string());
    }
    if let Some(year) = field(&data.year) {
        parts.push(format!("({})", year));
    }
    if let Some(title) = field(&data.title) {
        parts.push(title.to_string());
    }
    if let Some(journal) = field(&data.journal) {
        parts.push(journal.to_string());
    }
    if let Some(volume) = field(&data.volume) {
        match field(&data.issue) {
            Some(issue) => parts.push(format!("{}({})", volume, issue)),
            None => parts.push(volume.to_string()),
        }
    }
    if let Some(pages) = field(&data.pages) {
        parts.push(pages.to_string());
    }
    apa_join(parts)
}

fn apa_website(data: &CitationData) -> String {
    let mut parts = Vec::new();
    if let Some(author) = field(&data.author) {
        parts.push(author.to_string());
    }
    let year = match (field(&data.year), field(&data.date_accessed)) {
        (Some(year), _) => Some(year.to_string()),
        (None, Some(accessed)) => Some(
            parse_date(accessed).map_or_else(|| "n.d.".to_string(), |d| d.year().to_string()),
        ),
        (None, None) => None,
    };
    if let Some(year) = year {
        parts.push(format!("({})", year));
    }
    if let Some(title) = field(&data.title) {
        parts.push(title.to_string());
    }
    if let Some(site) = field(&data.website_name) {
        parts.push(site.to_string());
    }
    if let Some(url) = field(&data.url) {
        parts.push(url.to_string());
    }
    apa_join(parts)
}

fn apa_youtube(data: &CitationData) -> String {
    let mut parts = Vec::new();
    if let Some(channel) = field(&data.channel_name) {
        parts.push(channel.to_string());
    }
    if let Some(uploaded) = field(&data.upload_date) {
        match parse_date(uploaded) {
            Some(d) => parts.push(format!("({})", d.format("%Y, %B %-d"))),
            None => parts.push(format!("({})", uploaded)),
        }
    }
    if let Some(title) = field(&data.video_title) {
        parts.push(title.to_string());
    }
    parts.push("[Video]".to_string());
    if let Some(url) = field(&data.url) {
        parts.push(format!("YouTube. {}", url));
    }
    apa_join(parts)
}

// ============================================================================
// MLA: punctuation lives on each element, joined by spaces
// ============================================================================

fn mla_book(data: &CitationData) -> String {
    let mut parts = Vec::new();
    if let Some(author) = field(&data.author) {
        parts.push(format!("{}.", author));
    }
    if let Some(title) = field(&data.title) {
        parts.push(format!("\"{}.\"", title));
    }
    if let Some(publisher) = field(&data.publisher) {
        parts.push(format!("{},", publisher));
    }
    if let Some(year) = field(&data.year) {
        parts.push(format!("{}.", year));
    }
    parts.join(" ")
}

fn mla_article(data: &CitationData) -> String {
    let mut parts = Vec::new();
    if let Some(author) = field(&data.author) {
        parts.push(format!("{}.", author));
    }
    if let Some(title) = field(&data.title) {
        parts.push(format!("\"{}.\"", title));
    }
    if let Some(journal) = field(&data.journal) {
        parts.push(format!("{},", journal));
    }
    if let Some(volume) = field(&data.volume) {
        match field(&data.issue) {
            Some(issue) => parts.push(format!("vol. {}, no. {},", volume, issue)),
            None => parts.push(format!("vol. {},", volume)),
        }
    }
    if let Some(year) = field(&data.year) {
        parts.push(format!("{},", year));
    }
    if let Some(pages) = field(&data.pages) {
        parts.push(format!("pp. {}.", pages));
    }
    parts.join(" ")
}

fn mla_website(data: &CitationData) -> String {
    let mut parts = Vec::new();
    if let Some(author) = field(&data.author) {
        parts.push(format!("{}.", author));
    }
    if let Some(title) = field(&data.title) {
        parts.push(format!("\"{}.\"", title));
    }
    if let Some(site) = field(&data.website_name) {
        parts.push(format!("{},", site));
    }
    if let Some(accessed) = field(&data.date_accessed) {
        parts.push(format!("{},", long_date(accessed)));
    }
    if let Some(url) = field(&data.url) {
        parts.push(format!("{}.", url));
    }
    parts.join(" ")
}

fn mla_youtube(data: &CitationData) -> String {
    let mut parts = Vec::new();
    if let Some(title) = field(&data.video_title) {
        parts.push(format!("\"{}.\"", title));
    }
    parts.push("YouTube,".to_string());
    if let Some(channel) = field(&data.channel_name) {
        parts.push(format!("uploaded by {},", channel));
    }
    if let Some(uploaded) = field(&data.upload_date) {
        parts.push(format!("{},", long_date(uploaded)));
    }
    if let Some(url) = field(&data.url) {
        parts.push(format!("{}.", url));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    fn book(style: CitationStyle) -> CitationData {
        let mut data = CitationData::new(style, SourceType::Book);
        data.author = some("Smith, John");
        data.year = some("2020");
        data.title = some("Rust in Practice");
        data.publisher = some("Acme Press");
        data
    }

    #[test]
    fn test_apa_book() {
        assert_eq!(
            generate_citation(&book(CitationStyle::Apa)),
            "Smith, John. (2020). Rust in Practice. Acme Press."
        );
    }

    #[test]
    fn test_mla_book() {
        assert_eq!(
            generate_citation(&book(CitationStyle::Mla)),
            "Smith, John. \"Rust in Practice.\" Acme Press, 2020."
        );
    }

    #[test]
    fn test_article_volume_issue() {
        let mut data = CitationData::new(CitationStyle::Apa, SourceType::Article);
        data.author = some("Doe");
        data.year = some("2019");
        data.title = some("Loans");
        data.journal = some("Finance Today");
        data.volume = some("12");
        data.issue = some("3");
        data.pages = some("45-67");
        assert_eq!(generate_citation(&data), "Doe. (2019). Loans. Finance Today. 12(3). 45-67.");

        data.style = CitationStyle::Mla;
        assert_eq!(
            generate_citation(&data),
            "Doe. \"Loans.\" Finance Today, vol. 12, no. 3, 2019, pp. 45-67."
        );
    }

    #[test]
    fn test_website_dates() {
        let mut data = CitationData::new(CitationStyle::Apa, SourceType::Website);
        data.title = some("Rates");
        data.website_name = some("Example");
        data.url = some("https://example.com");
        data.date_accessed = some("2024-03-05");
        assert_eq!(generate_citation(&data), "(2024). Rates. Example. https://example.com.");

        data.style = CitationStyle::Mla;
        assert_eq!(
            generate_citation(&data),
            "\"Rates.\" Example, March 5, 2024, https://example.com."
        );
    }

    #[test]
    fn test_youtube() {
        let mut data = CitationData::new(CitationStyle::Apa, SourceType::Youtube);
        data.channel_name = some("Tools");
        data.video_title = some("Intro");
        data.upload_date = some("2023-11-02");
        data.url = some("https://youtu.be/x");
        assert_eq!(
            generate_citation(&data),
            "Tools. (2023, November 2). Intro. [Video]. YouTube. https://youtu.be/x."
        );

        data.style = CitationStyle::Mla;
        assert_eq!(
            generate_citation(&data),
            "\"Intro.\" YouTube, uploaded by Tools, November 2, 2023, https://youtu.be/x."
        );
    }

    #[test]
    fn test_empty_fields_skipped() {
        let mut data = CitationData::new(CitationStyle::Mla, SourceType::Youtube);
        data.channel_name = some("   ");
        assert_eq!(generate_citation(&data), "YouTube,");
    }

    #[test]
    fn test_deserialize_form() {
        let data: CitationData = serde_json::from_str(
            r#"{ "style": "MLA", "type": "book", "author": "Lee", "websiteName": "ignored" }"#,
        )
        .unwrap();
        assert_eq!(data.style, CitationStyle::Mla);
        assert_eq!(data.website_name.as_deref(), Some("ignored"));
        assert_eq!(generate_citation(&data), "Lee.");
    }
}
