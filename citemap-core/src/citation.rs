// BibTeX extraction and APA formatting for paper metadata attached to nodes

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Separator between BibTeX entries stored in a single node attribute
pub const ENTRY_SEPARATOR: &str = " || ";

const DOI_PREFIX: &str = "https://doi.org/";

static FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([a-z][a-z0-9_-]*)\s*=\s*").expect("valid field regex"));

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub authors: String,
    /// Year as written in the entry ("2019", "2019-05-01", ...)
    pub year: String,
    pub title: String,
    /// journal, booktitle or series
    pub venue: String,
    pub volume: String,
    pub issue: String,
    pub pages: String,
    pub doi: String,
}

impl Paper {
    /// Parse one BibTeX entry. Returns None when the entry carries no
    /// author, title or year.
    pub fn from_bibtex(entry: &str) -> Option<Self> {
        let fields = parse_fields(entry);
        let get = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| fields.get(*k).filter(|v| !v.is_empty()))
                .cloned()
                .unwrap_or_default()
        };

        let paper = Paper {
            authors: get(&["author"]),
            year: get(&["year", "date"]),
            title: get(&["title"]),
            venue: get(&["journal", "booktitle", "series"]),
            volume: get(&["volume"]),
            issue: get(&["number"]),
            pages: get(&["pages"]),
            doi: get(&["doi"]),
        };

        if paper.authors.is_empty() && paper.title.is_empty() && paper.year.is_empty() {
            None
        } else {
            Some(paper)
        }
    }

    /// Integer year from the first four characters, if positive
    pub fn year_value(&self) -> Option<i32> {
        let prefix: String = self.year.trim().chars().take(4).collect();
        prefix.parse::<i32>().ok().filter(|y| *y > 0)
    }

    pub fn doi_url(&self) -> Option<String> {
        if self.doi.is_empty() {
            return None;
        }
        let bare = self.doi.strip_prefix(DOI_PREFIX).unwrap_or(&self.doi);
        Some(format!("{}{}", DOI_PREFIX, bare))
    }

    /// Plain-text APA citation, the string copied to the clipboard
    pub fn apa_plain(&self) -> String {
        let mut plain = format!(
            "{} ({}). {}. {}",
            self.authors, self.year, self.title, self.venue
        );
        if !self.volume.is_empty() {
            plain.push_str(&format!(", {}", self.volume));
        }
        if !self.issue.is_empty() {
            plain.push_str(&format!("({})", self.issue));
        }
        if !self.pages.is_empty() {
            plain.push_str(&format!(", {}", self.pages));
        }
        if let Some(link) = self.doi_url() {
            plain.push_str(&format!(". {}", link));
        }
        plain.replace('\n', " ")
    }

    /// APA citation block for the side panel, with a copy button
    pub fn apa_html(&self) -> String {
        let mut citation = format!(
            "<span class='apa-author'>{}</span>",
            escape_html(&self.authors)
        );
        if !self.year.is_empty() {
            citation.push_str(&format!(" ({})", escape_html(&self.year)));
        }
        citation.push_str(". ");
        if !self.title.is_empty() {
            citation.push_str(&format!(
                "<span class='apa-title'>{}</span>. ",
                escape_html(&self.title)
            ));
        }
        if !self.venue.is_empty() {
            citation.push_str(&format!(
                "<i class='apa-journal'>{}</i>",
                escape_html(&self.venue)
            ));
            if !self.volume.is_empty() {
                citation.push_str(&format!(", <i>{}</i>", escape_html(&self.volume)));
            }
            if !self.issue.is_empty() {
                citation.push_str(&format!("({})", escape_html(&self.issue)));
            }
            if !self.pages.is_empty() {
                citation.push_str(&format!(", {}", escape_html(&self.pages)));
            }
            citation.push_str(". ");
        }
        if let Some(link) = self.doi_url() {
            let link = escape_html(&link);
            citation.push_str(&format!(
                " <a href='{}' target='_blank' class='apa-doi'>{}</a>",
                link, link
            ));
        }

        format!(
            "<div class='apa-entry'>{}<button class='copy-btn' data-apa='{}'>Copy APA</button></div>",
            citation,
            escape_html(&self.apa_plain())
        )
    }

    pub fn search_text(&self) -> String {
        format!("{} {} {} {}", self.authors, self.year, self.title, self.venue)
    }
}

/// Split a node's BibTeX attribute into papers. Empty values and the
/// literal "none" yield no papers.
pub fn parse_bibtex(raw: &str) -> Vec<Paper> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        return Vec::new();
    }

    raw.split(ENTRY_SEPARATOR)
        .filter(|entry| !entry.trim().is_empty())
        .filter_map(Paper::from_bibtex)
        .collect()
}

/// Strip TeX grouping braces and common escapes, collapse whitespace
pub fn clean_tex(text: &str) -> String {
    let text = text
        .replace(['{', '}'], "")
        .replace("\\&", "&")
        .replace("\\%", "%")
        .replace("\\_", "_");
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// Field names are lowercased; the first occurrence of a field wins
fn parse_fields(entry: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    let mut pos = 0;

    while let Some(caps) = FIELD_RE.captures_at(entry, pos) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let (value, end) = read_value(entry, whole.end());
        fields
            .entry(name.as_str().to_lowercase())
            .or_insert_with(|| clean_tex(value));
        pos = end.max(whole.end());
    }

    fields
}

// Reads a braced, quoted or bare value starting at `start`.
// Returns the raw value and the byte offset just past it.
fn read_value(text: &str, start: usize) -> (&str, usize) {
    let rest = &text[start..];
    let mut chars = rest.char_indices();

    match chars.next() {
        Some((_, '{')) => {
            let mut depth = 0usize;
            let mut escaped = false;
            for (i, c) in rest.char_indices() {
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            return (&rest[1..i], start + i + 1);
                        }
                    }
                    _ => {}
                }
            }
            (&rest[1..], text.len())
        }
        Some((_, '"')) => {
            let mut escaped = false;
            for (i, c) in chars {
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => return (&rest[1..i], start + i + 1),
                    _ => {}
                }
            }
            (&rest[1..], text.len())
        }
        _ => {
            let end = rest
                .find(|c: char| c == ',' || c == '}' || c == '\n')
                .unwrap_or(rest.len());
            (rest[..end].trim(), start + end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = "@article{lovelace1843, author = {Lovelace, Ada}, \
        title = {Notes on the {Analytical} Engine}, journal = {Scientific Memoirs}, \
        year = {1843}, volume = {3}, number = {29}, pages = {666--731}, \
        doi = {https://doi.org/10.1000/xyz}}";

    #[test]
    fn test_nested_braces_are_kept_whole() {
        let paper = Paper::from_bibtex(ARTICLE).unwrap();
        assert_eq!(paper.title, "Notes on the Analytical Engine");
        assert_eq!(paper.authors, "Lovelace, Ada");
        assert_eq!(paper.venue, "Scientific Memoirs");
        assert_eq!(paper.issue, "29");
    }

    #[test]
    fn test_booktitle_does_not_shadow_title() {
        let entry = "@inproceedings{k, booktitle = {Proc. Graphs}, title = {Real Title}, year = 2001}";
        let paper = Paper::from_bibtex(entry).unwrap();
        assert_eq!(paper.title, "Real Title");
        assert_eq!(paper.venue, "Proc. Graphs");
        assert_eq!(paper.year, "2001");
    }

    #[test]
    fn test_quoted_values() {
        let entry = r#"@article{k, author = "Doe, J.", title = "A {B} C", year = "1999"}"#;
        let paper = Paper::from_bibtex(entry).unwrap();
        assert_eq!(paper.authors, "Doe, J.");
        assert_eq!(paper.title, "A B C");
        assert_eq!(paper.year_value(), Some(1999));
    }

    #[test]
    fn test_field_names_case_insensitive() {
        let entry = "@article{k, AUTHOR = {X}, Title = {Y}, YEAR = {2010}}";
        let paper = Paper::from_bibtex(entry).unwrap();
        assert_eq!(paper.authors, "X");
        assert_eq!(paper.title, "Y");
    }

    #[test]
    fn test_equals_inside_value_is_not_a_field() {
        let entry = "@misc{k, title = {E = mc^2}, note = {a=b}, year = {1905}}";
        let paper = Paper::from_bibtex(entry).unwrap();
        assert_eq!(paper.title, "E = mc^2");
        assert_eq!(paper.year, "1905");
    }

    #[test]
    fn test_date_fallback_for_year() {
        let entry = "@article{k, author = {Z}, date = {2020-05-01}}";
        let paper = Paper::from_bibtex(entry).unwrap();
        assert_eq!(paper.year, "2020-05-01");
        assert_eq!(paper.year_value(), Some(2020));
    }

    #[test]
    fn test_clean_tex_collapses_whitespace() {
        assert_eq!(clean_tex("  {A}\n   {B}\t C \\& D "), "A B C & D");
    }

    #[test]
    fn test_empty_entry_is_skipped() {
        assert!(Paper::from_bibtex("@misc{onlykey,}").is_none());
    }

    #[test]
    fn test_unterminated_brace_reads_to_end() {
        let paper = Paper::from_bibtex("@article{k, title = {Never closed").unwrap();
        assert_eq!(paper.title, "Never closed");
    }

    fn full_paper() -> Paper {
        Paper {
            authors: "Doe, J.".to_string(),
            year: "2001".to_string(),
            title: "T".to_string(),
            venue: "J".to_string(),
            volume: "3".to_string(),
            issue: "4".to_string(),
            pages: "1--2".to_string(),
            doi: "10.1/x".to_string(),
        }
    }

    #[test]
    fn test_apa_plain_full() {
        assert_eq!(
            full_paper().apa_plain(),
            "Doe, J. (2001). T. J, 3(4), 1--2. https://doi.org/10.1/x"
        );
    }

    #[test]
    fn test_doi_prefix_not_doubled() {
        let paper = Paper {
            doi: "https://doi.org/10.1/x".to_string(),
            ..full_paper()
        };
        assert_eq!(paper.doi_url().as_deref(), Some("https://doi.org/10.1/x"));
        assert_eq!(paper.apa_plain(), full_paper().apa_plain());
        assert_eq!(Paper::default().doi_url(), None);
    }

    #[test]
    fn test_apa_html_full() {
        let html = full_paper().apa_html();
        assert!(html.starts_with("<div class='apa-entry'><span class='apa-author'>Doe, J.</span> (2001). "));
        assert!(html.contains("<span class='apa-title'>T</span>. "));
        assert!(html.contains("<i class='apa-journal'>J</i>, <i>3</i>(4), 1--2. "));
        assert!(html.contains(
            "<a href='https://doi.org/10.1/x' target='_blank' class='apa-doi'>https://doi.org/10.1/x</a>"
        ));
        assert!(html.ends_with(
            "<button class='copy-btn' data-apa='Doe, J. (2001). T. J, 3(4), 1--2. https://doi.org/10.1/x'>Copy APA</button></div>"
        ));
    }

    #[test]
    fn test_apa_copy_attribute_is_escaped() {
        let paper = Paper {
            authors: "O'Neil & Sons".to_string(),
            doi: String::new(),
            ..full_paper()
        };
        let html = paper.apa_html();
        assert!(html.contains(
            "data-apa='O&#39;Neil &amp; Sons (2001). T. J, 3(4), 1--2'"
        ));
        assert!(!html.contains("O'Neil"));
    }

    #[test]
    fn test_apa_html_without_venue_omits_venue_block() {
        let paper = Paper {
            venue: String::new(),
            doi: String::new(),
            ..full_paper()
        };
        let html = paper.apa_html();
        let citation = html.split("<button").next().unwrap();
        assert!(!citation.contains("apa-journal"));
        assert!(!citation.contains("<i>3</i>"));
        assert!(!citation.contains("1--2"));
        assert!(citation.ends_with("<span class='apa-title'>T</span>. "));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">O'Neil & co</a>"#),
            "&lt;a href=&quot;x&quot;&gt;O&#39;Neil &amp; co&lt;/a&gt;"
        );
    }
}
