//! Section-based extraction of structured fields from free-form model output.
//!
//! Every stage asks the model for text shaped like
//!
//! ```text
//! Overview:
//! A calculator.
//!
//! Key Features:
//! - add
//! - subtract
//! ```
//!
//! and every stage parses it the same way: a cursor walks the lines, switches
//! section when a line looks like one of the configured headers, collects
//! bullet lines as items under list sections and joins everything else into
//! the section's text. Stages differ only in their [`Section`] tables.
//!
//! Extraction never fails. Missing sections simply come back empty and the
//! stage substitutes its fallback values.

/// Bullet markers recognised at the start of a list item.
pub const BULLET_MARKERS: [char; 3] = ['-', '*', '•'];

/// Whether a section accumulates prose or bullet items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Lines are joined into one space-separated string.
    Text,
    /// Bullet lines become items; other lines are kept as text.
    List,
}

/// One recognisable section of a model response.
#[derive(Debug, Clone, Copy)]
pub struct Section<K: 'static> {
    /// Caller-defined field this section fills.
    pub key: K,
    /// Header keywords, matched case-insensitively against the start of a
    /// line. Earlier entries win, so list longer phrases first.
    pub keywords: &'static [&'static str],
    pub kind: SectionKind,
}

impl<K> Section<K> {
    /// A prose section: its lines are joined with single spaces.
    pub const fn text(key: K, keywords: &'static [&'static str]) -> Self {
        Self {
            key,
            keywords,
            kind: SectionKind::Text,
        }
    }

    /// A bullet-list section: each bullet line becomes one item.
    pub const fn list(key: K, keywords: &'static [&'static str]) -> Self {
        Self {
            key,
            keywords,
            kind: SectionKind::List,
        }
    }
}

/// Accumulated content of one section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionBody {
    pub text: String,
    pub items: Vec<String>,
}

impl SectionBody {
    fn push_text(&mut self, line: &str) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(line);
    }
}

/// Parser for one stage's response layout.
#[derive(Debug, Clone, Copy)]
pub struct SectionParser<K: 'static> {
    sections: &'static [Section<K>],
}

impl<K: Copy + PartialEq> SectionParser<K> {
    /// Creates a parser over `sections`, matched in the order given.
    pub const fn new(sections: &'static [Section<K>]) -> Self {
        Self { sections }
    }

    /// Walks `response` line by line and fills one [`SectionBody`] per section.
    ///
    /// Lines before the first recognised header are ignored.
    pub fn parse(&self, response: &str) -> Extracted<K> {
        let mut bodies = vec![SectionBody::default(); self.sections.len()];
        let mut current: Option<usize> = None;

        for raw in response.lines() {
            let line = raw.trim();
            if line.is_empty() || is_separator(line) {
                continue;
            }

            if let Some((index, inline)) = self.match_header(line) {
                current = Some(index);
                if let Some(inline) = inline {
                    bodies[index].push_text(inline);
                }
                continue;
            }

            let Some(index) = current else {
                continue;
            };

            match (self.sections[index].kind, bullet_item(line)) {
                (SectionKind::List, Some(item)) => bodies[index].items.push(item.to_string()),
                (SectionKind::List, None) | (SectionKind::Text, _) => {
                    bodies[index].push_text(line)
                }
            }
        }

        Extracted {
            keys: self.sections.iter().map(|s| s.key).collect(),
            bodies,
        }
    }

    /// Returns the section index and any inline content if `line` is a header.
    fn match_header<'l>(&self, line: &'l str) -> Option<(usize, Option<&'l str>)> {
        let normalized = strip_decoration(line);

        for (index, section) in self.sections.iter().enumerate() {
            for keyword in section.keywords {
                let Some(prefix) = normalized.get(..keyword.len()) else {
                    continue;
                };
                if !prefix.eq_ignore_ascii_case(keyword) {
                    continue;
                }

                let rest = normalized[keyword.len()..]
                    .trim_start_matches(|c: char| c == '*' || c == '_' || c.is_whitespace());
                if !(rest.is_empty() || rest.starts_with(':') || rest.starts_with('(')) {
                    continue;
                }

                let inline = rest
                    .split_once(':')
                    .map(|(_, after)| after.trim_matches(|c: char| c == '*' || c == '_' || c.is_whitespace()))
                    .filter(|after| !after.is_empty());
                return Some((index, inline));
            }
        }
        None
    }
}

/// Result of [`SectionParser::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted<K> {
    keys: Vec<K>,
    bodies: Vec<SectionBody>,
}

impl<K: Copy + PartialEq> Extracted<K> {
    fn body(&self, key: K) -> Option<&SectionBody> {
        self.keys
            .iter()
            .position(|k| *k == key)
            .map(|i| &self.bodies[i])
    }

    /// Section text, or `None` if the section was absent or empty.
    pub fn text(&self, key: K) -> Option<&str> {
        self.body(key)
            .map(|b| b.text.trim())
            .filter(|t| !t.is_empty())
    }

    /// Section items in response order (possibly empty).
    pub fn items(&self, key: K) -> &[String] {
        self.body(key).map(|b| b.items.as_slice()).unwrap_or(&[])
    }

    /// Section text, or the result of `fallback` when empty.
    pub fn text_or_else(&self, key: K, fallback: impl FnOnce() -> String) -> String {
        self.text(key).map(str::to_string).unwrap_or_else(fallback)
    }

    /// Section items, or the result of `fallback` when there are none.
    pub fn items_or_else(&self, key: K, fallback: impl FnOnce() -> Vec<String>) -> Vec<String> {
        let items = self.items(key);
        if items.is_empty() {
            fallback()
        } else {
            items.to_vec()
        }
    }
}

// ---------------------------------------------------------------------------
// Line helpers
// ---------------------------------------------------------------------------

/// Returns the item text if `line` starts with a bullet marker.
///
/// A doubled marker (`**bold**`, `--`) is not a bullet.
pub fn bullet_item(line: &str) -> Option<&str> {
    let mut chars = line.chars();
    let marker = chars.next().filter(|c| BULLET_MARKERS.contains(c))?;
    if chars.next() == Some(marker) {
        return None;
    }
    let item = line[marker.len_utf8()..].trim();
    (!item.is_empty()).then_some(item)
}

/// Removes Markdown heading hashes, bold markers and leading `1.` / `2)`
/// numbering from a candidate header line.
fn strip_decoration(line: &str) -> &str {
    let mut s = line.trim_start_matches('#').trim_start();
    s = s.strip_prefix("**").or_else(|| s.strip_prefix("__")).unwrap_or(s);

    let digits = s.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        if let Some(rest) = s[digits..].strip_prefix(['.', ')']) {
            s = rest.trim_start();
            s = s.strip_prefix("**").unwrap_or(s);
        }
    }
    s
}

fn is_separator(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| matches!(c, '-' | '*' | '_' | '=' | '#'))
}
