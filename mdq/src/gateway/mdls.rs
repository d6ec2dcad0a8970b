//! Parser for `mdls` attribute listings

use chrono::{DateTime, FixedOffset, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// Timestamp layout `mdls` prints
const MDLS_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Timestamp layout used when rendering dates
pub const RENDER_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One attribute value as printed by `mdls`
#[derive(Debug, Clone, PartialEq)]
pub enum MdValue {
    /// Quoted string or bare scalar (numbers, booleans)
    Text(String),
    Date(DateTime<FixedOffset>),
    List(Vec<String>),
    /// `(null)`
    Null,
}

impl MdValue {
    fn from_scalar(raw: &str) -> Self {
        let raw = raw.trim();
        if raw == "(null)" {
            return MdValue::Null;
        }
        if let Some(text) = unquote(raw) {
            return MdValue::Text(text);
        }
        if let Ok(date) = DateTime::parse_from_str(raw, MDLS_DATE_FORMAT) {
            return MdValue::Date(date);
        }
        MdValue::Text(raw.to_string())
    }

    /// Render for display. Null renders as `None`.
    pub fn render(&self) -> Option<String> {
        match self {
            MdValue::Text(text) => Some(text.clone()),
            MdValue::Date(date) => Some(
                date.with_timezone(&Utc)
                    .format(RENDER_DATE_FORMAT)
                    .to_string(),
            ),
            MdValue::List(items) => Some(items.join(", ")),
            MdValue::Null => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MdValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Named attribute
#[derive(Debug, Clone, PartialEq)]
pub struct MdAttribute {
    pub name: String,
    pub value: MdValue,
}

fn assignment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(.*?)\s*$").expect("valid regex")
    })
}

/// Strip surrounding double quotes and unescape `\"` / `\\`
fn unquote(raw: &str) -> Option<String> {
    let inner = raw.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }
    Some(out)
}

/// Parse `mdls` output into attributes, preserving order.
///
/// Lines that are not `name = value` assignments are ignored.
pub fn parse(output: &str) -> Vec<MdAttribute> {
    let mut attributes = Vec::new();
    let mut lines = output.lines();

    while let Some(line) = lines.next() {
        let Some(caps) = assignment_re().captures(line) else {
            continue;
        };
        let name = caps[1].to_string();
        let raw = &caps[2];

        let value = if raw == "(" {
            let mut items = Vec::new();
            for item in lines.by_ref() {
                let item = item.trim();
                if item == ")" {
                    break;
                }
                let item = item.strip_suffix(',').unwrap_or(item).trim();
                if item.is_empty() {
                    continue;
                }
                items.push(unquote(item).unwrap_or_else(|| item.to_string()));
            }
            MdValue::List(items)
        } else {
            MdValue::from_scalar(raw)
        };

        attributes.push(MdAttribute { name, value });
    }

    attributes
}

/// Render attributes as `attribute: value` lines, skipping nulls
pub fn render_lines(attributes: &[MdAttribute]) -> Vec<String> {
    attributes
        .iter()
        .filter_map(|attr| {
            attr.value
                .render()
                .map(|value| format!("{}: {}", attr.name, value))
        })
        .collect()
}

/// Look up a single attribute by name
pub fn find<'a>(attributes: &'a [MdAttribute], name: &str) -> Option<&'a MdValue> {
    attributes
        .iter()
        .find(|attr| attr.name == name)
        .map(|attr| &attr.value)
}

/// Split a multi-file listing into one attribute list per file.
///
/// `mdls` prints the files back to back without a separator, so a file's
/// block ends where an attribute name repeats.
pub fn split_blocks(attributes: Vec<MdAttribute>) -> Vec<Vec<MdAttribute>> {
    let mut blocks = Vec::new();
    let mut current: Vec<MdAttribute> = Vec::new();

    for attr in attributes {
        if current.iter().any(|a| a.name == attr.name) {
            blocks.push(std::mem::take(&mut current));
        }
        current.push(attr);
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"_kMDItemDisplayNameWithExtensions      = "notes.md"
kMDItemContentCreationDate             = 2024-03-01 09:30:00 +0000
kMDItemContentType                     = "net.daringfireball.markdown"
kMDItemContentTypeTree                 = (
    "net.daringfireball.markdown",
    "public.plain-text",
    public.data
)
kMDItemFSSize                          = 2048
kMDItemKind                            = "Markdown \"Doc\""
kMDItemUserTags                        = (null)
"#;

    #[test]
    fn test_parse_scalars_and_lists() {
        let attrs = parse(SAMPLE);
        assert_eq!(attrs.len(), 7);
        assert_eq!(
            find(&attrs, "kMDItemContentType").and_then(MdValue::as_text),
            Some("net.daringfireball.markdown")
        );
        assert_eq!(
            find(&attrs, "kMDItemContentTypeTree"),
            Some(&MdValue::List(vec![
                "net.daringfireball.markdown".into(),
                "public.plain-text".into(),
                "public.data".into(),
            ]))
        );
        assert_eq!(find(&attrs, "kMDItemUserTags"), Some(&MdValue::Null));
        assert_eq!(
            find(&attrs, "kMDItemKind").and_then(MdValue::as_text),
            Some(r#"Markdown "Doc""#)
        );
    }

    #[test]
    fn test_render_lines() {
        let lines = render_lines(&parse(SAMPLE));
        assert_eq!(lines[0], "_kMDItemDisplayNameWithExtensions: notes.md");
        assert_eq!(lines[1], "kMDItemContentCreationDate: 2024-03-01 09:30:00");
        assert_eq!(
            lines[3],
            "kMDItemContentTypeTree: net.daringfireball.markdown, public.plain-text, public.data"
        );
        assert_eq!(lines[4], "kMDItemFSSize: 2048");
        assert!(!lines.iter().any(|l| l.starts_with("kMDItemUserTags")));
    }

    #[test]
    fn test_dates_render_in_utc() {
        let attrs = parse("kMDItemFSContentChangeDate = 2024-03-01 09:30:00 +0200\n");
        assert_eq!(
            render_lines(&attrs),
            vec!["kMDItemFSContentChangeDate: 2024-03-01 07:30:00".to_string()]
        );
    }

    #[test]
    fn test_parse_ignores_noise() {
        assert!(parse("").is_empty());
        assert!(parse("/tmp/x: could not find /tmp/x.\n").is_empty());
    }

    #[test]
    fn test_split_blocks_per_file() {
        let output = r#"kMDItemContentType = "public.plain-text"
kMDItemKind        = "Plain Text"
kMDItemContentType = "public.folder"
kMDItemKind        = "Folder"
kMDItemContentType = (null)
kMDItemKind        = (null)
"#;
        let blocks = split_blocks(parse(output));
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            find(&blocks[1], "kMDItemKind").and_then(MdValue::as_text),
            Some("Folder")
        );
        assert_eq!(find(&blocks[2], "kMDItemKind"), Some(&MdValue::Null));
        assert!(split_blocks(Vec::new()).is_empty());
    }
}
