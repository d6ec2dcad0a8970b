//! Shorthand query compiler
//!
//! Translates the compact `@prefix:value` syntax into Spotlight's native
//! query language. Compilation never fails: malformed or dangling shorthand
//! degrades to a permissive predicate instead of an error.
//!
//! ```
//! use mdq::query::compile;
//!
//! assert_eq!(
//!     compile("@kind:Folder").as_str(),
//!     r#"kMDItemKind == "Folder""#
//! );
//! assert_eq!(
//!     compile("@size:>1M notes").as_str(),
//!     r#"(kMDItemFSSize > 1048576 && kMDItemFSName == "*notes*"cd)"#
//! );
//! ```

mod sort;

pub use sort::{SortKey, SortSpec};

use std::fmt;

/// Leading text that marks input as already written in the native language
pub const NATIVE_ATTRIBUTE_PREFIX: &str = "kMDItem";

/// Predicate matching every indexed item
pub const MATCH_ALL: &str = r#"kMDItemFSName == "*""#;

/// Filename attribute
const ATTR_NAME: &str = "kMDItemFSName";
const ATTR_CONTENT: &str = "kMDItemTextContent";
const ATTR_KIND: &str = "kMDItemKind";
const ATTR_CONTENT_TYPE: &str = "kMDItemContentType";
const ATTR_CONTENT_TYPE_TREE: &str = "kMDItemContentTypeTree";
const ATTR_MODIFIED: &str = "kMDItemFSContentChangeDate";
const ATTR_CREATED: &str = "kMDItemFSCreationDate";
const ATTR_SIZE: &str = "kMDItemFSSize";

/// A shorthand prefix family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prefix {
    /// `@name=` exact filename
    NameExact,
    /// `@name:` filename glob
    NameGlob,
    /// `@content:` text content substring
    Content,
    /// `@kind:` localized kind
    Kind,
    /// `@type:` content type identifier
    ContentType,
    /// `@tree:` content type ancestry
    ContentTypeTree,
    /// `@mod:` modified within N days
    Modified,
    /// `@created:` created within N days
    Created,
    /// `@size:` size comparison
    Size,
}

impl Prefix {
    /// Extraction order. `@name=` precedes `@name:` so the more specific
    /// family always claims its spans first.
    pub const PRIORITY: [Prefix; 9] = [
        Prefix::NameExact,
        Prefix::NameGlob,
        Prefix::Content,
        Prefix::Kind,
        Prefix::ContentType,
        Prefix::ContentTypeTree,
        Prefix::Modified,
        Prefix::Created,
        Prefix::Size,
    ];

    /// The literal text of this prefix
    pub fn token(self) -> &'static str {
        match self {
            Prefix::NameExact => "@name=",
            Prefix::NameGlob => "@name:",
            Prefix::Content => "@content:",
            Prefix::Kind => "@kind:",
            Prefix::ContentType => "@type:",
            Prefix::ContentTypeTree => "@tree:",
            Prefix::Modified => "@mod:",
            Prefix::Created => "@created:",
            Prefix::Size => "@size:",
        }
    }

    /// Compile one value of this family into a native predicate
    fn compile(self, value: &str) -> String {
        match self {
            Prefix::NameExact => format!(r#"{} == "{}"cd"#, ATTR_NAME, escape(value)),
            Prefix::NameGlob => name_glob(value),
            Prefix::Content => format!(r#"{} == "*{}*"cd"#, ATTR_CONTENT, escape(value)),
            Prefix::Kind => format!(r#"{} == "{}""#, ATTR_KIND, escape(value)),
            Prefix::ContentType => format!(r#"{} == "{}""#, ATTR_CONTENT_TYPE, escape(value)),
            Prefix::ContentTypeTree => {
                format!(r#"{} == "{}""#, ATTR_CONTENT_TYPE_TREE, escape(value))
            }
            Prefix::Modified => within_days(ATTR_MODIFIED, value),
            Prefix::Created => within_days(ATTR_CREATED, value),
            Prefix::Size => size_predicate(value),
        }
    }
}

/// A recognized prefix paired with its raw value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShorthandToken {
    pub prefix: Prefix,
    pub value: String,
}

/// A query string in Spotlight's native language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery(String);

impl CompiledQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the match-all fallback
    pub fn is_match_all(&self) -> bool {
        self.0 == MATCH_ALL
    }
}

impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CompiledQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Split input into shorthand tokens and the leftover free text.
///
/// Families are scanned in [`Prefix::PRIORITY`] order. Each match consumes
/// the prefix, its value, and one trailing whitespace character from the
/// working string. Tokens with an empty value are dropped.
pub fn tokenize(input: &str) -> (Vec<ShorthandToken>, String) {
    let mut working = input.to_string();
    let mut tokens = Vec::new();

    for prefix in Prefix::PRIORITY {
        let token = prefix.token();
        while let Some(start) = working.find(token) {
            let value_start = start + token.len();
            let value_end = working[value_start..]
                .find(char::is_whitespace)
                .map(|i| value_start + i)
                .unwrap_or(working.len());

            let span_end = match working[value_end..].chars().next() {
                Some(c) if c.is_whitespace() => value_end + c.len_utf8(),
                _ => value_end,
            };

            let value = working[value_start..value_end].to_string();
            working.replace_range(start..span_end, "");

            if !value.is_empty() {
                tokens.push(ShorthandToken { prefix, value });
            }
        }
    }

    (tokens, working)
}

/// Compile shorthand into a native query. Never fails.
pub fn compile(input: &str) -> CompiledQuery {
    if input.starts_with(NATIVE_ATTRIBUTE_PREFIX) {
        return CompiledQuery(input.to_string());
    }

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return CompiledQuery(MATCH_ALL.to_string());
    }

    let (tokens, rest) = tokenize(trimmed);

    let mut predicates: Vec<String> = tokens
        .iter()
        .map(|t| t.prefix.compile(&t.value))
        .collect();

    // Leftover text always narrows by filename, even next to other predicates
    let rest = rest.trim();
    if !rest.is_empty() {
        predicates.push(name_glob(rest));
    }

    let compiled = match predicates.len() {
        0 => MATCH_ALL.to_string(),
        1 => predicates.remove(0),
        _ => format!("({})", predicates.join(" && ")),
    };

    tracing::debug!(input = %input, query = %compiled, "compiled shorthand query");
    CompiledQuery(compiled)
}

/// Escape a value for embedding inside a double-quoted native string
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}

fn name_glob(value: &str) -> String {
    let escaped = escape(value);
    if value.contains('*') || value.contains('?') {
        format!(r#"{} == "{}"cd"#, ATTR_NAME, escaped)
    } else {
        format!(r#"{} == "*{}*"cd"#, ATTR_NAME, escaped)
    }
}

fn within_days(attribute: &str, value: &str) -> String {
    match value.parse::<u32>() {
        Ok(days) => format!("{} >= $time.today(-{})", attribute, days),
        Err(_) => {
            tracing::debug!(value, attribute, "day count not an integer, matching everything");
            MATCH_ALL.to_string()
        }
    }
}

fn size_predicate(value: &str) -> String {
    let (op, magnitude) = if let Some(rest) = value.strip_prefix('<') {
        ('<', rest)
    } else if let Some(rest) = value.strip_prefix('>') {
        ('>', rest)
    } else {
        ('>', value)
    };

    format!("{} {} {}", ATTR_SIZE, op, parse_size(magnitude))
}

/// Parse a magnitude with optional binary unit suffix. Non-numeric input is 0.
pub fn parse_size(magnitude: &str) -> u64 {
    const UNITS: [(&str, u64); 7] = [
        ("KB", 1024),
        ("MB", 1024 * 1024),
        ("GB", 1024 * 1024 * 1024),
        ("K", 1024),
        ("M", 1024 * 1024),
        ("G", 1024 * 1024 * 1024),
        ("B", 1),
    ];

    let upper = magnitude.trim().to_ascii_uppercase();
    let (number, multiplier) = UNITS
        .iter()
        .find_map(|(suffix, mult)| upper.strip_suffix(suffix).map(|n| (n, *mult)))
        .unwrap_or((upper.as_str(), 1));

    match number.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => (n * multiplier as f64) as u64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_name_glob() {
        assert_eq!(
            compile("report").as_str(),
            r#"kMDItemFSName == "*report*"cd"#
        );
    }

    #[test]
    fn test_wildcard_text_used_verbatim() {
        assert_eq!(compile("*.md").as_str(), r#"kMDItemFSName == "*.md"cd"#);
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(compile("").is_match_all());
        assert!(compile("   \t ").is_match_all());
    }

    #[test]
    fn test_native_passthrough() {
        let native = r#"kMDItemContentType == "public.png""#;
        assert_eq!(compile(native).as_str(), native);
    }

    #[test]
    fn test_name_exact_vs_glob() {
        assert_eq!(compile("@name=Back").as_str(), r#"kMDItemFSName == "Back"cd"#);
        assert_eq!(compile("@name:Back*").as_str(), r#"kMDItemFSName == "Back*"cd"#);
    }

    #[test]
    fn test_content_escapes() {
        assert_eq!(
            compile(r#"@content:say"hi\"#).as_str(),
            r#"kMDItemTextContent == "*say\"hi\\*"cd"#
        );
    }

    #[test]
    fn test_size_units() {
        assert_eq!(compile("@size:>1M").as_str(), "kMDItemFSSize > 1048576");
        assert_eq!(compile("@size:500K").as_str(), "kMDItemFSSize > 512000");
        assert_eq!(compile("@size:<2GB").as_str(), "kMDItemFSSize < 2147483648");
        assert_eq!(compile("@size:10b").as_str(), "kMDItemFSSize > 10");
        assert_eq!(compile("@size:lots").as_str(), "kMDItemFSSize > 0");
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1KB"), 1024);
        assert_eq!(parse_size("1.5k"), 1536);
        assert_eq!(parse_size("42"), 42);
        assert_eq!(parse_size(""), 0);
        assert_eq!(parse_size("-5M"), 0);
    }

    #[test]
    fn test_days() {
        assert_eq!(
            compile("@mod:7").as_str(),
            "kMDItemFSContentChangeDate >= $time.today(-7)"
        );
        assert_eq!(
            compile("@created:30").as_str(),
            "kMDItemFSCreationDate >= $time.today(-30)"
        );
    }

    #[test]
    fn test_bad_day_count_matches_everything() {
        // A typo'd day count silently widens to the whole index
        assert!(compile("@mod:week").is_match_all());
        assert!(compile("@created:-3").is_match_all());
    }

    #[test]
    fn test_dangling_prefix_dropped() {
        assert!(compile("@kind:").is_match_all());
        assert_eq!(compile("@kind: notes").as_str(), r#"kMDItemFSName == "*notes*"cd"#);
    }

    #[test]
    fn test_tokenize_consumes_spans() {
        let (tokens, rest) = tokenize("a @kind:Folder b @kind:Alias");
        assert_eq!(
            tokens,
            vec![
                ShorthandToken { prefix: Prefix::Kind, value: "Folder".into() },
                ShorthandToken { prefix: Prefix::Kind, value: "Alias".into() },
            ]
        );
        assert_eq!(rest.trim(), "a b");
    }

    #[test]
    fn test_name_exact_claimed_before_glob() {
        let (tokens, _) = tokenize("@name:foo @name=bar");
        assert_eq!(tokens[0].prefix, Prefix::NameExact);
        assert_eq!(tokens[0].value, "bar");
        assert_eq!(tokens[1].prefix, Prefix::NameGlob);
    }

    #[test]
    fn test_unknown_prefix_falls_through() {
        assert_eq!(
            compile("@color:red").as_str(),
            r#"kMDItemFSName == "*@color:red*"cd"#
        );
    }
}
