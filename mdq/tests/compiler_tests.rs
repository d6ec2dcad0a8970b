//! Compiler tests over realistic agent queries
//!
//! Each case pairs shorthand an agent would type with the native query
//! Spotlight receives.

use mdq::query::{compile, tokenize, Prefix};

fn check(input: &str, expected: &str) {
    assert_eq!(compile(input).as_str(), expected, "input: {:?}", input);
}

#[test]
fn test_plain_words_search_file_names() {
    check("invoice", r#"kMDItemFSName == "*invoice*"cd"#);
    check("  quarterly report ", r#"kMDItemFSName == "*quarterly report*"cd"#);
}

#[test]
fn test_empty_query_matches_everything() {
    check("", r#"kMDItemFSName == "*""#);
    check("   \t", r#"kMDItemFSName == "*""#);
}

#[test]
fn test_native_queries_pass_through() {
    let native = r#"kMDItemContentType == "com.adobe.pdf" && kMDItemFSSize > 1000"#;
    check(native, native);
}

#[test]
fn test_leading_space_disables_passthrough() {
    let compiled = compile(" kMDItemFSName == x");
    assert!(compiled.as_str().starts_with("kMDItemFSName == \"*kMDItemFSName"));
}

#[test]
fn test_recent_source_files_with_todo() {
    check(
        "@content:TODO @type:public.swift-source extra",
        r#"(kMDItemTextContent == "*TODO*"cd && kMDItemContentType == "public.swift-source" && kMDItemFSName == "*extra*"cd)"#,
    );
}

#[test]
fn test_large_files() {
    check("@size:>1M", "kMDItemFSSize > 1048576");
    check("@size:<500KB", "kMDItemFSSize < 512000");
    check("@size:2G", "kMDItemFSSize > 2147483648");
    check("@size:huge", "kMDItemFSSize > 0");
}

#[test]
fn test_exact_name_versus_glob() {
    check("@name=Back", r#"kMDItemFSName == "Back"cd"#);
    check("@name:Back*", r#"kMDItemFSName == "Back*"cd"#);
    check("@name:Back", r#"kMDItemFSName == "*Back*"cd"#);
}

#[test]
fn test_recently_modified_images() {
    check(
        "@tree:public.image @mod:7",
        "(kMDItemContentTypeTree == \"public.image\" && kMDItemFSContentChangeDate >= $time.today(-7))",
    );
}

#[test]
fn test_created_today() {
    check("@created:0", "kMDItemFSCreationDate >= $time.today(-0)");
}

#[test]
fn test_non_numeric_days_match_everything() {
    check("@mod:week", r#"kMDItemFSName == "*""#);
    check("@mod:-3", r#"kMDItemFSName == "*""#);
}

#[test]
fn test_folders() {
    check("@kind:Folder", r#"kMDItemKind == "Folder""#);
}

#[test]
fn test_quotes_and_backslashes_are_escaped() {
    check(r#"@content:say"hi\"#, r#"kMDItemTextContent == "*say\"hi\\*"cd"#);
}

#[test]
fn test_repeated_prefix_yields_every_value() {
    check(
        "@kind:Folder @kind:Alias",
        r#"(kMDItemKind == "Folder" && kMDItemKind == "Alias")"#,
    );
}

#[test]
fn test_prefix_without_value_is_ignored() {
    check("@content: notes", r#"kMDItemFSName == "*notes*"cd"#);
    check("@mod:", r#"kMDItemFSName == "*""#);
}

#[test]
fn test_unknown_prefix_is_file_name_text() {
    check("@author:me", r#"kMDItemFSName == "*@author:me*"cd"#);
}

#[test]
fn test_tokens_follow_priority_order() {
    let (tokens, rest) = tokenize("@size:>1M budget @name=a.txt @content:q3");
    let prefixes: Vec<Prefix> = tokens.iter().map(|t| t.prefix).collect();
    assert_eq!(prefixes, vec![Prefix::NameExact, Prefix::Content, Prefix::Size]);
    assert_eq!(rest.trim(), "budget");
}
