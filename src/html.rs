use std::borrow::Cow;

use regex::{Captures, Regex};

lazy_static::lazy_static! {
  static ref ENTITY: Regex = Regex::new(
    r"&(#[0-9]+;?|#[xX][0-9a-fA-F]+;?|[a-zA-Z][a-zA-Z0-9]*;?)"
  )
  .expect("bad entity regex");
  static ref LINE_BREAK: Regex =
    Regex::new(r"(?i)<br\s*/?>|</p\s*>").expect("bad line break regex");
  static ref TAG: Regex = Regex::new(r"<[^<]+?>").expect("bad tag regex");
}

// HTML5 names missing from htmlescape's HTML4 table.
const HTML5_ENTITIES: &[(&str, &str)] = &[
  ("apos", "'"),
  ("Tab", "\t"),
  ("NewLine", "\n"),
  ("excl", "!"),
  ("num", "#"),
  ("dollar", "$"),
  ("percnt", "%"),
  ("lpar", "("),
  ("rpar", ")"),
  ("ast", "*"),
  ("plus", "+"),
  ("comma", ","),
  ("period", "."),
  ("sol", "/"),
  ("colon", ":"),
  ("semi", ";"),
  ("equals", "="),
  ("quest", "?"),
  ("commat", "@"),
  ("lsqb", "["),
  ("lbrack", "["),
  ("bsol", "\\"),
  ("rsqb", "]"),
  ("rbrack", "]"),
  ("Hat", "^"),
  ("lowbar", "_"),
  ("grave", "`"),
  ("lcub", "{"),
  ("lbrace", "{"),
  ("verbar", "|"),
  ("vert", "|"),
  ("rcub", "}"),
  ("rbrace", "}"),
];

// Legacy names that decode even without a trailing semicolon, besides the
// Latin-1 range.
const LEGACY_ENTITIES: &[(&str, &str)] = &[
  ("amp", "&"),
  ("AMP", "&"),
  ("lt", "<"),
  ("LT", "<"),
  ("gt", ">"),
  ("GT", ">"),
  ("quot", "\""),
  ("QUOT", "\""),
  ("COPY", "\u{a9}"),
  ("REG", "\u{ae}"),
];

/// Decode HTML character references the way browsers do. Legacy references
/// may omit the semicolon ("&amp", "&copy2026"); anything unrecognized is
/// kept verbatim, so stray ampersands survive untouched.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
  ENTITY.replace_all(text, |caps: &Captures| {
    decode_reference(&caps[1]).unwrap_or_else(|| caps[0].to_owned())
  })
}

fn decode_reference(reference: &str) -> Option<String> {
  if let Some(number) = reference.strip_prefix('#') {
    return decode_numeric(number.trim_end_matches(';'));
  }

  let name = reference.trim_end_matches(';');
  if name.len() < reference.len() {
    if let Some(decoded) = decode_named(name) {
      return Some(decoded);
    }
  }

  // longest legacy prefix wins: "&ampere;" -> "&ere;"
  (2..=name.len()).rev().find_map(|end| {
    let (prefix, rest) = reference.split_at(end);
    decode_legacy(prefix).map(|decoded| decoded + rest)
  })
}

fn decode_numeric(number: &str) -> Option<String> {
  let code = match number.strip_prefix(['x', 'X']) {
    Some(hex) => u32::from_str_radix(hex, 16).ok()?,
    None => number.parse().ok()?,
  };
  char::from_u32(code).filter(|c| *c != '\0').map(String::from)
}

fn lookup(table: &[(&str, &str)], name: &str) -> Option<String> {
  table
    .iter()
    .find(|(entity, _)| *entity == name)
    .map(|(_, value)| (*value).to_owned())
}

fn decode_named(name: &str) -> Option<String> {
  lookup(HTML5_ENTITIES, name)
    .or_else(|| lookup(LEGACY_ENTITIES, name))
    .or_else(|| htmlescape::decode_html(&format!("&{name};")).ok())
}

fn decode_legacy(name: &str) -> Option<String> {
  if let Some(decoded) = lookup(LEGACY_ENTITIES, name) {
    return Some(decoded);
  }

  let decoded = htmlescape::decode_html(&format!("&{name};")).ok()?;
  let mut chars = decoded.chars();
  match (chars.next(), chars.next()) {
    (Some(c), None) if ('\u{a0}'..='\u{ff}').contains(&c) => Some(decoded),
    _ => None,
  }
}

/// Remove anything that looks like a tag. Line breaks and paragraph ends
/// become a single space so adjacent words don't run together.
pub fn strip_markup(text: &str) -> String {
  let mut text = LINE_BREAK.replace_all(text, " ").into_owned();

  // removing one tag can expose another, e.g. "<<b>i>"
  while TAG.is_match(&text) {
    text = TAG.replace_all(&text, "").into_owned();
  }

  text
}
