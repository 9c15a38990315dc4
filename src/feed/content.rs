use crate::html::{decode_entities, strip_markup};

pub const MAX_CONTENT_CHARS: usize = 500;
pub const ELLIPSIS: &str = "...";

/// Turn a markup-bearing description into display text of at most
/// `MAX_CONTENT_CHARS` characters.
pub fn clean_content(raw: &str) -> String {
  let decoded = decode_entities(raw);
  let stripped = strip_markup(&decoded);
  // trim after truncation: a cut text may end up shorter than the cap
  truncate(stripped).trim().to_owned()
}

/// Titles are plain text: entities are decoded but nothing is stripped.
pub fn clean_title(raw: &str) -> String {
  truncate(decode_entities(raw).into_owned()).trim().to_owned()
}

fn truncate(content: String) -> String {
  if content.chars().count() <= MAX_CONTENT_CHARS {
    return content;
  }

  let keep = MAX_CONTENT_CHARS - ELLIPSIS.chars().count();
  let mut truncated: String = content.chars().take(keep).collect();
  truncated.push_str(ELLIPSIS);
  truncated
}
