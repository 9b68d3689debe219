use std::{collections::HashMap, fmt};

use tracing::debug;

const ENTRY_SEPARATOR: char = ',';
const PAIR_SEPARATOR: char = ':';

/// Bearer token to stream key table loaded once at startup.
///
/// The table is never mutated after [`TokenMapping::parse`] returns; share it
/// behind an `Arc` instead of cloning per request.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TokenMapping {
    entries: HashMap<String, String>,
}

impl TokenMapping {
    /// Parses `token:streamKey` pairs separated by commas.
    ///
    /// Entries are trimmed, empty entries are skipped and entries without a
    /// `:` are dropped. Only the first `:` splits, so stream keys may contain
    /// colons. A repeated token keeps its last stream key.
    pub fn parse(raw: &str) -> Self {
        let mut entries = HashMap::new();
        let mut dropped = 0usize;

        for entry in raw.split(ENTRY_SEPARATOR) {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }

            match entry.split_once(PAIR_SEPARATOR) {
                Some((token, stream_key)) => {
                    entries.insert(token.trim().to_string(), stream_key.trim().to_string());
                }
                None => dropped += 1,
            }
        }

        debug!(
            entries = entries.len(),
            dropped, "parsed stream key mapping"
        );

        Self { entries }
    }

    pub fn stream_key_for(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }

    pub fn stream_keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Tokens are credentials; keep them out of debug output.
impl fmt::Debug for TokenMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenMapping")
            .field("entries", &self.entries.len())
            .finish()
    }
}

pub fn parse_mapping(raw: &str) -> TokenMapping {
    TokenMapping::parse(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping_of(pairs: &[(&str, &str)]) -> TokenMapping {
        TokenMapping {
            entries: pairs
                .iter()
                .map(|(token, key)| (token.to_string(), key.to_string()))
                .collect(),
        }
    }

    #[test]
    fn parses_well_formed_pairs() {
        let mapping = parse_mapping("token1:streamkey1,token2:streamkey2");

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.stream_key_for("token1"), Some("streamkey1"));
        assert_eq!(mapping.stream_key_for("token2"), Some("streamkey2"));
    }

    #[test]
    fn later_duplicate_token_wins() {
        assert_eq!(parse_mapping("a:1,a:2"), mapping_of(&[("a", "2")]));
    }

    #[test]
    fn drops_entries_without_separator() {
        assert_eq!(
            parse_mapping("a:1,bogus,b:2"),
            mapping_of(&[("a", "1"), ("b", "2")])
        );
    }

    #[test]
    fn splits_on_first_colon_only() {
        let mapping = parse_mapping("a:x:y");
        assert_eq!(mapping.stream_key_for("a"), Some("x:y"));
    }

    #[test]
    fn trims_entries_and_halves() {
        let mapping = parse_mapping("  a : 1 , , b:2 ,");
        assert_eq!(mapping, mapping_of(&[("a", "1"), ("b", "2")]));
    }

    #[test]
    fn empty_or_malformed_input_yields_empty_mapping() {
        assert!(parse_mapping("").is_empty());
        assert!(parse_mapping(" , ,").is_empty());
        assert!(parse_mapping("nocolon,alsonone").is_empty());
    }

    #[test]
    fn empty_halves_are_kept() {
        let mapping = parse_mapping(":orphan,lonely:");
        assert_eq!(mapping.stream_key_for(""), Some("orphan"));
        assert_eq!(mapping.stream_key_for("lonely"), Some(""));
    }

    #[test]
    fn parsing_is_deterministic() {
        let raw = "a:1,b:2,a:3,c:x:y";
        assert_eq!(parse_mapping(raw), parse_mapping(raw));
    }

    #[test]
    fn debug_output_hides_tokens() {
        let rendered = format!("{:?}", parse_mapping("secret-token:key"));
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("entries: 1"));
    }
}
