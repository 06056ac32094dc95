//! Parsing of user-entered tag strings.
//!
//! Tags are separated by spaces; a double-quoted phrase forms a single tag.
//! `fiction "civil war" fiction` yields `fiction` and `civil war`.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG_TOKEN: Regex = Regex::new(r#""[^"]*"|[^ ]+"#).expect("tag pattern is valid");
}

/// Split a tag string into distinct tags, keeping first occurrences in order.
///
/// Quote characters are removed from every token and empty tags are dropped.
///
/// # Examples
///
/// ```
/// use findcore::tags::parse_tags;
///
/// assert_eq!(
///     parse_tags(r#"fiction "civil war" fiction"#),
///     vec!["fiction".to_string(), "civil war".to_string()]
/// );
/// ```
#[must_use]
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for token in TAG_TOKEN.find_iter(input.trim()) {
        let tag = token.as_str().replace('"', "");
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_words() {
        assert_eq!(parse_tags("fiction classic"), vec!["fiction", "classic"]);
    }

    #[test]
    fn test_quoted_phrase_and_duplicates() {
        assert_eq!(
            parse_tags(r#"  "science fiction" space  space "#),
            vec!["science fiction", "space"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_tags("   ").is_empty());
        assert!(parse_tags(r#""""#).is_empty());
    }

    #[test]
    fn test_embedded_quotes_are_removed() {
        assert_eq!(parse_tags(r#"sci"fi"#), vec!["scifi"]);
    }
}
