//! The merge-tag mini-language used in action message templates.
//!
//! Tokens have the form `{{category.key}}` or
//! `{{category.key|default:"fallback"}}`. Categories form a closed set, each
//! with a fixed set of resolvable keys. Real values are substituted at send
//! time by the backend; this module only parses templates and renders
//! previews with static example values. The graph store never evaluates
//! merge tags.
//!
//! Anything that does not parse as a tag (unclosed braces, unknown
//! category, missing dot) is left in the template verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of merge-tag categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
    Contact,
    Order,
    Payment,
    Cart,
    Funnel,
    Session,
    System,
}

impl TagCategory {
    /// All categories, in palette order.
    pub const ALL: [Self; 7] = [
        Self::Contact,
        Self::Order,
        Self::Payment,
        Self::Cart,
        Self::Funnel,
        Self::Session,
        Self::System,
    ];

    /// The lowercase name used inside tags.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Order => "order",
            Self::Payment => "payment",
            Self::Cart => "cart",
            Self::Funnel => "funnel",
            Self::Session => "session",
            Self::System => "system",
        }
    }

    fn from_tag_str(s: &str) -> Option<Self> {
        match s {
            "contact" => Some(Self::Contact),
            "order" => Some(Self::Order),
            "payment" => Some(Self::Payment),
            "cart" => Some(Self::Cart),
            "funnel" => Some(Self::Funnel),
            "session" => Some(Self::Session),
            "system" => Some(Self::System),
            _ => None,
        }
    }

    /// The resolvable keys for this category, paired with the example value
    /// used in previews.
    #[must_use]
    pub fn keys(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Contact => &[
                ("first_name", "Alex"),
                ("last_name", "Rivera"),
                ("email", "alex@example.com"),
                ("phone", "+15551234567"),
            ],
            Self::Order => &[
                ("id", "ORD-1042"),
                ("total", "149.00"),
                ("currency", "USD"),
                ("item_count", "2"),
            ],
            Self::Payment => &[
                ("method", "credit_card"),
                ("status", "paid"),
                ("amount", "149.00"),
            ],
            Self::Cart => &[
                ("total", "89.00"),
                ("item_count", "1"),
                ("recovery_url", "https://shop.example.com/cart/recover/abc123"),
            ],
            Self::Funnel => &[
                ("name", "Spring Launch"),
                ("step_name", "Checkout"),
                ("step_url", "https://shop.example.com/checkout"),
            ],
            Self::Session => &[
                ("id", "3f6c2a"),
                ("source", "facebook"),
                ("landing_page", "https://shop.example.com/start"),
            ],
            Self::System => &[
                ("date", "2025-06-01"),
                ("time", "09:30"),
                ("company_name", "Example Co"),
            ],
        }
    }

    /// The example value for a key, if the key is resolvable.
    #[must_use]
    pub fn example(&self, key: &str) -> Option<&'static str> {
        self.keys()
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, example)| *example)
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed merge tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeTag {
    /// The tag category.
    pub category: TagCategory,
    /// The key within the category.
    pub key: String,
    /// The literal fallback from a `|default:"…"` modifier, if present.
    pub default: Option<String>,
}

impl MergeTag {
    /// Whether the key resolves within its category.
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.category.example(&self.key).is_some()
    }
}

impl fmt::Display for MergeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.default {
            Some(default) => {
                write!(f, "{{{{{}.{}|default:\"{default}\"}}}}", self.category, self.key)
            }
            None => write!(f, "{{{{{}.{}}}}}", self.category, self.key),
        }
    }
}

/// One segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Verbatim text.
    Literal(String),
    /// A merge tag.
    Tag(MergeTag),
}

/// Splits a template into literal text and merge tags.
///
/// Malformed tokens stay literal; parsing never fails.
#[must_use]
pub fn parse(template: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            // Unclosed token: everything left is literal.
            break;
        };

        let inner = &after_open[..close];
        let consumed = open + 2 + close + 2;
        match parse_tag(inner) {
            Some(tag) => {
                if open > 0 {
                    segments.push(Segment::Literal(rest[..open].to_string()));
                }
                segments.push(Segment::Tag(tag));
            }
            None => {
                // Not a tag; keep the braces verbatim.
                segments.push(Segment::Literal(rest[..consumed].to_string()));
            }
        }
        rest = &rest[consumed..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Literal(rest.to_string()));
    }
    segments
}

/// Parses the inside of a `{{…}}` token.
fn parse_tag(inner: &str) -> Option<MergeTag> {
    let inner = inner.trim();
    let (path, modifier) = match inner.split_once('|') {
        Some((path, modifier)) => (path.trim(), Some(modifier.trim())),
        None => (inner, None),
    };

    let (category, key) = path.split_once('.')?;
    let category = TagCategory::from_tag_str(category.trim())?;
    let key = key.trim();
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }

    let default = match modifier {
        None => None,
        Some(modifier) => Some(parse_default(modifier)?),
    };

    Some(MergeTag {
        category,
        key: key.to_string(),
        default,
    })
}

/// Parses a `default:"literal"` modifier.
fn parse_default(modifier: &str) -> Option<String> {
    let quoted = modifier.strip_prefix("default:")?.trim();
    let unquoted = quoted.strip_prefix('"')?.strip_suffix('"')?;
    Some(unquoted.to_string())
}

/// Renders a preview of a template, substituting example values.
///
/// Unknown keys fall back to their `default` when one is given; otherwise
/// the token is left in the output verbatim.
#[must_use]
pub fn render_preview(template: &str) -> String {
    parse(template)
        .into_iter()
        .map(|segment| match segment {
            Segment::Literal(text) => text,
            Segment::Tag(tag) => match tag.category.example(&tag.key) {
                Some(example) => example.to_string(),
                None => tag.default.clone().unwrap_or_else(|| tag.to_string()),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_one_literal() {
        let segments = parse("Hello there!");
        assert_eq!(segments, vec![Segment::Literal("Hello there!".to_string())]);
    }

    #[test]
    fn parses_simple_tag() {
        let segments = parse("Hi {{contact.first_name}}!");
        assert_eq!(segments.len(), 3);
        assert_eq!(
            segments[1],
            Segment::Tag(MergeTag {
                category: TagCategory::Contact,
                key: "first_name".to_string(),
                default: None,
            })
        );
    }

    #[test]
    fn parses_default_modifier() {
        let segments = parse("Hi {{contact.nickname|default:\"friend\"}}!");
        match &segments[1] {
            Segment::Tag(tag) => {
                assert_eq!(tag.key, "nickname");
                assert_eq!(tag.default.as_deref(), Some("friend"));
                assert!(!tag.is_known());
            }
            other => panic!("unexpected segment: {other:?}"),
        }
    }

    #[test]
    fn malformed_tokens_stay_literal() {
        // Unknown category, missing dot, bad modifier, unclosed braces.
        for template in [
            "{{weather.today}}",
            "{{contact}}",
            "{{contact.first_name|fallback:\"x\"}}",
            "Hello {{contact.first_name",
        ] {
            let segments = parse(template);
            assert!(
                segments.iter().all(|s| matches!(s, Segment::Literal(_))),
                "expected only literals for {template:?}, got {segments:?}"
            );
            let rendered: String = segments
                .into_iter()
                .map(|s| match s {
                    Segment::Literal(text) => text,
                    Segment::Tag(_) => unreachable!(),
                })
                .collect();
            assert_eq!(rendered, template);
        }
    }

    #[test]
    fn preview_substitutes_example_values() {
        let preview = render_preview("Hi {{contact.first_name}}, order {{order.id}} is paid.");
        assert_eq!(preview, "Hi Alex, order ORD-1042 is paid.");
    }

    #[test]
    fn preview_uses_default_for_unknown_key() {
        let preview = render_preview("Hi {{contact.nickname|default:\"friend\"}}!");
        assert_eq!(preview, "Hi friend!");
    }

    #[test]
    fn preview_keeps_unknown_key_without_default() {
        let preview = render_preview("Hi {{contact.nickname}}!");
        assert_eq!(preview, "Hi {{contact.nickname}}!");
    }

    #[test]
    fn every_category_key_has_an_example() {
        for category in TagCategory::ALL {
            for (key, _) in category.keys() {
                assert!(category.example(key).is_some());
            }
        }
    }

    #[test]
    fn tag_display_roundtrips_through_parse() {
        let tag = MergeTag {
            category: TagCategory::Cart,
            key: "recovery_url".to_string(),
            default: Some("https://shop.example.com".to_string()),
        };
        let segments = parse(&tag.to_string());
        assert_eq!(segments, vec![Segment::Tag(tag)]);
    }
}
