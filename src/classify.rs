//! Theme-type classification and meta-line rules

use serde::{Deserialize, Serialize};

use crate::types::{Theme, ThemeType};

/// Which field wins when a theme has both `author` and `carrier`.
///
/// Older page templates let `author` dominate while some filter logic
/// checked `carrier` first; both are kept selectable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TypePrecedence {
    #[default]
    AuthorFirst,
    CarrierFirst,
}

type Rule = (fn(&Theme) -> bool, ThemeType);

fn has_author(theme: &Theme) -> bool {
    theme.author().is_some()
}

fn has_carrier(theme: &Theme) -> bool {
    theme.carrier().is_some()
}

const AUTHOR_FIRST: &[Rule] = &[
    (has_author, ThemeType::User),
    (has_carrier, ThemeType::Carrier),
];

const CARRIER_FIRST: &[Rule] = &[
    (has_carrier, ThemeType::Carrier),
    (has_author, ThemeType::User),
];

impl TypePrecedence {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypePrecedence::AuthorFirst => "author-first",
            TypePrecedence::CarrierFirst => "carrier-first",
        }
    }

    fn rules(&self) -> &'static [Rule] {
        match self {
            TypePrecedence::AuthorFirst => AUTHOR_FIRST,
            TypePrecedence::CarrierFirst => CARRIER_FIRST,
        }
    }
}

/// Derive the theme type; the first matching rule wins, `Preloaded` otherwise
pub fn classify(theme: &Theme, precedence: TypePrecedence) -> ThemeType {
    precedence
        .rules()
        .iter()
        .find(|(matches, _)| matches(theme))
        .map(|(_, theme_type)| *theme_type)
        .unwrap_or(ThemeType::Preloaded)
}

/// A labelled line in a card or detail page meta block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaLine {
    pub label: &'static str,
    pub value: String,
}

/// Meta block lines: the author alone, or the original model(s) followed
/// by the carrier when one is set.
pub fn meta_lines(theme: &Theme) -> Vec<MetaLine> {
    if let Some(author) = theme.author() {
        return vec![MetaLine {
            label: "Author",
            value: author.to_string(),
        }];
    }

    let mut lines = vec![MetaLine {
        label: "Preloaded on",
        value: theme.original_model.joined(", "),
    }];
    if let Some(carrier) = theme.carrier() {
        lines.push(MetaLine {
            label: "Carrier",
            value: carrier.to_string(),
        });
    }
    lines
}
