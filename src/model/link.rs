/// Link categorization for triage results
use std::fmt;

/// Resolution sentinel: no collection file carries the link's file name
pub const NOT_FOUND_IN_COLLECTION: &str = "NOT FOUND IN COLLECTION";

/// Resolution sentinel: no match, and the link holds non-ASCII characters
pub const NON_ASCII_IN_LINK: &str = "NON-ASCII CHARS IN LINK";

/// The bucket a link ends up in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkCategory {
    /// Hand-authored link into the platform that breaks on course copy
    HardLink,

    /// Out of scope or benign
    Discarded,

    /// Already uses the platform's stable content reference
    XidLink,
}

impl LinkCategory {
    /// Converts the category to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::HardLink => "hard",
            Self::Discarded => "discarded",
            Self::XidLink => "xid",
        }
    }

    /// Parses a category from its database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "hard" => Some(Self::HardLink),
            "discarded" => Some(Self::Discarded),
            "xid" => Some(Self::XidLink),
            _ => None,
        }
    }
}

impl fmt::Display for LinkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HardLink => write!(f, "Hard Link"),
            Self::Discarded => write!(f, "Discarded"),
            Self::XidLink => write!(f, "x-id Link"),
        }
    }
}

/// One anchor or image reference pulled out of a content item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// The URL after normalization (lowercased, template token expanded)
    pub url: String,

    /// Anchor text (`text: ...`) or image alt text (`alt: ...`)
    pub display_text: String,

    /// Final bucket assigned by the classifier
    pub category: LinkCategory,

    /// Stable reference or sentinel; `None` when resolution was not attempted
    pub resolved_xid: Option<String>,
}

impl Link {
    pub fn new(
        url: impl Into<String>,
        display_text: impl Into<String>,
        category: LinkCategory,
    ) -> Self {
        Self {
            url: url.into(),
            display_text: display_text.into(),
            category,
            resolved_xid: None,
        }
    }

    /// Returns true if resolution ran but found no collection file
    pub fn is_unresolved(&self) -> bool {
        matches!(
            self.resolved_xid.as_deref(),
            Some(NOT_FOUND_IN_COLLECTION) | Some(NON_ASCII_IN_LINK)
        )
    }
}
