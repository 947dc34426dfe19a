//! The core data types shared across all platform sources.
//!
//! [`FeedItem`] is a single post or photo from any of the supported
//! platforms.  Every source converts its provider's raw records into
//! `FeedItem`s so the aggregator and the presenters stay platform-agnostic
//! apart from the final match on the variant.
//!
//! ## For contributors
//!
//! Adding a platform means a new [`Platform`] variant, a new `FeedItem`
//! variant, and a source module under `src/source/`.  The compiler will point
//! at every `match` that needs a new arm.

use std::fmt;

use serde::Serialize;

/// One of the social platforms the widget can pull from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Instagram,
    Facebook,
}

impl Platform {
    /// All platforms in their fixed concatenation order.
    pub const ALL: [Platform; 3] = [Platform::Twitter, Platform::Instagram, Platform::Facebook];

    /// Lowercase tag, used in URLs and serialized items.
    pub fn tag(self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
        }
    }

    /// Capitalised name for display.
    pub fn display_name(self) -> &'static str {
        match self {
            Platform::Twitter => "Twitter",
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single feed entry, normalised from one platform's API response.
///
/// Items are immutable once built.  Duplicates are legal: if a provider
/// returns the same post twice, both copies travel through the aggregator.
///
/// ## Serialization
///
/// Items serialize with a `social` tag naming the platform, e.g.
/// `{"social":"instagram","img":"https://..","text":"caption"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "social", rename_all = "lowercase")]
pub enum FeedItem {
    /// A tweet.  Missing text normalises to an empty string.
    Twitter { text: String },

    /// A photo with an optional caption.
    Instagram {
        #[serde(rename = "img")]
        image: Option<String>,
        #[serde(rename = "text")]
        caption: Option<String>,
    },

    /// A shared Facebook post.  Missing text normalises to an empty string.
    Facebook { text: String },
}

impl FeedItem {
    /// The platform this item came from.
    pub fn platform(&self) -> Platform {
        match self {
            FeedItem::Twitter { .. } => Platform::Twitter,
            FeedItem::Instagram { .. } => Platform::Instagram,
            FeedItem::Facebook { .. } => Platform::Facebook,
        }
    }

    /// The item's text, if any.  For Instagram this is the caption.
    pub fn text(&self) -> Option<&str> {
        match self {
            FeedItem::Twitter { text } | FeedItem::Facebook { text } => Some(text),
            FeedItem::Instagram { caption, .. } => caption.as_deref(),
        }
    }

    /// The image URL.  Only Instagram items carry one.
    pub fn image(&self) -> Option<&str> {
        match self {
            FeedItem::Instagram { image, .. } => image.as_deref(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
