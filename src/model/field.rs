//! Semantic field kinds and PDF-space geometry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of field kinds a tab can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Text,
    SignHere,
    InitialHere,
    Stamp,
    Checkbox,
    RadioGroup,
    List,
    FullName,
    DateSigned,
    Company,
    Title,
    EmailAddress,
    Numerical,
    SignerAttachment,
    /// Sentinel for tabs no rule recognizes.
    Unknown,
}

impl FieldKind {
    /// Every kind that has a translator, in declaration order.
    pub const REGISTERED: [FieldKind; 14] = [
        FieldKind::Text,
        FieldKind::SignHere,
        FieldKind::InitialHere,
        FieldKind::Stamp,
        FieldKind::Checkbox,
        FieldKind::RadioGroup,
        FieldKind::List,
        FieldKind::FullName,
        FieldKind::DateSigned,
        FieldKind::Company,
        FieldKind::Title,
        FieldKind::EmailAddress,
        FieldKind::Numerical,
        FieldKind::SignerAttachment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::SignHere => "signHere",
            FieldKind::InitialHere => "initialHere",
            FieldKind::Stamp => "stamp",
            FieldKind::Checkbox => "checkbox",
            FieldKind::RadioGroup => "radioGroup",
            FieldKind::List => "list",
            FieldKind::FullName => "fullName",
            FieldKind::DateSigned => "dateSigned",
            FieldKind::Company => "company",
            FieldKind::Title => "title",
            FieldKind::EmailAddress => "emailAddress",
            FieldKind::Numerical => "numerical",
            FieldKind::SignerAttachment => "signerAttachment",
            FieldKind::Unknown => "unknown",
        }
    }

    /// Signature-like kinds built as signable placeholders.
    pub fn is_signature_family(&self) -> bool {
        matches!(
            self,
            FieldKind::SignHere | FieldKind::InitialHere | FieldKind::Stamp
        )
    }

    /// Reporting bucket for the counters.
    pub fn category(&self) -> FieldCategory {
        match self {
            FieldKind::Text
            | FieldKind::FullName
            | FieldKind::Company
            | FieldKind::Title
            | FieldKind::EmailAddress
            | FieldKind::Numerical => FieldCategory::Text,
            FieldKind::SignHere | FieldKind::InitialHere | FieldKind::Stamp => {
                FieldCategory::Signature
            }
            FieldKind::DateSigned => FieldCategory::Date,
            FieldKind::Checkbox => FieldCategory::Checkbox,
            FieldKind::RadioGroup => FieldCategory::Radio,
            FieldKind::List => FieldCategory::Dropdown,
            FieldKind::SignerAttachment => FieldCategory::Attachment,
            FieldKind::Unknown => FieldCategory::Other,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = String;

    /// Parse a kind name case-insensitively (`signHere`, `SIGNHERE`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        FieldKind::REGISTERED
            .iter()
            .chain(std::iter::once(&FieldKind::Unknown))
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| format!("unknown field kind: {}", s))
    }
}

/// Output category tallied per processed tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldCategory {
    Text,
    Signature,
    Date,
    Checkbox,
    Radio,
    Dropdown,
    Attachment,
    Other,
}

/// Rectangle in PDF user space (origin bottom-left, points).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl Rectangle {
    /// Build a rectangle from any two corners; edges are normalized so
    /// `right >= left` and `top >= bottom`.
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left: left.min(right),
            bottom: bottom.min(top),
            right: left.max(right),
            top: bottom.max(top),
        }
    }

    /// Rectangle hanging down from its top-left corner.
    pub fn from_top_left(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self::new(left, top - height, left + width, top)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Grow to at least `min_width` x `min_height`, keeping the top-left
    /// corner fixed (template coordinates are anchored there).
    pub fn with_min_size(&self, min_width: f64, min_height: f64) -> Self {
        Self::from_top_left(
            self.left,
            self.top,
            self.width().max(min_width),
            self.height().max(min_height),
        )
    }

    /// `[left bottom right top]`, the PDF `/Rect` order.
    pub fn to_array(&self) -> [f64; 4] {
        [self.left, self.bottom, self.right, self.top]
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

/// Size and origin of a page's MediaBox.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
    /// Lower-left corner of the MediaBox; zero for nearly every PDF.
    pub origin_x: f64,
    pub origin_y: f64,
}

impl PageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }

    /// Page size from a `[llx lly urx ury]` MediaBox.
    pub fn from_media_box(media_box: [f64; 4]) -> Self {
        let [llx, lly, urx, ury] = media_box;
        Self {
            width: (urx - llx).abs(),
            height: (ury - lly).abs(),
            origin_x: llx.min(urx),
            origin_y: lly.min(ury),
        }
    }

    /// US Letter (8.5 x 11 inches).
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    pub fn left(&self) -> f64 {
        self.origin_x
    }

    pub fn top(&self) -> f64 {
        self.origin_y + self.height
    }

    pub fn bottom(&self) -> f64 {
        self.origin_y
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::letter()
    }
}
