//! Tab classification.
//!
//! Maps a raw tab record to a [`FieldKind`]. DocuSign's type vocabulary is
//! loose (`SignHere`, `signHereOptional`, `SignerAttachmentOptional`, ...), so
//! the rules below are substring tests applied most-specific first. The
//! order matters: `signerattachment` contains `sign`, `datesigned` contains
//! `sign`, and so on.

use crate::model::{FieldKind, Tab};

/// Classify a tab. Total and pure: unrecognized input yields
/// [`FieldKind::Unknown`].
pub fn classify(tab: &Tab) -> FieldKind {
    if let Some(kind) = tab.stamp_type().and_then(classify_stamp_type) {
        return kind;
    }
    tab.type_name()
        .map(classify_type_name)
        .unwrap_or(FieldKind::Unknown)
}

/// Classify a tab that came from a named list (`signHereTabs`, ...).
///
/// Tabs without any declared type are classified from the list name.
pub fn classify_with_hint(tab: &Tab, list_name: &str) -> FieldKind {
    if tab.type_name().is_some() || tab.stamp_type().is_some() {
        return classify(tab);
    }
    let hint = list_name
        .strip_suffix("Tabs")
        .or_else(|| list_name.strip_suffix("tabs"))
        .unwrap_or(list_name);
    classify_type_name(hint)
}

/// `stampType` is checked before `tabType` when present.
fn classify_stamp_type(stamp_type: &str) -> Option<FieldKind> {
    match stamp_type.trim().to_ascii_lowercase().as_str() {
        "signature" => Some(FieldKind::SignHere),
        "initials" => Some(FieldKind::InitialHere),
        "stamp" => Some(FieldKind::Stamp),
        _ => None,
    }
}

/// Classify a bare type name such as `SignHere` or `radioGroup`.
pub fn classify_type_name(type_name: &str) -> FieldKind {
    let t = type_name.trim().to_lowercase();
    let has = |needle: &str| t.contains(needle);

    // Attachment first: "signerattachment" would otherwise match "sign".
    if has("attachment") {
        return FieldKind::SignerAttachment;
    }

    const RULES: &[(&[&str], FieldKind)] = &[
        (&["signhere"], FieldKind::SignHere),
        (&["initialhere"], FieldKind::InitialHere),
        (&["text"], FieldKind::Text),
        (&["checkbox"], FieldKind::Checkbox),
        (&["radio"], FieldKind::RadioGroup),
        (&["list", "dropdown"], FieldKind::List),
        (&["fullname"], FieldKind::FullName),
        (&["date"], FieldKind::DateSigned),
        (&["company"], FieldKind::Company),
        (&["title"], FieldKind::Title),
        (&["email"], FieldKind::EmailAddress),
        (&["numerical", "number"], FieldKind::Numerical),
    ];

    if let Some((_, kind)) = RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| has(n)))
    {
        return *kind;
    }

    if has("signature") || (has("sign") && !has("signer")) {
        return FieldKind::SignHere;
    }

    FieldKind::Unknown
}
