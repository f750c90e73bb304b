//! Canned remarks offered in the dropdown next to the free-text field.

/// Remarks a teacher can pick with one click.
pub const CANNED_REMARKS: &[&str] = &[
    "Sick",
    "Family emergency",
    "Medical appointment",
    "Transport issue",
    "Traveling",
];

/// Returns the canonical spelling if `text` is one of [`CANNED_REMARKS`].
pub fn canned(text: &str) -> Option<&'static str> {
    let wanted = text.trim();
    CANNED_REMARKS
        .iter()
        .copied()
        .find(|remark| remark.eq_ignore_ascii_case(wanted))
}
