//! Description normalization: turn a raw bank description into a grouping key.
//!
//! UPI references look like `UPI-<payee>-<ref>@<handle>-<ref>`; everything
//! after the first `@` is routing noise, and the payee sits between the first
//! and second `-`. Other descriptions only lose their `@` suffix.

const UPI_MARKER: &str = "UPI";

/// Grouping key for a raw description. Never fails: when a delimiter is
/// missing the largest available prefix is returned.
pub fn normalize(raw: &str) -> &str {
    let prefix = raw.split_once('@').map_or(raw, |(head, _)| head);

    if !raw.starts_with(UPI_MARKER) {
        return prefix.trim();
    }

    match prefix.split('-').nth(1).map(str::trim) {
        Some(payee) if !payee.is_empty() => payee,
        _ => prefix.trim(),
    }
}
