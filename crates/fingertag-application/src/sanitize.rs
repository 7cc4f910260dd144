// SPDX-License-Identifier: GPL-3.0-or-later

//! Normalisation of mis-decoded punctuation in tag values.
//!
//! Catalog strings sometimes arrive double-decoded (UTF-8 read as
//! Windows-1252), which turns a right single quote into `â€™`. These
//! sequences garble the terminal prompts, so every value is cleaned before it
//! is shown and again before it is written.

/// Replacement table. Outputs are plain ASCII, so a second pass finds nothing.
const REPLACEMENTS: [(&str, &str); 5] = [
    ("â€™", "'"),
    ("â†’", "-"),
    ("\u{2019}", "'"),
    ("\u{2192}", "-"),
    ("â€“", "-"),
];

/// Clean a single tag value. Pure, total, and idempotent.
pub fn sanitize(value: &str) -> String {
    REPLACEMENTS
        .iter()
        .fold(value.to_string(), |cleaned, (from, to)| cleaned.replace(from, to))
}
