//! URL formatter / validator for the entry form.

use kiosk_types::error::{KioskError, Result};

const ACCEPTED_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Validate user-entered text as a kiosk URL.
///
/// Surrounding whitespace is trimmed. The result must start with `http://`
/// or `https://` (any case); nothing else about the URL is checked and the
/// trimmed text is returned as typed.
pub fn format_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let accepted = ACCEPTED_SCHEMES.iter().any(|scheme| {
        trimmed
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    });
    if accepted {
        Ok(trimmed.to_string())
    } else {
        Err(KioskError::InvalidFormat(trimmed.to_string()))
    }
}
