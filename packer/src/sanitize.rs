//! String sanitization levels applied after decoding.

use std::borrow::Cow;

/// Post-decode sanitization applied to a wire string.
///
/// All levels share the same wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sanitize {
    /// Keep the string exactly as received.
    #[default]
    None,
    /// Replace control characters with spaces.
    ControlChars,
    /// Replace control characters with spaces, then skip leading whitespace.
    ControlCharsTrimStart,
}

impl Sanitize {
    /// Applies the sanitization, borrowing when nothing changes.
    #[must_use]
    pub fn apply(self, value: &str) -> Cow<'_, str> {
        let value = self.trimmed(value);
        if self == Self::None || !value.chars().any(is_control) {
            return Cow::Borrowed(value);
        }
        let mut out = String::with_capacity(value.len());
        push_replaced(value, &mut out);
        Cow::Owned(out)
    }

    /// Appends the sanitized string to `out` without allocating a new string.
    pub fn apply_into(self, value: &str, out: &mut String) {
        let value = self.trimmed(value);
        if self == Self::None {
            out.push_str(value);
        } else {
            push_replaced(value, out);
        }
    }

    /// Control characters turn into spaces, so a leading run of them is
    /// trimmed along with the whitespace.
    fn trimmed(self, value: &str) -> &str {
        match self {
            Self::ControlCharsTrimStart => {
                value.trim_start_matches(|c: char| c.is_ascii_whitespace() || is_control(c))
            }
            Self::None | Self::ControlChars => value,
        }
    }
}

fn is_control(c: char) -> bool {
    u32::from(c) < 0x20
}

fn push_replaced(value: &str, out: &mut String) {
    out.extend(value.chars().map(|c| if is_control(c) { ' ' } else { c }));
}
