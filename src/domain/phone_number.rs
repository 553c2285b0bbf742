//! Phone number helpers used when building call log entries

use crate::domain::call::CallInfo;

/// Characters that carry dialing meaning and survive separator stripping
const NON_SEPARATORS: &[char] = &['+', '*', '#', ',', ';', 'N'];

/// Zero code point of every run of ten Unicode decimal digits (category Nd)
const DECIMAL_ZEROS: &[u32] = &[
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66,
    0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946,
    0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0,
    0xA9F0, 0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066, 0x110F0, 0x11136, 0x111D0,
    0x112F0, 0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0, 0x11950, 0x11C50, 0x11D50,
    0x11DA0, 0x16A60, 0x16AC0, 0x16B50, 0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6, 0x1E140,
    0x1E2F0, 0x1E950, 0x1FBF0,
];

/// Whether `number` is a SIP-style address rather than a dialable number
pub fn is_uri_number(number: &str) -> bool {
    number.contains('@') || number.contains("%40")
}

/// ASCII form of a decimal digit from any script, e.g. `'٣'` becomes `'3'`
fn decimal_digit(c: char) -> Option<char> {
    if c.is_ascii_digit() {
        return Some(c);
    }

    let code = c as u32;
    DECIMAL_ZEROS
        .iter()
        .find(|&&zero| (zero..zero + 10).contains(&code))
        .and_then(|&zero| char::from_digit(code - zero, 10))
}

/// Remove visual separators such as spaces, dashes, dots and parentheses.
///
/// Decimal digits of any script are kept and converted to ASCII.
pub fn strip_separators(number: &str) -> String {
    number
        .chars()
        .filter_map(|c| decimal_digit(c).or_else(|| NON_SEPARATORS.contains(&c).then_some(c)))
        .collect()
}

/// Number to record for a call: `None` without a handle, the raw address
/// for URI numbers, otherwise the dialable digits.
pub fn log_number(call: &dyn CallInfo) -> Option<String> {
    let handle = call.original_handle()?;
    let number = handle.scheme_specific_part();

    if is_uri_number(number) {
        Some(number.to_string())
    } else {
        Some(strip_separators(number))
    }
}

/// Decides whether a number reaches local emergency services
#[cfg_attr(test, mockall::automock)]
pub trait EmergencyNumberClassifier: Send + Sync {
    fn is_local_emergency_number(&self, number: &str) -> bool;
}

/// Emergency classifier backed by a fixed list of numbers
#[derive(Debug, Clone)]
pub struct EmergencyNumbers {
    numbers: Vec<String>,
}

impl EmergencyNumbers {
    pub const DEFAULT: &'static [&'static str] = &["112", "911"];

    pub fn new<I, S>(numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            numbers: numbers
                .into_iter()
                .map(|n| strip_separators(n.as_ref()))
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    pub fn numbers(&self) -> &[String] {
        &self.numbers
    }
}

impl Default for EmergencyNumbers {
    fn default() -> Self {
        Self::new(Self::DEFAULT.iter())
    }
}

impl EmergencyNumberClassifier for EmergencyNumbers {
    fn is_local_emergency_number(&self, number: &str) -> bool {
        if is_uri_number(number) {
            return false;
        }

        // Exact match only; "9110" is not an emergency call.
        let dialed = strip_separators(number);
        self.numbers.iter().any(|n| *n == dialed)
    }
}
