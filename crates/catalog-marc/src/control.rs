//! The fixed-length `008` control field.
//!
//! The field is written by independent passes, each owning a disjoint
//! character range, so passes may run in any order.

use std::fmt;
use std::ops::Range;

/// Positions 07-14: start and end years.
pub const DATE_RANGE: Range<usize> = 7..15;
/// Positions 15-17: place of publication.
pub const COUNTRY_RANGE: Range<usize> = 15..18;
/// Positions 35-37: language.
pub const LANGUAGE_RANGE: Range<usize> = 35..38;

pub const CONTROL_TEMPLATE: &str = "######k########xx######################d";
pub const FILLER: char = '#';
/// Written in place of an unknown year digit.
pub const UNKNOWN_YEAR: &str = "uuuu";
/// Country code for no place, unknown, or undetermined.
pub const UNKNOWN_COUNTRY: &str = "xx#";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlField {
    chars: Vec<char>,
}

impl Default for ControlField {
    fn default() -> Self {
        Self {
            chars: CONTROL_TEMPLATE.chars().collect(),
        }
    }
}

impl ControlField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `value` into `range`, right-padding with the filler and
    /// truncating anything longer than the range.
    pub fn write(&mut self, range: Range<usize>, value: &str) {
        let mut value = value.chars().filter(char::is_ascii);
        for pos in range {
            self.chars[pos] = value.next().unwrap_or(FILLER);
        }
    }

    /// Characters currently held in `range`.
    pub fn read(&self, range: Range<usize>) -> String {
        self.chars[range].iter().collect()
    }

    /// True while `range` still holds its template characters.
    pub fn is_untouched(&self, range: Range<usize>) -> bool {
        let template: String = CONTROL_TEMPLATE.chars().skip(range.start).take(range.len()).collect();
        self.read(range) == template
    }

    pub fn set_dates(&mut self, start: Option<u16>, end: Option<u16>) {
        let year = |y: Option<u16>| y.map_or_else(|| UNKNOWN_YEAR.to_string(), |y| format!("{y:04}"));
        self.write(DATE_RANGE, &format!("{}{}", year(start), year(end)));
    }

    /// A 2-character code is padded to `"gw#"`; no code writes `"xx#"`.
    pub fn set_country(&mut self, code: Option<&str>) {
        self.write(COUNTRY_RANGE, code.unwrap_or(UNKNOWN_COUNTRY));
    }

    pub fn set_language(&mut self, code: &str) {
        self.write(LANGUAGE_RANGE, code);
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

impl fmt::Display for ControlField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.chars.iter().try_for_each(|c| write!(f, "{c}"))
    }
}
