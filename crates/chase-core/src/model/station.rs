use core::fmt;
use serde::{Deserialize, Serialize};

/// Numbered square on the board. Labels are positive; the board data decides
/// which labels exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Station(u16);

impl Station {
    pub const fn new(label: u16) -> Self {
        Station(label)
    }

    pub const fn label(self) -> u16 {
        self.0
    }

    /// Parses a decimal label, tolerating surrounding whitespace. Zero and
    /// non-numeric text are rejected.
    pub fn parse(text: &str) -> Option<Self> {
        let label = text.trim().parse::<u16>().ok()?;
        if label == 0 {
            return None;
        }
        Some(Station(label))
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Station;

    #[test]
    fn parse_accepts_padded_decimal_labels() {
        assert_eq!(Station::parse(" 42 "), Some(Station::new(42)));
        assert_eq!(Station::parse("199"), Some(Station::new(199)));
    }

    #[test]
    fn parse_rejects_zero_and_garbage() {
        assert_eq!(Station::parse("0"), None);
        assert_eq!(Station::parse("-3"), None);
        assert_eq!(Station::parse("12a"), None);
        assert_eq!(Station::parse(""), None);
    }

    #[test]
    fn orders_by_label() {
        assert!(Station::new(7) < Station::new(70));
    }

    #[test]
    fn display_prints_bare_label() {
        assert_eq!(Station::new(131).to_string(), "131");
    }
}
