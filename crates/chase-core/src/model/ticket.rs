use core::fmt;
use serde::{Deserialize, Serialize};

/// Primary transit data source. Each line ships as its own adjacency file;
/// adding one means extending `ALL` and the file table, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Line {
    Taxi = 0,
    Bus = 1,
    Subway = 2,
    Boat = 3,
}

impl Line {
    pub const ALL: [Line; 4] = [Line::Taxi, Line::Bus, Line::Subway, Line::Boat];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Line::Taxi),
            1 => Some(Line::Bus),
            2 => Some(Line::Subway),
            3 => Some(Line::Boat),
            _ => None,
        }
    }

    pub const fn file_name(self) -> &'static str {
        match self {
            Line::Taxi => "taxi.txt",
            Line::Bus => "bus.txt",
            Line::Subway => "subway.txt",
            Line::Boat => "boat.txt",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Line::Taxi => "taxi",
            Line::Bus => "bus",
            Line::Subway => "subway",
            Line::Boat => "boat",
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Revealed clue about Mister X's last move. The boat never appears here on
/// its own: the ferry is only reachable under the mystery ticket, so boat
/// edges surface exclusively through `Mystery`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum TicketKind {
    Taxi = 0,
    Bus = 1,
    Subway = 2,
    Mystery = 3,
}

impl TicketKind {
    pub const ALL: [TicketKind; 4] = [
        TicketKind::Taxi,
        TicketKind::Bus,
        TicketKind::Subway,
        TicketKind::Mystery,
    ];

    /// The single line this clue reads from, or `None` for the derived
    /// mystery union.
    pub const fn source_line(self) -> Option<Line> {
        match self {
            TicketKind::Taxi => Some(Line::Taxi),
            TicketKind::Bus => Some(Line::Bus),
            TicketKind::Subway => Some(Line::Subway),
            TicketKind::Mystery => None,
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "taxi" => Some(TicketKind::Taxi),
            "bus" => Some(TicketKind::Bus),
            "subway" => Some(TicketKind::Subway),
            "mystery" => Some(TicketKind::Mystery),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TicketKind::Taxi => "taxi",
            TicketKind::Bus => "bus",
            TicketKind::Subway => "subway",
            TicketKind::Mystery => "mystery",
        }
    }
}

impl fmt::Display for TicketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{Line, TicketKind};

    #[test]
    fn line_indices_roundtrip() {
        for (position, line) in Line::ALL.iter().copied().enumerate() {
            assert_eq!(line.index(), position);
            assert_eq!(Line::from_index(position), Some(line));
        }
        assert_eq!(Line::from_index(4), None);
    }

    #[test]
    fn line_file_names_are_distinct() {
        let names: Vec<&str> = Line::ALL.iter().map(|line| line.file_name()).collect();
        for (i, name) in names.iter().enumerate() {
            assert!(name.ends_with(".txt"));
            assert!(!names[i + 1..].contains(name));
        }
    }

    #[test]
    fn ticket_from_str_parses_case_insensitive_values() {
        assert_eq!(TicketKind::from_str("TAXI"), Some(TicketKind::Taxi));
        assert_eq!(TicketKind::from_str("mystery"), Some(TicketKind::Mystery));
        assert_eq!(TicketKind::from_str("boat"), None);
        assert_eq!(TicketKind::from_str("walk"), None);
    }

    #[test]
    fn only_mystery_lacks_a_source_line() {
        assert_eq!(TicketKind::Taxi.source_line(), Some(Line::Taxi));
        assert_eq!(TicketKind::Bus.source_line(), Some(Line::Bus));
        assert_eq!(TicketKind::Subway.source_line(), Some(Line::Subway));
        assert_eq!(TicketKind::Mystery.source_line(), None);
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(TicketKind::Subway.to_string(), "subway");
        assert_eq!(Line::Boat.to_string(), "boat");
    }
}
