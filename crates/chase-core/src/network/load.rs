use super::graph::AdjacencyGraph;
use crate::model::coords::{CoordIndex, MapPoint};
use crate::model::station::Station;
use crate::model::ticket::Line;
use core::fmt;
use std::collections::BTreeSet;

pub const COORDS_FILE: &str = "coords.txt";

/// Raw text of every board data file, keyed the same way the files are laid
/// out on disk. Lets callers parse a network without touching the
/// filesystem.
#[derive(Debug, Clone, Default)]
pub struct NetworkSources {
    pub taxi: String,
    pub bus: String,
    pub subway: String,
    pub boat: String,
    pub coords: String,
}

impl NetworkSources {
    pub fn adjacency(&self, line: Line) -> &str {
        match line {
            Line::Taxi => &self.taxi,
            Line::Bus => &self.bus,
            Line::Subway => &self.subway,
            Line::Boat => &self.boat,
        }
    }

    pub fn adjacency_mut(&mut self, line: Line) -> &mut String {
        match line {
            Line::Taxi => &mut self.taxi,
            Line::Bus => &mut self.bus,
            Line::Subway => &mut self.subway,
            Line::Boat => &mut self.boat,
        }
    }
}

/// Fatal board data problem. Any single malformed line fails the whole load;
/// no partially built network is ever handed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataFormatError {
    UnreadableFile { file: String, detail: String },
    MissingSeparator { file: String, line: usize },
    BadStation { file: String, line: usize, text: String },
    BadNeighbor { file: String, line: usize, text: String },
    BadCoordinate { file: String, line: usize, text: String },
}

impl fmt::Display for DataFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataFormatError::UnreadableFile { file, detail } => {
                write!(f, "could not read {file}: {detail}")
            }
            DataFormatError::MissingSeparator { file, line } => {
                write!(f, "{file}:{line}: expected \"station:neighbor,neighbor,...\"")
            }
            DataFormatError::BadStation { file, line, text } => {
                write!(f, "{file}:{line}: bad station label {text:?}")
            }
            DataFormatError::BadNeighbor { file, line, text } => {
                write!(f, "{file}:{line}: bad neighbor label {text:?}")
            }
            DataFormatError::BadCoordinate { file, line, text } => {
                write!(f, "{file}:{line}: bad coordinate pair {text:?}")
            }
        }
    }
}

impl std::error::Error for DataFormatError {}

/// Parses one adjacency file: `station:neighbor,neighbor,...` per row. Blank
/// rows are skipped; an empty right-hand side is a station with no exits.
pub(super) fn parse_adjacency(file: &str, text: &str) -> Result<AdjacencyGraph, DataFormatError> {
    let mut graph = AdjacencyGraph::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let row = raw.trim();
        if row.is_empty() {
            continue;
        }
        let Some((head, tail)) = row.split_once(':') else {
            return Err(DataFormatError::MissingSeparator {
                file: file.to_string(),
                line,
            });
        };
        let Some(station) = Station::parse(head) else {
            return Err(DataFormatError::BadStation {
                file: file.to_string(),
                line,
                text: head.trim().to_string(),
            });
        };
        let mut neighbors = BTreeSet::new();
        let tail = tail.trim();
        if !tail.is_empty() {
            for token in tail.split(',') {
                let Some(neighbor) = Station::parse(token) else {
                    return Err(DataFormatError::BadNeighbor {
                        file: file.to_string(),
                        line,
                        text: token.trim().to_string(),
                    });
                };
                neighbors.insert(neighbor);
            }
        }
        graph.insert_row(station, neighbors);
    }
    Ok(graph)
}

/// Parses the coordinate file: `x,y` per row, the 1-based row number being
/// the station label. A blank row still consumes its label and leaves that
/// station without artwork.
pub(super) fn parse_coords(file: &str, text: &str) -> Result<CoordIndex, DataFormatError> {
    let mut coords = CoordIndex::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let row = raw.trim();
        if row.is_empty() {
            continue;
        }
        let parsed = row.split_once(',').and_then(|(x, y)| {
            let x = x.trim().parse::<u32>().ok()?;
            let y = y.trim().parse::<u32>().ok()?;
            Some(MapPoint::new(x, y))
        });
        let Some(point) = parsed else {
            return Err(DataFormatError::BadCoordinate {
                file: file.to_string(),
                line,
                text: row.to_string(),
            });
        };
        let Some(station) = u16::try_from(line).ok().map(Station::new) else {
            return Err(DataFormatError::BadCoordinate {
                file: file.to_string(),
                line,
                text: row.to_string(),
            });
        };
        coords.insert(station, point);
    }
    Ok(coords)
}

#[cfg(test)]
mod tests {
    use super::{DataFormatError, parse_adjacency, parse_coords};
    use crate::model::station::Station;

    #[test]
    fn adjacency_parses_rows_and_skips_blanks() {
        let graph = parse_adjacency("taxi.txt", "1:2,3\n\n  2 : 1 , 4 \n3:\n").unwrap();
        assert_eq!(graph.row_count(), 3);
        let from_two: Vec<u16> = graph
            .neighbors(Station::new(2))
            .iter()
            .map(|station| station.label())
            .collect();
        assert_eq!(from_two, vec![1, 4]);
        assert!(graph.neighbors(Station::new(3)).is_empty());
    }

    #[test]
    fn adjacency_missing_separator_is_fatal_with_position() {
        let err = parse_adjacency("bus.txt", "1:2\n7 8\n").unwrap_err();
        assert_eq!(
            err,
            DataFormatError::MissingSeparator {
                file: "bus.txt".to_string(),
                line: 2,
            }
        );
    }

    #[test]
    fn adjacency_bad_station_reports_offending_text() {
        let err = parse_adjacency("subway.txt", "zero:1\n").unwrap_err();
        assert_eq!(
            err,
            DataFormatError::BadStation {
                file: "subway.txt".to_string(),
                line: 1,
                text: "zero".to_string(),
            }
        );
    }

    #[test]
    fn adjacency_bad_neighbor_covers_trailing_comma() {
        let err = parse_adjacency("taxi.txt", "1:2,3,\n").unwrap_err();
        assert_eq!(
            err,
            DataFormatError::BadNeighbor {
                file: "taxi.txt".to_string(),
                line: 1,
                text: String::new(),
            }
        );
    }

    #[test]
    fn coords_use_one_based_row_numbers() {
        let coords = parse_coords("coords.txt", "10,20\n30,40\n").unwrap();
        let first = coords.get(Station::new(1)).unwrap();
        let second = coords.get(Station::new(2)).unwrap();
        assert_eq!((first.x, first.y), (10, 20));
        assert_eq!((second.x, second.y), (30, 40));
    }

    #[test]
    fn blank_coord_row_consumes_its_label() {
        let coords = parse_coords("coords.txt", "10,20\n\n30,40\n").unwrap();
        assert_eq!(coords.get(Station::new(2)), None);
        let third = coords.get(Station::new(3)).unwrap();
        assert_eq!((third.x, third.y), (30, 40));
    }

    #[test]
    fn malformed_coord_row_is_fatal_with_position() {
        let err = parse_coords("coords.txt", "10,20\nten,20\n").unwrap_err();
        assert_eq!(
            err,
            DataFormatError::BadCoordinate {
                file: "coords.txt".to_string(),
                line: 2,
                text: "ten,20".to_string(),
            }
        );
    }

    #[test]
    fn error_messages_name_file_and_line() {
        let err = parse_adjacency("boat.txt", "x:1\n").unwrap_err();
        assert!(err.to_string().starts_with("boat.txt:1:"));
    }
}
