//! Static transit data for one board.
//!
//! This module is composed of:
//! - `graph`: per-line adjacency rows with total neighbor lookups.
//! - `load`: the data file parsers and their error type.
//!
//! `TransitNetwork` glues the pieces together: one graph per primary line,
//! the derived mystery union, and the station artwork coordinates. It is
//! built once and read-only afterwards.

mod graph;
mod load;

pub use graph::AdjacencyGraph;
pub use load::{COORDS_FILE, DataFormatError, NetworkSources};

use crate::model::coords::CoordIndex;
use crate::model::station::Station;
use crate::model::ticket::{Line, TicketKind};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct TransitNetwork {
    lines: [AdjacencyGraph; 4],
    mystery: AdjacencyGraph,
    coords: CoordIndex,
    stations: BTreeSet<Station>,
}

impl TransitNetwork {
    /// Reads `taxi.txt`, `bus.txt`, `subway.txt`, `boat.txt` and
    /// `coords.txt` from `dir` and parses them as one network.
    pub fn from_dir(dir: &Path) -> Result<Self, DataFormatError> {
        let mut sources = NetworkSources::default();
        for line in Line::ALL.iter().copied() {
            *sources.adjacency_mut(line) = read_named(dir, line.file_name())?;
        }
        sources.coords = read_named(dir, COORDS_FILE)?;
        Self::from_sources(&sources)
    }

    /// Parses in-memory sources. Construction is atomic: any malformed row
    /// returns the error and nothing else.
    pub fn from_sources(sources: &NetworkSources) -> Result<Self, DataFormatError> {
        let taxi = load::parse_adjacency(Line::Taxi.file_name(), sources.adjacency(Line::Taxi))?;
        let bus = load::parse_adjacency(Line::Bus.file_name(), sources.adjacency(Line::Bus))?;
        let subway =
            load::parse_adjacency(Line::Subway.file_name(), sources.adjacency(Line::Subway))?;
        let boat = load::parse_adjacency(Line::Boat.file_name(), sources.adjacency(Line::Boat))?;
        let coords = load::parse_coords(COORDS_FILE, &sources.coords)?;
        let lines = [taxi, bus, subway, boat];

        let mut stations = BTreeSet::new();
        for graph in &lines {
            for station in graph.stations() {
                stations.insert(station);
                stations.extend(graph.neighbors(station).iter().copied());
            }
        }

        // The mystery graph is derived, never loaded: for every keyed
        // station, the union of its rows across all primary lines.
        let mut keyed: BTreeSet<Station> = BTreeSet::new();
        for graph in &lines {
            keyed.extend(graph.stations());
        }
        let mut mystery = AdjacencyGraph::new();
        for station in keyed.iter().copied() {
            let mut union = BTreeSet::new();
            for graph in &lines {
                union.extend(graph.neighbors(station).iter().copied());
            }
            mystery.insert_row(station, union);
        }

        Ok(TransitNetwork {
            lines,
            mystery,
            coords,
            stations,
        })
    }

    /// Stations reachable in one move from `station` under `ticket`.
    /// Stations absent from the data have no neighbors rather than being an
    /// error.
    pub fn neighbors(&self, ticket: TicketKind, station: Station) -> &BTreeSet<Station> {
        match ticket.source_line() {
            Some(line) => self.line_graph(line).neighbors(station),
            None => self.mystery.neighbors(station),
        }
    }

    pub fn line_graph(&self, line: Line) -> &AdjacencyGraph {
        &self.lines[line.index()]
    }

    pub fn coordinates(&self) -> &CoordIndex {
        &self.coords
    }

    /// Every station label mentioned anywhere in the data, as key or
    /// neighbor.
    pub fn stations(&self) -> impl Iterator<Item = Station> + '_ {
        self.stations.iter().copied()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }
}

fn read_named(dir: &Path, name: &str) -> Result<String, DataFormatError> {
    fs::read_to_string(dir.join(name)).map_err(|err| DataFormatError::UnreadableFile {
        file: name.to_string(),
        detail: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{NetworkSources, TransitNetwork};
    use crate::model::station::Station;
    use crate::model::ticket::{Line, TicketKind};
    use std::collections::BTreeSet;

    fn sample_sources() -> NetworkSources {
        NetworkSources {
            taxi: "1:2,3\n2:1,4\n3:1\n4:2\n".to_string(),
            bus: "1:4\n4:1,5\n5:4\n".to_string(),
            subway: "2:5\n5:2\n".to_string(),
            boat: "3:6\n6:3\n".to_string(),
            coords: "10,10\n20,10\n10,30\n20,30\n30,30\n30,50\n".to_string(),
        }
    }

    fn stations(labels: &[u16]) -> BTreeSet<Station> {
        labels.iter().copied().map(Station::new).collect()
    }

    #[test]
    fn primary_tickets_read_their_own_line() {
        let network = TransitNetwork::from_sources(&sample_sources()).unwrap();
        assert_eq!(
            network.neighbors(TicketKind::Taxi, Station::new(1)),
            &stations(&[2, 3])
        );
        assert_eq!(
            network.neighbors(TicketKind::Bus, Station::new(1)),
            &stations(&[4])
        );
        assert_eq!(
            network.neighbors(TicketKind::Subway, Station::new(1)),
            &stations(&[])
        );
    }

    #[test]
    fn mystery_is_the_union_of_every_line() {
        let network = TransitNetwork::from_sources(&sample_sources()).unwrap();
        for station in network.stations() {
            let mut expected = BTreeSet::new();
            for line in Line::ALL.iter().copied() {
                expected.extend(network.line_graph(line).neighbors(station).iter().copied());
            }
            assert_eq!(
                network.neighbors(TicketKind::Mystery, station),
                &expected,
                "union mismatch at station {station}"
            );
        }
    }

    #[test]
    fn boat_edges_surface_only_through_mystery() {
        let network = TransitNetwork::from_sources(&sample_sources()).unwrap();
        let ferry = Station::new(6);
        for ticket in [TicketKind::Taxi, TicketKind::Bus, TicketKind::Subway] {
            assert!(!network.neighbors(ticket, Station::new(3)).contains(&ferry));
        }
        assert!(
            network
                .neighbors(TicketKind::Mystery, Station::new(3))
                .contains(&ferry)
        );
    }

    #[test]
    fn unknown_station_is_everywhere_empty() {
        let network = TransitNetwork::from_sources(&sample_sources()).unwrap();
        for ticket in TicketKind::ALL.iter().copied() {
            assert!(network.neighbors(ticket, Station::new(150)).is_empty());
        }
    }

    #[test]
    fn station_universe_counts_keys_and_neighbors() {
        let network = TransitNetwork::from_sources(&sample_sources()).unwrap();
        assert_eq!(network.station_count(), 6);
        let labels: Vec<u16> = network.stations().map(Station::label).collect();
        assert_eq!(labels, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn coordinates_are_wired_through() {
        let network = TransitNetwork::from_sources(&sample_sources()).unwrap();
        let point = network.coordinates().get(Station::new(5)).unwrap();
        assert_eq!((point.x, point.y), (30, 30));
        assert_eq!(network.coordinates().len(), 6);
    }

    #[test]
    fn bad_row_in_any_file_fails_the_whole_load() {
        let mut sources = sample_sources();
        sources.boat = "3:6\nbroken\n".to_string();
        assert!(TransitNetwork::from_sources(&sources).is_err());
    }
}
