use crate::model::station::Station;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

fn empty_neighbors() -> &'static BTreeSet<Station> {
    static EMPTY: OnceLock<BTreeSet<Station>> = OnceLock::new();
    EMPTY.get_or_init(BTreeSet::new)
}

/// Adjacency rows for a single transit line. Immutable once the network is
/// built; lookups are total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyGraph {
    edges: BTreeMap<Station, BTreeSet<Station>>,
}

impl AdjacencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole row for `station`. A later row for the same
    /// station wins, matching how the data files are read top to bottom.
    pub fn insert_row(&mut self, station: Station, neighbors: BTreeSet<Station>) {
        self.edges.insert(station, neighbors);
    }

    /// Stations reachable from `station` in one move. Stations without a row
    /// yield the shared empty set, never an error.
    pub fn neighbors(&self, station: Station) -> &BTreeSet<Station> {
        match self.edges.get(&station) {
            Some(neighbors) => neighbors,
            None => empty_neighbors(),
        }
    }

    pub fn contains(&self, station: Station) -> bool {
        self.edges.contains_key(&station)
    }

    pub fn stations(&self) -> impl Iterator<Item = Station> + '_ {
        self.edges.keys().copied()
    }

    pub fn row_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::AdjacencyGraph;
    use crate::model::station::Station;
    use std::collections::BTreeSet;

    fn row(labels: &[u16]) -> BTreeSet<Station> {
        labels.iter().copied().map(Station::new).collect()
    }

    #[test]
    fn neighbors_returns_inserted_row() {
        let mut graph = AdjacencyGraph::new();
        graph.insert_row(Station::new(1), row(&[2, 3]));
        assert_eq!(graph.neighbors(Station::new(1)), &row(&[2, 3]));
        assert!(graph.contains(Station::new(1)));
        assert_eq!(graph.row_count(), 1);
    }

    #[test]
    fn unknown_station_has_empty_neighbors() {
        let graph = AdjacencyGraph::new();
        assert!(graph.neighbors(Station::new(77)).is_empty());
        assert!(!graph.contains(Station::new(77)));
    }

    #[test]
    fn repeated_lookups_are_stable() {
        let mut graph = AdjacencyGraph::new();
        graph.insert_row(Station::new(4), row(&[9]));
        let first = graph.neighbors(Station::new(4)).clone();
        let second = graph.neighbors(Station::new(4)).clone();
        assert_eq!(first, second);
    }

    #[test]
    fn later_row_replaces_earlier_row() {
        let mut graph = AdjacencyGraph::new();
        graph.insert_row(Station::new(1), row(&[2]));
        graph.insert_row(Station::new(1), row(&[5, 6]));
        assert_eq!(graph.neighbors(Station::new(1)), &row(&[5, 6]));
    }

    #[test]
    fn stations_iterates_sorted_keys() {
        let mut graph = AdjacencyGraph::new();
        graph.insert_row(Station::new(20), row(&[]));
        graph.insert_row(Station::new(3), row(&[]));
        let keys: Vec<u16> = graph.stations().map(Station::label).collect();
        assert_eq!(keys, vec![3, 20]);
    }
}
