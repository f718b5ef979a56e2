use crate::model::station::Station;
use std::collections::BTreeMap;

/// Pixel position of a station on the board artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapPoint {
    pub x: u32,
    pub y: u32,
}

impl MapPoint {
    pub const fn new(x: u32, y: u32) -> Self {
        MapPoint { x, y }
    }
}

/// Station to pixel lookup built from the coordinate file, where the 1-based
/// line number is the station label. Stations without artwork simply have no
/// entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordIndex {
    points: BTreeMap<Station, MapPoint>,
}

impl CoordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, station: Station, point: MapPoint) {
        self.points.insert(station, point);
    }

    pub fn get(&self, station: Station) -> Option<MapPoint> {
        self.points.get(&station).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Station, MapPoint)> + '_ {
        self.points.iter().map(|(station, point)| (*station, *point))
    }
}
