// src/query/viewport.rs

//! Map viewport serialization.

use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// The visible map bounding region, used as a spatial filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl MapBounds {
    /// Serialize the bounds as a closed GeoJSON-style ring literal, e.g.
    /// `[[[-123,48],[-122,48],...]]`.
    ///
    /// The ring is traversed counter-clockwise starting and ending at the
    /// southwest corner, with extra vertices at every integer meridian the
    /// box crosses. The backend's geo-within projection mishandles long
    /// straight edges, so the edges must be subdivided.
    pub fn to_coordinates(&self) -> String {
        let mut points: Vec<String> = Vec::new();

        // bottom edge, west to east
        points.push(coord(self.west, self.south));
        let mut x = self.west.ceil() as i64;
        while (x as f64) < self.east {
            points.push(coord(x as f64, self.south));
            x += 1;
        }
        points.push(coord(self.east, self.south));

        // top edge, east to west
        points.push(coord(self.east, self.north));
        let mut x = self.east.floor() as i64;
        while (x as f64) > self.west {
            points.push(coord(x as f64, self.north));
            x -= 1;
        }
        points.push(coord(self.west, self.north));

        // close the ring
        points.push(coord(self.west, self.south));

        format!("[[{}]]", points.join(","))
    }
}

fn coord(lng: f64, lat: f64) -> String {
    format!("[{lng},{lat}]")
}

impl fmt::Display for MapBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.west, self.south, self.east, self.north
        )
    }
}

impl FromStr for MapBounds {
    type Err = AppError;

    /// Parse `west,south,east,north`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(AppError::validation(format!(
                "expected west,south,east,north, got: {s}"
            )));
        }
        let mut values = [0f64; 4];
        for (i, part) in parts.iter().enumerate() {
            values[i] = part
                .parse()
                .map_err(|e| AppError::validation(format!("bad bounds value {part}: {e}")))?;
        }
        let bounds = MapBounds {
            west: values[0],
            south: values[1],
            east: values[2],
            north: values[3],
        };
        if bounds.west >= bounds.east || bounds.south >= bounds.north {
            return Err(AppError::validation(format!("degenerate bounds: {s}")));
        }
        Ok(bounds)
    }
}
