//! Latitude/longitude bounding boxes.

use crate::Coordinate;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in degrees.
///
/// Boxes built from points always satisfy `south <= north` and `west <= east`.
/// A box produced by [`crate::ViewportFitter::shrink`] may be inverted; see
/// [`BoundingBox::is_inverted`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Southern edge (minimum latitude)
    pub south: f64,
    /// Western edge (minimum longitude)
    pub west: f64,
    /// Northern edge (maximum latitude)
    pub north: f64,
    /// Eastern edge (maximum longitude)
    pub east: f64,
}

impl BoundingBox {
    /// Creates a box from its four edges, as given.
    #[inline]
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Zero-area box around a single point.
    #[inline]
    pub fn from_point(point: Coordinate) -> Self {
        Self::new(point.latitude, point.longitude, point.latitude, point.longitude)
    }

    /// Minimal box enclosing every point, or `None` for an empty sequence.
    ///
    /// # Example
    /// ```
    /// use favmap_geo::{BoundingBox, Coordinate};
    ///
    /// let bounds = BoundingBox::from_points([
    ///     Coordinate::new(34.0, 126.0),
    ///     Coordinate::new(34.2, 126.3),
    /// ])
    /// .unwrap();
    /// assert_eq!(bounds.north, 34.2);
    /// assert_eq!(bounds.west, 126.0);
    /// ```
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut iter = points.into_iter();
        let mut bounds = Self::from_point(iter.next()?);
        for point in iter {
            bounds.extend(point);
        }
        Some(bounds)
    }

    /// Grows the box so it contains `point`.
    #[inline]
    pub fn extend(&mut self, point: Coordinate) {
        self.south = self.south.min(point.latitude);
        self.north = self.north.max(point.latitude);
        self.west = self.west.min(point.longitude);
        self.east = self.east.max(point.longitude);
    }

    /// South-west corner.
    #[inline]
    pub fn south_west(&self) -> Coordinate {
        Coordinate::new(self.south, self.west)
    }

    /// North-east corner.
    #[inline]
    pub fn north_east(&self) -> Coordinate {
        Coordinate::new(self.north, self.east)
    }

    /// Midpoint of the box.
    #[inline]
    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.center_latitude(), (self.west + self.east) / 2.0)
    }

    /// Latitude halfway between the southern and northern edges.
    #[inline]
    pub fn center_latitude(&self) -> f64 {
        (self.south + self.north) / 2.0
    }

    /// Signed latitude span in degrees (negative when inverted).
    #[inline]
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    /// Signed longitude span in degrees (negative when inverted).
    #[inline]
    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }

    /// True when either axis has its edges crossed.
    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.south > self.north || self.west > self.east
    }

    /// Rebuilds the box from its two corners, swapping crossed edges.
    ///
    /// This mirrors what a map widget does when a box is assembled by
    /// extending an empty bounds object with the south-west and north-east
    /// corners one after the other.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self::new(
            self.south.min(self.north),
            self.west.min(self.east),
            self.south.max(self.north),
            self.west.max(self.east),
        )
    }

    /// True if the point lies within the box, edges included.
    #[inline]
    pub fn contains(&self, point: &Coordinate) -> bool {
        point.latitude >= self.south
            && point.latitude <= self.north
            && point.longitude >= self.west
            && point.longitude <= self.east
    }
}
