use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::GameError;

/// Single coordinate axis used for board width, height, and positions.
pub type Ix = u8;

/// Count type used for mine counts and total-tile counts.
pub type Ax = u16;

pub const fn mult(a: Ix, b: Ix) -> Ax {
    let a = a as Ax;
    let b = b as Ax;
    a.saturating_mul(b)
}

/// Zero-indexed tile position on the board.
///
/// Renders as the `"x,y"` key used for set membership and parses back from it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: Ix,
    pub y: Ix,
}

impl Coord {
    pub const fn new(x: Ix, y: Ix) -> Self {
        Self { x, y }
    }

    /// Whether the coordinate lies inside a board of `width` by `height`.
    pub const fn is_within(self, width: Ix, height: Ix) -> bool {
        self.x < width && self.y < height
    }

    /// Iterates the up-to-8 in-bounds neighbors, diagonals included.
    pub fn neighbors(self, width: Ix, height: Ix) -> NeighborIter {
        NeighborIter::new(self, (width, height))
    }
}

impl From<(Ix, Ix)> for Coord {
    fn from((x, y): (Ix, Ix)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Coord {
    type Err = GameError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let invalid = || GameError::InvalidCoordinateKey(key.into());
        let (x, y) = key.split_once(',').ok_or_else(invalid)?;
        let x = x.trim().parse().map_err(|_| invalid())?;
        let y = y.trim().parse().map_err(|_| invalid())?;
        Ok(Self { x, y })
    }
}

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

/// Boards are stored row-major, so the array index is `[y, x]`.
impl ToNdIndex for Coord {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.y.into(), self.x.into()]
    }
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord, delta: (i8, i8), bounds: (Ix, Ix)) -> Option<Coord> {
    let (dx, dy) = delta;
    let (max_x, max_y) = bounds;

    let next_x = coords.x.checked_add_signed(dx)?;
    if next_x >= max_x {
        return None;
    }

    let next_y = coords.y.checked_add_signed(dy)?;
    if next_y >= max_y {
        return None;
    }

    Some(Coord::new(next_x, next_y))
}

#[derive(Debug, Clone)]
pub struct NeighborIter {
    center: Coord,
    bounds: (Ix, Ix),
    index: u8,
}

impl NeighborIter {
    fn new(center: Coord, bounds: (Ix, Ix)) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item =
                apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trips_through_display_and_parse() {
        for coord in [Coord::new(0, 0), Coord::new(7, 3), Coord::new(255, 254)] {
            let key = coord.to_string();
            assert_eq!(key.parse::<Coord>().unwrap(), coord);
        }
        assert_eq!(Coord::new(4, 12).to_string(), "4,12");
    }

    #[test]
    fn malformed_keys_are_rejected() {
        for key in ["", "3", "3;4", "-1,2", "a,b", "1,2,3", "300,1"] {
            assert_eq!(
                key.parse::<Coord>(),
                Err(GameError::InvalidCoordinateKey(key.into())),
                "key {key:?}"
            );
        }
    }

    #[test]
    fn corner_has_three_neighbors() {
        let neighbors: Vec<_> = Coord::new(0, 0).neighbors(3, 3).collect();
        assert_eq!(
            neighbors,
            vec![Coord::new(1, 0), Coord::new(0, 1), Coord::new(1, 1)]
        );
    }

    #[test]
    fn interior_has_eight_neighbors_and_excludes_center() {
        let center = Coord::new(1, 1);
        let neighbors: Vec<_> = center.neighbors(3, 3).collect();
        assert_eq!(neighbors.len(), 8);
        assert!(!neighbors.contains(&center));
    }

    #[test]
    fn single_tile_board_has_no_neighbors() {
        assert_eq!(Coord::new(0, 0).neighbors(1, 1).count(), 0);
    }

    #[test]
    fn bounds_check() {
        assert!(Coord::new(2, 1).is_within(3, 2));
        assert!(!Coord::new(3, 1).is_within(3, 2));
        assert!(!Coord::new(0, 2).is_within(3, 2));
    }
}
