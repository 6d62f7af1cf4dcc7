use std::{fmt::Display, ops::Add};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: isize,
    pub y: isize,
}

impl Coord {
    pub const ORIGIN: Coord = Coord::new(0, 0);

    pub const fn new(x: isize, y: isize) -> Self {
        Self { x, y }
    }
}

impl Add<(isize, isize)> for Coord {
    type Output = Coord;

    fn add(self, (dx, dy): (isize, isize)) -> Coord {
        Coord::new(self.x + dx, self.y + dy)
    }
}

impl From<(isize, isize)> for Coord {
    fn from((x, y): (isize, isize)) -> Self {
        Self::new(x, y)
    }
}

impl Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub fn opposite(self) -> Self {
        use Direction::*;
        match self {
            North => South,
            NorthEast => SouthWest,
            East => West,
            SouthEast => NorthWest,
            South => North,
            SouthWest => NorthEast,
            West => East,
            NorthWest => SouthEast,
        }
    }

    pub fn abbreviation(self) -> &'static str {
        use Direction::*;
        match self {
            North => "N",
            NorthEast => "NE",
            East => "E",
            SouthEast => "SE",
            South => "S",
            SouthWest => "SW",
            West => "W",
            NorthWest => "NW",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.abbreviation())
    }
}
