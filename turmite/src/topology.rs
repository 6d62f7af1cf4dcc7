use std::{fmt::Display, str::FromStr};

use smallvec::{SmallVec, smallvec};

use crate::{
    coord::{
        Coord,
        Direction::{self, *},
    },
    error::UnknownTopology,
};

const SQUARE: [Direction; 4] = [North, East, South, West];
const HEX: [Direction; 6] = [NorthEast, East, SouthEast, SouthWest, West, NorthWest];
const TRIANGLE: [Direction; 6] = [North, NorthEast, SouthEast, South, SouthWest, NorthWest];

pub type Polygon = SmallVec<[(f64, f64); 6]>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Topology {
    #[default]
    Square,
    Hex,
    /// Alternating up and down triangles. Only cells with `x ≡ y (mod 2)`
    /// exist; even `x` points up, odd `x` points down.
    Triangle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Turn {
    Forward,
    Right,
    Back,
    Left,
    Clockwise(u8),
}

impl Display for Turn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Turn::Forward => f.write_str("N"),
            Turn::Right => f.write_str("R"),
            Turn::Back => f.write_str("U"),
            Turn::Left => f.write_str("L"),
            Turn::Clockwise(steps) => write!(f, "{steps}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Up,
    Down,
}

impl Topology {
    pub const ALL: [Topology; 3] = [Topology::Square, Topology::Hex, Topology::Triangle];

    pub fn name(self) -> &'static str {
        match self {
            Topology::Square => "square",
            Topology::Hex => "hex",
            Topology::Triangle => "triangle",
        }
    }

    pub fn compass(self) -> &'static [Direction] {
        match self {
            Topology::Square => &SQUARE,
            Topology::Hex => &HEX,
            Topology::Triangle => &TRIANGLE,
        }
    }

    pub fn direction_count(self) -> usize {
        self.compass().len()
    }

    pub fn initial_direction(self) -> Direction {
        self.compass()[0]
    }

    pub fn decode_turn(self, token: char) -> Option<Turn> {
        let turn = match token.to_ascii_uppercase() {
            'N' | 'F' => Turn::Forward,
            'R' => Turn::Right,
            'U' | 'B' => Turn::Back,
            'L' => Turn::Left,
            'I' if self == Topology::Hex => Turn::Clockwise(2),
            'E' if self == Topology::Hex => Turn::Clockwise(4),
            digit @ '0'..='9' => Turn::Clockwise(digit as u8 - b'0'),
            _ => return None,
        };
        self.supports(turn).then_some(turn)
    }

    pub fn supports(self, turn: Turn) -> bool {
        match (self, turn) {
            (Topology::Square, Turn::Clockwise(_)) => false,
            (Topology::Hex, Turn::Clockwise(steps)) => steps < 6,
            // Every move flips the triangle, so the ant can never go straight.
            (Topology::Triangle, Turn::Forward) => false,
            (Topology::Triangle, Turn::Clockwise(steps)) => steps < 6 && steps % 2 == 1,
            _ => true,
        }
    }

    fn steps(self, turn: Turn) -> usize {
        let n = self.direction_count();
        match turn {
            Turn::Forward => 0,
            Turn::Right => 1,
            Turn::Back => n / 2,
            Turn::Left => n - 1,
            Turn::Clockwise(steps) => steps as usize,
        }
    }

    pub fn turn(self, heading: Direction, turn: Turn) -> Direction {
        let compass = self.compass();
        let Some(i) = compass.iter().position(|&d| d == heading) else {
            panic!("{heading} is not a heading on the {self} grid");
        };
        compass[(i + self.steps(turn)) % compass.len()]
    }

    fn delta(self, heading: Direction) -> Option<(isize, isize)> {
        let delta = match (self, heading) {
            (Topology::Square, North) => (0, 1),
            (Topology::Square, East) => (1, 0),
            (Topology::Square, South) => (0, -1),
            (Topology::Square, West) => (-1, 0),
            (Topology::Hex, East) => (1, 0),
            (Topology::Hex, West) => (-1, 0),
            (Topology::Hex, NorthEast) => (0, 1),
            (Topology::Hex, SouthWest) => (0, -1),
            (Topology::Hex, NorthWest) => (-1, 1),
            (Topology::Hex, SouthEast) => (1, -1),
            (Topology::Triangle, North | NorthWest) => (-1, 1),
            (Topology::Triangle, South | SouthEast) => (1, -1),
            (Topology::Triangle, SouthWest) => (-1, -1),
            (Topology::Triangle, NorthEast) => (1, 1),
            _ => return None,
        };
        Some(delta)
    }

    pub fn neighbour(self, coord: Coord, heading: Direction) -> Option<Coord> {
        if !self.exits(coord).contains(&heading) {
            return None;
        }
        self.delta(heading).map(|delta| coord + delta)
    }

    pub fn contains(self, coord: Coord) -> bool {
        match self {
            Topology::Triangle => coord.x.rem_euclid(2) == coord.y.rem_euclid(2),
            Topology::Square | Topology::Hex => true,
        }
    }

    pub fn orientation(self, coord: Coord) -> Option<Orientation> {
        if self != Topology::Triangle || !self.contains(coord) {
            return None;
        }
        Some(match coord.x.rem_euclid(2) {
            0 => Orientation::Up,
            _ => Orientation::Down,
        })
    }

    pub fn exits(self, coord: Coord) -> SmallVec<[Direction; 6]> {
        let compass = self.compass().iter().copied();
        match self.orientation(coord) {
            // Up triangles have their exits on the odd compass points.
            Some(Orientation::Up) => compass.skip(1).step_by(2).collect(),
            Some(Orientation::Down) => compass.step_by(2).collect(),
            None if self.contains(coord) => compass.collect(),
            None => SmallVec::new(),
        }
    }

    /// Headings an ant can hold while standing on `coord`, i.e. the directions
    /// of the moves that lead into it.
    pub fn arrivals(self, coord: Coord) -> SmallVec<[Direction; 6]> {
        let mut arrivals: SmallVec<[Direction; 6]> =
            self.exits(coord).into_iter().map(Direction::opposite).collect();
        let compass = self.compass();
        arrivals.sort_by_key(|d| compass.iter().position(|c| c == d));
        arrivals
    }

    pub fn vertices(self, Coord { x, y }: Coord) -> Polygon {
        let (x, y) = (x as f64, y as f64);
        match self {
            Topology::Square => smallvec![(x, y), (x + 1., y), (x + 1., y + 1.), (x, y + 1.)],
            Topology::Hex => {
                // Centres are one unit apart, so the circumradius is 1/sqrt(3).
                let size = 3f64.sqrt().recip();
                let (cx, cy) = (x + y / 2., y * 1.5 * size);
                smallvec![
                    (cx, cy + size),
                    (cx + 0.5, cy + size / 2.),
                    (cx + 0.5, cy - size / 2.),
                    (cx, cy - size),
                    (cx - 0.5, cy - size / 2.),
                    (cx - 0.5, cy + size / 2.),
                ]
            }
            Topology::Triangle => {
                let h = 3f64.sqrt() / 2.;
                if x.rem_euclid(2.) == 0. {
                    let (u, v) = (x / 2. + y / 4., y * h / 2.);
                    smallvec![
                        (u - 0.5, v - h / 3.),
                        (u + 0.5, v - h / 3.),
                        (u, v + 2. * h / 3.)
                    ]
                } else {
                    let (u, v) = (x / 2. + y / 4. - 0.25, (y - 1.) * h / 2. + h / 3.);
                    smallvec![
                        (u - 0.5, v + h / 3.),
                        (u + 0.5, v + h / 3.),
                        (u, v - 2. * h / 3.)
                    ]
                }
            }
        }
    }
}

impl Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Topology {
    type Err = UnknownTopology;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" => Ok(Topology::Square),
            "hex" | "hexagonal" => Ok(Topology::Hex),
            "triangle" | "triangular" => Ok(Topology::Triangle),
            _ => Err(UnknownTopology(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbours() {
        let cases = [
            (Topology::Square, (1, -1), North, Some((1, 0))),
            (Topology::Square, (1, -1), East, Some((2, -1))),
            (Topology::Square, (1, -1), South, Some((1, -2))),
            (Topology::Square, (1, -1), West, Some((0, -1))),
            (Topology::Square, (1, -1), NorthEast, None),
            (Topology::Square, (1, -1), SouthWest, None),
            (Topology::Hex, (1, -1), East, Some((2, -1))),
            (Topology::Hex, (1, -1), West, Some((0, -1))),
            (Topology::Hex, (1, -1), NorthEast, Some((1, 0))),
            (Topology::Hex, (1, -1), SouthEast, Some((2, -2))),
            (Topology::Hex, (1, -1), SouthWest, Some((1, -2))),
            (Topology::Hex, (1, -1), NorthWest, Some((0, 0))),
            (Topology::Hex, (1, -1), North, None),
            (Topology::Hex, (1, -1), South, None),
            // Down triangle.
            (Topology::Triangle, (1, -1), North, Some((0, 0))),
            (Topology::Triangle, (1, -1), SouthWest, Some((0, -2))),
            (Topology::Triangle, (1, -1), SouthEast, Some((2, -2))),
            (Topology::Triangle, (1, -1), South, None),
            (Topology::Triangle, (1, -1), NorthEast, None),
            (Topology::Triangle, (1, -1), NorthWest, None),
            (Topology::Triangle, (1, -1), East, None),
            // Up triangle.
            (Topology::Triangle, (2, 0), NorthWest, Some((1, 1))),
            (Topology::Triangle, (2, 0), NorthEast, Some((3, 1))),
            (Topology::Triangle, (2, 0), South, Some((3, -1))),
            (Topology::Triangle, (2, 0), North, None),
            (Topology::Triangle, (2, 0), SouthEast, None),
            (Topology::Triangle, (2, 0), West, None),
            // Not a triangle at all.
            (Topology::Triangle, (1, 0), North, None),
        ];
        for (topology, coord, heading, expected) in cases {
            assert_eq!(
                topology.neighbour(coord.into(), heading),
                expected.map(Coord::from),
                "{topology} {coord:?} {heading}"
            );
        }
    }

    #[test]
    fn test_turns() {
        use Turn::*;
        let cases = [
            (Topology::Square, North, Forward, North),
            (Topology::Square, East, Forward, East),
            (Topology::Square, North, Right, East),
            (Topology::Square, West, Back, East),
            (Topology::Square, West, Left, South),
            (Topology::Hex, East, Forward, East),
            (Topology::Hex, NorthWest, Forward, NorthWest),
            (Topology::Hex, East, Right, SouthEast),
            (Topology::Hex, East, Clockwise(2), SouthWest),
            (Topology::Hex, East, Back, West),
            (Topology::Hex, East, Clockwise(4), NorthWest),
            (Topology::Hex, East, Left, NorthEast),
            (Topology::Triangle, North, Right, NorthEast),
            (Topology::Triangle, North, Back, South),
            (Topology::Triangle, North, Left, NorthWest),
            (Topology::Triangle, SouthEast, Right, South),
            (Topology::Triangle, SouthWest, Right, NorthWest),
            (Topology::Triangle, NorthEast, Right, SouthEast),
            (Topology::Triangle, South, Right, SouthWest),
            (Topology::Triangle, NorthWest, Right, North),
        ];
        for (topology, heading, turn, expected) in cases {
            assert_eq!(topology.turn(heading, turn), expected, "{topology} {heading} {turn}");
        }
    }

    #[test]
    fn test_vocabulary() {
        assert_eq!(Topology::Square.decode_turn('r'), Some(Turn::Right));
        assert_eq!(Topology::Square.decode_turn('F'), Some(Turn::Forward));
        assert_eq!(Topology::Square.decode_turn('2'), None);
        assert_eq!(Topology::Square.decode_turn('I'), None);
        assert_eq!(Topology::Hex.decode_turn('I'), Some(Turn::Clockwise(2)));
        assert_eq!(Topology::Hex.decode_turn('e'), Some(Turn::Clockwise(4)));
        assert_eq!(Topology::Hex.decode_turn('5'), Some(Turn::Clockwise(5)));
        assert_eq!(Topology::Hex.decode_turn('6'), None);
        assert_eq!(Topology::Triangle.decode_turn('N'), None);
        assert_eq!(Topology::Triangle.decode_turn('3'), Some(Turn::Clockwise(3)));
        assert_eq!(Topology::Triangle.decode_turn('2'), None);
        assert_eq!(Topology::Triangle.decode_turn('x'), None);
    }

    #[test]
    fn test_triangle_cells() {
        for (coord, exists) in [
            ((0, 0), true),
            ((-1, -1), true),
            ((1, 0), false),
            ((-1, 0), false),
            ((-99999, 99999), true),
            ((-99998, 99999), false),
        ] {
            assert_eq!(Topology::Triangle.contains(coord.into()), exists, "{coord:?}");
        }
        assert_eq!(Topology::Triangle.orientation(Coord::ORIGIN), Some(Orientation::Up));
        assert_eq!(Topology::Triangle.orientation((-1, 1).into()), Some(Orientation::Down));
        assert_eq!(Topology::Triangle.orientation((0, 1).into()), None);
        assert_eq!(Topology::Square.orientation(Coord::ORIGIN), None);
    }

    #[test]
    fn test_arrivals() {
        let up = Topology::Triangle.arrivals(Coord::ORIGIN);
        assert_eq!(up.as_slice(), &[North, SouthEast, SouthWest]);
        let down = Topology::Triangle.arrivals((1, 1).into());
        assert_eq!(down.as_slice(), &[NorthEast, South, NorthWest]);
        assert_eq!(Topology::Hex.arrivals(Coord::ORIGIN).as_slice(), &HEX);
    }

    #[test]
    fn test_neighbours_share_an_edge() {
        fn shares_edge(a: &Polygon, b: &Polygon) -> bool {
            let close = |p: &(f64, f64), q: &(f64, f64)| {
                (p.0 - q.0).abs() < 1e-9 && (p.1 - q.1).abs() < 1e-9
            };
            a.iter().filter(|p| b.iter().any(|q| close(p, q))).count() == 2
        }
        for topology in Topology::ALL {
            for coord in [(0, 0), (1, 1), (-3, 5), (4, -2)].map(Coord::from) {
                let cell = topology.vertices(coord);
                for heading in topology.exits(coord) {
                    let Some(next) = topology.neighbour(coord, heading) else {
                        panic!("{topology} {coord} has no {heading} neighbour");
                    };
                    assert!(
                        shares_edge(&cell, &topology.vertices(next)),
                        "{topology} {coord} -> {next}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("square".parse(), Ok(Topology::Square));
        assert_eq!("Hex".parse(), Ok(Topology::Hex));
        assert_eq!("triangular".parse(), Ok(Topology::Triangle));
        assert_eq!(
            "octagon".parse::<Topology>(),
            Err(UnknownTopology("octagon".to_owned()))
        );
    }
}
