use std::{
    collections::{HashMap, hash_map},
    fmt::{Display, Write},
    ops::Range,
};

use itertools::{Itertools, MinMaxResult};

use crate::{coord::Coord, rule::Color};

/// Sparse cell colours. A cell is stored iff its colour is not 0.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Grid {
    cells: HashMap<Coord, Color>,
}

impl Grid {
    pub fn get(&self, coord: Coord) -> Color {
        self.cells.get(&coord).copied().unwrap_or_default()
    }

    pub fn set(&mut self, coord: Coord, color: Color) {
        if color == 0 {
            self.cells.remove(&coord);
        } else {
            self.cells.insert(coord, color);
        }
    }

    pub fn snapshot(&self) -> impl Iterator<Item = (Coord, Color)> + '_ {
        self.cells.iter().map(|(&coord, &color)| (coord, color))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn span(&self) -> Span {
        let range = |minmax: MinMaxResult<isize>| match minmax {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(a) => Some(a..a + 1),
            MinMaxResult::MinMax(a, b) => Some(a..b + 1),
        };
        let xs = range(self.cells.keys().map(|c| c.x).minmax());
        let ys = range(self.cells.keys().map(|c| c.y).minmax());
        match (xs, ys) {
            (Some(xs), Some(ys)) => Span::Covers { xs, ys },
            _ => Span::Empty,
        }
    }

    pub fn picture(&self) -> Picture<'_> {
        Picture(self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Span {
    Empty,
    Covers { xs: Range<isize>, ys: Range<isize> },
}

pub struct Picture<'a>(&'a Grid);

fn glyph(color: Color) -> char {
    match color {
        0 => '.',
        1..=9 => char::from(b'0' + color),
        10..=35 => char::from(b'a' + color - 10),
        _ => '#',
    }
}

impl Display for Picture<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Span::Covers { xs, ys } = self.0.span() else {
            return Ok(());
        };
        for (i, y) in ys.rev().enumerate() {
            if i > 0 {
                f.write_char('\n')?;
            }
            for x in xs.clone() {
                f.write_char(glyph(self.0.get(Coord::new(x, y))))?;
            }
        }
        Ok(())
    }
}

impl IntoIterator for Grid {
    type Item = (Coord, Color);

    type IntoIter = hash_map::IntoIter<Coord, Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

impl FromIterator<(Coord, Color)> for Grid {
    fn from_iter<T: IntoIterator<Item = (Coord, Color)>>(iter: T) -> Self {
        let mut grid = Grid::default();
        for (coord, color) in iter {
            grid.set(coord, color);
        }
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unvisited_is_zero() {
        let grid = Grid::default();
        assert_eq!(grid.get(Coord::ORIGIN), 0);
        assert_eq!(grid.get(Coord::new(123, -321)), 0);
        assert!(grid.is_empty());
        assert_eq!(grid.span(), Span::Empty);
    }

    #[test]
    fn test_saved_value_is_returned() {
        let mut grid = Grid::default();
        grid.set(Coord::new(10, 2), 42);
        assert_eq!(grid.get(Coord::new(10, 2)), 42);
        grid.set(Coord::new(10, 2), 7);
        assert_eq!(grid.get(Coord::new(10, 2)), 7);
    }

    #[test]
    fn test_zero_is_not_stored() {
        let mut grid = Grid::default();
        grid.set(Coord::new(0, 0), 42);
        grid.set(Coord::new(5, 5), 21);
        grid.set(Coord::new(5, 5), 0);
        grid.set(Coord::new(9, 9), 0);
        let cells: HashMap<_, _> = grid.snapshot().collect();
        assert_eq!(cells, HashMap::from([(Coord::new(0, 0), 42)]));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_span() {
        let grid: Grid = [((3, -1), 1), ((-2, 4), 2)]
            .map(|(c, k)| (Coord::from(c), k))
            .into_iter()
            .collect();
        assert_eq!(
            grid.span(),
            Span::Covers {
                xs: -2..4,
                ys: -1..5
            }
        );
    }

    #[test]
    fn test_picture() {
        let grid: Grid = [((0, 1), 1), ((1, 0), 2), ((2, 0), 11)]
            .map(|(c, k)| (Coord::from(c), k))
            .into_iter()
            .collect();
        assert_eq!(grid.picture().to_string(), "1..\n.2b");
        assert_eq!(Grid::default().picture().to_string(), "");
    }
}
