use std::{fmt::Display, iter::Peekable, str::CharIndices};

use itertools::Itertools;

use crate::{
    error::RuleError,
    topology::{Topology, Turn},
};

pub type Color = u8;
pub type MachineState = u8;

const MAX_COLORS: usize = Color::MAX as usize + 1;
const MAX_STATES: usize = MachineState::MAX as usize + 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub write: Color,
    pub turn: Turn,
    pub next: MachineState,
}

/// Transition table indexed by `(machine state, colour read)`.
///
/// Two grammars are accepted:
///
/// - shorthand: one turn per colour, states separated by `/`, e.g. `RL` or
///   `RRL/LRR`. Each visit advances the cell to the next colour and the
///   machine to the next state, both cyclically.
/// - explicit: `{{{write,turn,next},...},...}` listing every transition,
///   one brace group per state, one triple per colour.
///
/// Every state must cover the same number of colours, so the table is total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleTable {
    topology: Topology,
    colors: usize,
    transitions: Vec<Transition>,
}

type Row = Vec<(usize, Turn, usize)>;

impl RuleTable {
    pub fn parse(rule: &str, topology: Topology) -> Result<Self, RuleError> {
        let rows = if rule.trim_start().starts_with('{') {
            explicit(rule, topology)?
        } else {
            shorthand(rule, topology)?
        };
        let table = Self::from_rows(topology, rows)?;
        log::debug!("parsed {rule:?} for the {topology} grid as {table}");
        Ok(table)
    }

    fn from_rows(topology: Topology, rows: Vec<Row>) -> Result<Self, RuleError> {
        let (states, colors) = shape(&rows)?;
        let mut transitions = Vec::with_capacity(states * colors);
        for (state, row) in rows.into_iter().enumerate() {
            for (read, (write, turn, next)) in row.into_iter().enumerate() {
                if write >= colors {
                    return Err(RuleError::ColorOutOfRange {
                        state,
                        read,
                        color: write,
                        colors,
                    });
                }
                if next >= states {
                    return Err(RuleError::StateOutOfRange {
                        state,
                        read,
                        next,
                        states,
                    });
                }
                transitions.push(Transition {
                    write: write as Color,
                    turn,
                    next: next as MachineState,
                });
            }
        }
        Ok(Self {
            topology,
            colors,
            transitions,
        })
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn colors(&self) -> usize {
        self.colors
    }

    pub fn states(&self) -> usize {
        self.transitions.len() / self.colors
    }

    pub fn lookup(&self, state: MachineState, color: Color) -> Transition {
        let (state, color) = (state as usize, color as usize);
        if state >= self.states() || color >= self.colors {
            panic!(
                "no transition for state {state} on colour {color} in a {}x{} table",
                self.states(),
                self.colors
            );
        }
        self.transitions[state * self.colors + color]
    }
}

fn shape<T>(rows: &[Vec<T>]) -> Result<(usize, usize), RuleError> {
    let Some(first) = rows.first() else {
        return Err(RuleError::Empty);
    };
    let colors = first.len();
    for (state, row) in rows.iter().enumerate() {
        match row.len() {
            0 => return Err(RuleError::EmptyState { state }),
            found if found != colors => {
                return Err(RuleError::UnevenStates {
                    state,
                    expected: colors,
                    found,
                });
            }
            _ => (),
        }
    }
    for (what, found, max) in [
        ("colours", colors, MAX_COLORS),
        ("states", rows.len(), MAX_STATES),
    ] {
        if found > max {
            return Err(RuleError::TooLarge { what, found, max });
        }
    }
    Ok((rows.len(), colors))
}

fn shorthand(rule: &str, topology: Topology) -> Result<Vec<Row>, RuleError> {
    if rule.trim().is_empty() {
        return Err(RuleError::Empty);
    }
    let (mut turns, mut row) = (vec![], vec![]);
    for (position, c) in rule.char_indices() {
        match c {
            '/' => turns.push(std::mem::take(&mut row)),
            c if c.is_whitespace() => (),
            c => {
                let Some(turn) = topology.decode_turn(c) else {
                    return Err(RuleError::UnknownTurn {
                        token: c,
                        position,
                        topology,
                    });
                };
                row.push(turn);
            }
        }
    }
    turns.push(row);
    let (states, colors) = shape(&turns)?;
    let rows = turns
        .into_iter()
        .enumerate()
        .map(|(state, row)| {
            row.into_iter()
                .enumerate()
                .map(|(read, turn)| ((read + 1) % colors, turn, (state + 1) % states))
                .collect()
        })
        .collect();
    Ok(rows)
}

fn explicit(rule: &str, topology: Topology) -> Result<Vec<Row>, RuleError> {
    let mut cursor = Cursor {
        chars: rule.char_indices().peekable(),
        len: rule.len(),
    };
    let rows = cursor.list(|c| c.list(|c| c.transition(topology)))?;
    if let Some((position, _)) = cursor.peek() {
        return Err(RuleError::Malformed {
            position,
            expected: "end of rule",
        });
    }
    Ok(rows)
}

struct Cursor<'a> {
    chars: Peekable<CharIndices<'a>>,
    len: usize,
}

impl Cursor<'_> {
    fn peek(&mut self) -> Option<(usize, char)> {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
        self.chars.peek().copied()
    }

    fn position(&mut self) -> usize {
        self.peek().map_or(self.len, |(i, _)| i)
    }

    fn eat(&mut self, c: char) -> bool {
        match self.peek() {
            Some((_, next)) if next == c => {
                self.chars.next();
                true
            }
            _ => false,
        }
    }

    fn expect(&mut self, c: char, expected: &'static str) -> Result<(), RuleError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(RuleError::Malformed {
                position: self.position(),
                expected,
            })
        }
    }

    fn list<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, RuleError>,
    ) -> Result<Vec<T>, RuleError> {
        self.expect('{', "'{'")?;
        let mut items = vec![];
        if self.eat('}') {
            return Ok(items);
        }
        loop {
            items.push(item(self)?);
            if self.eat('}') {
                return Ok(items);
            }
            self.expect(',', "',' or '}'")?;
        }
    }

    fn number(&mut self) -> Result<usize, RuleError> {
        let position = self.position();
        let mut digits = String::new();
        while let Some((_, c)) = self.chars.next_if(|(_, c)| c.is_ascii_digit()) {
            digits.push(c);
        }
        if digits.is_empty() {
            return Err(RuleError::Malformed {
                position,
                expected: "a number",
            });
        }
        // Anything too big for usize is out of range anyway.
        Ok(digits.parse().unwrap_or(usize::MAX))
    }

    fn turn(&mut self, topology: Topology) -> Result<Turn, RuleError> {
        let Some((position, token)) = self.peek() else {
            return Err(RuleError::Malformed {
                position: self.len,
                expected: "a turn",
            });
        };
        self.chars.next();
        topology.decode_turn(token).ok_or(RuleError::UnknownTurn {
            token,
            position,
            topology,
        })
    }

    fn transition(&mut self, topology: Topology) -> Result<(usize, Turn, usize), RuleError> {
        self.expect('{', "'{'")?;
        let write = self.number()?;
        self.expect(',', "','")?;
        let turn = self.turn(topology)?;
        self.expect(',', "','")?;
        let next = self.number()?;
        self.expect('}', "'}'")?;
        Ok((write, turn, next))
    }
}

impl Display for RuleTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let states = self
            .transitions
            .chunks(self.colors)
            .map(|row| {
                let row = row
                    .iter()
                    .map(|t| format!("{{{},{},{}}}", t.write, t.turn, t.next))
                    .join(",");
                format!("{{{row}}}")
            })
            .join(",");
        write!(f, "{{{states}}}")
    }
}
