use thiserror::Error;

use crate::{
    coord::{Coord, Direction},
    rule::MachineState,
    topology::Topology,
};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("rule string is empty")]
    Empty,
    #[error("state {state} has no transitions")]
    EmptyState { state: usize },
    #[error("{token:?} at position {position} is not a turn on the {topology} grid")]
    UnknownTurn {
        token: char,
        position: usize,
        topology: Topology,
    },
    #[error("state {state} lists {found} colours but state 0 lists {expected}")]
    UnevenStates {
        state: usize,
        expected: usize,
        found: usize,
    },
    #[error("state {state} writes colour {color} on colour {read}, but the rule has {colors} colours")]
    ColorOutOfRange {
        state: usize,
        read: usize,
        color: usize,
        colors: usize,
    },
    #[error("state {state} moves to state {next} on colour {read}, but the rule has {states} states")]
    StateOutOfRange {
        state: usize,
        read: usize,
        next: usize,
        states: usize,
    },
    #[error("rule uses {found} {what}, at most {max} are supported")]
    TooLarge {
        what: &'static str,
        found: usize,
        max: usize,
    },
    #[error("malformed rule at position {position}: expected {expected}")]
    Malformed {
        position: usize,
        expected: &'static str,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown grid {0:?}, expected one of square, hex, triangle")]
pub struct UnknownTopology(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error(transparent)]
    Topology(#[from] UnknownTopology),
    #[error("an ant cannot stand on {position} heading {heading} on the {topology} grid")]
    InvalidStart {
        position: Coord,
        heading: Direction,
        topology: Topology,
    },
    #[error("start state {state} is outside the rule's {states} states")]
    InvalidState { state: MachineState, states: usize },
}
