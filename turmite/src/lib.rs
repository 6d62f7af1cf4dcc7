//! Langton's ant and its multi-state generalisation, turmites, on square,
//! hexagonal and triangular grids.
//!
//! ```
//! use turmite::SimConfig;
//!
//! let mut sim = SimConfig::default().build().unwrap();
//! let report = sim.run(Some(100), |_| std::ops::ControlFlow::Continue(()));
//! assert_eq!(report.steps, 100);
//! ```

mod config;
mod coord;
mod error;
mod grid;
pub mod render;
mod rule;
mod sim;
mod topology;
mod turmite;


pub use crate::{
    config::SimConfig,
    coord::{Coord, Direction},
    error::{Error, RuleError, UnknownTopology},
    grid::{Grid, Picture, Span},
    rule::{Color, MachineState, RuleTable, Transition},
    sim::{Outcome, Report, Simulation, StopHandle},
    topology::{Orientation, Polygon, Topology, Turn},
    turmite::{Ant, Phase, Turmite},
};
