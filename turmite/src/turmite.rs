use crate::{
    coord::{Coord, Direction},
    error::Error,
    grid::Grid,
    rule::{MachineState, RuleTable, Transition},
    topology::Topology,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ant {
    pub position: Coord,
    pub heading: Direction,
    pub state: MachineState,
}

impl Ant {
    pub fn new(topology: Topology) -> Self {
        Self {
            position: Coord::ORIGIN,
            heading: topology.initial_direction(),
            state: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Halted,
}

#[derive(Clone, Debug)]
pub struct Turmite {
    topology: Topology,
    rules: RuleTable,
    grid: Grid,
    ant: Ant,
    steps: u64,
    phase: Phase,
}

impl Turmite {
    pub fn new(rules: RuleTable) -> Self {
        let topology = rules.topology();
        Self {
            topology,
            rules,
            grid: Grid::default(),
            ant: Ant::new(topology),
            steps: 0,
            phase: Phase::Idle,
        }
    }

    pub fn with_ant(rules: RuleTable, ant: Ant) -> Result<Self, Error> {
        let topology = rules.topology();
        if !topology.arrivals(ant.position).contains(&ant.heading) {
            return Err(Error::InvalidStart {
                position: ant.position,
                heading: ant.heading,
                topology,
            });
        }
        if ant.state as usize >= rules.states() {
            return Err(Error::InvalidState {
                state: ant.state,
                states: rules.states(),
            });
        }
        Ok(Self {
            ant,
            ..Self::new(rules)
        })
    }

    pub fn step(&mut self) -> bool {
        if self.phase == Phase::Halted {
            return false;
        }
        self.phase = Phase::Running;
        let Ant {
            position,
            heading,
            state,
        } = self.ant;
        let Transition { write, turn, next } = self.rules.lookup(state, self.grid.get(position));
        self.grid.set(position, write);
        let heading = self.topology.turn(heading, turn);
        let Some(position) = self.topology.neighbour(position, heading) else {
            panic!(
                "{position} has no {heading} neighbour on the {} grid",
                self.topology
            );
        };
        self.ant = Ant {
            position,
            heading,
            state: next,
        };
        self.steps += 1;
        true
    }

    pub fn halt(&mut self) {
        self.phase = Phase::Halted;
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn ant(&self) -> Ant {
        self.ant
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
}
