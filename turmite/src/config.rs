use crate::{
    error::Error, rule::RuleTable, sim::Simulation, topology::Topology, turmite::Turmite,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimConfig {
    pub rule: String,
    pub topology: Topology,
    pub step_limit: Option<u64>,
    /// Steps between progress callbacks. 0 disables them.
    pub progress_interval: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rule: "RL".to_owned(),
            topology: Topology::Square,
            step_limit: None,
            progress_interval: 10_000,
        }
    }
}

impl SimConfig {
    pub fn new(rule: impl Into<String>, topology: Topology) -> Self {
        Self {
            rule: rule.into(),
            topology,
            ..Self::default()
        }
    }

    pub fn build(&self) -> Result<Simulation, Error> {
        let rules = RuleTable::parse(&self.rule, self.topology)?;
        log::info!(
            "{} grid, rule {:?}: {} states x {} colours",
            self.topology,
            self.rule,
            rules.states(),
            rules.colors()
        );
        let turmite = Turmite::new(rules);
        Ok(Simulation::new(
            turmite,
            self.step_limit,
            self.progress_interval,
        ))
    }
}
