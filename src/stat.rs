use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub cost: usize,
    pub path_len: usize,
    pub time_us: usize,
    pub expanded_nodes: usize,
    pub pushed_nodes: usize,
    pub decreased_keys: usize,
}

impl Stats {
    pub fn print(&self) {
        info!(
            "Cost {:?} Path length {:?} Time(microseconds) {:?} Expanded nodes {:?} Pushed nodes {:?} Decreased keys {:?}",
            self.cost, self.path_len, self.time_us, self.expanded_nodes, self.pushed_nodes, self.decreased_keys
        );
    }
}
