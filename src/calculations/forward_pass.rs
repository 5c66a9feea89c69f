use crate::graph::task_dag::TaskDag;
use crate::task::Task;
use petgraph::Direction;
use petgraph::graph::NodeIndex;

/// Forward pass of the critical path method: walks the DAG in
/// topological order and computes earliest start/finish offsets.
pub struct ForwardPass<'a> {
    tasks: &'a [Task],
    dag: &'a TaskDag,
}

impl<'a> ForwardPass<'a> {
    pub fn new(tasks: &'a [Task], dag: &'a TaskDag) -> Self {
        Self { tasks, dag }
    }

    /// Earliest (start, finish) offsets per task, indexed by input
    /// position. `order` must be a topological order over the DAG.
    pub fn execute(&self, order: &[usize]) -> Vec<(f64, f64)> {
        let mut earliest = vec![(0.0, 0.0); self.tasks.len()];

        for &position in order {
            let node_ix = NodeIndex::new(position);
            let mut earliest_start: f64 = 0.0;
            for dependency_ix in self.dag.graph.neighbors_directed(node_ix, Direction::Incoming) {
                let dependency_position = self.dag.graph[dependency_ix];
                let (_, dependency_finish) = earliest[dependency_position];
                if dependency_finish > earliest_start {
                    earliest_start = dependency_finish;
                }
            }
            let earliest_finish = earliest_start + self.tasks[position].duration_days;
            earliest[position] = (earliest_start, earliest_finish);
        }

        earliest
    }
}
