use crate::graph::task_dag::TaskDag;
use crate::task::Task;
use petgraph::Direction;
use petgraph::graph::NodeIndex;

/// Backward pass of the critical path method: walks the DAG in reverse
/// topological order and computes latest start/finish offsets.
pub struct BackwardPass<'a> {
    tasks: &'a [Task],
    dag: &'a TaskDag,
}

impl<'a> BackwardPass<'a> {
    pub fn new(tasks: &'a [Task], dag: &'a TaskDag) -> Self {
        Self { tasks, dag }
    }

    /// Latest (start, finish) offsets per task, indexed by input
    /// position. Tasks with no successors anchor at `project_duration`.
    pub fn execute(&self, order: &[usize], project_duration: f64) -> Vec<(f64, f64)> {
        let mut latest = vec![(0.0, 0.0); self.tasks.len()];

        for &position in order.iter().rev() {
            let node_ix = NodeIndex::new(position);
            let mut latest_finish = project_duration;
            for successor_ix in self.dag.graph.neighbors_directed(node_ix, Direction::Outgoing) {
                let successor_position = self.dag.graph[successor_ix];
                let (successor_start, _) = latest[successor_position];
                if successor_start < latest_finish {
                    latest_finish = successor_start;
                }
            }
            let latest_start = latest_finish - self.tasks[position].duration_days;
            latest[position] = (latest_start, latest_finish);
        }

        latest
    }
}
