use crate::schedule::{DanglingDependencyPolicy, ScheduleError, ScheduleOptions};
use crate::task::Task;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// Dependency DAG over a task list. Node weights are positions into the
/// originating slice, so pass results can live in plain vectors indexed
/// the same way.
pub struct TaskDag {
    pub graph: DiGraph<usize, ()>,
    pub id_to_index: HashMap<String, NodeIndex>,
}

impl TaskDag {
    /// Build the DAG for a task list. Dependencies that name no task in
    /// the list are an error unless the options ask to ignore them.
    pub fn build(tasks: &[Task], options: &ScheduleOptions) -> Result<Self, ScheduleError> {
        let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(tasks.len(), tasks.len());
        let mut id_to_index: HashMap<String, NodeIndex> = HashMap::with_capacity(tasks.len());

        // Add nodes first
        for (position, task) in tasks.iter().enumerate() {
            let node_ix = graph.add_node(position);
            id_to_index.insert(task.id.clone(), node_ix);
        }

        // Add edges: dependency -> task
        for (position, task) in tasks.iter().enumerate() {
            let task_ix = NodeIndex::new(position);
            let mut linked: HashSet<&str> = HashSet::with_capacity(task.dependencies.len());
            for dependency in &task.dependencies {
                if !linked.insert(dependency.as_str()) {
                    // Repeated reference to the same task adds no constraint.
                    continue;
                }
                match id_to_index.get(dependency) {
                    Some(&dependency_ix) => {
                        graph.add_edge(dependency_ix, task_ix, ());
                    }
                    None => match options.dangling_dependencies {
                        DanglingDependencyPolicy::Error => {
                            return Err(ScheduleError::UnknownDependency {
                                task_id: task.id.clone(),
                                dependency: dependency.clone(),
                            });
                        }
                        DanglingDependencyPolicy::Ignore => {}
                    },
                }
            }
        }

        Ok(Self { graph, id_to_index })
    }

    /// Topological order over the DAG as task positions. A cycle is
    /// reported with the id of a task on it.
    pub fn topo_order(&self, tasks: &[Task]) -> Result<Vec<usize>, ScheduleError> {
        let order = toposort(&self.graph, None).map_err(|cycle| {
            let position = self.graph[cycle.node_id()];
            ScheduleError::CycleDetected {
                task_id: tasks[position].id.clone(),
            }
        })?;
        Ok(order.into_iter().map(|node_ix| self.graph[node_ix]).collect())
    }
}
