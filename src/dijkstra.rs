use log::debug;

use crate::error::GraphError;
use crate::graph::{intensity_weight, Distance, Graph, VertexId, UNREACHABLE};
use crate::keyed_queue::KeyedQueue;
use crate::min_queue::{HeapQueue, MinQueue, SortedQueue};
use crate::tree_queue::TreeQueue;

/// Dijkstra from `source` to all vertices. Returns distances, `UNREACHABLE` when a vertex cannot be reached.
///
/// `weight(u, v)` is evaluated each time the edge u-v is relaxed. Entries popped for an already settled vertex
/// are stale and skipped.
pub fn dijkstra_with<Q, W>(graph: &Graph, source: VertexId, mut queue: Q, weight: W) -> Vec<Distance>
where
    Q: MinQueue<Distance, VertexId>,
    W: Fn(VertexId, VertexId) -> Distance,
{
    let n = graph.vertex_count();
    let mut dist = vec![UNREACHABLE; n];
    let mut visited = vec![false; n];
    let mut stale = 0usize;

    dist[source] = 0;
    queue.push(0, source);

    while let Some((_, current)) = queue.pop() {
        if visited[current] {
            stale += 1;
            continue;
        }
        visited[current] = true;

        for &next in graph.neighbors(current) {
            let next_cost = dist[current] + weight(current, next);
            if next_cost < dist[next] {
                dist[next] = next_cost;
                queue.push(next_cost, next);
            }
        }
    }

    debug!(
        "dijkstra from {}: settled {} of {} vertices, skipped {} stale entries",
        source,
        visited.iter().filter(|&&v| v).count(),
        n,
        stale
    );
    dist
}

impl Graph {
    /// Shortest intensity-difference distances from `source`, using the binary-heap queue.
    ///
    /// Fails before doing any work when `source` is outside `[0, width*height)` or when `intensity` does not
    /// hold exactly one value per vertex.
    pub fn dijkstra(&self, source: i64, intensity: &[u8]) -> Result<Vec<Distance>, GraphError> {
        QueueKind::Heap.run(self, source, intensity)
    }

    fn check_buffer(&self, intensity: &[u8]) -> Result<(), GraphError> {
        if intensity.len() != self.vertex_count() {
            return Err(GraphError::BufferSizeMismatch {
                expected: self.vertex_count(),
                actual: intensity.len(),
            });
        }
        Ok(())
    }
}

/// Priority-queue backing used by a shortest-path run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum QueueKind {
    /// Binary heap, lazy deletion of stale entries.
    #[default]
    Heap,
    /// Sorted linked sequence, O(n) insertion.
    Sorted,
    /// Indexed binary heap with decrease-key.
    Keyed,
    /// Ordered tree map with decrease-key.
    Tree,
}

impl QueueKind {
    pub fn run(&self, graph: &Graph, source: i64, intensity: &[u8]) -> Result<Vec<Distance>, GraphError> {
        graph.check_buffer(intensity)?;
        let source = graph.vertex(source)?;
        let weight = |u, v| intensity_weight(intensity, u, v);

        Ok(match self {
            QueueKind::Heap => dijkstra_with(graph, source, HeapQueue::new(), weight),
            QueueKind::Sorted => dijkstra_with(graph, source, SortedQueue::new(), weight),
            QueueKind::Keyed => dijkstra_with(graph, source, KeyedQueue::new(), weight),
            QueueKind::Tree => dijkstra_with(graph, source, TreeQueue::new(), weight),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_QUEUES: [QueueKind; 4] = [
        QueueKind::Heap,
        QueueKind::Sorted,
        QueueKind::Keyed,
        QueueKind::Tree,
    ];

    fn square() -> (Graph, Vec<u8>) {
        let mut graph = Graph::new(2, 2).unwrap();
        graph.add_edge(0, 1).unwrap();
        graph.add_edge(0, 2).unwrap();
        graph.add_edge(1, 3).unwrap();
        graph.add_edge(2, 3).unwrap();
        (graph, vec![10, 20, 10, 30])
    }

    // Deterministic pseudo-random pixels.
    fn noise(n: usize, mut state: u32) -> Vec<u8> {
        (0..n)
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                (state >> 16) as u8
            })
            .collect()
    }

    // Bellman-Ford style relaxation to a fixed point; slow but obviously correct.
    fn relax_to_fixed_point(graph: &Graph, source: VertexId, intensity: &[u8]) -> Vec<Distance> {
        let mut dist = vec![UNREACHABLE; graph.vertex_count()];
        dist[source] = 0;
        let mut changed = true;
        while changed {
            changed = false;
            for u in 0..graph.vertex_count() {
                if dist[u] == UNREACHABLE {
                    continue;
                }
                for &v in graph.neighbors(u) {
                    let cand = dist[u] + intensity_weight(intensity, u, v);
                    if cand < dist[v] {
                        dist[v] = cand;
                        changed = true;
                    }
                }
            }
        }
        dist
    }

    #[test]
    fn square_grid_distances() {
        let (graph, buf) = square();
        assert_eq!(graph.dijkstra(0, &buf).unwrap(), vec![0, 10, 0, 20]);
    }

    #[test]
    fn edgeless_graph_reaches_only_source() {
        let graph = Graph::new(3, 2).unwrap();
        let buf = vec![1, 2, 3, 4, 5, 6];
        let dist = graph.dijkstra(4, &buf).unwrap();
        for (v, d) in dist.iter().enumerate() {
            if v == 4 {
                assert_eq!(*d, 0);
            } else {
                assert_eq!(*d, UNREACHABLE);
            }
        }
    }

    #[test]
    fn rejects_out_of_range_source() {
        let (graph, buf) = square();
        assert_eq!(
            graph.dijkstra(-1, &buf),
            Err(GraphError::VertexOutOfRange {
                vertex: -1,
                vertices: 4
            })
        );
        assert_eq!(
            graph.dijkstra(4, &buf),
            Err(GraphError::VertexOutOfRange {
                vertex: 4,
                vertices: 4
            })
        );
    }

    #[test]
    fn rejects_wrong_buffer_length() {
        let (graph, _) = square();
        assert_eq!(
            graph.dijkstra(0, &[1, 2, 3]),
            Err(GraphError::BufferSizeMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn unreachable_component_stays_infinite() {
        let mut graph = Graph::new(4, 1).unwrap();
        graph.add_edge(0, 1).unwrap();
        graph.add_edge(2, 3).unwrap();
        let dist = graph.dijkstra(0, &[0, 5, 9, 9]).unwrap();
        assert_eq!(dist, vec![0, 5, UNREACHABLE, UNREACHABLE]);
    }

    #[test]
    fn duplicate_edges_do_not_change_distances() {
        let (mut graph, buf) = square();
        graph.add_edge(0, 1).unwrap();
        graph.add_edge(2, 3).unwrap();
        assert_eq!(graph.dijkstra(0, &buf).unwrap(), vec![0, 10, 0, 20]);
    }

    #[test]
    fn never_exceeds_literal_path_cost() {
        let graph = Graph::grid(5, 4).unwrap();
        let buf = noise(20, 7);
        let dist = graph.dijkstra(0, &buf).unwrap();
        // Walk along the top row then down the last column.
        let mut path: Vec<VertexId> = (0..5).collect();
        path.extend([9, 14, 19]);
        let mut cost = 0;
        for pair in path.windows(2) {
            cost += intensity_weight(&buf, pair[0], pair[1]);
            assert!(dist[pair[1]] <= cost);
        }
    }

    #[test]
    fn matches_fixed_point_relaxation() {
        for seed in 1..6 {
            let graph = Graph::grid(7, 5).unwrap();
            let buf = noise(35, seed);
            let expected = relax_to_fixed_point(&graph, 17, &buf);
            assert_eq!(graph.dijkstra(17, &buf).unwrap(), expected, "seed {seed}");
        }
    }

    #[test]
    fn every_queue_agrees() {
        let graph = Graph::grid(9, 6).unwrap();
        let buf = noise(54, 42);
        let reference = QueueKind::Heap.run(&graph, 23, &buf).unwrap();
        for kind in ALL_QUEUES {
            assert_eq!(kind.run(&graph, 23, &buf).unwrap(), reference, "{kind:?}");
        }
    }

    #[test]
    fn rebuild_and_rerun_is_idempotent() {
        let buf = noise(30, 3);
        let first = Graph::grid(6, 5).unwrap().dijkstra(11, &buf).unwrap();
        let second = Graph::grid(6, 5).unwrap().dijkstra(11, &buf).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn weights_follow_the_current_buffer() {
        let graph = Graph::grid(3, 1).unwrap();
        let mut buf = vec![0, 100, 200];
        assert_eq!(graph.dijkstra(0, &buf).unwrap(), vec![0, 100, 200]);
        for p in buf.iter_mut() {
            *p /= 2;
        }
        assert_eq!(graph.dijkstra(0, &buf).unwrap(), vec![0, 50, 100]);
    }

    #[test]
    fn uniform_image_is_zero_everywhere() {
        let graph = Graph::grid(4, 4).unwrap();
        let buf = vec![128; 16];
        for kind in ALL_QUEUES {
            assert!(kind.run(&graph, 5, &buf).unwrap().iter().all(|&d| d == 0));
        }
    }
}
