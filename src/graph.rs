/*
Undirected grid graph over the pixels of a width x height image.

Vertex ids are flattened coordinates (y * width + x). Each vertex owns one adjacency row; add_edge always writes
both directions, so the rows stay symmetric. Edge weights are not stored: they come from the intensity buffer
at traversal time (see intensity_weight), so one graph can be reused against a buffer that changes.
*/

use crate::error::GraphError;

pub type VertexId = usize;
pub type Distance = u64;

/// Distance of a vertex the source cannot reach.
pub const UNREACHABLE: Distance = Distance::MAX;

/// Formats a distance for text output, `inf` for unreachable vertices.
pub fn display_distance(d: Distance) -> String {
    if d == UNREACHABLE {
        String::from("inf")
    } else {
        d.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    width: usize,
    height: usize,
    adjacency: Vec<Vec<VertexId>>,
}

impl Graph {
    /// Allocates one empty adjacency row per pixel.
    pub fn new(width: usize, height: usize) -> Result<Self, GraphError> {
        let n = width
            .checked_mul(height)
            .filter(|&n| n > 0)
            .ok_or(GraphError::InvalidDimensions { width, height })?;

        Ok(Self {
            width,
            height,
            adjacency: vec![Vec::new(); n],
        })
    }

    /// 4-connected grid: each pixel links to its right and bottom neighbours, once per pair.
    pub fn grid(width: usize, height: usize) -> Result<Self, GraphError> {
        let mut graph = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                let u = y * width + x;
                if x + 1 < width {
                    graph.link(u, u + 1);
                }
                if y + 1 < height {
                    graph.link(u, u + width);
                }
            }
        }
        Ok(graph)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges, duplicates included.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Adds the undirected edge u-v. Adding the same pair twice leaves a parallel edge.
    pub fn add_edge(&mut self, u: VertexId, v: VertexId) -> Result<(), GraphError> {
        self.check(u)?;
        self.check(v)?;
        self.link(u, v);
        Ok(())
    }

    fn link(&mut self, u: VertexId, v: VertexId) {
        self.adjacency[u].push(v);
        self.adjacency[v].push(u);
    }

    pub fn neighbors(&self, v: VertexId) -> &[VertexId] {
        &self.adjacency[v]
    }

    pub fn vertex_at(&self, x: usize, y: usize) -> Option<VertexId> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    pub fn coords(&self, v: VertexId) -> (usize, usize) {
        (v % self.width, v / self.width)
    }

    /// Validates a raw (possibly negative) vertex id coming from outside the graph.
    pub fn vertex(&self, raw: i64) -> Result<VertexId, GraphError> {
        usize::try_from(raw)
            .ok()
            .filter(|&v| v < self.vertex_count())
            .ok_or(GraphError::VertexOutOfRange {
                vertex: raw,
                vertices: self.vertex_count(),
            })
    }

    fn check(&self, v: VertexId) -> Result<(), GraphError> {
        if v < self.vertex_count() {
            Ok(())
        } else {
            Err(GraphError::VertexOutOfRange {
                vertex: i64::try_from(v).unwrap_or(i64::MAX),
                vertices: self.vertex_count(),
            })
        }
    }
}

/// Absolute intensity difference between two pixels.
pub fn intensity_weight(intensity: &[u8], u: VertexId, v: VertexId) -> Distance {
    Distance::from(intensity[u].abs_diff(intensity[v]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_dimensions() {
        assert_eq!(
            Graph::new(0, 4),
            Err(GraphError::InvalidDimensions {
                width: 0,
                height: 4
            })
        );
        assert!(Graph::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn add_edge_is_symmetric() {
        let mut graph = Graph::new(3, 2).unwrap();
        graph.add_edge(0, 4).unwrap();
        graph.add_edge(5, 1).unwrap();
        for u in 0..graph.vertex_count() {
            for &v in graph.neighbors(u) {
                assert!(graph.neighbors(v).contains(&u), "{v} missing back-edge to {u}");
            }
        }
        assert_eq!(graph.neighbors(0), &[4]);
        assert_eq!(graph.neighbors(4), &[0]);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn duplicate_edges_are_kept() {
        let mut graph = Graph::new(2, 1).unwrap();
        graph.add_edge(0, 1).unwrap();
        graph.add_edge(0, 1).unwrap();
        assert_eq!(graph.neighbors(0), &[1, 1]);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn add_edge_rejects_out_of_range() {
        let mut graph = Graph::new(2, 2).unwrap();
        assert_eq!(
            graph.add_edge(0, 4),
            Err(GraphError::VertexOutOfRange {
                vertex: 4,
                vertices: 4
            })
        );
        // Nothing was linked before the error.
        assert!(graph.neighbors(0).is_empty());
    }

    #[test]
    fn grid_is_four_connected() {
        let graph = Graph::grid(3, 3).unwrap();
        // 2 * 3 horizontal + 3 * 2 vertical pairs.
        assert_eq!(graph.edge_count(), 12);
        let mut centre = graph.neighbors(4).to_vec();
        centre.sort();
        assert_eq!(centre, vec![1, 3, 5, 7]);
        let mut corner = graph.neighbors(0).to_vec();
        corner.sort();
        assert_eq!(corner, vec![1, 3]);
    }

    #[test]
    fn single_pixel_grid_has_no_edges() {
        let graph = Graph::grid(1, 1).unwrap();
        assert_eq!(graph.vertex_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn coordinates_round_trip() {
        let graph = Graph::new(4, 3).unwrap();
        assert_eq!(graph.vertex_at(3, 2), Some(11));
        assert_eq!(graph.coords(11), (3, 2));
        assert_eq!(graph.vertex_at(4, 0), None);
    }

    #[test]
    fn raw_vertex_validation() {
        let graph = Graph::new(2, 2).unwrap();
        assert_eq!(graph.vertex(3), Ok(3));
        assert!(graph.vertex(-1).is_err());
        assert!(graph.vertex(4).is_err());
    }

    #[test]
    fn unreachable_displays_as_inf() {
        assert_eq!(display_distance(UNREACHABLE), "inf");
        assert_eq!(display_distance(42), "42");
    }

    #[test]
    fn weight_is_absolute_difference() {
        let buf = [10u8, 250, 0];
        assert_eq!(intensity_weight(&buf, 0, 1), 240);
        assert_eq!(intensity_weight(&buf, 1, 0), 240);
        assert_eq!(intensity_weight(&buf, 2, 1), 250);
    }
}
