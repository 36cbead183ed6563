//! Static graph model: nodes, weighted directed arcs, and the structural
//! neighborhood used by the relocation moves.

use crate::error::ModelError;
use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;

/// Identifies a node of the propagation graph.
///
/// Keys are opaque to the search: any hashable, ordered value works. The
/// ordering only serves deterministic tie-breaking. `nearby` defines the
/// structural "nodes close to this one" relation that the relocation
/// neighborhood of the local search is built from; keys returned here that
/// are not part of the graph are ignored.
pub trait NodeKey: Clone + Eq + Hash + Ord + fmt::Debug {
    /// Keys structurally adjacent to this one.
    fn nearby(&self) -> Vec<Self>;
}

/// A cell of a rectangular grid, the usual node key for fire instances.
///
/// Structural adjacency is 8-connected: the four orthogonal and four
/// diagonal neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

impl NodeKey for Cell {
    fn nearby(&self) -> Vec<Self> {
        let mut out = Vec::with_capacity(8);
        for dr in -1..=1 {
            for dc in -1..=1 {
                if dr != 0 || dc != 0 {
                    out.push(Cell::new(self.row + dr, self.col + dc));
                }
            }
        }
        out
    }
}

/// Immutable directed graph with non-negative base arc weights.
///
/// Construction resolves node keys to dense indices once; the search and the
/// propagation engine work on indices throughout. At most one arc may exist
/// per ordered (tail, head) pair.
#[derive(Debug, Clone)]
pub struct FireGraph<N> {
    nodes: Vec<N>,
    index: FxHashMap<N, usize>,
    out: Vec<Vec<(usize, f64)>>,
    nearby: Vec<Vec<usize>>,
    arc_count: usize,
}

impl<N: NodeKey> FireGraph<N> {
    /// Builds a graph from a node set and weighted arcs.
    ///
    /// Rejects duplicate nodes, arcs with unknown endpoints, duplicate
    /// (tail, head) pairs, and negative or non-finite weights.
    pub fn new(
        nodes: impl IntoIterator<Item = N>,
        arcs: impl IntoIterator<Item = (N, N, f64)>,
    ) -> Result<Self, ModelError> {
        let nodes: Vec<N> = nodes.into_iter().collect();
        let mut index = FxHashMap::default();
        for (i, n) in nodes.iter().enumerate() {
            if index.insert(n.clone(), i).is_some() {
                return Err(ModelError::DuplicateNode(format!("{n:?}")));
            }
        }

        let mut out: Vec<Vec<(usize, f64)>> = vec![Vec::new(); nodes.len()];
        let mut arc_count = 0;
        for (tail, head, weight) in arcs {
            let &u = index
                .get(&tail)
                .ok_or_else(|| ModelError::UnknownNode(format!("{tail:?}")))?;
            let &v = index
                .get(&head)
                .ok_or_else(|| ModelError::UnknownNode(format!("{head:?}")))?;
            if !weight.is_finite() || weight < 0.0 {
                return Err(ModelError::InvalidWeight {
                    arc: format!("{tail:?} -> {head:?}"),
                    weight,
                });
            }
            if out[u].iter().any(|&(w, _)| w == v) {
                return Err(ModelError::DuplicateArc(format!("{tail:?} -> {head:?}")));
            }
            out[u].push((v, weight));
            arc_count += 1;
        }

        // Resolve each node's structural neighborhood to indices up front.
        let nearby = nodes
            .iter()
            .map(|n| {
                let mut ids: Vec<usize> = n
                    .nearby()
                    .iter()
                    .filter_map(|k| index.get(k).copied())
                    .collect();
                ids.sort_unstable();
                ids.dedup();
                ids
            })
            .collect();

        Ok(Self {
            nodes,
            index,
            out,
            nearby,
            arc_count,
        })
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of arcs.
    pub fn arc_count(&self) -> usize {
        self.arc_count
    }

    /// The key of the node at `idx`.
    pub fn node(&self, idx: usize) -> &N {
        &self.nodes[idx]
    }

    /// The dense index of a key, if it is part of the graph.
    pub fn index_of(&self, key: &N) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Indices of nodes structurally near the node at `idx`.
    pub fn nearby(&self, idx: usize) -> &[usize] {
        &self.nearby[idx]
    }

    /// Outgoing arcs of the node at `idx` as (head index, base weight).
    pub fn out_arcs(&self, idx: usize) -> &[(usize, f64)] {
        &self.out[idx]
    }
}

impl FireGraph<Cell> {
    /// Builds a `rows x cols` grid with arcs in both directions between all
    /// 8-connected cell pairs, `straight` weight for orthogonal arcs and
    /// `diagonal` weight for diagonal arcs.
    pub fn grid(rows: i32, cols: i32, straight: f64, diagonal: f64) -> Result<Self, ModelError> {
        let mut nodes = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                nodes.push(Cell::new(r, c));
            }
        }
        let in_bounds = |cell: &Cell| {
            cell.row >= 0 && cell.row < rows && cell.col >= 0 && cell.col < cols
        };
        let mut arcs = Vec::new();
        for n in &nodes {
            for m in n.nearby() {
                if in_bounds(&m) {
                    let weight = if m.row == n.row || m.col == n.col {
                        straight
                    } else {
                        diagonal
                    };
                    arcs.push((*n, m, weight));
                }
            }
        }
        Self::new(nodes, arcs)
    }
}
