//! Node and edge storage
//!
//! [`GraphStore`] is the authoritative set of nodes and edges for a
//! visualization. Its shape (node set, edge list, adjacency) is fixed when it
//! is built; afterwards only positions, force accumulators and the write-once
//! textures change.

use std::collections::{BTreeSet, HashMap};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{VizError, VizResult};
use crate::math::{self, Vec3};

/// Opaque handle to a texture owned by the draw backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// A graph vertex with its simulation state
#[derive(Debug, Clone)]
pub struct Node {
    /// Stable identifier (application name)
    pub id: String,
    /// Position in 3D space
    pub position: Vec3,
    /// Force accumulated during the current substep
    pub force: Vec3,
    neighbors: BTreeSet<usize>,
    texture: Option<TextureHandle>,
}

impl Node {
    fn new(id: String, position: Vec3) -> Self {
        Self {
            id,
            position,
            force: [0.0; 3],
            neighbors: BTreeSet::new(),
            texture: None,
        }
    }

    /// Indices of the nodes this node has a relation to
    pub fn neighbors(&self) -> impl Iterator<Item = usize> + '_ {
        self.neighbors.iter().copied()
    }

    pub fn is_related_to(&self, other: usize) -> bool {
        self.neighbors.contains(&other)
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }
}

/// An undirected relation between two nodes (indices into the node list)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
}

/// Authoritative node and edge store
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_id_to_index: HashMap<String, usize>,
}

impl GraphStore {
    /// Build a store from positioned nodes and an edge list of node ids.
    ///
    /// Adjacency is derived from the edges and is symmetric. Duplicate edges
    /// are kept in the edge list.
    pub fn build<N, E, S>(nodes: N, edges: E) -> VizResult<Self>
    where
        N: IntoIterator<Item = (String, Vec3)>,
        E: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut store = Self::default();

        for (id, position) in nodes {
            if store.node_id_to_index.contains_key(&id) {
                return Err(VizError::DuplicateNode(id));
            }
            store.node_id_to_index.insert(id.clone(), store.nodes.len());
            store.nodes.push(Node::new(id, position));
        }

        for (a, b) in edges {
            let a = store.require(a.as_ref())?;
            let b = store.require(b.as_ref())?;
            store.nodes[a].neighbors.insert(b);
            store.nodes[b].neighbors.insert(a);
            store.edges.push(Edge { a, b });
        }

        Ok(store)
    }

    fn require(&self, id: &str) -> VizResult<usize> {
        self.index_of(id)
            .ok_or_else(|| VizError::UnknownNode(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.node_id_to_index.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    /// Whether two nodes share at least one edge
    pub fn are_related(&self, a: usize, b: usize) -> bool {
        self.nodes.get(a).is_some_and(|n| n.is_related_to(b))
    }

    /// Attach a texture to a node. Textures are write-once.
    pub fn set_texture(&mut self, id: &str, texture: TextureHandle) -> VizResult<()> {
        let index = self.require(id)?;
        let node = &mut self.nodes[index];
        if node.texture.is_some() {
            return Err(VizError::TextureAlreadySet(id.to_string()));
        }
        node.texture = Some(texture);
        Ok(())
    }

    /// Number of nodes with a texture attached
    pub fn textured_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.texture.is_some()).count()
    }

    /// Arithmetic mean of all node positions (origin for an empty store)
    pub fn centroid(&self) -> Vec3 {
        if self.nodes.is_empty() {
            return [0.0; 3];
        }
        let sum = self
            .nodes
            .iter()
            .fold([0.0; 3], |acc, n| math::add(acc, n.position));
        math::scale(sum, 1.0 / self.nodes.len() as f32)
    }
}

/// Scatter `count` points at distance `spread` from the origin in uniformly
/// random directions.
///
/// A fixed `seed` reproduces the same layout; `None` draws from entropy.
pub fn scatter_positions(count: usize, spread: f32, seed: Option<u64>) -> Vec<Vec3> {
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    (0..count)
        .map(|_| {
            // Uniform direction on the sphere
            let theta = rng.gen_range(0.0..std::f32::consts::TAU);
            let z: f32 = rng.gen_range(-1.0..=1.0);
            let ring = (1.0 - z * z).sqrt();
            [
                ring * theta.cos() * spread,
                ring * theta.sin() * spread,
                z * spread,
            ]
        })
        .collect()
}
