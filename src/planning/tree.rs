//! Search tree storage shared by the tree-growing planners.
//!
//! Nodes are never physically deleted; removal marks a node (and its
//! subtree) so indices stay stable for concurrent workers. Live nodes are
//! also kept in an R-tree over their planar position for nearest-neighbor
//! queries.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::core::Pose2D;

use super::state_space::BoundedStateSpace;

/// A tree node.
#[derive(Clone, Copy, Debug)]
pub struct Node {
    pub state: Pose2D,
    pub parent: Option<usize>,
    /// The motion from the parent has been checked.
    pub validated: bool,
    pub removed: bool,
}

/// Planar position of a live node for R-tree storage.
#[derive(Clone, Copy, Debug, PartialEq)]
struct IndexedNode {
    position: [f64; 2],
    id: usize,
}

impl IndexedNode {
    fn new(state: &Pose2D, id: usize) -> Self {
        Self {
            position: [state.x, state.y],
            id,
        }
    }
}

impl RTreeObject for IndexedNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Tree rooted at a single state.
#[derive(Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    index: RTree<IndexedNode>,
}

impl Tree {
    /// Create a tree containing only `root`.
    pub fn new(root: Pose2D) -> Self {
        let mut index = RTree::new();
        index.insert(IndexedNode::new(&root, 0));
        Self {
            nodes: vec![Node {
                state: root,
                parent: None,
                validated: true,
                removed: false,
            }],
            index,
        }
    }

    /// Number of nodes that have not been removed.
    #[inline]
    pub fn len(&self) -> usize {
        self.index.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.size() == 0
    }

    #[inline]
    pub fn node(&self, id: usize) -> &Node {
        &self.nodes[id]
    }

    #[inline]
    pub fn state(&self, id: usize) -> Pose2D {
        self.nodes[id].state
    }

    /// Add a node below `parent`, returning its id.
    pub fn add(&mut self, state: Pose2D, parent: usize, validated: bool) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node {
            state,
            parent: Some(parent),
            validated,
            removed: false,
        });
        self.index.insert(IndexedNode::new(&state, id));
        id
    }

    pub fn mark_validated(&mut self, id: usize) {
        self.nodes[id].validated = true;
    }

    /// Live node closest to `target` under the state space metric.
    ///
    /// Candidates come from the R-tree in planar order. The metric never
    /// falls below the planar distance, so the walk stops once the planar
    /// distance alone exceeds the best match. Ties go to the lowest id.
    pub fn nearest(&self, space: &BoundedStateSpace, target: &Pose2D) -> Option<usize> {
        let mut best: Option<(f64, usize)> = None;

        for (candidate, planar_2) in self
            .index
            .nearest_neighbor_iter_with_distance_2(&[target.x, target.y])
        {
            if let Some((best_distance, _)) = best
                && planar_2.sqrt() > best_distance
            {
                break;
            }

            let distance = space.distance(&self.nodes[candidate.id].state, target);
            let better = best.is_none_or(|(best_distance, best_id)| {
                distance < best_distance || (distance == best_distance && candidate.id < best_id)
            });
            if better {
                best = Some((distance, candidate.id));
            }
        }

        best.map(|(_, id)| id)
    }

    /// Node ids from the root down to `id`.
    pub fn branch(&self, id: usize) -> Vec<usize> {
        let mut ids = vec![id];
        let mut current = id;
        while let Some(parent) = self.nodes[current].parent {
            ids.push(parent);
            current = parent;
        }
        ids.reverse();
        ids
    }

    /// States from the root down to `id`.
    pub fn path_to(&self, id: usize) -> Vec<Pose2D> {
        self.branch(id).into_iter().map(|i| self.nodes[i].state).collect()
    }

    /// Remove `id` and every descendant; returns the removed ids.
    ///
    /// The root is never removed.
    pub fn remove_subtree(&mut self, id: usize) -> Vec<usize> {
        if self.nodes[id].parent.is_none() || self.nodes[id].removed {
            return Vec::new();
        }

        let mut removed = vec![id];
        self.nodes[id].removed = true;

        // Children always have larger ids than their parents
        for child in (id + 1)..self.nodes.len() {
            if let Some(parent) = self.nodes[child].parent
                && self.nodes[parent].removed
                && !self.nodes[child].removed
            {
                self.nodes[child].removed = true;
                removed.push(child);
            }
        }

        for &gone in &removed {
            self.index.remove(&IndexedNode::new(&self.nodes[gone].state, gone));
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EnvironmentBounds;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn space() -> BoundedStateSpace {
        BoundedStateSpace::new(EnvironmentBounds::new(0.0, 10.0, 0.0, 10.0))
    }

    #[test]
    fn test_nearest_and_path() {
        let mut tree = Tree::new(Pose2D::new(0.0, 0.0, 0.0));
        let a = tree.add(Pose2D::new(1.0, 0.0, 0.0), 0, true);
        let b = tree.add(Pose2D::new(2.0, 0.0, 0.0), a, true);
        let c = tree.add(Pose2D::new(0.0, 3.0, 0.0), 0, true);

        assert_eq!(tree.nearest(&space(), &Pose2D::new(2.2, 0.1, 0.0)), Some(b));
        assert_eq!(tree.nearest(&space(), &Pose2D::new(0.1, 2.5, 0.0)), Some(c));

        let path = tree.path_to(b);
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], Pose2D::new(0.0, 0.0, 0.0));
        assert_eq!(path[2], Pose2D::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_nearest_accounts_for_heading() {
        let mut tree = Tree::new(Pose2D::new(0.0, 0.0, 0.0));
        // Planar closest, but facing the other way
        let turned = tree.add(Pose2D::new(1.0, 0.0, std::f64::consts::PI), 0, true);
        let aligned = tree.add(Pose2D::new(1.4, 0.0, 0.0), 0, true);

        let target = Pose2D::new(1.0, 0.0, 0.0);
        assert_eq!(tree.nearest(&space(), &target), Some(aligned));
        assert_ne!(tree.nearest(&space(), &target), Some(turned));
    }

    #[test]
    fn test_nearest_matches_exhaustive_search() {
        let space = space();
        let mut rng = StdRng::seed_from_u64(11);
        let mut tree = Tree::new(Pose2D::new(5.0, 5.0, 0.0));

        for _ in 0..300 {
            let state = space.sample_uniform(&mut rng);
            let parent = rng.random_range(0..tree.nodes.len());
            tree.add(state, parent, true);
        }
        tree.remove_subtree(17);
        tree.remove_subtree(120);

        for _ in 0..200 {
            let target = space.sample_uniform(&mut rng);
            let expected = tree
                .nodes
                .iter()
                .enumerate()
                .filter(|(_, node)| !node.removed)
                .map(|(id, node)| (id, space.distance(&node.state, &target)))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(id, _)| id);
            assert_eq!(tree.nearest(&space, &target), expected);
        }
    }

    #[test]
    fn test_remove_subtree() {
        let mut tree = Tree::new(Pose2D::new(0.0, 0.0, 0.0));
        let a = tree.add(Pose2D::new(1.0, 0.0, 0.0), 0, false);
        let b = tree.add(Pose2D::new(2.0, 0.0, 0.0), a, false);
        let c = tree.add(Pose2D::new(0.0, 3.0, 0.0), 0, false);
        let d = tree.add(Pose2D::new(3.0, 0.0, 0.0), b, false);

        let removed = tree.remove_subtree(a);
        assert_eq!(removed, vec![a, b, d]);
        assert_eq!(tree.len(), 2);
        assert!(!tree.node(c).removed);

        // Removed nodes are skipped by nearest-neighbor queries
        assert_eq!(tree.nearest(&space(), &Pose2D::new(3.0, 0.0, 0.0)), Some(0));

        // The root is never removed
        assert!(tree.remove_subtree(0).is_empty());
    }
}
