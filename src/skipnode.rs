//! Nodes of the skipmap and the arena which owns them.
//!
//! The map never hands out references into the node graph; instead every
//! `next` and `below` link is a [`NodeId`] into a single [`Arena`]. The arena
//! owns all nodes, and since keys are never removed, every id it issues stays
//! valid for the lifetime of the arena.

use std::ops::{Index, IndexMut};

/// Index of a node within its [`Arena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

// ////////////////////////////////////////////////////////////////////////////
// SkipNode
// ////////////////////////////////////////////////////////////////////////////

/// One key of the map at one level.
///
/// A key promoted to level `n` is represented by `n + 1` nodes, one per level,
/// each linked to the node beneath it through `below`. Only the level-0 node
/// carries the value; the nodes above it hold an empty value.
#[derive(Clone, Debug, Default)]
pub(crate) struct SkipNode {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
    // The following node on the same level.
    pub next: Option<NodeId>,
    // The node with the same key one level down. Always `None` on level 0.
    pub below: Option<NodeId>,
}

impl SkipNode {
    /// Create a new level-0 node.
    pub fn new(key: Vec<u8>, value: Vec<u8>, next: Option<NodeId>) -> Self {
        SkipNode {
            key,
            value,
            next,
            below: None,
        }
    }

    /// Create a node above `below`, holding `key` but no value.
    pub fn tower(key: Vec<u8>, below: NodeId, next: Option<NodeId>) -> Self {
        SkipNode {
            key,
            value: Vec::new(),
            next,
            below: Some(below),
        }
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Arena
// ////////////////////////////////////////////////////////////////////////////

/// Owner of every node of a map.
#[derive(Clone, Debug, Default)]
pub(crate) struct Arena {
    nodes: Vec<SkipNode>,
}

impl Arena {
    pub fn new() -> Self {
        Arena::default()
    }

    /// Move `node` into the arena, returning its id.
    pub fn push(&mut self, node: SkipNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Total number of nodes across all levels.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over a level, starting at `front` and following `next` links.
    pub fn walk(&self, front: NodeId) -> Walk<'_> {
        Walk {
            arena: self,
            current: Some(front),
        }
    }
}

impl Index<NodeId> for Arena {
    type Output = SkipNode;

    #[expect(
        clippy::indexing_slicing,
        reason = "Ids are only ever issued by `push` and nodes are never removed"
    )]
    fn index(&self, id: NodeId) -> &SkipNode {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for Arena {
    #[expect(
        clippy::indexing_slicing,
        reason = "Ids are only ever issued by `push` and nodes are never removed"
    )]
    fn index_mut(&mut self, id: NodeId) -> &mut SkipNode {
        &mut self.nodes[id.0]
    }
}

/// Iterator over the ids of one level, as returned by [`Arena::walk`].
pub(crate) struct Walk<'a> {
    arena: &'a Arena,
    current: Option<NodeId>,
}

impl Iterator for Walk<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.arena[id].next;
        Some(id)
    }
}
