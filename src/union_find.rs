//! Disjoint-set forest keyed by arbitrary ids.
//!
//! `find` compresses paths and `union` links by rank. Ids that were never
//! inserted are registered as singletons the first time they are looked up.

use hashbrown::HashMap;
use std::hash::Hash;

#[derive(Clone, Debug, Default)]
pub struct UnionFind<K> {
    parent: HashMap<K, K>,
    rank: HashMap<K, u32>,
}

impl<K: Clone + Eq + Hash> UnionFind<K> {
    pub fn new() -> Self {
        Self {
            parent: HashMap::new(),
            rank: HashMap::new(),
        }
    }

    /// Registers `id` as its own component unless it is already known.
    pub fn insert(&mut self, id: K) {
        if !self.parent.contains_key(&id) {
            self.parent.insert(id.clone(), id.clone());
            self.rank.insert(id, 0);
        }
    }

    /// Number of ids seen so far.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn find(&mut self, id: &K) -> K {
        self.insert(id.clone());

        let mut root = id.clone();
        while let Some(parent) = self.parent.get(&root).filter(|&p| p != &root) {
            root = parent.clone();
        }

        // Point every node on the walk straight at the root.
        let mut node = id.clone();
        while node != root {
            let next = self.parent.insert(node, root.clone());
            match next {
                Some(next) => node = next,
                None => break,
            }
        }

        root
    }

    /// Merges the components of `a` and `b`. Returns false if they were already joined.
    pub fn union(&mut self, a: &K, b: &K) -> bool {
        let mut a = self.find(a);
        let mut b = self.find(b);
        if a == b {
            return false;
        }
        let rank_a = self.rank[&a];
        let rank_b = self.rank[&b];
        if rank_a < rank_b {
            std::mem::swap(&mut a, &mut b);
        }
        if rank_a == rank_b {
            self.rank.insert(a.clone(), rank_a.saturating_add(1));
        }
        self.parent.insert(b, a);
        true
    }

    pub fn connected(&mut self, a: &K, b: &K) -> bool {
        self.find(a) == self.find(b)
    }

    /// Number of disjoint components among the ids seen so far.
    pub fn component_count(&self) -> usize {
        self.parent.iter().filter(|(id, parent)| id == parent).count()
    }
}
