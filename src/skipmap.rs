//! SkipMap stores byte-string key-value pairs, with the keys being unique and
//! always sorted.

use std::{cmp::Ordering, fmt, iter, mem};

use crate::{
    level_generator::{Geometric, LevelGenerator},
    skipnode::{Arena, NodeId, SkipNode},
};

/// Result of the descent performed by [`SkipMap::locate`].
#[derive(Debug, PartialEq, Eq)]
enum Location {
    /// The key is present; this is its level-0 node.
    Found(NodeId),
    /// The key is absent.
    ///
    /// `landing[n]` is the last node on level `n` whose key is less than the
    /// target, or `None` if the target belongs before that level's front. In
    /// particular `landing[0]` is the level-0 predecessor of the key.
    Vacant { landing: Vec<Option<NodeId>> },
}

// ////////////////////////////////////////////////////////////////////////////
// SkipMap
// ////////////////////////////////////////////////////////////////////////////

/// An ordered map from byte strings to byte strings, backed by a skiplist.
///
/// Level 0 is a singly linked list holding every key in lexicographic order;
/// each level above it holds a random subset of the level beneath. Lookups
/// start at the sparsest level and drop down whenever they can no longer
/// advance, giving expected `$O(\log n)$` lookups and insertions without any
/// rebalancing.
///
/// Keys can only be inserted or updated, never removed. The map is intended as
/// the sorted index of a larger storage engine, such as a memtable.
///
/// The coin flips deciding how far each key is promoted come from the
/// [`LevelGenerator`] `G`, which defaults to a fair [`Geometric`] generator.
pub struct SkipMap<G = Geometric> {
    // The first node of every level, indexed by level. Empty iff the map is.
    fronts: Vec<NodeId>,
    nodes: Arena,
    len: usize,
    level_generator: G,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl SkipMap<Geometric> {
    /// Create a new skipmap promoting keys with a fair coin.
    ///
    /// # Examples
    ///
    /// ```
    /// use byteskip::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// assert!(skipmap.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        SkipMap::with_level_generator(Geometric::default())
    }

    /// Constructs a new, empty skipmap whose number of levels is tuned for the
    /// intended capacity.  Specifically, it allows at most
    /// `floor(log2(capacity)) + 1` levels, ensuring that only *a few* keys
    /// occupy the highest level.
    ///
    /// The capacity is only a hint: more keys may be inserted at the cost of
    /// longer scans.
    ///
    /// # Examples
    ///
    /// ```
    /// use byteskip::SkipMap;
    ///
    /// let mut skipmap = SkipMap::with_capacity(100);
    /// skipmap.extend((0..100u32).map(|x| (x.to_be_bytes(), x.to_le_bytes())));
    /// assert!(skipmap.levels() <= 7);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let levels = capacity
            .checked_ilog2()
            .and_then(|bits| usize::try_from(bits).ok())
            .map_or(1, |bits| bits.saturating_add(1));
        SkipMap::with_level_generator(Geometric::new(levels, 0.5).unwrap_or_default())
    }
}

impl<G> SkipMap<G> {
    /// Create a new skipmap using `level_generator` to decide promotions.
    ///
    /// # Examples
    ///
    /// ```
    /// use byteskip::{Geometric, SkipMap};
    ///
    /// let generator = Geometric::with_seed(16, 0.25, 42).unwrap();
    /// let mut skipmap = SkipMap::with_level_generator(generator);
    /// skipmap.insert("key", "value");
    /// assert_eq!(skipmap.find(b"key"), Some(&b"value"[..]));
    /// ```
    #[inline]
    pub fn with_level_generator(level_generator: G) -> Self {
        SkipMap {
            fronts: Vec::new(),
            nodes: Arena::new(),
            len: 0,
            level_generator,
        }
    }

    /// Returns the number of keys in the skipmap.
    ///
    /// # Examples
    ///
    /// ```
    /// use byteskip::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.insert("a", "1");
    /// skipmap.insert("b", "2");
    /// skipmap.insert("a", "3");
    /// assert_eq!(skipmap.len(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the skipmap contains no keys.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of levels currently in use, level 0 included.
    ///
    /// An empty skipmap has no levels.
    #[inline]
    #[must_use]
    pub fn levels(&self) -> usize {
        self.fronts.len()
    }

    /// Returns the value of the given key, or `None` if the key was never
    /// inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use byteskip::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// assert_eq!(skipmap.find(b"a"), None);
    /// skipmap.insert("a", "1");
    /// assert_eq!(skipmap.find(b"a"), Some(&b"1"[..]));
    /// assert_eq!(skipmap.find(b"b"), None);
    /// ```
    #[must_use]
    pub fn find(&self, key: &[u8]) -> Option<&[u8]> {
        if self.fronts.is_empty() {
            return None;
        }
        match self.locate(key) {
            Location::Found(id) => Some(self.nodes[id].value.as_slice()),
            Location::Vacant { .. } => None,
        }
    }

    /// Returns `true` if the skipmap contains the given key.
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.find(key).is_some()
    }

    /// Search for `key`, descending from the top level to level 0.
    ///
    /// Each level is scanned forward for as long as the next key is less than
    /// the target; the node reached is recorded as that level's landing point
    /// before dropping down through `below`. Levels whose front is already
    /// past the target are never entered. Level 0 is then scanned until the
    /// key is matched or overshot.
    fn locate(&self, key: &[u8]) -> Location {
        let mut landing = Vec::with_capacity(self.fronts.len());
        let Some(&base) = self.fronts.first() else {
            return Location::Vacant { landing };
        };

        let mut current: Option<NodeId> = None;
        for &front in self.fronts.iter().skip(1).rev() {
            let mut node = match current {
                Some(node) => node,
                None if key > self.nodes[front].key.as_slice() => front,
                None => {
                    landing.push(None);
                    continue;
                }
            };
            while let Some(next) = self.nodes[node].next {
                if key > self.nodes[next].key.as_slice() {
                    node = next;
                } else {
                    break;
                }
            }
            landing.push(Some(node));
            current = self.nodes[node].below;
        }

        let mut predecessor = None;
        for id in self.nodes.walk(current.unwrap_or(base)) {
            match key.cmp(self.nodes[id].key.as_slice()) {
                Ordering::Equal => return Location::Found(id),
                Ordering::Less => break,
                Ordering::Greater => predecessor = Some(id),
            }
        }
        landing.push(predecessor);
        landing.reverse();
        Location::Vacant { landing }
    }

    /// Insert a new minimum key by rewriting the level-0 front in place.
    ///
    /// The front keeps its identity and takes the new key and value, while
    /// its former contents move to a new node right after it. Returns the
    /// front, which now holds the new key.
    fn rewrite_front(&mut self, front: NodeId, key: Vec<u8>, value: Vec<u8>) -> NodeId {
        let node = &mut self.nodes[front];
        let old_key = mem::replace(&mut node.key, key);
        let old_value = mem::replace(&mut node.value, value);
        let next = node.next;

        let moved = self.nodes.push(SkipNode::new(old_key, old_value, next));
        self.nodes[front].next = Some(moved);

        // If the old minimum was promoted, its level-1 node is level 1's front
        // and must now sit above the node which took over its key.
        if let Some(&upper) = self.fronts.get(1) {
            if self.nodes[upper].below == Some(front) {
                self.nodes[upper].below = Some(moved);
            }
        }
        front
    }

    /// Insert a level-0 node right after `predecessor`.
    fn splice_after(&mut self, predecessor: NodeId, key: Vec<u8>, value: Vec<u8>) -> NodeId {
        let next = self.nodes[predecessor].next;
        let id = self.nodes.push(SkipNode::new(key, value, next));
        self.nodes[predecessor].next = Some(id);
        id
    }

    /// Checks the integrity of the skipmap.
    #[cfg(test)]
    fn check(&self) {
        use std::collections::HashSet;

        let Some(&base) = self.fronts.first() else {
            assert_eq!(self.len, 0);
            return;
        };

        let mut lower: Vec<NodeId> = self.nodes.walk(base).collect();
        assert_eq!(lower.len(), self.len);
        assert!(lower.iter().all(|&id| self.nodes[id].below.is_none()));
        self.check_sorted(&lower);

        for &front in self.fronts.iter().skip(1) {
            let level: Vec<NodeId> = self.nodes.walk(front).collect();
            self.check_sorted(&level);

            let below_level: HashSet<NodeId> = lower.iter().copied().collect();
            for &id in &level {
                let node = &self.nodes[id];
                let below = node.below.expect("upper node without a node below it");
                assert!(below_level.contains(&below));
                assert_eq!(self.nodes[below].key, node.key);
                assert!(node.value.is_empty());
            }
            assert!(level.len() <= lower.len());
            lower = level;
        }
    }

    #[cfg(test)]
    fn check_sorted(&self, level: &[NodeId]) {
        for pair in level.windows(2) {
            if let &[a, b] = pair {
                assert!(self.nodes[a].key < self.nodes[b].key);
            }
        }
    }

    /// The keys of a single level, in order.
    #[cfg(test)]
    fn level_keys(&self, level: usize) -> Vec<Vec<u8>> {
        self.fronts.get(level).map_or_else(Vec::new, |&front| {
            self.nodes
                .walk(front)
                .map(|id| self.nodes[id].key.clone())
                .collect()
        })
    }

    /// Renders the internal structure of the skipmap (for debugging
    /// purposes).
    ///
    /// There is one line per level, the highest level first, listing the keys
    /// of that level in order. Non-ASCII bytes are escaped.
    ///
    /// # Examples
    ///
    /// ```
    /// use byteskip::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.insert("b", "1");
    /// skipmap.insert("a", "2");
    /// assert!(skipmap.debug_structure().ends_with("level 0: a -> b"));
    /// ```
    #[must_use]
    pub fn debug_structure(&self) -> String {
        let rows: Vec<String> = self
            .fronts
            .iter()
            .enumerate()
            .rev()
            .map(|(level, &front)| {
                let keys: Vec<String> = self
                    .nodes
                    .walk(front)
                    .map(|id| self.nodes[id].key.escape_ascii().to_string())
                    .collect();
                format!("level {level}: {}", keys.join(" -> "))
            })
            .collect();
        rows.join("\n")
    }
}

impl<G: LevelGenerator> SkipMap<G> {
    /// Insert the key-value pair into the skipmap.
    ///
    /// If the key is already present its value is replaced and the structure
    /// of the skipmap is left untouched. Any byte string, including the empty
    /// one, is a valid key or value.
    ///
    /// # Examples
    ///
    /// ```
    /// use byteskip::SkipMap;
    ///
    /// let mut skipmap = SkipMap::new();
    /// skipmap.insert("b", "1");
    /// skipmap.insert("a", "2");
    /// skipmap.insert("b", "3");
    /// assert_eq!(skipmap.find(b"b"), Some(&b"3"[..]));
    /// assert_eq!(skipmap.len(), 2);
    /// ```
    pub fn insert(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        let key = key.into();
        let value = value.into();

        let Some(&base) = self.fronts.first() else {
            let front = self.nodes.push(SkipNode::new(key, value, None));
            self.fronts.push(front);
            self.len = 1;
            return;
        };

        let landing = match self.locate(&key) {
            Location::Found(id) => {
                self.nodes[id].value = value;
                return;
            }
            Location::Vacant { landing } => landing,
        };

        let inserted = match landing.first().copied().flatten() {
            Some(predecessor) => self.splice_after(predecessor, key, value),
            None => self.rewrite_front(base, key, value),
        };
        self.len = self.len.saturating_add(1);
        self.promote(inserted, &landing);
    }

    /// Replicate the freshly inserted level-0 node `inserted` to higher
    /// levels for as long as the level generator asks for it.
    ///
    /// At most one new level is created, after which promotion stops.
    fn promote(&mut self, inserted: NodeId, landing: &[Option<NodeId>]) {
        let mut below = inserted;
        for level in 1..self.level_generator.total() {
            if !self.level_generator.promote() {
                break;
            }
            let key = self.nodes[below].key.clone();
            match landing.get(level).copied() {
                Some(Some(after)) => {
                    let next = self.nodes[after].next;
                    below = self.nodes.push(SkipNode::tower(key, below, next));
                    self.nodes[after].next = Some(below);
                }
                Some(None) => {
                    if let Some(front) = self.fronts.get_mut(level) {
                        below = self.nodes.push(SkipNode::tower(key, below, Some(*front)));
                        *front = below;
                    }
                }
                None => {
                    let top = self.nodes.push(SkipNode::tower(key, below, None));
                    self.fronts.push(top);
                    break;
                }
            }
        }
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl Default for SkipMap<Geometric> {
    #[inline]
    fn default() -> Self {
        SkipMap::new()
    }
}

impl<K, V, G> Extend<(K, V)> for SkipMap<G>
where
    K: Into<Vec<u8>>,
    V: Into<Vec<u8>>,
    G: LevelGenerator,
{
    #[inline]
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iterable: I) {
        for (key, value) in iterable {
            self.insert(key, value);
        }
    }
}

impl<K, V> iter::FromIterator<(K, V)> for SkipMap<Geometric>
where
    K: Into<Vec<u8>>,
    V: Into<Vec<u8>>,
{
    #[inline]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut skipmap = SkipMap::new();
        skipmap.extend(iter);
        skipmap
    }
}

impl<G> fmt::Debug for SkipMap<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        if let Some(&base) = self.fronts.first() {
            for id in self.nodes.walk(base) {
                let node = &self.nodes[id];
                map.entry(
                    &node.key.escape_ascii().to_string(),
                    &node.value.escape_ascii().to_string(),
                );
            }
        }
        map.finish()
    }
}
