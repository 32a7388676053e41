use std::fmt;

/// Statistics on a [RbTree](crate::RbTree) instance, gathered by a full walk
/// of the tree. Refer to [RbTree::stats](crate::RbTree::stats) and
/// [RbTree::validate](crate::RbTree::validate).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// Number of keys, duplicates included.
    pub n_count: usize,
    /// Number of red nodes.
    pub n_red: usize,
    /// Number of black nodes.
    pub n_black: usize,
    /// Nodes on the longest root-to-leaf path, zero for an empty tree.
    pub height: usize,
    /// Black nodes on any path from root down to the sentinel, the
    /// sentinel counted and the root itself excluded. Zero when empty.
    pub black_height: usize,
    /// Node slots allocated in the arena, live or released.
    pub n_slots: usize,
    /// Released slots waiting for reuse.
    pub n_free: usize,
}

impl Stats {
    /// Ratio of red nodes to black nodes.
    pub fn red_black_ratio(&self) -> f64 {
        (self.n_red as f64) / (std::cmp::max(self.n_black, 1) as f64)
    }

    /// Upper bound on height for `n_count` keys, `2 * log2(n+1)`.
    pub fn max_height(&self) -> f64 {
        2.0 * ((self.n_count + 1) as f64).log2()
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "n_count:{} n_red:{} n_black:{} height:{} black_height:{} r/b:{:.2} slots:{}/{}",
            self.n_count,
            self.n_red,
            self.n_black,
            self.height,
            self.black_height,
            self.red_black_ratio(),
            self.n_free,
            self.n_slots
        )
    }
}
