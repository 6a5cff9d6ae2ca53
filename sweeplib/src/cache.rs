use crate::config::Geometry;

/// One replaceable slot within a set
///
/// `last_used` is a logical timestamp, the 1-based trace line number that
/// last touched the way. The all-zero sentinel means "empty": it never
/// matches on the hit path and always loses the recency comparison, because
/// real sequence numbers start at 1.
#[derive(Debug, Clone, Copy, Default)]
struct Way {
    tag: u32,
    last_used: u64,
}

/// The hit/miss/replacement model for one cache geometry
///
/// Ways are stored as a single flat allocation in set-major order, so set `s`
/// occupies indices `s * associativity .. (s + 1) * associativity`. Only tags
/// and recency are tracked; the model never stores line contents.
///
/// The caller must feed `access` a strictly increasing timestamp. LRU
/// ordering is unspecified if timestamps repeat or go backwards.
pub struct CacheConfig {
    geometry: Geometry,
    ways: Vec<Way>,
    hits: u64,
    accesses: u64,
    index_mask: u32,
    index_shift: u32,
    tag_shift: u32,
}

impl CacheConfig {
    /// Builds the empty state for a geometry
    ///
    /// Panics if the geometry's derived fields are inconsistent, which means
    /// the fixed configuration table itself is defective.
    pub fn new(geometry: Geometry) -> Self {
        geometry.validate();
        let index_shift = geometry.block_offset_bits + geometry.byte_offset_bits;
        Self {
            ways: vec![Way::default(); (geometry.num_sets() * geometry.associativity) as usize],
            hits: 0,
            accesses: 0,
            index_mask: geometry.num_sets() - 1,
            index_shift,
            tag_shift: index_shift + geometry.index_offset_bits,
            geometry,
        }
    }

    /// Splits an address into its set index and tag
    ///
    /// The set index is aligned so it can be used directly to select a set;
    /// the tag is the remaining high-order bits shifted down.
    pub fn set_and_tag(&self, address: u32) -> (u32, u32) {
        ((address >> self.index_shift) & self.index_mask, address >> self.tag_shift)
    }

    /// Replays one access, returning true on a hit
    ///
    /// On a hit the matching way's recency is refreshed. On a miss the victim
    /// is the way with the strictly smallest `last_used`, scanning in
    /// increasing way order and keeping the first-seen minimum, so an exact
    /// recency tie always evicts the lowest-indexed way. With a single way
    /// this degenerates to unconditional overwrite. Exactly one way is
    /// mutated per call and every input produces a defined outcome.
    pub fn access(&mut self, address: u32, timestamp: u64) -> bool {
        let (set, tag) = self.set_and_tag(address);
        let set_lower = (set * self.geometry.associativity) as usize;
        let set_upper = set_lower + self.geometry.associativity as usize;
        self.accesses += 1;
        let mut x = set_lower;
        while x < set_upper {
            // An empty way never hits, even when the computed tag is 0
            if self.ways[x].tag == tag && self.ways[x].last_used != 0 {
                self.ways[x].last_used = timestamp;
                self.hits += 1;
                return true;
            }
            x += 1;
        }
        // Miss, evict the least recently used way
        let mut min_value = u64::MAX;
        let mut min_index = usize::MAX;
        let mut x = set_lower;
        while x < set_upper {
            if self.ways[x].last_used < min_value {
                min_value = self.ways[x].last_used;
                min_index = x;
            }
            x += 1;
        }
        self.ways[min_index] = Way { tag, last_used: timestamp };
        false
    }

    /// Hit rate as a percentage, 0 when nothing has been accessed yet
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            return 0.0;
        }
        self.hits as f64 / self.accesses as f64 * 100.0
    }

    /// Reinitializes every way to the empty sentinel and zeroes the counters
    ///
    /// Only intended between independent runs sharing the same object, never
    /// mid-trace.
    pub fn reset(&mut self) {
        self.ways.fill(Way::default());
        self.hits = 0;
        self.accesses = 0;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn accesses(&self) -> u64 {
        self.accesses
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Number of ways still holding the empty sentinel. Useful for analysing
    /// cache utilisation or debugging
    pub fn empty_way_count(&self) -> usize {
        self.ways.iter().filter(|w| w.last_used == 0).count()
    }
}
