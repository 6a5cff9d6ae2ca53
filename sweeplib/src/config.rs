use std::str::FromStr;

/// The address decomposition parameters for a single cache geometry
///
/// All fields are fixed at construction; the mutable tag/recency state lives
/// in [`crate::cache::CacheConfig`]. Addresses are 32 bits wide and
/// word-aligned to 4-byte words, so the byte offset is always 2 bits.
#[derive(Debug, Clone, Copy)]
pub struct Geometry {
    /// 1-based configuration id, used in reports and per-access output
    pub id: u8,
    /// Total data capacity in bytes. Informational; only checked against the
    /// derived fields at construction
    pub total_size_bytes: u32,
    /// Ways per set, 1 for direct mapped
    pub associativity: u32,
    /// Block size in 4-byte words
    pub block_size_words: u32,
    pub byte_offset_bits: u32,
    pub block_offset_bits: u32,
    pub index_offset_bits: u32,
}

impl Geometry {
    pub const fn num_sets(&self) -> u32 {
        1 << self.index_offset_bits
    }

    pub const fn tag_bits(&self) -> u32 {
        u32::BITS - (self.byte_offset_bits + self.block_offset_bits + self.index_offset_bits)
    }

    /// Checks the internal consistency of the geometry
    ///
    /// A violation means the configuration table itself is wrong, which is a
    /// programming defect rather than a runtime condition, so this panics
    /// instead of returning an error. Called once when the cache state is
    /// built.
    pub fn validate(&self) {
        assert!(self.associativity >= 1, "config {}: associativity must be at least 1", self.id);
        assert_eq!(
            1u32 << self.block_offset_bits,
            self.block_size_words,
            "config {}: block offset bits don't match the block size",
            self.id
        );
        assert_eq!(
            self.num_sets() * self.associativity * self.block_size_words * 4,
            self.total_size_bytes,
            "config {}: sets * ways * block words * 4 must equal the total size",
            self.id
        );
        assert!(
            self.byte_offset_bits + self.block_offset_bits + self.index_offset_bits < u32::BITS,
            "config {}: no tag bits left in a 32-bit address",
            self.id
        );
    }
}

/// The fixed battery of seven geometries every trace is replayed against
///
/// The ids, sizes, and bit-field widths are part of the tool's output
/// contract and must not be reordered.
pub const GEOMETRIES: [Geometry; 7] = [
    Geometry { id: 1, total_size_bytes: 2048, associativity: 1, block_size_words: 1, byte_offset_bits: 2, block_offset_bits: 0, index_offset_bits: 9 },
    Geometry { id: 2, total_size_bytes: 2048, associativity: 1, block_size_words: 2, byte_offset_bits: 2, block_offset_bits: 1, index_offset_bits: 8 },
    Geometry { id: 3, total_size_bytes: 2048, associativity: 1, block_size_words: 4, byte_offset_bits: 2, block_offset_bits: 2, index_offset_bits: 7 },
    Geometry { id: 4, total_size_bytes: 2048, associativity: 2, block_size_words: 1, byte_offset_bits: 2, block_offset_bits: 0, index_offset_bits: 8 },
    Geometry { id: 5, total_size_bytes: 2048, associativity: 4, block_size_words: 1, byte_offset_bits: 2, block_offset_bits: 0, index_offset_bits: 7 },
    Geometry { id: 6, total_size_bytes: 2048, associativity: 4, block_size_words: 4, byte_offset_bits: 2, block_offset_bits: 2, index_offset_bits: 5 },
    Geometry { id: 7, total_size_bytes: 4096, associativity: 1, block_size_words: 1, byte_offset_bits: 2, block_offset_bits: 0, index_offset_bits: 10 },
];

/// Which of the seven configurations a run drives
///
/// Parsed from the command line: the literal `all`, or a decimal id `1`..`7`.
/// Anything else is rejected before any trace processing starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    All,
    Single(u8),
}

impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Selection::All);
        }
        match s.parse::<u8>() {
            Ok(id) if (1..=GEOMETRIES.len() as u8).contains(&id) => Ok(Selection::Single(id)),
            _ => Err(format!(
                "invalid configuration selector {s:?}: expected \"all\" or an id from 1 to {}",
                GEOMETRIES.len()
            )),
        }
    }
}
