use core::cmp::Ordering;

/// An unordered pair of global vertex indices, stored in increasing order.
///
/// Edge data of the compiled mesh (rest lengths for instance) is keyed by
/// this type so that `(a, b)` and `(b, a)` address the same entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexPair([u32; 2]);

impl VertexPair {
    /// Sorts two vertex indices in increasing order into a new pair.
    pub fn new(a: u32, b: u32) -> Self {
        match a.cmp(&b) {
            Ordering::Greater => VertexPair([b, a]),
            _ => VertexPair([a, b]),
        }
    }

    /// The smallest index of the pair.
    #[inline]
    pub fn low(&self) -> u32 {
        self.0[0]
    }

    /// The largest index of the pair.
    #[inline]
    pub fn high(&self) -> u32 {
        self.0[1]
    }

    /// Both indices, in increasing order.
    #[inline]
    pub fn as_array(&self) -> [u32; 2] {
        self.0
    }
}

impl From<[u32; 2]> for VertexPair {
    fn from(value: [u32; 2]) -> Self {
        VertexPair::new(value[0], value[1])
    }
}
