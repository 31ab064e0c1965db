//! String Interning Pool
//!
//! Deduplicated storage for element names, attribute names and values, and
//! character data. Icon sets repeat the same tag and attribute names (and
//! often the same values) thousands of times, so each distinct string is
//! stored once and referenced by a u32 ID.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// String interning pool
///
/// Memory layout:
/// - `entries`: (offset, len) into `data` for each interned string ID
/// - `data`: concatenated string bytes
/// - `hash_index`: hash -> list of IDs (handles rare collisions)
#[derive(Debug)]
pub struct StringPool {
    entries: Vec<(u32, u32)>,
    data: Vec<u8>,
    hash_index: HashMap<u64, Vec<u32>>,
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

impl StringPool {
    /// Create a new empty string pool
    pub fn new() -> Self {
        let mut pool = StringPool {
            entries: Vec::with_capacity(256),
            data: Vec::with_capacity(4096),
            hash_index: HashMap::new(),
        };
        // Entry 0 is reserved for the empty string
        pool.entries.push((0, 0));
        pool
    }

    #[inline]
    fn compute_hash(s: &[u8]) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        hasher.finish()
    }

    /// Intern a string, returning its ID (0 for the empty string)
    pub fn intern(&mut self, s: &[u8]) -> u32 {
        if s.is_empty() {
            return 0;
        }

        let hash = Self::compute_hash(s);
        if let Some(ids) = self.hash_index.get(&hash) {
            for &id in ids {
                if self.get(id) == Some(s) {
                    return id;
                }
            }
        }

        let offset = self.data.len() as u32;
        self.data.extend_from_slice(s);

        let id = self.entries.len() as u32;
        self.entries.push((offset, s.len() as u32));
        self.hash_index.entry(hash).or_default().push(id);

        id
    }

    /// Get the bytes of an interned string
    pub fn get(&self, id: u32) -> Option<&[u8]> {
        let &(offset, len) = self.entries.get(id as usize)?;
        self.data.get(offset as usize..(offset + len) as usize)
    }

    /// Get an interned string as `&str`
    pub fn get_str(&self, id: u32) -> Option<&str> {
        std::str::from_utf8(self.get(id)?).ok()
    }

    /// Number of distinct strings (including the reserved empty entry)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when only the reserved empty entry exists
    pub fn is_empty(&self) -> bool {
        self.entries.len() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_deduplicates() {
        let mut pool = StringPool::new();
        let a = pool.intern(b"stroke-width");
        let b = pool.intern(b"fill");
        let c = pool.intern(b"stroke-width");
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.get_str(a), Some("stroke-width"));
    }

    #[test]
    fn test_empty_string() {
        let mut pool = StringPool::new();
        assert!(pool.is_empty());
        assert_eq!(pool.intern(b""), 0);
        assert_eq!(pool.get_str(0), Some(""));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_unknown_id() {
        let pool = StringPool::new();
        assert_eq!(pool.get(42), None);
    }
}
