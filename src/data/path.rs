//! Structural path addressing.
//!
//! Every node in the schema tree is addressed by the sequence of keys from
//! the root down to it. Internally paths are kept structured (an ordered
//! list of segments); the flat delimiter-joined string form appears only at
//! the boundaries that need a single identifier: the field registry key,
//! the host `data-path`/`data-group` attributes, and the dependency side of
//! visibility expressions.

use std::fmt;

/// Delimiter used by the flat path form.
pub const PATH_DELIMITER: char = '_';

/// Ordered key sequence addressing one schema node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// The empty path addressing the schema root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Extend this path by one key.
    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key.to_string());
        Self { segments }
    }

    /// Rebuild a path from its flat form by splitting on the delimiter.
    ///
    /// Keys that themselves contain the delimiter cannot round-trip through
    /// the flat form; lookups through here address the flat namespace, which
    /// is what schema authors see in `data-path` attributes.
    pub fn from_flat(flat: &str) -> Self {
        if flat.is_empty() {
            return Self::root();
        }
        Self {
            segments: flat.split(PATH_DELIMITER).map(str::to_string).collect(),
        }
    }

    /// Path segments in root-to-leaf order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Flat delimiter-joined identifier.
    pub fn flat(&self) -> String {
        self.segments.join(&PATH_DELIMITER.to_string())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.flat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_extends_path() {
        let path = FieldPath::root().child("network").child("wifi").child("ssid");
        assert_eq!(path.flat(), "network_wifi_ssid");
        assert_eq!(path.segments().len(), 3);
    }

    #[test]
    fn test_root_is_empty() {
        let root = FieldPath::root();
        assert!(root.is_root());
        assert_eq!(root.flat(), "");
        assert_eq!(root.child("a").flat(), "a");
    }

    #[test]
    fn test_from_flat_round_trip() {
        let path = FieldPath::from_flat("a_b_c");
        assert_eq!(path.segments(), ["a", "b", "c"]);
        assert_eq!(path.flat(), "a_b_c");
        assert!(FieldPath::from_flat("").is_root());
    }

    #[test]
    fn test_delimiter_inside_key_flattens_ambiguously() {
        // Two distinct structured paths share a flat form; the registry
        // logs the collision instead of silently merging state.
        let nested = FieldPath::root().child("a").child("b");
        let single = FieldPath::root().child("a_b");
        assert_ne!(nested, single);
        assert_eq!(nested.flat(), single.flat());
    }
}
