use derive_more::Display;

/// A `NodeId` is a unique identifier for a node in a document arena.
#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(usize);

impl From<NodeId> for usize {
    /// Converts a `NodeId` into a usize
    fn from(value: NodeId) -> Self {
        value.0
    }
}

impl From<usize> for NodeId {
    /// Converts a usize into a `NodeId`
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl NodeId {
    pub const ROOT_NODE: usize = 0;

    /// Returns the root node ID
    #[must_use]
    pub fn root() -> Self {
        Self(Self::ROOT_NODE)
    }

    /// Returns true when this nodeId is the root node
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == Self::ROOT_NODE
    }

    /// Returns the next node ID
    #[must_use]
    pub fn next(&self) -> Self {
        if self.0 == usize::MAX {
            return Self(usize::MAX);
        }

        Self(self.0 + 1)
    }

    /// Returns the nodeID as usize
    #[must_use]
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root() {
        assert!(NodeId::root().is_root());
        assert!(!NodeId::from(3usize).is_root());
        assert_eq!(NodeId::default(), NodeId::root());
    }

    #[test]
    fn next_saturates() {
        assert_eq!(NodeId::from(1usize).next(), NodeId::from(2usize));
        assert_eq!(NodeId::from(usize::MAX).next(), NodeId::from(usize::MAX));
    }

    #[test]
    fn display() {
        assert_eq!(NodeId::from(42usize).to_string(), "42");
    }
}
