use crate::error::{Error, Result};

/// Separator used when serializing a path to a single string key
pub const SEPARATOR: char = '/';

/// An ordered sequence of path segments from a mount root to a node.
///
/// The empty sequence denotes the mount root. Paths are the universal
/// cross-provider key: a node's position in the tree is defined by the
/// segments from the mount root to it, never by its backend id. There is
/// no normalization of case or separators; callers pass already-split
/// segments, and segments containing the separator are rejected so that
/// `TreePath::parse(p.serialize()) == p` holds for every constructible path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TreePath {
    segments: Vec<String>,
}

fn validate_segment(segment: &str) -> Result<()> {
    if segment.is_empty() || segment.contains(SEPARATOR) {
        return Err(Error::invalid_segment(segment));
    }
    Ok(())
}

impl TreePath {
    /// The mount root
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from pre-split segments
    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        for segment in &segments {
            validate_segment(segment)?;
        }
        Ok(Self { segments })
    }

    /// Parse a serialized key back into a path. The empty string is the root.
    pub fn parse(key: &str) -> Result<Self> {
        if key.is_empty() {
            return Ok(Self::root());
        }
        Self::from_segments(key.split(SEPARATOR))
    }

    /// Serialize to the canonical string key. The root serializes to "".
    pub fn serialize(&self) -> String {
        self.segments.join("/")
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Final segment, if any
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Path with the final segment removed; None for the root
    pub fn parent(&self) -> Option<TreePath> {
        if self.segments.is_empty() {
            return None;
        }
        Some(TreePath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Extend with one more segment
    pub fn join(&self, name: &str) -> Result<TreePath> {
        validate_segment(name)?;
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Ok(Self { segments })
    }

    /// Whether `prefix` is this path or an ancestor of it
    pub fn starts_with(&self, prefix: &TreePath) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }

    /// Substitute an `old` prefix with `new`; None when `old` is not a prefix
    pub fn rebase(&self, old: &TreePath, new: &TreePath) -> Option<TreePath> {
        if !self.starts_with(old) {
            return None;
        }
        let mut segments = new.segments.clone();
        segments.extend_from_slice(&self.segments[old.segments.len()..]);
        Some(TreePath { segments })
    }
}

impl std::fmt::Display for TreePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.serialize())
    }
}
