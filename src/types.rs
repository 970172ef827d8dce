use std::fmt;

/// Identity of a pod as printed in event lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodRef {
    pub namespace: String,
    pub name: String,
}

impl fmt::Display for PodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// One item from the pod watch, decoded or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PodEvent {
    Added(PodRef),
    Modified(PodRef),
    Deleted(PodRef),
    /// Payload was not a pod (status object, foreign kind, undecodable line).
    Unrecognized,
    /// Bookmarks and anything else we don't print.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogSummary {
    pub lines: usize,
    pub errors: usize,
}

impl fmt::Display for LogSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} lines, {} error(s)", self.lines, self.errors)
    }
}
