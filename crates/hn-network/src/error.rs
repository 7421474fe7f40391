//! Network-specific error types.

/// Model construction, validation and topology errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// The network has no nodes.
    EmptyNodes,

    /// The network has no links.
    EmptyLinks,

    /// A link carries a non-positive physical attribute.
    NonPositiveAttribute {
        link: String,
        what: &'static str,
    },

    /// Two nodes share the same code.
    DuplicateNodeCode { code: String },

    /// Two links share the same code.
    DuplicateLinkCode { code: String },

    /// Two nodes or two links share the same external id.
    DuplicateExternalId { what: &'static str },

    /// A link endpoint handle doesn't resolve to a node in the arena.
    DanglingEndpoint { link: String },

    /// A detected cycle references a node pair with no connecting link.
    Topology { from: String, to: String },

    /// Handle or code not found in the index.
    NotFound { what: &'static str },
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::EmptyNodes => write!(f, "Network has no nodes"),
            NetworkError::EmptyLinks => write!(f, "Network has no links"),
            NetworkError::NonPositiveAttribute { link, what } => {
                write!(f, "Link {} has non-positive {}", link, what)
            }
            NetworkError::DuplicateNodeCode { code } => {
                write!(f, "Duplicate node code {}", code)
            }
            NetworkError::DuplicateLinkCode { code } => {
                write!(f, "Duplicate link code {}", code)
            }
            NetworkError::DuplicateExternalId { what } => {
                write!(f, "Duplicate external id for {}", what)
            }
            NetworkError::DanglingEndpoint { link } => {
                write!(f, "Link {} references a node outside the arena", link)
            }
            NetworkError::Topology { from, to } => {
                write!(f, "Cycle references node pair {}-{} with no connecting link", from, to)
            }
            NetworkError::NotFound { what } => write!(f, "{} not found in index", what),
        }
    }
}

impl std::error::Error for NetworkError {}
