use bon::Builder;

/// Deepest nesting of constructed values the decoder accepts.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Largest number of TLV nodes decoded from one buffer.
pub const DEFAULT_MAX_NODES: usize = 65_536;

/// Resource bounds applied while decoding untrusted ASN.1 input.
///
/// # Example
/// ```
/// use certview::config::DecodeLimits;
/// let limits = DecodeLimits::builder().max_depth(16).build();
/// assert_eq!(limits.max_depth, 16);
/// assert_eq!(limits.max_nodes, certview::config::DEFAULT_MAX_NODES);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Builder)]
pub struct DecodeLimits {
    /// Maximum nesting depth; the top-level element sits at depth 0.
    #[builder(default = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
    /// Maximum number of nodes in the decoded tree.
    #[builder(default = DEFAULT_MAX_NODES)]
    pub max_nodes: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}
