//! Expansion rules: what a symbol becomes in the next generation

/// Rewrites one symbol into the next generation's text.
///
/// Rules are context free: they see only the symbol and the round number.
pub trait ExpansionRule: Send + Sync {
    /// Append the replacement for `symbol` to `out`.
    fn expand(&self, symbol: char, iteration: u32, out: &mut String);
}

/// Verbatim replacement string
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Replace(pub String);

impl Replace {
    pub fn new(replacement: impl Into<String>) -> Self {
        Self(replacement.into())
    }
}

impl ExpansionRule for Replace {
    fn expand(&self, _symbol: char, _iteration: u32, out: &mut String) {
        out.push_str(&self.0);
    }
}
