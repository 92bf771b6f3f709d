//! L-system grammar engine
//!
//! Pure string rewriting: each round scans the current string once, left to
//! right, replacing every symbol that has a rule and keeping the rest. No
//! randomness lives here; stochastic behaviour belongs to draw rules.

pub mod rule;

pub use rule::{ExpansionRule, Replace};

use std::collections::BTreeMap;

use crate::core::{Error, Result};

/// Axiom, rule table and round count
pub struct Grammar {
    axiom: String,
    rules: BTreeMap<char, Box<dyn ExpansionRule>>,
    iterations: u32,
}

impl Grammar {
    pub fn new(axiom: impl Into<String>, iterations: u32) -> Self {
        Self {
            axiom: axiom.into(),
            rules: BTreeMap::new(),
            iterations,
        }
    }

    /// Grammar whose rules are all verbatim replacements.
    pub fn from_replacements(
        axiom: impl Into<String>,
        replacements: &BTreeMap<char, String>,
        iterations: u32,
    ) -> Self {
        let mut grammar = Self::new(axiom, iterations);
        for (&symbol, replacement) in replacements {
            grammar.add_rule(symbol, Replace::new(replacement.clone()));
        }
        grammar
    }

    pub fn with_rule(mut self, symbol: char, rule: impl ExpansionRule + 'static) -> Self {
        self.add_rule(symbol, rule);
        self
    }

    /// Add or replace the rule for `symbol`.
    pub fn add_rule(&mut self, symbol: char, rule: impl ExpansionRule + 'static) {
        self.rules.insert(symbol, Box::new(rule));
    }

    pub fn axiom(&self) -> &str {
        &self.axiom
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn has_rule(&self, symbol: char) -> bool {
        self.rules.contains_key(&symbol)
    }

    /// One rewriting round over `current`.
    pub fn iterate(&self, current: &str, iteration: u32) -> String {
        let mut next = String::with_capacity(current.len() * 2);
        for symbol in current.chars() {
            match self.rules.get(&symbol) {
                Some(rule) => rule.expand(symbol, iteration, &mut next),
                None => next.push(symbol),
            }
        }
        next
    }

    /// Run every round starting from the axiom.
    ///
    /// Growth is geometric for recursive rules; callers bound `iterations`
    /// or use [`Grammar::expand_bounded`].
    pub fn expand(&self) -> String {
        let mut current = self.axiom.clone();
        for i in 0..self.iterations {
            current = self.iterate(&current, i);
        }
        current
    }

    /// Like [`Grammar::expand`], failing once the working string exceeds `max_len` bytes.
    pub fn expand_bounded(&self, max_len: usize) -> Result<String> {
        let mut current = self.axiom.clone();
        for i in 0..self.iterations {
            current = self.iterate(&current, i);
            if current.len() > max_len {
                return Err(Error::Grammar(format!(
                    "expansion of '{}' reached {} bytes after {} of {} rounds (limit {})",
                    self.axiom,
                    current.len(),
                    i + 1,
                    self.iterations,
                    max_len
                )));
            }
        }
        log::debug!(
            "Expanded '{}' over {} rounds to {} symbols",
            self.axiom, self.iterations, current.len()
        );
        Ok(current)
    }
}
