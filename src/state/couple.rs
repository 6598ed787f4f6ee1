//! Canonical string form of a (mom, dad) pair, shared by answers and guesses.
//!
//! Names containing [`COUPLE_SEPARATOR`] cannot be round-tripped and are rejected
//! wherever the catalog is loaded.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Literal placed between the two names of a couple token.
pub const COUPLE_SEPARATOR: &str = " & ";

/// Decoded form of a couple token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Couple {
    /// First slot of the pair (the actual parent in the built-in catalog).
    pub mom: String,
    /// Second slot of the pair (usually the celebrity).
    pub dad: String,
}

impl Couple {
    /// Build a couple from both names.
    pub fn new(mom: impl Into<String>, dad: impl Into<String>) -> Self {
        Self {
            mom: mom.into(),
            dad: dad.into(),
        }
    }

    /// Token form of this couple.
    pub fn token(&self) -> String {
        encode(&self.mom, &self.dad)
    }

    /// True when neither slot holds a name.
    pub fn is_blank(&self) -> bool {
        self.mom.is_empty() && self.dad.is_empty()
    }
}

impl fmt::Display for Couple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{COUPLE_SEPARATOR}{}", self.mom, self.dad)
    }
}

/// Join two names into a couple token.
pub fn encode(mom: &str, dad: &str) -> String {
    format!("{mom}{COUPLE_SEPARATOR}{dad}")
}

/// Split a couple token on the first separator.
///
/// Empty or separator-less input yields two empty names instead of an error.
pub fn decode(token: &str) -> Couple {
    match token.split_once(COUPLE_SEPARATOR) {
        Some((mom, dad)) => Couple::new(mom, dad),
        None => Couple::default(),
    }
}

/// Whether a name can be stored inside a token without breaking [`decode`].
pub fn is_encodable_name(name: &str) -> bool {
    !name.contains(COUPLE_SEPARATOR)
}
