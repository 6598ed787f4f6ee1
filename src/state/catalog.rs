//! Fixed baby sequence and the answer key derived from it.

use thiserror::Error;

use crate::state::couple::{Couple, is_encodable_name};

const IMAGE_BASE_URL: &str =
    "https://raw.githubusercontent.com/madelinengo/baby-shower-game/refs/heads/main/images";

const MOMMY: &str = "Mommy";
const DADDY: &str = "Daddy";

/// One guessing target of the fixed sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Baby {
    /// Stable position in the sequence (`0..N`).
    pub index: usize,
    /// Externally hosted photo of the baby.
    pub image_url: String,
    /// Couple that actually "produced" this baby.
    pub answer: Couple,
}

/// Static ground truth: baby index to correct couple token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerKey {
    tokens: Vec<String>,
}

impl AnswerKey {
    /// Build a key where position `i` holds the token for baby `i`.
    pub fn from_tokens(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    /// Correct token for a baby, if the index exists.
    pub fn get(&self, baby_index: usize) -> Option<&str> {
        self.tokens.get(baby_index).map(String::as_str)
    }

    /// Number of babies covered by the key.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when the key covers no baby.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Exact token comparison against the key entry.
    pub fn is_correct(&self, baby_index: usize, token: &str) -> bool {
        self.get(baby_index) == Some(token)
    }
}

/// Reasons a catalog definition is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The baby sequence is empty.
    #[error("catalog must contain at least one baby")]
    Empty,
    /// A parent or celebrity name is blank.
    #[error("baby {index} has an empty parent name")]
    BlankName {
        /// Offending baby index.
        index: usize,
    },
    /// A name contains the couple separator and could not be decoded again.
    #[error("name `{name}` contains the couple separator")]
    UnencodableName {
        /// Offending name.
        name: String,
    },
}

/// Immutable, process-wide baby sequence plus the names offered to players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    babies: Vec<Baby>,
    answer_key: AnswerKey,
    parents: Vec<String>,
    celebrities: Vec<String>,
}

impl Catalog {
    /// Validate and assemble a catalog. Baby indices are assigned from order.
    pub fn new(
        answers: Vec<(String, Couple)>,
        parents: Vec<String>,
        celebrities: Vec<String>,
    ) -> Result<Self, CatalogError> {
        if answers.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut babies = Vec::with_capacity(answers.len());
        for (index, (image_url, answer)) in answers.into_iter().enumerate() {
            if answer.mom.trim().is_empty() || answer.dad.trim().is_empty() {
                return Err(CatalogError::BlankName { index });
            }
            for name in [&answer.mom, &answer.dad] {
                if !is_encodable_name(name) {
                    return Err(CatalogError::UnencodableName { name: name.clone() });
                }
            }
            babies.push(Baby {
                index,
                image_url,
                answer,
            });
        }

        if let Some(name) = parents
            .iter()
            .chain(celebrities.iter())
            .find(|name| !is_encodable_name(name))
        {
            return Err(CatalogError::UnencodableName { name: name.clone() });
        }

        let answer_key =
            AnswerKey::from_tokens(babies.iter().map(|baby| baby.answer.token()).collect());

        Ok(Self {
            babies,
            answer_key,
            parents,
            celebrities,
        })
    }

    /// Number of babies (`N`).
    pub fn len(&self) -> usize {
        self.babies.len()
    }

    /// Always false for a validated catalog; kept for API symmetry with [`Catalog::len`].
    pub fn is_empty(&self) -> bool {
        self.babies.is_empty()
    }

    /// Babies in reveal order.
    pub fn babies(&self) -> &[Baby] {
        &self.babies
    }

    /// Baby at a given index.
    pub fn baby(&self, index: usize) -> Option<&Baby> {
        self.babies.get(index)
    }

    /// Ground-truth lookup table.
    pub fn answer_key(&self) -> &AnswerKey {
        &self.answer_key
    }

    /// Actual parents offered in the first slot.
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// Celebrities offered in the second slot.
    pub fn celebrities(&self) -> &[String] {
        &self.celebrities
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let answers = [
            ("dad_halle.jpeg", DADDY, "Halle Berry"),
            ("dad_mindy.jpeg", DADDY, "Mindy Kaling"),
            ("dad_priyanka.jpeg", DADDY, "Priyanka Chopra"),
            ("dad_zendaya.jpeg", DADDY, "Zendaya"),
            ("mom_benedict.jpeg", MOMMY, "Benedict Cumberbatch"),
            ("mom_owen.jpeg", MOMMY, "Owen Wilson"),
            ("mom_rupert.jpeg", MOMMY, "Rupert Grint"),
            ("mom_timothee.jpeg", MOMMY, "Timothee Chalamet"),
            ("dad_mom.jpeg", MOMMY, DADDY),
        ]
        .into_iter()
        .map(|(file, mom, dad)| {
            (
                format!("{IMAGE_BASE_URL}/pics_baby/{file}"),
                Couple::new(mom, dad),
            )
        })
        .collect();

        let parents = vec![MOMMY.to_string(), DADDY.to_string()];
        let celebrities = [
            "Owen Wilson",
            "Benedict Cumberbatch",
            "Rupert Grint",
            "Timothee Chalamet",
            DADDY,
            "Priyanka Chopra",
            "Halle Berry",
            "Zendaya",
            "Mindy Kaling",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        // Built-in data is known to satisfy every catalog rule.
        match Self::new(answers, parents, celebrities) {
            Ok(catalog) => catalog,
            Err(err) => unreachable!("built-in catalog rejected: {err}"),
        }
    }
}
