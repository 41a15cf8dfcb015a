use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub const SERVICE_NAME: &str = "GPT Visualizer";
pub const API_VERSION: &str = "1.0.2";

/// Dimensionality of the synthesized per-token vectors.
pub const DEFAULT_DIM: usize = 20;

/// Dimensionality of the projected destination space.
pub const PROJECTED_DIM: usize = 3;

/// Tokens appended after the user's input on every request.
pub const REFERENCE_OUTPUT_VOCABULARY: [&str; 15] = [
    "The", "cat", "sits", "on", "the", "mat", "and", "watches", "birds", "fly", "high", "in",
    "the", "sky", ".",
];

/// Corpus positions whose vector collapses onto the previous token (or the origin).
pub const REFERENCE_ZERO_LENGTH: [usize; 8] = [0, 1, 5, 9, 10, 14, 17, 18];

/// A single corpus entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub position: usize,
    /// True when the token came from the caller's text, false for vocabulary tokens.
    pub is_input: bool,
}

/// Ordered token sequence for one request: input tokens first, then the output vocabulary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Corpus {
    tokens: Vec<Token>,
    input_len: usize,
}

impl Corpus {
    pub fn new(input: Vec<String>, output: &[String]) -> Self {
        let input_len = input.len();
        let tokens = input
            .into_iter()
            .chain(output.iter().cloned())
            .enumerate()
            .map(|(position, text)| Token {
                text,
                position,
                is_input: position < input_len,
            })
            .collect();
        Self { tokens, input_len }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of tokens that came from the caller's text.
    pub fn input_len(&self) -> usize {
        self.input_len
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

/// One record of the visualize response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenVector {
    pub token: String,
    /// [x, y, z] destination coordinate.
    pub destination: [f64; PROJECTED_DIM],
    pub is_input: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VisualizeRequest {
    pub input_text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualizeResponse {
    pub tokens: Vec<TokenVector>,
}

/// A row that can be collapsed onto the origin.
pub trait Collapse: Clone {
    fn collapse_to_origin(&mut self);
}

impl Collapse for Vec<f64> {
    fn collapse_to_origin(&mut self) {
        self.iter_mut().for_each(|x| *x = 0.0);
    }
}

impl<const N: usize> Collapse for [f64; N] {
    fn collapse_to_origin(&mut self) {
        *self = [0.0; N];
    }
}

/// Corpus positions whose resolved vector has zero length relative to the
/// previous position. Position 0 resolves to the origin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZeroLengthSet {
    positions: BTreeSet<usize>,
}

impl ZeroLengthSet {
    pub fn new(positions: impl IntoIterator<Item = usize>) -> Self {
        Self {
            positions: positions.into_iter().collect(),
        }
    }

    pub fn contains(&self, position: usize) -> bool {
        self.positions.contains(&position)
    }

    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.positions.iter().copied()
    }

    /// Resolve every listed position in `rows`, in ascending order, so a run of
    /// consecutive positions all copy the row preceding the run.
    ///
    /// Positions past the end of `rows` are ignored.
    pub fn apply<R: Collapse>(&self, rows: &mut [R]) {
        for i in self.positions.range(..rows.len()).copied() {
            if i == 0 {
                rows[0].collapse_to_origin();
            } else {
                rows[i] = rows[i - 1].clone();
            }
        }
    }
}

impl Default for ZeroLengthSet {
    fn default() -> Self {
        Self::new(REFERENCE_ZERO_LENGTH)
    }
}
