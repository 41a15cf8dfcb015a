use tokviz_embed::EmbeddingSource;
use tokviz_types::{Corpus, ZeroLengthSet};

/// Build one `dim`-component vector per corpus position.
///
/// Zero-length positions are never sent to the source; they resolve to the
/// origin (position 0) or a copy of the preceding resolved vector.
pub fn synthesize(
    corpus: &Corpus,
    source: &dyn EmbeddingSource,
    dim: usize,
    zero_length: &ZeroLengthSet,
) -> Vec<Vec<f64>> {
    let mut rows: Vec<Vec<f64>> = corpus
        .iter()
        .map(|token| {
            if zero_length.contains(token.position) {
                return vec![0.0; dim];
            }
            let v = source.embed(&token.text, dim);
            assert_eq!(
                v.len(),
                dim,
                "embedding source returned {} components for {:?}, expected {dim}",
                v.len(),
                token.text
            );
            v
        })
        .collect();

    zero_length.apply(&mut rows);
    rows
}
