use tokviz_types::{Corpus, TokenVector, ZeroLengthSet, PROJECTED_DIM};

/// Re-apply the zero-length rule to projected destinations.
///
/// Centering moves duplicated rows off the origin, so position 0 must be
/// zeroed again and every later listed position re-copied from its
/// already-reconciled predecessor.
pub fn reconcile(destinations: &mut [[f64; PROJECTED_DIM]], zero_length: &ZeroLengthSet) {
    zero_length.apply(destinations);
}

/// Zip the corpus with its destinations into response records, in corpus order.
pub fn assemble(corpus: Corpus, destinations: Vec<[f64; PROJECTED_DIM]>) -> Vec<TokenVector> {
    assert_eq!(
        corpus.len(),
        destinations.len(),
        "corpus/destination length mismatch"
    );
    corpus
        .into_tokens()
        .into_iter()
        .zip(destinations)
        .map(|(token, destination)| TokenVector {
            token: token.text,
            destination,
            is_input: token.is_input,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconcile_restores_origin_and_copies() {
        let mut dest = vec![
            [0.4, 0.4, 0.4],
            [0.4, 0.4, 0.4],
            [1.0, 2.0, 3.0],
            [9.0, 9.0, 9.0],
        ];
        reconcile(&mut dest, &ZeroLengthSet::new([0, 1, 3]));

        assert_eq!(dest[0], [0.0, 0.0, 0.0]);
        assert_eq!(dest[1], [0.0, 0.0, 0.0]);
        assert_eq!(dest[2], [1.0, 2.0, 3.0]);
        assert_eq!(dest[3], [1.0, 2.0, 3.0]);
    }

    #[test]
    fn assemble_preserves_order_and_flags() {
        let vocab: Vec<String> = vec!["cat".into()];
        let corpus = Corpus::new(vec!["hi".into(), "!".into()], &vocab);
        let out = assemble(
            corpus,
            vec![[0.0; 3], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]],
        );

        let tokens: Vec<&str> = out.iter().map(|t| t.token.as_str()).collect();
        assert_eq!(tokens, vec!["hi", "!", "cat"]);
        assert_eq!(
            out.iter().map(|t| t.is_input).collect::<Vec<_>>(),
            vec![true, true, false]
        );
        assert_eq!(out[2].destination, [2.0, 2.0, 2.0]);
    }

    #[test]
    #[should_panic(expected = "length mismatch")]
    fn assemble_rejects_length_mismatch() {
        let vocab: Vec<String> = vec!["cat".into()];
        assemble(Corpus::new(Vec::new(), &vocab), Vec::new());
    }
}
