use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::vectorizer::Collection;

/// Shared term universe of one run.
///
/// Every distinct token of both collections appears exactly once, in lexical
/// order. Index `i` of every document vector built in the run denotes `get(i)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: IndexSet<Box<str>>,
}

impl Vocabulary {
    /// Build the vocabulary from the union of both collections.
    /// No term is dropped.
    pub fn build(high: &Collection, low: &Collection) -> Self {
        Self::from_tokens(
            high.iter()
                .chain(low.iter())
                .flat_map(|(_, freq)| freq.token_set_ref_str()),
        )
    }

    pub fn from_tokens<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut terms: IndexSet<Box<str>> = tokens
            .into_iter()
            .map(|t| Box::<str>::from(t.as_ref()))
            .collect();
        // the hash set order depends on input order, sort to fix it
        terms.sort_unstable();
        Self { terms }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Vector index of `term`
    #[inline]
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.terms.get_index_of(term)
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.terms.get_index(idx).map(|t| t.as_ref())
    }

    #[inline]
    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|t| t.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::{Collection, Side};

    fn collection(side: Side, reqs: &[(&str, &[&str])]) -> Collection {
        Collection::from_requirements(side, reqs.iter().map(|(id, toks)| (*id, *toks))).unwrap()
    }

    #[test]
    fn union_is_deduplicated_and_sorted() {
        let high = collection(Side::High, &[("H1", &["user", "login", "user"])]);
        let low = collection(Side::Low, &[("L1", &["user", "login"]), ("L2", &["system", "shutdown"])]);
        let vocab = Vocabulary::build(&high, &low);

        assert_eq!(vocab.iter().collect::<Vec<_>>(), vec!["login", "shutdown", "system", "user"]);
        assert_eq!(vocab.index_of("system"), Some(2));
        assert_eq!(vocab.get(3), Some("user"));
        assert_eq!(vocab.index_of("absent"), None);
    }

    #[test]
    fn order_does_not_depend_on_input_order() {
        let a = Vocabulary::from_tokens(["c", "a", "b"]);
        let b = Vocabulary::from_tokens(["b", "c", "a", "a"]);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_collections_give_empty_vocabulary() {
        let high = Collection::new(Side::High);
        let low = Collection::new(Side::Low);
        let vocab = Vocabulary::build(&high, &low);
        assert!(vocab.is_empty());
        assert_eq!(vocab.len(), 0);
    }
}
