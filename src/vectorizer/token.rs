use std::fmt::Debug;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// TokenFrequency
/// Raw occurrence counts of the tokens of one requirement.
///
/// Tokens are kept in first-occurrence order, so iterating the same token
/// sequence always yields the same order.
///
/// # Examples
/// ```
/// use tracelink_vectorizer::TokenFrequency;
/// let mut freq = TokenFrequency::new();
/// freq.add_tokens(&["user", "login", "user"]);
///
/// assert_eq!(freq.token_count("user"), 2);
/// assert_eq!(freq.token_sum(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    token_count: IndexMap<String, u32>,
    total_token_count: u64,
}

impl TokenFrequency {
    pub fn new() -> Self {
        TokenFrequency {
            token_count: IndexMap::new(),
            total_token_count: 0,
        }
    }

    /// Add a token
    ///
    /// # Arguments
    /// * `token` - token to count
    #[inline]
    pub fn add_token(&mut self, token: &str) -> &mut Self {
        if let Some(count) = self.token_count.get_mut(token) {
            *count += 1;
        } else {
            self.token_count.insert(token.to_string(), 1);
        }
        self.total_token_count += 1;
        self
    }

    /// Add several tokens
    ///
    /// # Arguments
    /// * `tokens` - slice of tokens to count
    #[inline]
    pub fn add_tokens<T>(&mut self, tokens: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for token in tokens {
            self.add_token(token.as_ref());
        }
        self
    }

    /// Occurrence count of `token`, 0 if absent
    #[inline]
    pub fn token_count(&self, token: &str) -> u32 {
        self.token_count.get(token).copied().unwrap_or(0)
    }

    /// Total number of tokens added, duplicates included
    #[inline]
    pub fn token_sum(&self) -> u64 {
        self.total_token_count
    }

    /// Number of distinct tokens
    #[inline]
    pub fn token_num(&self) -> usize {
        self.token_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.token_count.is_empty()
    }

    #[inline]
    pub fn contains_token(&self, token: &str) -> bool {
        self.token_count.contains_key(token)
    }

    /// Distinct tokens in first-occurrence order
    #[inline]
    pub fn token_set_ref_str(&self) -> Vec<&str> {
        self.token_count.keys().map(|s| s.as_str()).collect()
    }

    /// (token, count) pairs in first-occurrence order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.token_count.iter().map(|(token, &count)| (token.as_str(), count))
    }
}

impl<T> FromIterator<T> for TokenFrequency
where
    T: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut freq = TokenFrequency::new();
        for token in iter {
            freq.add_token(token.as_ref());
        }
        freq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_duplicates_and_keeps_first_occurrence_order() {
        let mut freq = TokenFrequency::new();
        freq.add_tokens(&["b", "a", "b", "c", "b"]);

        assert_eq!(freq.token_count("b"), 3);
        assert_eq!(freq.token_count("a"), 1);
        assert_eq!(freq.token_count("missing"), 0);
        assert_eq!(freq.token_sum(), 5);
        assert_eq!(freq.token_num(), 3);
        assert_eq!(freq.token_set_ref_str(), vec!["b", "a", "c"]);
    }

    #[test]
    fn empty_frequency() {
        let freq = TokenFrequency::new();
        assert!(freq.is_empty());
        assert_eq!(freq.token_sum(), 0);
        assert_eq!(freq.iter().count(), 0);
    }

    #[test]
    fn collect_from_iterator() {
        let freq: TokenFrequency = ["x", "y", "x"].into_iter().collect();
        assert_eq!(freq.iter().collect::<Vec<_>>(), vec![("x", 2), ("y", 1)]);
    }
}
