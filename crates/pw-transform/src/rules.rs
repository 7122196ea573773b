//! Ordered rule tables: a list of `(matcher, result)` pairs where the first
//! matching entry wins. Entry order is the priority order.

/// An ordered first-match table.
#[derive(Debug, Clone)]
pub struct RuleTable<K, R> {
    entries: Vec<(K, R)>,
}

impl<K, R> RuleTable<K, R> {
    pub fn new(entries: Vec<(K, R)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(K, R)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Result of the first entry whose matcher satisfies `pred`.
    pub fn first_match(&self, pred: impl Fn(&K) -> bool) -> Option<&R> {
        self.position(pred).map(|index| &self.entries[index].1)
    }

    /// Index of the first entry whose matcher satisfies `pred`.
    pub fn position(&self, pred: impl Fn(&K) -> bool) -> Option<usize> {
        self.entries.iter().position(|(matcher, _)| pred(matcher))
    }
}

impl<K, R> FromIterator<(K, R)> for RuleTable<K, R> {
    fn from_iter<I: IntoIterator<Item = (K, R)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
