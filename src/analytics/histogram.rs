use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
struct WordEntry {
    count: u64,
    first_seen: usize,
}

/// Word frequency histogram
///
/// Counts only ever grow. Each word remembers when it was first inserted so
/// rankings can break ties by first-seen order.
#[derive(Debug, Clone, Default)]
pub struct WordHistogram {
    entries: HashMap<String, WordEntry>,
}

impl WordHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence of a word
    pub fn add(&mut self, word: &str) {
        let next = self.entries.len();
        match self.entries.get_mut(word) {
            Some(entry) => entry.count += 1,
            None => {
                self.entries.insert(
                    word.to_string(),
                    WordEntry {
                        count: 1,
                        first_seen: next,
                    },
                );
            }
        }
    }

    /// Occurrences of a word (0 if never seen)
    pub fn count(&self, word: &str) -> u64 {
        self.entries.get(word).map_or(0, |e| e.count)
    }

    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `n` most frequent words, by descending count then first-seen order
    pub fn top(&self, n: usize) -> Vec<(String, u64)> {
        let mut ranked: Vec<(&String, &WordEntry)> = self.entries.iter().collect();
        ranked.sort_by(|a, b| {
            b.1.count
                .cmp(&a.1.count)
                .then_with(|| a.1.first_seen.cmp(&b.1.first_seen))
        });

        ranked
            .into_iter()
            .take(n)
            .map(|(word, entry)| (word.clone(), entry.count))
            .collect()
    }
}
