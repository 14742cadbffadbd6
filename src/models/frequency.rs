use std::collections::HashMap;

/// Occurrence counts of the distinct values of one column.
///
/// Values are kept in the order they first appear in the rows, which is the
/// order both tie-breaks are defined against.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyReport {
    pub column: String,
    first_seen: Vec<(String, usize)>,
}

impl FrequencyReport {
    pub fn from_values<'a, I>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut positions: HashMap<&'a str, usize> = HashMap::new();
        let mut first_seen: Vec<(String, usize)> = Vec::new();

        for value in values {
            match positions.get(value) {
                Some(&position) => first_seen[position].1 += 1,
                None => {
                    positions.insert(value, first_seen.len());
                    first_seen.push((value.to_string(), 1));
                }
            }
        }

        Self {
            column: column.to_string(),
            first_seen,
        }
    }

    /// Count table ordered by descending frequency. Equal counts keep
    /// first-seen order.
    pub fn counts(&self) -> Vec<(&str, usize)> {
        let mut table: Vec<(&str, usize)> = self
            .first_seen
            .iter()
            .map(|(value, count)| (value.as_str(), *count))
            .collect();
        table.sort_by(|a, b| b.1.cmp(&a.1));
        table
    }

    /// Distinct values in first-occurrence row order.
    pub fn unique_values(&self) -> impl Iterator<Item = &str> {
        self.first_seen.iter().map(|(value, _)| value.as_str())
    }

    pub fn count_of(&self, value: &str) -> usize {
        self.first_seen
            .iter()
            .find(|(seen, _)| seen == value)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Highest-count value, taken from the head of the count table.
    pub fn mode(&self) -> Option<&str> {
        self.counts().first().map(|(value, _)| *value)
    }

    /// Lowest-count value. Scans the unique values in row order and keeps the
    /// first one holding the minimum, so ties resolve differently from `mode`.
    pub fn anti_mode(&self) -> Option<&str> {
        let mut least: Option<(&str, usize)> = None;
        for (value, count) in &self.first_seen {
            match least {
                Some((_, best)) if *count >= best => {}
                _ => least = Some((value.as_str(), *count)),
            }
        }
        least.map(|(value, _)| value)
    }

    /// The `n` most frequent values.
    pub fn top(&self, n: usize) -> Vec<(&str, usize)> {
        self.counts().into_iter().take(n).collect()
    }

    /// The `n` least frequent values, in count-table order.
    pub fn bottom(&self, n: usize) -> Vec<(&str, usize)> {
        let table = self.counts();
        let skip = table.len().saturating_sub(n);
        table.into_iter().skip(skip).collect()
    }

    pub fn distinct(&self) -> usize {
        self.first_seen.len()
    }

    pub fn total(&self) -> usize {
        self.first_seen.iter().map(|(_, count)| count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.first_seen.is_empty()
    }
}
