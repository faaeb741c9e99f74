use crate::option::ComboOption;

/// Indices into `options` whose label contains `query`, ignoring case.
///
/// Candidate order is preserved and an empty query matches everything.
pub fn filter_options(options: &[ComboOption], query: &str) -> Vec<usize> {
    let query_lower = query.to_lowercase();
    options
        .iter()
        .enumerate()
        .filter(|(_, option)| option.label.to_lowercase().contains(&query_lower))
        .map(|(i, _)| i)
        .collect()
}

/// The visible subset of the candidate set, tagged with the query it was
/// derived from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredSet {
    indices: Vec<usize>,
    query: String,
}

impl FilteredSet {
    pub fn derive(options: &[ComboOption], query: &str) -> Self {
        Self {
            indices: filter_options(options, query),
            query: query.to_string(),
        }
    }

    /// Query this set reflects. Lags the live search text while a debounce
    /// is pending.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Candidate-set index of the `position`-th visible option.
    pub fn candidate_index(&self, position: usize) -> Option<usize> {
        self.indices.get(position).copied()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Resolve the visible options against the candidate set they came from.
    pub fn resolve<'a>(&'a self, options: &'a [ComboOption]) -> impl Iterator<Item = &'a ComboOption> + 'a {
        self.indices.iter().filter_map(move |&i| options.get(i))
    }
}
