//! Boolean keyword query grammar.
//!
//! A query is a whitespace-separated list of terms: `+term` must be present,
//! `-term` must be absent, and bare terms form an OR group. Matching is
//! case-insensitive substring containment over an entry's title and
//! description. The parsed form is storage-agnostic: it can be evaluated
//! directly against an in-memory entry or compiled into SQL by the store.

/// Parsed keyword expression: ordered term classes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordQuery {
    pub required: Vec<String>,
    pub excluded: Vec<String>,
    pub optional: Vec<String>,
}

impl KeywordQuery {
    /// Split a raw expression into term classes. Prefix-only tokens
    /// (`+` or `-` with no term) are dropped.
    pub fn parse(expression: &str) -> Self {
        let mut query = Self::default();

        for token in expression.split_whitespace() {
            if let Some(term) = token.strip_prefix('+') {
                if !term.is_empty() {
                    query.required.push(term.to_string());
                }
            } else if let Some(term) = token.strip_prefix('-') {
                if !term.is_empty() {
                    query.excluded.push(term.to_string());
                }
            } else {
                query.optional.push(token.to_string());
            }
        }

        query
    }

    /// True when no term survived parsing; an empty query matches everything.
    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.excluded.is_empty() && self.optional.is_empty()
    }

    /// Label term for rule digests: the first optional term, falling back to
    /// the first required term.
    pub fn label(&self) -> Option<&str> {
        self.optional
            .first()
            .or_else(|| self.required.first())
            .map(String::as_str)
    }

    /// Evaluate the predicate against one entry's text fields:
    /// `(any optional, vacuously true when none) AND (all required) AND
    /// (no excluded)`. A term hits when it is contained in the title or the
    /// description; an excluded term rejects when present in either.
    pub fn matches(&self, title: &str, description: &str) -> bool {
        let title = title.to_lowercase();
        let description = description.to_lowercase();

        let hit = |term: &String| {
            let term = term.to_lowercase();
            title.contains(&term) || description.contains(&term)
        };

        if self.excluded.iter().any(hit) {
            return false;
        }

        if !self.required.iter().all(hit) {
            return false;
        }

        self.optional.is_empty() || self.optional.iter().any(hit)
    }
}
