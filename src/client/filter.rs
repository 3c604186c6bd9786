use std::collections::BTreeMap;

use crate::entity::Note;

/// Client-side view filters over a fetched note list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteFilter {
    /// Case-insensitive substring matched against title and content.
    pub search: Option<String>,
    /// Exact tag match.
    pub tag: Option<String>,
}

impl NoteFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.tag.is_none()
    }

    pub fn matches(&self, note: &Note) -> bool {
        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            if !note.title.to_lowercase().contains(&term)
                && !note.content.to_lowercase().contains(&term)
            {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !note.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, notes: &'a [Note]) -> Vec<&'a Note> {
        notes.iter().filter(|n| self.matches(n)).collect()
    }
}

/// Distinct tags with the number of notes carrying each, most used first.
///
/// A tag repeated on one note counts once for that note.
pub fn tag_summary(notes: &[Note]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for note in notes {
        let mut seen: Vec<&str> = Vec::new();
        for tag in &note.tags {
            if !seen.contains(&tag.as_str()) {
                seen.push(tag);
                *counts.entry(tag).or_default() += 1;
            }
        }
    }

    let mut summary: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(tag, count)| (tag.to_string(), count))
        .collect();
    summary.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    summary
}
