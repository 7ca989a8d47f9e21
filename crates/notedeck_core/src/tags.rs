//! Tag helpers derived from the comma-separated `tags` field.
//!
//! Nothing here is stored: the tag options and the filtered view are always
//! recomputed from the canonical note list.

use crate::models::Note;

/// Split a comma-separated tag string into trimmed, non-empty tags.
pub fn split_tags(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|tag| !tag.is_empty())
}

/// Distinct tags across `notes`, in first-seen order.
pub fn tag_options(notes: &[Note]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for note in notes {
        for tag in split_tags(&note.tags) {
            if !out.iter().any(|existing| existing == tag) {
                out.push(tag.to_string());
            }
        }
    }
    out
}

/// Notes carrying `selected` exactly; an empty selection keeps every note.
pub fn filter_by_tag<'a>(notes: &'a [Note], selected: &str) -> Vec<&'a Note> {
    let selected = selected.trim();
    if selected.is_empty() {
        return notes.iter().collect();
    }
    notes.iter().filter(|note| note.has_tag(selected)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str, tags: &str) -> Note {
        Note {
            id: id.to_string(),
            title: format!("title {}", id),
            content: format!("content {}", id),
            tags: tags.to_string(),
            file_url: None,
        }
    }

    fn sample() -> Vec<Note> {
        vec![note("1", "a,b"), note("2", "b,c"), note("3", "d")]
    }

    fn ids(notes: &[&Note]) -> Vec<String> {
        notes.iter().map(|note| note.id.clone()).collect()
    }

    #[test]
    fn selecting_a_tag_keeps_only_exact_matches() {
        let notes = sample();
        assert_eq!(ids(&filter_by_tag(&notes, "b")), vec!["1", "2"]);
        assert_eq!(ids(&filter_by_tag(&notes, "d")), vec!["3"]);
        assert!(filter_by_tag(&notes, "e").is_empty());
    }

    #[test]
    fn empty_selection_keeps_everything() {
        let notes = sample();
        assert_eq!(ids(&filter_by_tag(&notes, "")), vec!["1", "2", "3"]);
    }

    #[test]
    fn tag_options_are_deduplicated_in_first_seen_order() {
        assert_eq!(tag_options(&sample()), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn split_tags_trims_and_skips_blanks() {
        let parsed: Vec<&str> = split_tags(" rust, ,cli,,notes ").collect();
        assert_eq!(parsed, vec!["rust", "cli", "notes"]);
        assert_eq!(split_tags("").count(), 0);
    }

    #[test]
    fn tag_options_ignore_notes_without_tags() {
        let notes = vec![note("1", ""), note("2", " , "), note("3", "x")];
        assert_eq!(tag_options(&notes), vec!["x"]);
    }
}
