//! BibTeX export of the included studies.

use slr_core::document::{ReviewDocument, Study};

const EMPTY: &str = "% Belum ada studi yang dimasukkan.";

/// One `@article` entry per included study, keyed `study<n>` by position and
/// separated by blank lines. Returns a comment line when nothing is
/// included.
pub fn included_studies_bibtex(doc: &ReviewDocument) -> String {
  let entries: Vec<String> = doc
    .included_studies()
    .enumerate()
    .map(|(i, s)| entry(i + 1, s))
    .collect();
  if entries.is_empty() {
    return EMPTY.to_owned();
  }
  entries.join("\n\n")
}

fn or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
  if value.is_empty() { fallback } else { value }
}

fn entry(n: usize, s: &Study) -> String {
  format!(
    "@article{{study{n},\n  author  = {{{author}}},\n  title   = {{{{{title}}}}},\n  journal = {{{journal}}},\n  year    = {{{year}}},\n  doi     = {{{doi}}},\n}}",
    author = or(&s.authors, "Unknown"),
    title = or(&s.title, "Unknown"),
    journal = s.source,
    year = or(&s.year, "0000"),
    doi = s.doi,
  )
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use slr_core::document::ReviewDocument;

  use super::*;
  use crate::test_helpers::sample_review;

  #[test]
  fn placeholder_when_nothing_included() {
    assert_eq!(included_studies_bibtex(&ReviewDocument::default()), EMPTY);
  }

  #[test]
  fn entries_are_numbered_and_defaulted() {
    let out = included_studies_bibtex(&sample_review());
    let entries: Vec<&str> = out.split("\n\n").collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(
      entries[0],
      "@article{study1,\n  author  = {Smith, J.},\n  title   = {{Tutoring with \"GPT\"}},\n  journal = {Computers & Education},\n  year    = {2023},\n  doi     = {10.1000/ce.1},\n}"
    );
    assert!(entries[1].starts_with("@article{study2,\n  author  = {Unknown},"));
    assert!(entries[1].contains("  year    = {2021},"));
  }
}
