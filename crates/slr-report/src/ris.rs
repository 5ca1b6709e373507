//! RIS export of the included studies.

use slr_core::document::{ReviewDocument, Study};

const EMPTY: &str = "% Belum ada studi.";

/// One `TY`/`AU`/`TI`/`PY`/`JO`/`DO`/`ER` record per included study,
/// separated by blank lines.
pub fn included_studies_ris(doc: &ReviewDocument) -> String {
  let records: Vec<String> = doc.included_studies().map(record).collect();
  if records.is_empty() {
    return EMPTY.to_owned();
  }
  records.join("\n\n")
}

fn record(s: &Study) -> String {
  let author = if s.authors.is_empty() { "Unknown" } else { s.authors.as_str() };
  [
    "TY  - JOUR".to_owned(),
    format!("AU  - {author}"),
    format!("TI  - {}", s.title),
    format!("PY  - {}", s.year),
    format!("JO  - {}", s.source),
    format!("DO  - {}", s.doi),
    "ER  - ".to_owned(),
  ]
  .join("\n")
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use slr_core::document::ReviewDocument;

  use super::*;
  use crate::test_helpers::sample_review;

  #[test]
  fn placeholder_when_nothing_included() {
    assert_eq!(included_studies_ris(&ReviewDocument::default()), EMPTY);
  }

  #[test]
  fn fixed_tag_sequence() {
    let out = included_studies_ris(&sample_review());
    let records: Vec<&str> = out.split("\n\n").collect();
    assert_eq!(records.len(), 2);
    assert_eq!(
      records[1],
      "TY  - JOUR\nAU  - Unknown\nTI  - Chatbots, a survey\nPY  - 2021\nJO  - \nDO  - \nER  - "
    );
  }
}
