//! Spreadsheet export of the included studies.
//!
//! UTF-8 with a byte-order mark so spreadsheet software picks the right
//! encoding; `\n` line endings; fields quoted when needed, with embedded
//! double quotes doubled.

use slr_core::{document::ReviewDocument, qa::qa_score};

use crate::Result;

const BOM: &str = "\u{feff}";

pub const CSV_HEADERS: [&str; 9] = [
  "No",
  "Judul",
  "Penulis",
  "Tahun",
  "Sumber",
  "DOI",
  "QA Score",
  "Metodologi",
  "Temuan",
];

/// One row per included study: index, title, authors, year, source, DOI, QA
/// score (blank if unscored), methodology, findings.
pub fn included_studies_csv(doc: &ReviewDocument) -> Result<String> {
  let mut writer = csv::WriterBuilder::new()
    .terminator(csv::Terminator::Any(b'\n'))
    .quote_style(csv::QuoteStyle::Necessary)
    .from_writer(Vec::new());

  writer.write_record(CSV_HEADERS)?;
  for (i, study) in doc.included_studies().enumerate() {
    let index = (i + 1).to_string();
    let score = qa_score(study).map(|s| s.to_string()).unwrap_or_default();
    writer.write_record([
      index.as_str(),
      study.title.as_str(),
      study.authors.as_str(),
      study.year.as_str(),
      study.source.as_str(),
      study.doi.as_str(),
      score.as_str(),
      study.extracted_data.methodology.as_str(),
      study.extracted_data.findings.as_str(),
    ])?;
  }

  let bytes = writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
  Ok(format!("{BOM}{}", String::from_utf8(bytes)?))
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use slr_core::document::ReviewDocument;

  use super::*;
  use crate::test_helpers::sample_review;

  #[test]
  fn starts_with_bom_and_header() {
    let out = included_studies_csv(&ReviewDocument::default()).unwrap();
    assert_eq!(out, "\u{feff}No,Judul,Penulis,Tahun,Sumber,DOI,QA Score,Metodologi,Temuan\n");
  }

  #[test]
  fn one_row_per_included_study_with_escaping() {
    let out = included_studies_csv(&sample_review()).unwrap();
    let lines: Vec<&str> = out.trim_start_matches(BOM).lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
      lines[1],
      "1,\"Tutoring with \"\"GPT\"\"\",\"Smith, J.\",2023,Computers & Education,10.1000/ce.1,10,\"RCT, \"\"blinded\"\"\",Improved scores"
    );
    assert_eq!(lines[2], "2,\"Chatbots, a survey\",,2021,,,,,");
  }
}
