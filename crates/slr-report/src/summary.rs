//! Plain-text review summary, suitable for pasting into a report.

use chrono::{Datelike, NaiveDate};
use slr_core::{document::ReviewDocument, views::stats};

const DEFAULT_TITLE: &str = "Systematic Literature Review";

const MONTHS: [&str; 12] = [
  "Januari",
  "Februari",
  "Maret",
  "April",
  "Mei",
  "Juni",
  "Juli",
  "Agustus",
  "September",
  "Oktober",
  "November",
  "Desember",
];

/// `19 Oktober 2026`.
pub fn format_long_date(date: NaiveDate) -> String {
  format!("{} {} {}", date.day(), MONTHS[date.month0() as usize], date.year())
}

/// Title, date, search statistics and the numbered list of included studies.
pub fn summary_text(doc: &ReviewDocument, date: NaiveDate) -> String {
  let title = match doc.meta.title.as_str() {
    "" => DEFAULT_TITLE,
    t => t,
  };
  let stats = stats(doc);
  let included: Vec<String> = doc
    .included_studies()
    .enumerate()
    .map(|(i, s)| format!("{}. {} ({}, {})", i + 1, s.title, s.authors, s.year))
    .collect();
  let list = if included.is_empty() {
    "(belum ada)".to_owned()
  } else {
    included.join("\n")
  };

  format!(
    "Judul Review: {title}
Tanggal: {date}

Statistik Pencarian:
- Total Studi Ditemukan: {found}
- Total Studi Diperiksa: {total}
- Dimasukkan: {inc}
- Dikecualikan: {exc}
- Perlu Ditinjau: {maybe}

Studi yang Dimasukkan (n={n}):
{list}
",
    date = format_long_date(date),
    found = stats.total_found,
    total = stats.total,
    inc = stats.included,
    exc = stats.excluded,
    maybe = stats.maybe,
    n = included.len(),
  )
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::test_helpers::sample_review;

  fn day() -> NaiveDate { NaiveDate::from_ymd_opt(2026, 10, 19).unwrap() }

  #[test]
  fn long_date_uses_indonesian_months() {
    assert_eq!(format_long_date(day()), "19 Oktober 2026");
  }

  #[test]
  fn empty_review_summary() {
    let text = summary_text(&ReviewDocument::default(), day());
    assert!(text.starts_with("Judul Review: Systematic Literature Review\nTanggal: 19 Oktober 2026\n"));
    assert!(text.contains("Studi yang Dimasukkan (n=0):\n(belum ada)\n"));
  }

  #[test]
  fn summary_lists_included_studies() {
    let text = summary_text(&sample_review(), day());
    assert!(text.contains("- Total Studi Ditemukan: 150\n"));
    assert!(text.contains("- Perlu Ditinjau: 1\n"));
    assert!(text.contains("1. Tutoring with \"GPT\" (Smith, J., 2023)\n2. Chatbots, a survey (, 2021)\n"));
  }
}
