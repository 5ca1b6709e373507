//! Distributions behind the analysis charts.

use std::collections::BTreeMap;

use serde::Serialize;
use slr_core::{
  document::{ReviewDocument, Verdict},
  qa::qa_score,
  views::ReviewStats,
};

/// Label used for studies that have no source recorded.
pub const UNKNOWN_SOURCE: &str = "Tidak diketahui";

/// Study counts per publication year, years ascending. Studies without a
/// year are left out.
pub fn studies_by_year(doc: &ReviewDocument) -> Vec<(String, usize)> {
  let mut years: BTreeMap<&str, usize> = BTreeMap::new();
  for study in doc.studies.iter().filter(|s| !s.year.is_empty()) {
    *years.entry(study.year.as_str()).or_default() += 1;
  }
  years.into_iter().map(|(y, n)| (y.to_owned(), n)).collect()
}

/// Study counts per source, in order of first appearance.
pub fn studies_by_source(doc: &ReviewDocument) -> Vec<(String, usize)> {
  let mut out: Vec<(String, usize)> = Vec::new();
  for study in &doc.studies {
    let source = match study.source.as_str() {
      "" => UNKNOWN_SOURCE,
      s => s,
    };
    match out.iter_mut().find(|(name, _)| name == source) {
      Some((_, n)) => *n += 1,
      None => out.push((source.to_owned(), 1)),
    }
  }
  out
}

/// Coarse quality band of a QA score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QaBand {
  High,
  Medium,
  Low,
}

impl QaBand {
  pub fn of(score: u32) -> Self {
    match score {
      7.. => Self::High,
      4..=6 => Self::Medium,
      _ => Self::Low,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QaEntry {
  pub title: String,
  pub score: u32,
  pub band:  QaBand,
}

/// QA scores of the included studies that have been assessed.
pub fn qa_distribution(doc: &ReviewDocument) -> Vec<QaEntry> {
  doc
    .included_studies()
    .filter_map(|s| {
      qa_score(s).map(|score| QaEntry {
        title: s.title.clone(),
        score,
        band: QaBand::of(score),
      })
    })
    .collect()
}

/// Each verdict with its count and rounded share of all studies.
pub fn verdict_breakdown(stats: &ReviewStats) -> [(Verdict, usize, u8); 4] {
  let total = stats.total.max(1) as f64;
  let pct = |n: usize| (n as f64 / total * 100.0).round() as u8;
  [
    (Verdict::Include, stats.included, pct(stats.included)),
    (Verdict::Maybe, stats.maybe, pct(stats.maybe)),
    (Verdict::Exclude, stats.excluded, pct(stats.excluded)),
    (Verdict::Pending, stats.pending, pct(stats.pending)),
  ]
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use slr_core::views::stats;

  use super::*;
  use crate::test_helpers::sample_review;

  #[test]
  fn years_ascending_without_blanks() {
    assert_eq!(studies_by_year(&sample_review()), vec![
      ("2021".to_string(), 1),
      ("2023".to_string(), 2),
    ]);
  }

  #[test]
  fn sources_in_first_seen_order() {
    assert_eq!(studies_by_source(&sample_review()), vec![
      ("Computers & Education".to_string(), 2),
      (UNKNOWN_SOURCE.to_string(), 2),
    ]);
  }

  #[test]
  fn qa_distribution_skips_unscored() {
    assert_eq!(qa_distribution(&sample_review()), vec![QaEntry {
      title: "Tutoring with \"GPT\"".into(),
      score: 10,
      band:  QaBand::High,
    }]);
  }

  #[test]
  fn bands() {
    assert_eq!(QaBand::of(7), QaBand::High);
    assert_eq!(QaBand::of(4), QaBand::Medium);
    assert_eq!(QaBand::of(3), QaBand::Low);
  }

  #[test]
  fn breakdown_percentages() {
    let breakdown = verdict_breakdown(&stats(&sample_review()));
    assert_eq!(breakdown[0], (Verdict::Include, 2, 50));
    assert_eq!(breakdown[3], (Verdict::Pending, 0, 0));
  }

  #[test]
  fn breakdown_of_empty_review_is_zero() {
    let breakdown = verdict_breakdown(&ReviewStats::default());
    assert!(breakdown.iter().all(|&(_, n, p)| n == 0 && p == 0));
  }
}
