//! Computed read models over a [`ReviewDocument`] — never stored, always
//! derived.

use serde::{Deserialize, Serialize};

use crate::document::{ReviewDocument, Verdict};

// ─── Statistics ──────────────────────────────────────────────────────────────

/// Study counts by verdict plus the total number of search hits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
  pub total:       usize,
  pub included:    usize,
  pub excluded:    usize,
  pub maybe:       usize,
  pub pending:     usize,
  /// Sum of `resultCount` over every search session.
  pub total_found: u64,
}

pub fn stats(doc: &ReviewDocument) -> ReviewStats {
  let mut stats = ReviewStats {
    total: doc.studies.len(),
    total_found: doc
      .conducting
      .searches
      .iter()
      .map(|s| s.result_count)
      .sum(),
    ..ReviewStats::default()
  };
  for study in &doc.studies {
    match study.verdict {
      Verdict::Include => stats.included += 1,
      Verdict::Exclude => stats.excluded += 1,
      Verdict::Maybe => stats.maybe += 1,
      Verdict::Pending => stats.pending += 1,
    }
  }
  stats
}

// ─── Progress ────────────────────────────────────────────────────────────────

/// The five milestones that make up review progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressChecklist {
  pub has_question:       bool,
  /// PICO population or outcome is filled in.
  pub has_pico:           bool,
  pub has_inclusion:      bool,
  pub has_study:          bool,
  pub has_included_study: bool,
}

impl ProgressChecklist {
  pub fn of(doc: &ReviewDocument) -> Self {
    let pico = &doc.planning.pico;
    Self {
      has_question:       !doc.planning.questions.is_empty(),
      has_pico:           !pico.population.is_empty() || !pico.outcome.is_empty(),
      has_inclusion:      !doc.planning.criteria.inclusion.is_empty(),
      has_study:          !doc.studies.is_empty(),
      has_included_study: doc.included_studies().next().is_some(),
    }
  }

  fn items(&self) -> [bool; 5] {
    [
      self.has_question,
      self.has_pico,
      self.has_inclusion,
      self.has_study,
      self.has_included_study,
    ]
  }

  /// Percentage of milestones reached, rounded to the nearest integer.
  pub fn percent(&self) -> u8 {
    let items = self.items();
    let done = items.iter().filter(|&&d| d).count();
    (done as f64 / items.len() as f64 * 100.0).round() as u8
  }
}

pub fn progress(doc: &ReviewDocument) -> u8 { ProgressChecklist::of(doc).percent() }

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::{
    document::Criterion,
    id::EntityId,
    input::{NewQuestion, NewSearch, NewStudy},
  };

  fn study(verdict: Verdict) -> crate::document::Study {
    NewStudy { verdict, ..NewStudy::titled("S") }.build(Utc::now())
  }

  #[test]
  fn stats_count_each_verdict() {
    let mut doc = ReviewDocument::default();
    doc.studies = vec![study(Verdict::Include), study(Verdict::Exclude), study(Verdict::Maybe)];
    assert_eq!(
      stats(&doc),
      ReviewStats {
        total:       3,
        included:    1,
        excluded:    1,
        maybe:       1,
        pending:     0,
        total_found: 0,
      }
    );
  }

  #[test]
  fn total_found_sums_result_counts() {
    let mut doc = ReviewDocument::default();
    for n in [120, 0, 37] {
      let mut s = NewSearch::new("q").build(Utc::now());
      s.result_count = n;
      doc.conducting.searches.push(s);
    }
    assert_eq!(stats(&doc).total_found, 157);
  }

  #[test]
  fn empty_document_has_zero_progress() {
    assert_eq!(progress(&ReviewDocument::default()), 0);
  }

  #[test]
  fn complete_checklist_is_hundred() {
    let mut doc = ReviewDocument::default();
    doc.planning.questions.push(NewQuestion::new("Q?").build("RQ1".into()));
    doc.planning.pico.outcome = "accuracy".into();
    doc.planning.criteria.inclusion.push(Criterion {
      id:   EntityId::generate(),
      text: "peer reviewed".into(),
    });
    doc.studies.push(study(Verdict::Include));
    assert_eq!(progress(&doc), 100);
  }

  #[test]
  fn partial_progress_rounds() {
    let mut doc = ReviewDocument::default();
    doc.studies.push(study(Verdict::Pending));
    assert_eq!(progress(&doc), 20);
    doc.planning.pico.population = "nurses".into();
    assert_eq!(progress(&doc), 40);
  }
}
