//! PRISMA flow counts and a printable text rendering of the flow diagram.

use std::fmt;

use serde::Serialize;
use slr_core::{document::ReviewDocument, views::stats};

/// Record counts at each stage of the PRISMA flow.
///
/// Studies marked `maybe` are counted as assessed for eligibility and then
/// excluded there; `exclude` verdicts are exclusions at title/abstract
/// screening.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrismaCounts {
  /// Records identified through database searching.
  pub identified:           u64,
  /// Duplicates removed. Not tracked per record; always zero.
  pub duplicates:           u64,
  pub screened:             usize,
  pub excluded_screening:   usize,
  pub assessed_eligibility: usize,
  pub excluded_eligibility: usize,
  pub included:             usize,
}

impl PrismaCounts {
  pub fn from_document(doc: &ReviewDocument) -> Self {
    let stats = stats(doc);
    Self {
      identified:           stats.total_found,
      duplicates:           0,
      screened:             stats.total,
      excluded_screening:   stats.excluded,
      assessed_eligibility: stats.included + stats.maybe,
      excluded_eligibility: stats.maybe,
      included:             stats.included,
    }
  }

  /// Records left after duplicate removal.
  pub fn after_deduplication(&self) -> u64 { self.identified.saturating_sub(self.duplicates) }
}

const BOX_WIDTH: usize = 36;

fn stage(f: &mut fmt::Formatter<'_>, title: &str, count: String, note: Option<String>) -> fmt::Result {
  let rule = "─".repeat(BOX_WIDTH);
  writeln!(f, "┌{rule}┐")?;
  writeln!(f, "│ {title:<width$} │", width = BOX_WIDTH - 2)?;
  match note {
    Some(note) => writeln!(f, "│ {count:<width$} │ ──▶ {note}", width = BOX_WIDTH - 2)?,
    None => writeln!(f, "│ {count:<width$} │", width = BOX_WIDTH - 2)?,
  }
  writeln!(f, "└{rule}┘")
}

fn arrow(f: &mut fmt::Formatter<'_>) -> fmt::Result {
  writeln!(f, "{:>width$}", "│", width = BOX_WIDTH / 2 + 1)?;
  writeln!(f, "{:>width$}", "▼", width = BOX_WIDTH / 2 + 1)
}

impl fmt::Display for PrismaCounts {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    stage(f, "Identifikasi", format!("{} rekaman dari database", self.identified), None)?;
    arrow(f)?;
    stage(
      f,
      "Setelah Deduplication",
      format!("{} rekaman unik", self.after_deduplication()),
      Some(format!("{} duplikat dihapus", self.duplicates)),
    )?;
    arrow(f)?;
    stage(
      f,
      "Skrining (Screening)",
      format!("{} rekaman disaring", self.screened),
      Some(format!("{} dikecualikan (judul/abstrak)", self.excluded_screening)),
    )?;
    arrow(f)?;
    stage(
      f,
      "Kelayakan (Eligibility)",
      format!("{} artikel dinilai", self.assessed_eligibility),
      Some(format!("{} dikecualikan (alasan lain)", self.excluded_eligibility)),
    )?;
    arrow(f)?;
    stage(f, "Dimasukkan", format!("{} studi dalam sintesis", self.included), None)
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::test_helpers::sample_review;

  #[test]
  fn counts_follow_verdicts() {
    assert_eq!(PrismaCounts::from_document(&sample_review()), PrismaCounts {
      identified:           150,
      duplicates:           0,
      screened:             4,
      excluded_screening:   1,
      assessed_eligibility: 3,
      excluded_eligibility: 1,
      included:             2,
    });
  }

  #[test]
  fn empty_review_is_all_zero() {
    assert_eq!(
      PrismaCounts::from_document(&ReviewDocument::default()),
      PrismaCounts::default()
    );
  }

  #[test]
  fn diagram_lists_every_stage() {
    let text = PrismaCounts::from_document(&sample_review()).to_string();
    for needle in [
      "150 rekaman dari database",
      "0 duplikat dihapus",
      "4 rekaman disaring",
      "1 dikecualikan (judul/abstrak)",
      "3 artikel dinilai",
      "2 studi dalam sintesis",
    ] {
      assert!(text.contains(needle), "missing {needle:?} in:\n{text}");
    }
  }
}
