//! Plain-text views printed by the read-only commands.

use std::fmt::Write as _;

use slr_core::{
  document::ReviewDocument,
  qa::qa_score,
  views::{ProgressChecklist, ReviewStats},
};
use slr_report::analysis;

/// Every section of the document, ids included so they can be passed back
/// to the mutating commands.
pub fn overview(doc: &ReviewDocument) -> String {
  let mut out = String::new();
  let title = match doc.meta.title.as_str() {
    "" => "(untitled)",
    t => t,
  };
  let _ = writeln!(out, "{title}");
  if let Some(updated) = doc.meta.updated_at {
    let _ = writeln!(out, "last updated {}", updated.format("%Y-%m-%d %H:%M:%S UTC"));
  }

  let planning = &doc.planning;
  section(&mut out, "Research questions", planning.questions.len());
  for q in &planning.questions {
    let _ = writeln!(out, "  {} {}  [{}]", q.code, q.question, q.id);
    if let Some(rationale) = &q.rationale {
      let _ = writeln!(out, "      {rationale}");
    }
  }

  let pico = &planning.pico;
  let _ = writeln!(out, "\nPICO");
  for (label, value) in [
    ("P", &pico.population),
    ("I", &pico.intervention),
    ("C", &pico.comparison),
    ("O", &pico.outcome),
  ] {
    let _ = writeln!(out, "  {label}: {value}");
  }

  for (heading, items) in [
    ("Inclusion criteria", &planning.criteria.inclusion),
    ("Exclusion criteria", &planning.criteria.exclusion),
  ] {
    section(&mut out, heading, items.len());
    for c in items {
      let _ = writeln!(out, "  - {}  [{}]", c.text, c.id);
    }
  }

  section(&mut out, "Keyword groups", planning.keywords.len());
  for k in &planning.keywords {
    let joined = k.terms.join(&format!(" {} ", k.operator));
    let _ = writeln!(out, "  {}: ({joined})  [{}]", k.group, k.id);
  }

  section(&mut out, "Sources", planning.sources.len());
  for s in &planning.sources {
    let url = s.url.as_deref().unwrap_or("-");
    let _ = writeln!(out, "  {} {} {url}  [{}]", s.abbr, s.name, s.id);
  }

  section(&mut out, "Searches", doc.conducting.searches.len());
  for s in &doc.conducting.searches {
    let _ = writeln!(
      out,
      "  {} {} \"{}\" -> {}  [{}]",
      s.date.map_or_else(|| "-".to_owned(), |d| d.to_string()),
      s.source_label(doc),
      s.query,
      s.result_count,
      s.id
    );
  }

  section(&mut out, "Studies", doc.studies.len());
  for s in &doc.studies {
    let score = qa_score(s).map_or_else(|| "-".to_owned(), |n| n.to_string());
    let _ = writeln!(
      out,
      "  [{:<7}] {} ({}, {}) QA {score}  [{}]",
      s.verdict.as_str(),
      s.title,
      s.authors,
      s.year,
      s.id
    );
  }
  out
}

fn section(out: &mut String, heading: &str, count: usize) {
  let _ = writeln!(out, "\n{heading} ({count})");
}

pub fn stats(stats: &ReviewStats) -> String {
  let mut out = format!("Found in searches: {}\nStudies: {}\n", stats.total_found, stats.total);
  for (verdict, n, pct) in analysis::verdict_breakdown(stats) {
    let _ = writeln!(out, "  {:<8} {n:>4}  {pct:>3}%", verdict.as_str());
  }
  out
}

pub fn progress(checklist: &ProgressChecklist) -> String {
  let mut out = format!("Progress: {}%\n", checklist.percent());
  for (done, label) in [
    (checklist.has_question, "research question defined"),
    (checklist.has_pico, "PICO population or outcome filled in"),
    (checklist.has_inclusion, "inclusion criterion defined"),
    (checklist.has_study, "study recorded"),
    (checklist.has_included_study, "study included"),
  ] {
    let mark = if done { 'x' } else { ' ' };
    let _ = writeln!(out, "  [{mark}] {label}");
  }
  out
}

/// Year, source and QA distributions.
pub fn analysis(doc: &ReviewDocument) -> String {
  let mut out = String::from("Studies by year\n");
  for (year, n) in analysis::studies_by_year(doc) {
    let _ = writeln!(out, "  {year}  {n}");
  }
  out.push_str("\nStudies by source\n");
  for (source, n) in analysis::studies_by_source(doc) {
    let _ = writeln!(out, "  {source}  {n}");
  }
  out.push_str("\nQA scores of included studies\n");
  for entry in analysis::qa_distribution(doc) {
    let _ = writeln!(out, "  {:>2}/10 {:?}  {}", entry.score, entry.band, entry.title);
  }
  out
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use slr_core::views;

  use super::*;

  #[test]
  fn empty_progress_has_every_box_unchecked() {
    let text = progress(&ProgressChecklist::default());
    assert!(text.starts_with("Progress: 0%\n"));
    assert_eq!(text.matches("[ ]").count(), 5);
  }

  #[test]
  fn stats_lists_every_verdict() {
    let text = stats(&views::stats(&ReviewDocument::default()));
    for verdict in ["include", "maybe", "exclude", "pending"] {
      assert!(text.contains(verdict), "{verdict} missing from:\n{text}");
    }
  }

  #[test]
  fn overview_of_empty_document() {
    let text = overview(&ReviewDocument::default());
    assert!(text.starts_with("(untitled)\n"));
    assert!(text.contains("\nStudies (0)\n"));
  }
}
