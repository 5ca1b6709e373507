//! The quality-assessment rubric and per-study scoring.
//!
//! The rubric is process-wide configuration, never stored in a document.
//! Studies reference its questions positionally through `q<index>` keys.

use crate::document::Study;

/// The fixed, ordered QA rubric.
pub const QA_QUESTIONS: [&str; 8] = [
  "Apakah tujuan penelitian didefinisikan dengan jelas?",
  "Apakah desain penelitian sesuai dengan tujuan?",
  "Apakah metode pengumpulan data dijelaskan secara rinci?",
  "Apakah validitas dan reliabilitas dibahas?",
  "Apakah analisis data dijelaskan secara memadai?",
  "Apakah temuan disajikan dengan jelas?",
  "Apakah keterbatasan penelitian dibahas?",
  "Apakah kesimpulan didukung oleh data?",
];

/// Key under which the answer to question `index` is stored.
pub fn qa_key(index: usize) -> String { format!("q{index}") }

/// Score a study on a 0–10 scale, or `None` if it has no answers.
///
/// The weighted sum of the answered questions is divided by the size of the
/// whole rubric, so unanswered questions pull the score down rather than
/// dropping out of the denominator.
pub fn qa_score(study: &Study) -> Option<u32> {
  if study.qa_scores.is_empty() {
    return None;
  }
  let sum: f64 = study.qa_scores.values().map(|a| a.weight()).sum();
  Some((sum / QA_QUESTIONS.len() as f64 * 10.0).round() as u32)
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::{document::QaAnswer, input::NewStudy};

  fn study_with(answers: &[(usize, QaAnswer)]) -> Study {
    let mut study = NewStudy::titled("X").build(Utc::now());
    for &(i, a) in answers {
      study.qa_scores.insert(qa_key(i), a);
    }
    study
  }

  #[test]
  fn no_answers_scores_none() {
    assert_eq!(qa_score(&study_with(&[])), None);
  }

  #[test]
  fn half_yes_half_no_scores_five() {
    let answers: Vec<_> = (0..8)
      .map(|i| (i, if i < 4 { QaAnswer::Yes } else { QaAnswer::No }))
      .collect();
    assert_eq!(qa_score(&study_with(&answers)), Some(5));
  }

  #[test]
  fn single_yes_is_normalised_against_whole_rubric() {
    assert_eq!(qa_score(&study_with(&[(0, QaAnswer::Yes)])), Some(1));
  }

  #[test]
  fn partial_counts_half() {
    let answers: Vec<_> = (0..8).map(|i| (i, QaAnswer::Partial)).collect();
    assert_eq!(qa_score(&study_with(&answers)), Some(5));
  }

  #[test]
  fn all_yes_scores_ten() {
    let answers: Vec<_> = (0..8).map(|i| (i, QaAnswer::Yes)).collect();
    assert_eq!(qa_score(&study_with(&answers)), Some(10));
  }

  #[test]
  fn all_no_scores_zero_not_none() {
    assert_eq!(qa_score(&study_with(&[(3, QaAnswer::No)])), Some(0));
  }
}
