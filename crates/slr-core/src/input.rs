//! Caller-supplied inputs for creating and updating entities.
//!
//! `New*` types carry what the caller knows at creation time; the store fills
//! in ids, codes, timestamps and defaults. `*Patch` types are shallow: every
//! `Some` field overwrites the stored value, every `None` leaves it alone.

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
  document::{
    DEFAULT_KEYWORD_GROUP, ExtractedData, KeywordGroup, Operator, ResearchQuestion,
    SearchSession, Source, Study, Verdict, default_abbr,
  },
  id::EntityId,
};

// ─── Research questions ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct NewQuestion {
  pub question:  String,
  pub rationale: Option<String>,
}

impl NewQuestion {
  pub fn new(question: impl Into<String>) -> Self {
    Self { question: question.into(), rationale: None }
  }

  pub(crate) fn build(self, code: String) -> ResearchQuestion {
    ResearchQuestion {
      id: EntityId::generate(),
      code,
      question: self.question,
      rationale: self.rationale,
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct QuestionPatch {
  pub question:  Option<String>,
  pub rationale: Option<Option<String>>,
}

impl QuestionPatch {
  pub(crate) fn apply(self, q: &mut ResearchQuestion) {
    if let Some(question) = self.question {
      q.question = question;
    }
    if let Some(rationale) = self.rationale {
      q.rationale = rationale;
    }
  }
}

// ─── Keyword groups ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct NewKeywordGroup {
  pub group:    String,
  pub operator: Operator,
  pub terms:    Vec<String>,
}

impl NewKeywordGroup {
  pub(crate) fn build(self) -> KeywordGroup {
    let group = match self.group.trim() {
      "" => DEFAULT_KEYWORD_GROUP.to_owned(),
      name => name.to_owned(),
    };
    KeywordGroup {
      id: EntityId::generate(),
      group,
      operator: self.operator,
      terms: clean_terms(self.terms),
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct KeywordGroupPatch {
  pub group:    Option<String>,
  pub operator: Option<Operator>,
  pub terms:    Option<Vec<String>>,
}

impl KeywordGroupPatch {
  pub(crate) fn apply(self, k: &mut KeywordGroup) {
    if let Some(group) = self.group {
      k.group = group;
    }
    if let Some(operator) = self.operator {
      k.operator = operator;
    }
    if let Some(terms) = self.terms {
      k.terms = clean_terms(terms);
    }
  }
}

/// Trim every term and drop the empty ones. Duplicates are kept.
fn clean_terms(terms: Vec<String>) -> Vec<String> {
  terms
    .into_iter()
    .map(|t| t.trim().to_owned())
    .filter(|t| !t.is_empty())
    .collect()
}

// ─── Sources ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct NewSource {
  pub name: String,
  pub url:  Option<String>,
  /// Upper-cased on creation; derived from `name` when absent or blank.
  pub abbr: Option<String>,
}

impl NewSource {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), url: None, abbr: None }
  }

  pub(crate) fn build(self) -> Source {
    let abbr = self
      .abbr
      .map(|a| a.trim().to_uppercase())
      .filter(|a| !a.is_empty())
      .unwrap_or_else(|| default_abbr(&self.name));
    Source {
      id: EntityId::generate(),
      name: self.name,
      url: self.url.filter(|u| !u.is_empty()),
      abbr,
    }
  }
}

// ─── Search sessions ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct NewSearch {
  pub source_id:    Option<EntityId>,
  pub source_name:  Option<String>,
  pub query:        String,
  /// Defaults to the creation date.
  pub date:         Option<NaiveDate>,
  pub result_count: u64,
  pub notes:        Option<String>,
}

impl NewSearch {
  pub fn new(query: impl Into<String>) -> Self {
    Self { query: query.into(), ..Self::default() }
  }

  pub(crate) fn build(self, now: DateTime<Utc>) -> SearchSession {
    SearchSession {
      id:           EntityId::generate(),
      source_id:    self.source_id,
      source_name:  self.source_name,
      query:        self.query,
      date:         Some(self.date.unwrap_or_else(|| now.date_naive())),
      result_count: self.result_count,
      notes:        self.notes,
    }
  }
}

// ─── Studies ─────────────────────────────────────────────────────────────────

/// A new study. Only `title` is required by the caller; everything else
/// starts empty (and the verdict at [`Verdict::Pending`]) unless supplied.
#[derive(Debug, Clone, Default)]
pub struct NewStudy {
  pub title:          String,
  pub authors:        String,
  pub year:           String,
  pub source:         String,
  pub doi:            String,
  pub abstract_text:  String,
  pub verdict:        Verdict,
  pub tags:           Vec<String>,
  pub notes:          String,
  pub extracted_data: ExtractedData,
}

impl NewStudy {
  pub fn titled(title: impl Into<String>) -> Self {
    Self { title: title.into(), ..Self::default() }
  }

  pub(crate) fn build(self, now: DateTime<Utc>) -> Study {
    Study {
      id:             EntityId::generate(),
      title:          self.title,
      authors:        self.authors,
      year:           self.year,
      source:         self.source,
      doi:            self.doi,
      abstract_text:  self.abstract_text,
      verdict:        self.verdict,
      qa_scores:      Default::default(),
      tags:           self.tags,
      notes:          self.notes,
      extracted_data: self.extracted_data,
      added_at:       now,
    }
  }
}

/// Shallow update of a study. `extracted_data`, when present, replaces the
/// whole record.
#[derive(Debug, Clone, Default)]
pub struct StudyPatch {
  pub title:          Option<String>,
  pub authors:        Option<String>,
  pub year:           Option<String>,
  pub source:         Option<String>,
  pub doi:            Option<String>,
  pub abstract_text:  Option<String>,
  pub verdict:        Option<Verdict>,
  pub tags:           Option<Vec<String>>,
  pub notes:          Option<String>,
  pub extracted_data: Option<ExtractedData>,
}

impl StudyPatch {
  pub fn is_empty(&self) -> bool {
    self.title.is_none()
      && self.authors.is_none()
      && self.year.is_none()
      && self.source.is_none()
      && self.doi.is_none()
      && self.abstract_text.is_none()
      && self.verdict.is_none()
      && self.tags.is_none()
      && self.notes.is_none()
      && self.extracted_data.is_none()
  }

  pub(crate) fn apply(self, s: &mut Study) {
    fn set<T>(slot: &mut T, value: Option<T>) {
      if let Some(v) = value {
        *slot = v;
      }
    }
    set(&mut s.title, self.title);
    set(&mut s.authors, self.authors);
    set(&mut s.year, self.year);
    set(&mut s.source, self.source);
    set(&mut s.doi, self.doi);
    set(&mut s.abstract_text, self.abstract_text);
    set(&mut s.verdict, self.verdict);
    set(&mut s.tags, self.tags);
    set(&mut s.notes, self.notes);
    set(&mut s.extracted_data, self.extracted_data);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn keyword_group_defaults_name_and_cleans_terms() {
    let group = NewKeywordGroup {
      group:    "  ".into(),
      operator: Operator::And,
      terms:    vec![" deep learning ".into(), "".into(), "cnn".into(), "cnn".into()],
    }
    .build();
    assert_eq!(group.group, DEFAULT_KEYWORD_GROUP);
    assert_eq!(group.terms, vec!["deep learning", "cnn", "cnn"]);
  }

  #[test]
  fn source_abbr_derived_from_name() {
    let source = NewSource::new("scopus").build();
    assert_eq!(source.abbr, "SC");
    assert_eq!(source.url, None);
  }

  #[test]
  fn source_abbr_supplied_is_uppercased() {
    let source = NewSource {
      name: "Web of Science".into(),
      url:  Some("https://www.webofscience.com".into()),
      abbr: Some("ws".into()),
    }
    .build();
    assert_eq!(source.abbr, "WS");
  }

  #[test]
  fn search_date_defaults_to_creation_day() {
    let now = DateTime::parse_from_rfc3339("2024-03-05T23:10:00Z")
      .unwrap()
      .with_timezone(&Utc);
    let search = NewSearch::new("\"llm\" AND review").build(now);
    assert_eq!(search.date, NaiveDate::from_ymd_opt(2024, 3, 5));
    assert_eq!(search.result_count, 0);
  }

  #[test]
  fn study_patch_overwrites_only_supplied_fields() {
    let mut study = NewStudy {
      authors: "Doe, J.".into(),
      ..NewStudy::titled("Original")
    }
    .build(Utc::now());
    StudyPatch { title: Some("Renamed".into()), ..StudyPatch::default() }.apply(&mut study);
    assert_eq!(study.title, "Renamed");
    assert_eq!(study.authors, "Doe, J.");
  }
}
