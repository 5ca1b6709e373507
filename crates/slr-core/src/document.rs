//! The review document — the single tree that holds every piece of review
//! data.
//!
//! Field names serialise in camelCase. Every field except an entity's `id`
//! defaults when absent, so a document (or a collection element) written
//! before a field existed still decodes with the new field at its default.

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::id::EntityId;

// ─── Document root ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewDocument {
  pub meta:       Meta,
  pub planning:   Planning,
  pub conducting: Conducting,
  pub studies:    Vec<Study>,
}

impl ReviewDocument {
  /// A fresh, empty document with `createdAt` stamped to `now`.
  pub fn new_at(now: DateTime<Utc>) -> Self {
    let mut doc = Self::default();
    doc.meta.created_at = Some(now);
    doc
  }

  pub fn study(&self, id: &EntityId) -> Option<&Study> {
    self.studies.iter().find(|s| &s.id == id)
  }

  pub fn source(&self, id: &EntityId) -> Option<&Source> {
    self.planning.sources.iter().find(|s| &s.id == id)
  }

  /// Studies whose verdict is [`Verdict::Include`], in document order.
  pub fn included_studies(&self) -> impl Iterator<Item = &Study> {
    self.studies.iter().filter(|s| s.verdict == Verdict::Include)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Meta {
  pub title:      String,
  /// Set once, when the document is first created.
  pub created_at: Option<DateTime<Utc>>,
  /// Set by every mutation.
  pub updated_at: Option<DateTime<Utc>>,
}

// ─── Planning ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Planning {
  pub questions: Vec<ResearchQuestion>,
  pub pico:      Pico,
  pub criteria:  Criteria,
  pub keywords:  Vec<KeywordGroup>,
  pub sources:   Vec<Source>,
}

/// A research question. `code` tracks the question's 1-based position and is
/// rewritten whenever a question is deleted; `id` is the stable identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchQuestion {
  pub id:        EntityId,
  #[serde(default)]
  pub code:      String,
  #[serde(default)]
  pub question:  String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rationale: Option<String>,
}

/// Format the code for the question at zero-based `index`.
pub fn question_code(index: usize) -> String { format!("RQ{}", index + 1) }

/// Population / Intervention / Comparison / Outcome framing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pico {
  pub population:   String,
  pub intervention: String,
  pub comparison:   String,
  pub outcome:      String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Criteria {
  pub inclusion: Vec<Criterion>,
  pub exclusion: Vec<Criterion>,
}

impl Criteria {
  pub fn of(&self, kind: CriterionKind) -> &Vec<Criterion> {
    match kind {
      CriterionKind::Inclusion => &self.inclusion,
      CriterionKind::Exclusion => &self.exclusion,
    }
  }

  pub fn of_mut(&mut self, kind: CriterionKind) -> &mut Vec<Criterion> {
    match kind {
      CriterionKind::Inclusion => &mut self.inclusion,
      CriterionKind::Exclusion => &mut self.exclusion,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriterionKind {
  Inclusion,
  Exclusion,
}

impl fmt::Display for CriterionKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Inclusion => f.write_str("inclusion"),
      Self::Exclusion => f.write_str("exclusion"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
  pub id:   EntityId,
  #[serde(default)]
  pub text: String,
}

/// Display name given to a keyword group created without one.
pub const DEFAULT_KEYWORD_GROUP: &str = "Grup Kata Kunci";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordGroup {
  pub id:       EntityId,
  #[serde(default)]
  pub group:    String,
  #[serde(default)]
  pub operator: Operator,
  #[serde(default)]
  pub terms:    Vec<String>,
}

/// How the terms of a keyword group combine in a search string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
  And,
  #[default]
  Or,
}

impl fmt::Display for Operator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::And => f.write_str("AND"),
      Self::Or => f.write_str("OR"),
    }
  }
}

impl FromStr for Operator {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_uppercase().as_str() {
      "AND" => Ok(Self::And),
      "OR" => Ok(Self::Or),
      other => Err(format!("unknown operator {other:?} (expected AND or OR)")),
    }
  }
}

/// A bibliographic database searched during the review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
  pub id:   EntityId,
  #[serde(default)]
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url:  Option<String>,
  #[serde(default)]
  pub abbr: String,
}

/// Short display code derived from a source name: its first two characters,
/// upper-cased.
pub fn default_abbr(name: &str) -> String {
  name.chars().take(2).collect::<String>().to_uppercase()
}

// ─── Conducting ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conducting {
  pub searches: Vec<SearchSession>,
}

/// One executed search. `source_id` is a soft reference: the source may have
/// been deleted since, in which case `source_name` (or a placeholder) is what
/// readers should show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSession {
  pub id:           EntityId,
  #[serde(default)]
  pub source_id:    Option<EntityId>,
  #[serde(default)]
  pub source_name:  Option<String>,
  #[serde(default)]
  pub query:        String,
  /// Blank or unparseable dates read as `None`.
  #[serde(
    default,
    deserialize_with = "lenient_date",
    skip_serializing_if = "Option::is_none"
  )]
  pub date:         Option<NaiveDate>,
  #[serde(default, deserialize_with = "lenient_count")]
  pub result_count: u64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes:        Option<String>,
}

impl SearchSession {
  /// The label to show for this session's source, resolving the soft
  /// reference against `doc`.
  pub fn source_label<'a>(&'a self, doc: &'a ReviewDocument) -> &'a str {
    self
      .source_id
      .as_ref()
      .and_then(|id| doc.source(id))
      .map(|s| s.name.as_str())
      .or(self.source_name.as_deref().filter(|n| !n.is_empty()))
      .unwrap_or("-")
  }
}

/// Accept `YYYY-MM-DD` or a full RFC 3339 timestamp; anything else, the
/// empty string included, reads as no date.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = serde_json::Value::deserialize(deserializer)?;
  let Some(raw) = value.as_str().map(str::trim) else {
    return Ok(None);
  };
  Ok(
    raw
      .parse::<NaiveDate>()
      .ok()
      .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive())),
  )
}

/// Accept a number, a numeric string, or anything else (read as zero).
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
  D: Deserializer<'de>,
{
  let value = serde_json::Value::deserialize(deserializer)?;
  let n = match &value {
    serde_json::Value::Number(n) => n.as_f64().unwrap_or_default(),
    serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or_default(),
    _ => 0.0,
  };
  if n.is_finite() && n > 0.0 {
    Ok(n.trunc() as u64)
  } else {
    Ok(0)
  }
}

// ─── Studies ─────────────────────────────────────────────────────────────────

/// The screening decision on a study.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
  #[default]
  Pending,
  Include,
  Maybe,
  Exclude,
}

impl Verdict {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::Include => "include",
      Self::Maybe => "maybe",
      Self::Exclude => "exclude",
    }
  }
}

impl fmt::Display for Verdict {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Verdict {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pending" => Ok(Self::Pending),
      "include" => Ok(Self::Include),
      "maybe" => Ok(Self::Maybe),
      "exclude" => Ok(Self::Exclude),
      other => Err(format!(
        "unknown verdict {other:?} (expected pending, include, maybe or exclude)"
      )),
    }
  }
}

/// An answer to one quality-assessment question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QaAnswer {
  Yes,
  Partial,
  No,
}

impl QaAnswer {
  /// Contribution of this answer to the QA score.
  pub fn weight(self) -> f64 {
    match self {
      Self::Yes => 1.0,
      Self::Partial => 0.5,
      Self::No => 0.0,
    }
  }
}

impl fmt::Display for QaAnswer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Yes => f.write_str("yes"),
      Self::Partial => f.write_str("partial"),
      Self::No => f.write_str("no"),
    }
  }
}

impl FromStr for QaAnswer {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "yes" => Ok(Self::Yes),
      "partial" => Ok(Self::Partial),
      "no" => Ok(Self::No),
      other => Err(format!("unknown QA answer {other:?} (expected yes, partial or no)")),
    }
  }
}

/// Data-extraction fields recorded for a study.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractedData {
  pub methodology: String,
  pub sample_size: String,
  pub metrics:     String,
  pub findings:    String,
}

/// A candidate study found during searching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Study {
  pub id:             EntityId,
  #[serde(default)]
  pub title:          String,
  #[serde(default)]
  pub authors:        String,
  /// Publication year as entered; loosely numeric.
  #[serde(default)]
  pub year:           String,
  #[serde(default)]
  pub source:         String,
  #[serde(default)]
  pub doi:            String,
  #[serde(default, rename = "abstract")]
  pub abstract_text:  String,
  #[serde(default)]
  pub verdict:        Verdict,
  /// Sparse: keys are `q<index>` into [`crate::qa::QA_QUESTIONS`].
  #[serde(default)]
  pub qa_scores:      BTreeMap<String, QaAnswer>,
  #[serde(default)]
  pub tags:           Vec<String>,
  #[serde(default)]
  pub notes:          String,
  #[serde(default)]
  pub extracted_data: ExtractedData,
  #[serde(default)]
  pub added_at:       DateTime<Utc>,
}
