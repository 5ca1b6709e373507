//! [`ReviewStore`] — the owner of the review document.
//!
//! The store holds the one in-memory [`ReviewDocument`], applies every
//! mutation to it, and after each one stamps `meta.updatedAt`, rewrites the
//! whole document to storage and notifies subscribers in registration order.
//!
//! The in-memory document is authoritative for the running session: a failed
//! write is logged and otherwise ignored, so only durability is lost.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  document::{
    Criterion, CriterionKind, KeywordGroup, Pico, QaAnswer, ResearchQuestion, ReviewDocument,
    SearchSession, Source, Study, Verdict, question_code,
  },
  id::{EntityId, EntityKind},
  input::{
    KeywordGroupPatch, NewKeywordGroup, NewQuestion, NewSearch, NewSource, NewStudy,
    QuestionPatch, StudyPatch,
  },
  merge::merge_onto_defaults,
  qa::{QA_QUESTIONS, qa_key, qa_score},
  storage::{DocumentStorage, STORAGE_KEY},
  views::{ProgressChecklist, ReviewStats, stats},
};

// ─── Loading ─────────────────────────────────────────────────────────────────

/// Parse a serialised document and merge it onto the current defaults.
pub fn parse_document(text: &str) -> Result<ReviewDocument> {
  let value: Value = serde_json::from_str(text)?;
  merge_onto_defaults(value)
}

/// Read the persisted document from `storage`.
///
/// Returns `Ok(None)` when nothing has been saved yet. Unreadable storage and
/// corrupt or mis-shaped data are errors; what to do about them is up to the
/// caller (see [`ReviewStore::open`]).
pub fn load_document<S: DocumentStorage>(storage: &S) -> Result<Option<ReviewDocument>> {
  let raw = storage
    .read(STORAGE_KEY)
    .map_err(|e| Error::Storage(Box::new(e)))?;
  raw.as_deref().map(parse_document).transpose()
}

/// File name offered for an export taken at `now`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
  format!("slr-export-{}.json", now.format("%Y-%m-%d-%H%M%S"))
}

// ─── Subscriptions ───────────────────────────────────────────────────────────

/// Handle returned by [`ReviewStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&ReviewDocument)>;

// ─── Entity lookup ───────────────────────────────────────────────────────────

trait Identified {
  const KIND: EntityKind;
  fn id(&self) -> &EntityId;
}

macro_rules! identified {
  ($($ty:ty => $kind:ident),* $(,)?) => {
    $(impl Identified for $ty {
      const KIND: EntityKind = EntityKind::$kind;
      fn id(&self) -> &EntityId { &self.id }
    })*
  };
}

identified! {
  ResearchQuestion => ResearchQuestion,
  Criterion => Criterion,
  KeywordGroup => KeywordGroup,
  Source => Source,
  SearchSession => SearchSession,
  Study => Study,
}

fn find_mut<'a, T: Identified>(items: &'a mut [T], id: &EntityId) -> Result<&'a mut T> {
  items
    .iter_mut()
    .find(|item| item.id() == id)
    .ok_or_else(|| Error::not_found(T::KIND, id))
}

fn remove<T: Identified>(items: &mut Vec<T>, id: &EntityId) -> Result<T> {
  let index = items
    .iter()
    .position(|item| item.id() == id)
    .ok_or_else(|| Error::not_found(T::KIND, id))?;
  Ok(items.remove(index))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// The review document together with its storage and subscribers.
///
/// Operations on an id that does not exist return [`Error::NotFound`] and
/// leave the document, the storage and the subscribers untouched. Input is
/// otherwise assumed to be validated by the caller (non-empty titles and
/// queries and the like).
pub struct ReviewStore<S: DocumentStorage> {
  storage:           S,
  doc:               ReviewDocument,
  subscribers:       Vec<(SubscriptionId, Subscriber)>,
  next_subscription: u64,
}

impl<S: DocumentStorage> ReviewStore<S> {
  /// Open the store over `storage`, loading the saved document if any.
  ///
  /// Never fails: with nothing saved, or with saved data that cannot be
  /// read, the store starts from a fresh document whose `createdAt` is now.
  /// Opening does not write to storage.
  pub fn open(storage: S) -> Self {
    let doc = match load_document(&storage) {
      Ok(Some(doc)) => {
        debug!(studies = doc.studies.len(), "loaded saved review document");
        doc
      }
      Ok(None) => {
        info!("no saved review document; starting a new one");
        ReviewDocument::new_at(Utc::now())
      }
      Err(e) => {
        warn!(error = %e, "saved review document is unreadable; starting a new one");
        ReviewDocument::new_at(Utc::now())
      }
    };
    Self::with_document(storage, doc)
  }

  /// Wrap an already-built document without reading storage.
  pub fn with_document(storage: S, doc: ReviewDocument) -> Self {
    Self {
      storage,
      doc,
      subscribers: Vec::new(),
      next_subscription: 0,
    }
  }

  pub fn document(&self) -> &ReviewDocument { &self.doc }

  pub fn storage(&self) -> &S { &self.storage }

  pub fn storage_mut(&mut self) -> &mut S { &mut self.storage }

  pub fn into_storage(self) -> S { self.storage }

  // ── Subscriptions ───────────────────────────────────────────────────────

  /// Register `f` to be called with the document after every mutation.
  pub fn subscribe(&mut self, f: impl FnMut(&ReviewDocument) + 'static) -> SubscriptionId {
    let id = SubscriptionId(self.next_subscription);
    self.next_subscription += 1;
    self.subscribers.push((id, Box::new(f)));
    id
  }

  /// Remove a subscriber. Returns `false` if it was not registered.
  pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
    let before = self.subscribers.len();
    self.subscribers.retain(|(sid, _)| *sid != id);
    self.subscribers.len() != before
  }

  // ── Commit path ─────────────────────────────────────────────────────────

  fn commit(&mut self) {
    self.doc.meta.updated_at = Some(Utc::now());
    self.persist();
    self.notify();
  }

  fn persist(&mut self) {
    let json = match serde_json::to_string(&self.doc) {
      Ok(json) => json,
      Err(e) => {
        warn!(error = %e, "failed to serialise review document; not saved");
        return;
      }
    };
    match self.storage.write(STORAGE_KEY, &json) {
      Ok(()) => debug!(bytes = json.len(), "review document saved"),
      Err(e) => warn!(error = %e, "failed to save review document; changes kept in memory only"),
    }
  }

  fn notify(&mut self) {
    for (_, f) in &mut self.subscribers {
      f(&self.doc);
    }
  }

  // ── Meta ────────────────────────────────────────────────────────────────

  pub fn set_title(&mut self, title: impl Into<String>) {
    self.doc.meta.title = title.into();
    self.commit();
  }

  // ── Research questions ──────────────────────────────────────────────────

  pub fn add_question(&mut self, input: NewQuestion) -> ResearchQuestion {
    let questions = &mut self.doc.planning.questions;
    let question = input.build(question_code(questions.len()));
    questions.push(question.clone());
    self.commit();
    question
  }

  pub fn update_question(&mut self, id: &EntityId, patch: QuestionPatch) -> Result<()> {
    patch.apply(find_mut(&mut self.doc.planning.questions, id)?);
    self.commit();
    Ok(())
  }

  /// Delete a question and renumber the rest `RQ1..RQn` in their current
  /// order.
  pub fn delete_question(&mut self, id: &EntityId) -> Result<()> {
    let questions = &mut self.doc.planning.questions;
    remove(questions, id)?;
    for (i, q) in questions.iter_mut().enumerate() {
      q.code = question_code(i);
    }
    self.commit();
    Ok(())
  }

  // ── PICO ────────────────────────────────────────────────────────────────

  pub fn set_pico(&mut self, pico: Pico) {
    self.doc.planning.pico = pico;
    self.commit();
  }

  // ── Criteria ────────────────────────────────────────────────────────────

  pub fn add_criterion(&mut self, kind: CriterionKind, text: impl Into<String>) -> Criterion {
    let criterion = Criterion {
      id:   EntityId::generate(),
      text: text.into(),
    };
    self.doc.planning.criteria.of_mut(kind).push(criterion.clone());
    self.commit();
    criterion
  }

  pub fn delete_criterion(&mut self, kind: CriterionKind, id: &EntityId) -> Result<()> {
    remove(self.doc.planning.criteria.of_mut(kind), id)?;
    self.commit();
    Ok(())
  }

  // ── Keyword groups ──────────────────────────────────────────────────────

  pub fn add_keyword_group(&mut self, input: NewKeywordGroup) -> KeywordGroup {
    let group = input.build();
    self.doc.planning.keywords.push(group.clone());
    self.commit();
    group
  }

  pub fn update_keyword_group(&mut self, id: &EntityId, patch: KeywordGroupPatch) -> Result<()> {
    patch.apply(find_mut(&mut self.doc.planning.keywords, id)?);
    self.commit();
    Ok(())
  }

  pub fn delete_keyword_group(&mut self, id: &EntityId) -> Result<()> {
    remove(&mut self.doc.planning.keywords, id)?;
    self.commit();
    Ok(())
  }

  // ── Sources ─────────────────────────────────────────────────────────────

  pub fn add_source(&mut self, input: NewSource) -> Source {
    let source = input.build();
    self.doc.planning.sources.push(source.clone());
    self.commit();
    source
  }

  /// Delete a source. Search sessions that reference it keep their
  /// (now dangling) `sourceId`.
  pub fn delete_source(&mut self, id: &EntityId) -> Result<()> {
    remove(&mut self.doc.planning.sources, id)?;
    self.commit();
    Ok(())
  }

  // ── Search sessions ─────────────────────────────────────────────────────

  pub fn add_search(&mut self, input: NewSearch) -> SearchSession {
    let search = input.build(Utc::now());
    self.doc.conducting.searches.push(search.clone());
    self.commit();
    search
  }

  pub fn delete_search(&mut self, id: &EntityId) -> Result<()> {
    remove(&mut self.doc.conducting.searches, id)?;
    self.commit();
    Ok(())
  }

  // ── Studies ─────────────────────────────────────────────────────────────

  pub fn study(&self, id: &EntityId) -> Option<&Study> { self.doc.study(id) }

  pub fn add_study(&mut self, input: NewStudy) -> Study {
    let study = input.build(Utc::now());
    self.doc.studies.push(study.clone());
    self.commit();
    study
  }

  pub fn update_study(&mut self, id: &EntityId, patch: StudyPatch) -> Result<()> {
    patch.apply(find_mut(&mut self.doc.studies, id)?);
    self.commit();
    Ok(())
  }

  pub fn delete_study(&mut self, id: &EntityId) -> Result<()> {
    remove(&mut self.doc.studies, id)?;
    self.commit();
    Ok(())
  }

  /// Set a study's screening verdict. Setting the verdict it already has is
  /// a no-op: nothing is stamped, saved or notified.
  pub fn set_verdict(&mut self, id: &EntityId, verdict: Verdict) -> Result<()> {
    let study = find_mut(&mut self.doc.studies, id)?;
    if study.verdict == verdict {
      return Ok(());
    }
    study.verdict = verdict;
    self.commit();
    Ok(())
  }

  /// Record the answer to QA question `question` (an index into
  /// [`QA_QUESTIONS`]) for a study.
  pub fn set_qa_score(&mut self, id: &EntityId, question: usize, answer: QaAnswer) -> Result<()> {
    if question >= QA_QUESTIONS.len() {
      return Err(Error::QaQuestionOutOfRange(question));
    }
    let study = find_mut(&mut self.doc.studies, id)?;
    study.qa_scores.insert(qa_key(question), answer);
    self.commit();
    Ok(())
  }

  // ── Computed views ──────────────────────────────────────────────────────

  pub fn stats(&self) -> ReviewStats { stats(&self.doc) }

  pub fn qa_score(&self, study: &Study) -> Option<u32> { qa_score(study) }

  pub fn progress_checklist(&self) -> ProgressChecklist { ProgressChecklist::of(&self.doc) }

  pub fn progress(&self) -> u8 { self.progress_checklist().percent() }

  // ── Import / export ─────────────────────────────────────────────────────

  /// The whole document, pretty-printed.
  pub fn export_json(&self) -> Result<String> { Ok(serde_json::to_string_pretty(&self.doc)?) }

  /// Replace the whole document with `text`, merged onto the defaults.
  ///
  /// Malformed input is returned as an error and the current document is
  /// kept. On success the imported document is taken as-is (its own
  /// `updatedAt` included), saved, and subscribers are notified.
  pub fn import_json(&mut self, text: &str) -> Result<()> {
    let doc = parse_document(text)?;
    info!(
      studies = doc.studies.len(),
      questions = doc.planning.questions.len(),
      "importing review document"
    );
    self.doc = doc;
    self.persist();
    self.notify();
    Ok(())
  }
}
