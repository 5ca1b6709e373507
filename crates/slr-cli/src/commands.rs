//! Subcommands and their dispatch onto the review store.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail, ensure};
use chrono::{NaiveDate, Utc};
use clap::{Subcommand, ValueEnum};
use slr_core::{
  ReviewStore,
  document::{CriterionKind, ExtractedData, Operator, Pico, QaAnswer, Verdict},
  id::EntityId,
  input::{
    KeywordGroupPatch, NewKeywordGroup, NewQuestion, NewSearch, NewSource, NewStudy,
    QuestionPatch, StudyPatch,
  },
  qa::QA_QUESTIONS,
  storage::DocumentStorage,
  store::export_file_name,
};
use tracing::info;

use crate::render;

// ─── Command tree ─────────────────────────────────────────────────────────────

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Print the whole review.
  Show,
  /// Study counts by verdict.
  Stats,
  /// Milestone checklist and overall progress.
  Progress,
  /// Year, source and QA distributions.
  Analysis,
  /// Set the review title.
  Title { title: String },
  /// Research questions.
  #[command(subcommand)]
  Question(QuestionCommand),
  /// Set PICO fields; omitted fields keep their current value.
  Pico {
    #[arg(long, short = 'p')]
    population:   Option<String>,
    #[arg(long, short = 'i')]
    intervention: Option<String>,
    #[arg(long, short = 'c')]
    comparison:   Option<String>,
    #[arg(long, short = 'o')]
    outcome:      Option<String>,
  },
  /// Inclusion and exclusion criteria.
  #[command(subcommand)]
  Criterion(CriterionCommand),
  /// Keyword groups for building search strings.
  #[command(subcommand)]
  Keyword(KeywordCommand),
  /// Bibliographic databases.
  #[command(subcommand)]
  Source(SourceCommand),
  /// Executed search sessions.
  #[command(subcommand)]
  Search(SearchCommand),
  /// Candidate studies.
  #[command(subcommand)]
  Study(StudyCommand),
  /// Screen a study. Choosing the verdict it already has resets it to
  /// pending.
  Screen { id: String, verdict: Verdict },
  /// Answer a quality-assessment question (1-based) for a study.
  Qa {
    id:       String,
    question: usize,
    answer:   QaAnswer,
  },
  /// List the quality-assessment rubric.
  Rubric,
  /// Write the review document as JSON.
  Export {
    /// Output file; defaults to a timestamped name in the current directory.
    #[arg(long, short)]
    out: Option<PathBuf>,
  },
  /// Replace the review document with a JSON export.
  Import { file: PathBuf },
  /// Render a report of the included studies.
  Report {
    format: ReportFormat,
    /// Output file; defaults to stdout.
    #[arg(long, short)]
    out:    Option<PathBuf>,
  },
}

#[derive(Subcommand, Debug)]
pub enum QuestionCommand {
  Add {
    question:  String,
    #[arg(long)]
    rationale: Option<String>,
  },
  Update {
    id:              String,
    #[arg(long)]
    question:        Option<String>,
    #[arg(long, conflicts_with = "clear_rationale")]
    rationale:       Option<String>,
    #[arg(long)]
    clear_rationale: bool,
  },
  Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum CriterionCommand {
  Add { kind: KindArg, text: String },
  Delete { kind: KindArg, id: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum KindArg {
  Inclusion,
  Exclusion,
}

impl From<KindArg> for CriterionKind {
  fn from(kind: KindArg) -> Self {
    match kind {
      KindArg::Inclusion => Self::Inclusion,
      KindArg::Exclusion => Self::Exclusion,
    }
  }
}

#[derive(Subcommand, Debug)]
pub enum KeywordCommand {
  Add {
    #[arg(long, default_value = "")]
    group:    String,
    #[arg(long, default_value = "OR")]
    operator: Operator,
    terms:    Vec<String>,
  },
  Update {
    id:       String,
    #[arg(long)]
    group:    Option<String>,
    #[arg(long)]
    operator: Option<Operator>,
    /// Comma-separated replacement term list.
    #[arg(long, value_delimiter = ',')]
    terms:    Option<Vec<String>>,
  },
  Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum SourceCommand {
  Add {
    name: String,
    #[arg(long)]
    url:  Option<String>,
    #[arg(long)]
    abbr: Option<String>,
  },
  Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum SearchCommand {
  Add {
    query:   String,
    /// Id of the source that was searched.
    #[arg(long)]
    source:  Option<String>,
    /// Defaults to today.
    #[arg(long)]
    date:    Option<NaiveDate>,
    #[arg(long, default_value_t = 0)]
    results: u64,
    #[arg(long)]
    notes:   Option<String>,
  },
  Delete { id: String },
}

#[derive(clap::Args, Debug, Default)]
pub struct StudyFields {
  #[arg(long)]
  authors:     Option<String>,
  #[arg(long)]
  year:        Option<String>,
  #[arg(long)]
  source:      Option<String>,
  #[arg(long)]
  doi:         Option<String>,
  #[arg(long = "abstract")]
  abstract_:   Option<String>,
  /// Comma-separated tags.
  #[arg(long, value_delimiter = ',')]
  tags:        Option<Vec<String>>,
  #[arg(long)]
  notes:       Option<String>,
  #[arg(long)]
  methodology: Option<String>,
  #[arg(long)]
  sample_size: Option<String>,
  #[arg(long)]
  metrics:     Option<String>,
  #[arg(long)]
  findings:    Option<String>,
}

impl StudyFields {
  fn has_extraction(&self) -> bool {
    self.methodology.is_some()
      || self.sample_size.is_some()
      || self.metrics.is_some()
      || self.findings.is_some()
  }

  /// Extraction record with the given fields overlaid on `base`.
  fn extraction_over(&self, mut base: ExtractedData) -> ExtractedData {
    for (slot, value) in [
      (&mut base.methodology, &self.methodology),
      (&mut base.sample_size, &self.sample_size),
      (&mut base.metrics, &self.metrics),
      (&mut base.findings, &self.findings),
    ] {
      if let Some(v) = value {
        slot.clone_from(v);
      }
    }
    base
  }
}

#[derive(Subcommand, Debug)]
pub enum StudyCommand {
  Add {
    title:  String,
    #[command(flatten)]
    fields: StudyFields,
  },
  Update {
    id:     String,
    #[arg(long)]
    title:  Option<String>,
    #[command(flatten)]
    fields: StudyFields,
  },
  Delete { id: String },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
  Csv,
  Bibtex,
  Ris,
  Summary,
  Prisma,
}

// ─── Dispatch ─────────────────────────────────────────────────────────────────

/// The verdict to store when the user picks `chosen` for a study currently
/// at `current`: picking the same verdict again undoes it.
pub fn toggled_verdict(current: Verdict, chosen: Verdict) -> Verdict {
  if current == chosen { Verdict::Pending } else { chosen }
}

fn non_empty(value: &str, what: &str) -> anyhow::Result<()> {
  ensure!(!value.trim().is_empty(), "{what} must not be empty");
  Ok(())
}

pub fn run<S: DocumentStorage>(store: &mut ReviewStore<S>, command: Command) -> anyhow::Result<()> {
  match command {
    Command::Show => print!("{}", render::overview(store.document())),
    Command::Stats => print!("{}", render::stats(&store.stats())),
    Command::Progress => print!("{}", render::progress(&store.progress_checklist())),
    Command::Analysis => print!("{}", render::analysis(store.document())),
    Command::Rubric => {
      for (i, q) in QA_QUESTIONS.iter().enumerate() {
        println!("{:>2}. {q}", i + 1);
      }
    }

    Command::Title { title } => store.set_title(title),
    Command::Question(cmd) => run_question(store, cmd)?,
    Command::Pico { population, intervention, comparison, outcome } => {
      let current = store.document().planning.pico.clone();
      store.set_pico(Pico {
        population:   population.unwrap_or(current.population),
        intervention: intervention.unwrap_or(current.intervention),
        comparison:   comparison.unwrap_or(current.comparison),
        outcome:      outcome.unwrap_or(current.outcome),
      });
    }
    Command::Criterion(CriterionCommand::Add { kind, text }) => {
      non_empty(&text, "criterion text")?;
      let c = store.add_criterion(kind.into(), text);
      println!("{}", c.id);
    }
    Command::Criterion(CriterionCommand::Delete { kind, id }) => {
      store.delete_criterion(kind.into(), &EntityId::from(id))?;
    }
    Command::Keyword(cmd) => run_keyword(store, cmd)?,
    Command::Source(SourceCommand::Add { name, url, abbr }) => {
      non_empty(&name, "source name")?;
      let s = store.add_source(NewSource { name, url, abbr });
      println!("{}", s.id);
    }
    Command::Source(SourceCommand::Delete { id }) => store.delete_source(&EntityId::from(id))?,
    Command::Search(cmd) => run_search(store, cmd)?,
    Command::Study(cmd) => run_study(store, cmd)?,

    Command::Screen { id, verdict } => {
      let id = EntityId::from(id);
      let current = store
        .study(&id)
        .map(|s| s.verdict)
        .with_context(|| format!("no study with id {id}"))?;
      let next = toggled_verdict(current, verdict);
      store.set_verdict(&id, next)?;
      println!("{next}");
    }
    Command::Qa { id, question, answer } => {
      let Some(index) = question.checked_sub(1) else {
        bail!("questions are numbered from 1");
      };
      store.set_qa_score(&EntityId::from(id), index, answer)?;
    }

    Command::Export { out } => {
      let json = store.export_json()?;
      let path = out.unwrap_or_else(|| PathBuf::from(export_file_name(Utc::now())));
      write_file(&path, &json)?;
      info!(path = %path.display(), "exported review");
      println!("{}", path.display());
    }
    Command::Import { file } => {
      let text = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;
      store
        .import_json(&text)
        .with_context(|| format!("failed to import {}", file.display()))?;
    }
    Command::Report { format, out } => {
      let text = report(store, format)?;
      match out {
        Some(path) => write_file(&path, &text)?,
        None => print!("{text}"),
      }
    }
  }
  Ok(())
}

fn run_question<S: DocumentStorage>(
  store: &mut ReviewStore<S>,
  cmd: QuestionCommand,
) -> anyhow::Result<()> {
  match cmd {
    QuestionCommand::Add { question, rationale } => {
      non_empty(&question, "question")?;
      let q = store.add_question(NewQuestion { question, rationale });
      println!("{} {}", q.code, q.id);
    }
    QuestionCommand::Update { id, question, rationale, clear_rationale } => {
      let rationale = if clear_rationale { Some(None) } else { rationale.map(Some) };
      store.update_question(&EntityId::from(id), QuestionPatch { question, rationale })?;
    }
    QuestionCommand::Delete { id } => store.delete_question(&EntityId::from(id))?,
  }
  Ok(())
}

fn run_keyword<S: DocumentStorage>(
  store: &mut ReviewStore<S>,
  cmd: KeywordCommand,
) -> anyhow::Result<()> {
  match cmd {
    KeywordCommand::Add { group, operator, terms } => {
      ensure!(
        terms.iter().any(|t| !t.trim().is_empty()),
        "a keyword group needs at least one term"
      );
      let k = store.add_keyword_group(NewKeywordGroup { group, operator, terms });
      println!("{}", k.id);
    }
    KeywordCommand::Update { id, group, operator, terms } => {
      store.update_keyword_group(&EntityId::from(id), KeywordGroupPatch {
        group,
        operator,
        terms,
      })?;
    }
    KeywordCommand::Delete { id } => store.delete_keyword_group(&EntityId::from(id))?,
  }
  Ok(())
}

fn run_search<S: DocumentStorage>(
  store: &mut ReviewStore<S>,
  cmd: SearchCommand,
) -> anyhow::Result<()> {
  match cmd {
    SearchCommand::Add { query, source, date, results, notes } => {
      non_empty(&query, "search query")?;
      let source_id = source.map(EntityId::from);
      let source_name = source_id
        .as_ref()
        .and_then(|id| store.document().source(id))
        .map(|s| s.name.clone());
      let s = store.add_search(NewSearch {
        source_id,
        source_name,
        query,
        date,
        result_count: results,
        notes,
      });
      println!("{}", s.id);
    }
    SearchCommand::Delete { id } => store.delete_search(&EntityId::from(id))?,
  }
  Ok(())
}

fn run_study<S: DocumentStorage>(store: &mut ReviewStore<S>, cmd: StudyCommand) -> anyhow::Result<()> {
  match cmd {
    StudyCommand::Add { title, fields } => {
      non_empty(&title, "study title")?;
      let extracted_data = fields.extraction_over(ExtractedData::default());
      let s = store.add_study(NewStudy {
        authors: fields.authors.unwrap_or_default(),
        year: fields.year.unwrap_or_default(),
        source: fields.source.unwrap_or_default(),
        doi: fields.doi.unwrap_or_default(),
        abstract_text: fields.abstract_.unwrap_or_default(),
        tags: fields.tags.unwrap_or_default(),
        notes: fields.notes.unwrap_or_default(),
        extracted_data,
        ..NewStudy::titled(title)
      });
      println!("{}", s.id);
    }
    StudyCommand::Update { id, title, fields } => {
      if let Some(title) = &title {
        non_empty(title, "study title")?;
      }
      let id = EntityId::from(id);
      let extracted_data = if fields.has_extraction() {
        let current = store
          .study(&id)
          .map(|s| s.extracted_data.clone())
          .with_context(|| format!("no study with id {id}"))?;
        Some(fields.extraction_over(current))
      } else {
        None
      };
      let patch = StudyPatch {
        title,
        authors: fields.authors,
        year: fields.year,
        source: fields.source,
        doi: fields.doi,
        abstract_text: fields.abstract_,
        verdict: None,
        tags: fields.tags,
        notes: fields.notes,
        extracted_data,
      };
      ensure!(!patch.is_empty(), "nothing to update");
      store.update_study(&id, patch)?;
    }
    StudyCommand::Delete { id } => store.delete_study(&EntityId::from(id))?,
  }
  Ok(())
}

fn report<S: DocumentStorage>(store: &ReviewStore<S>, format: ReportFormat) -> anyhow::Result<String> {
  let doc = store.document();
  Ok(match format {
    ReportFormat::Csv => slr_report::included_studies_csv(doc).context("failed to build CSV")?,
    ReportFormat::Bibtex => slr_report::included_studies_bibtex(doc),
    ReportFormat::Ris => slr_report::included_studies_ris(doc),
    ReportFormat::Summary => slr_report::summary_text(doc, Utc::now().date_naive()),
    ReportFormat::Prisma => slr_report::PrismaCounts::from_document(doc).to_string(),
  })
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
  std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
