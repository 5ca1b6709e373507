//! Derived outputs for a review: reference exports and PRISMA reporting.
//!
//! Everything here is a pure function of a [`ReviewDocument`]; nothing writes
//! back to the store. Reference exports (CSV, BibTeX, RIS) cover the
//! included studies only, in document order.
//!
//! # Quick start
//!
//! ```no_run
//! use slr_core::{ReviewStore, storage::MemoryStorage};
//!
//! let store = ReviewStore::open(MemoryStorage::new());
//! let bib = slr_report::included_studies_bibtex(store.document());
//! println!("{bib}");
//! ```

pub mod analysis;
mod bibtex;
mod csv_export;
pub mod error;
pub mod prisma;
mod ris;
mod summary;

pub use bibtex::included_studies_bibtex;
pub use csv_export::{CSV_HEADERS, included_studies_csv};
pub use error::{Error, Result};
pub use prisma::PrismaCounts;
pub use ris::included_studies_ris;
pub use summary::{format_long_date, summary_text};

#[cfg(test)]
pub(crate) mod test_helpers {
  use slr_core::{
    ReviewStore,
    document::{ExtractedData, QaAnswer, ReviewDocument, Verdict},
    input::{NewSearch, NewStudy},
    storage::MemoryStorage,
  };

  /// A small review: two included studies, one excluded, one maybe, and
  /// two searches totalling 150 hits.
  pub fn sample_review() -> ReviewDocument {
    let mut store = ReviewStore::open(MemoryStorage::new());
    store.set_title("LLMs in education");
    store.add_search(NewSearch { result_count: 100, ..NewSearch::new("llm AND education") });
    store.add_search(NewSearch { result_count: 50, ..NewSearch::new("gpt AND classroom") });

    let a = store.add_study(NewStudy {
      authors: "Smith, J.".into(),
      year: "2023".into(),
      source: "Computers & Education".into(),
      doi: "10.1000/ce.1".into(),
      verdict: Verdict::Include,
      extracted_data: ExtractedData {
        methodology: "RCT, \"blinded\"".into(),
        findings: "Improved scores".into(),
        ..ExtractedData::default()
      },
      ..NewStudy::titled("Tutoring with \"GPT\"")
    });
    for i in 0..8 {
      store.set_qa_score(&a.id, i, QaAnswer::Yes).unwrap();
    }
    store.add_study(NewStudy {
      year: "2021".into(),
      verdict: Verdict::Include,
      ..NewStudy::titled("Chatbots, a survey")
    });
    store.add_study(NewStudy {
      year: "2023".into(),
      source: "Computers & Education".into(),
      verdict: Verdict::Exclude,
      ..NewStudy::titled("Off topic")
    });
    store.add_study(NewStudy { verdict: Verdict::Maybe, ..NewStudy::titled("Unclear") });
    store.document().clone()
  }
}
