use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{DocumentKey, FiscalPeriod};

/// A sell-side analyst as named in a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalystIdentity {
    /// Display name with original casing
    pub name: String,
    /// Firm affiliation. Best-effort; detection never fills it in.
    #[serde(default)]
    pub firm: String,
}

impl AnalystIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            firm: String::new(),
        }
    }

    /// Lower-cased name used for matching
    pub fn match_key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Ordered lower-cased name -> identity map.
///
/// Iteration follows first-insertion order; re-inserting an existing key
/// replaces the identity but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    entries: Vec<(String, AnalystIdentity)>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from display names; blank names are ignored
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roster = Self::new();
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() {
                roster.insert(AnalystIdentity::new(name));
            }
        }
        roster
    }

    pub fn insert(&mut self, identity: AnalystIdentity) {
        let key = identity.match_key();
        // An empty key would match every line
        if key.trim().is_empty() {
            return;
        }
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = identity,
            None => self.entries.push((key, identity)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&AnalystIdentity> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, identity)| identity)
    }

    /// First roster entry (in roster order) whose key occurs in `lowered_line`
    pub fn first_match(&self, lowered_line: &str) -> Option<&AnalystIdentity> {
        self.entries
            .iter()
            .find(|(key, _)| lowered_line.contains(key.as_str()))
            .map(|(_, identity)| identity)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One analyst question sliced out of a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub analyst: AnalystIdentity,
    /// Buffered lines joined with single spaces
    pub question: String,
    /// Filename of the transcript the question came from
    pub source_document: String,
    pub document_key: DocumentKey,
    pub fiscal_period: FiscalPeriod,
    /// Upload time of the source document
    pub call_date: NaiveDateTime,
}

impl QuestionRecord {
    pub fn period_label(&self) -> String {
        self.fiscal_period.label()
    }
}

/// All questions attributed to one analyst, in document-then-emission order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalystQuestions {
    pub firm: String,
    pub questions: Vec<QuestionRecord>,
}

impl AnalystQuestions {
    /// Group questions by fiscal period, newest period first.
    ///
    /// Every incomplete period falls into a single trailing unknown group;
    /// order inside a period is preserved.
    pub fn by_period(&self) -> Vec<(FiscalPeriod, Vec<&QuestionRecord>)> {
        let mut groups: BTreeMap<FiscalPeriod, Vec<&QuestionRecord>> = BTreeMap::new();
        for record in &self.questions {
            groups
                .entry(record.fiscal_period.clone().or_unknown())
                .or_default()
                .push(record);
        }
        groups.into_iter().rev().collect()
    }
}

/// Aggregated questions keyed by analyst display name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionsByAnalyst(BTreeMap<String, AnalystQuestions>);

impl QuestionsByAnalyst {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record under its analyst's display name
    pub fn push(&mut self, record: QuestionRecord) {
        let entry = self
            .0
            .entry(record.analyst.name.clone())
            .or_insert_with(|| AnalystQuestions {
                firm: record.analyst.firm.clone(),
                questions: Vec::new(),
            });
        entry.questions.push(record);
    }

    pub fn get(&self, name: &str) -> Option<&AnalystQuestions> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnalystQuestions)> {
        self.0.iter()
    }

    pub fn analyst_count(&self) -> usize {
        self.0.len()
    }

    pub fn question_count(&self) -> usize {
        self.0.values().map(|a| a.questions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Extend<QuestionRecord> for QuestionsByAnalyst {
    fn extend<T: IntoIterator<Item = QuestionRecord>>(&mut self, iter: T) {
        for record in iter {
            self.push(record);
        }
    }
}
