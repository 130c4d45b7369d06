//! Scripted model doubles shared by the scenario tests.

use crate::{
    BiasReporter, BiasedSpan, CapabilityError, Classification, Classifier, MaskFiller,
    SpanExtractor,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Call log that survives moving a double into a `Debiaser`.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    fn record(&self, input: &str) {
        self.0.lock().unwrap().push(input.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

pub struct FakeClassifier {
    verdicts: HashMap<String, Classification>,
    fallback: Option<Classification>,
    pub log: CallLog,
}

impl FakeClassifier {
    pub fn new() -> Self {
        Self {
            verdicts: HashMap::new(),
            fallback: None,
            log: CallLog::default(),
        }
    }

    pub fn with(mut self, text: &str, verdict: Classification) -> Self {
        self.verdicts.insert(text.to_string(), verdict);
        self
    }

    pub fn fallback(mut self, verdict: Classification) -> Self {
        self.fallback = Some(verdict);
        self
    }
}

impl Classifier for FakeClassifier {
    fn classify(&self, text: &str) -> Result<Classification, CapabilityError> {
        self.log.record(text);
        self.verdicts
            .get(text)
            .copied()
            .or(self.fallback)
            .ok_or_else(|| CapabilityError::failed(format!("unscripted sentence {text:?}")))
    }
}

pub struct FakeExtractor {
    spans: Vec<BiasedSpan>,
    pub log: CallLog,
}

impl FakeExtractor {
    pub fn new(spans: Vec<BiasedSpan>) -> Self {
        Self {
            spans,
            log: CallLog::default(),
        }
    }
}

impl SpanExtractor for FakeExtractor {
    fn extract_spans(&self, text: &str) -> Result<Vec<BiasedSpan>, CapabilityError> {
        self.log.record(text);
        Ok(self.spans.clone())
    }
}

pub struct FakeFiller {
    table: HashMap<String, Vec<String>>,
    pub log: CallLog,
}

impl FakeFiller {
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
            log: CallLog::default(),
        }
    }

    pub fn with(mut self, prompt: &str, words: &[&str]) -> Self {
        self.table.insert(
            prompt.to_string(),
            words.iter().map(|w| w.to_string()).collect(),
        );
        self
    }
}

impl MaskFiller for FakeFiller {
    fn fill_mask(&self, text: &str) -> Result<Vec<String>, CapabilityError> {
        self.log.record(text);
        self.table
            .get(text)
            .cloned()
            .ok_or_else(|| CapabilityError::failed(format!("unscripted prompt {text:?}")))
    }
}

#[derive(Clone, Default)]
pub struct RecordingReporter(Arc<Mutex<Vec<(f64, f64)>>>);

impl RecordingReporter {
    pub fn reports(&self) -> Vec<(f64, f64)> {
        self.0.lock().unwrap().clone()
    }
}

impl BiasReporter for RecordingReporter {
    fn report(&self, original_score: f64, best_new_score: f64) {
        self.0.lock().unwrap().push((original_score, best_new_score));
    }
}
