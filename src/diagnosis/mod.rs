//! C8: post-validation analysis over an already-`validate`d [`Validator`].
//!
//! Every routine here is a pure function of `&Validator` — none of them
//! mutate state (spec §4.7, §9 "Symptom dispatch"). [`crate::validator::Validator`]
//! exposes thin public methods that just forward into this module.

mod causes;
mod missing_ops;
mod patterns;
mod symptoms;

use crate::issue::Severity;
use crate::validator::Validator;

/// The closed set of user-visible failure modes a caller can ask about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symptom {
    BlackScreen,
    WrongColors,
    BlendIssues,
    TransparentOutput,
    Flickering,
    GeometryIssues,
}

/// A single named check within a [`SymptomReport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Check {
    pub name: &'static str,
    pub passed: bool,
    pub severity: Severity,
    pub message: &'static str,
    pub suggestion: Option<&'static str>,
}

/// The result of running one symptom's routine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymptomReport {
    pub symptom: Symptom,
    pub checks: Vec<Check>,
    pub likely_cause: Option<&'static str>,
    pub probability: u8,
}

/// A single missing-operation record (spec §4.7).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingOperation {
    pub operation: &'static str,
    pub severity: Severity,
    pub message: &'static str,
    pub context: Option<&'static str>,
}

/// A detected authoring pattern (spec §4.7).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternMatch {
    pub name: &'static str,
    pub description: &'static str,
    pub confidence: u8,
}

/// A ranked likely-cause hypothesis (spec §4.7).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CauseRecord {
    pub name: &'static str,
    pub probability: u8,
}

pub(crate) const MAX_MISSING_OPERATIONS: usize = 16;
pub(crate) const MAX_PATTERNS: usize = 8;
pub(crate) const MAX_CAUSES: usize = 16;

pub fn diagnose_symptom(validator: &Validator, symptom: Symptom) -> SymptomReport {
    symptoms::diagnose(validator, symptom)
}

pub fn detect_missing_operations(validator: &Validator) -> Vec<MissingOperation> {
    missing_ops::detect(validator)
}

pub fn detect_patterns(validator: &Validator) -> Vec<PatternMatch> {
    patterns::detect(validator)
}

pub fn analyze_likely_causes(validator: &Validator) -> Vec<CauseRecord> {
    causes::analyze(validator)
}
