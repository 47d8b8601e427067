//! PII detection
//!
//! Rule-based matching only: a [`PatternRegistry`] supplies named regular
//! expressions, and two scanners apply a selected [`RuleSet`] to either
//! normalized document text ([`TextScanner`]) or sampled table rows
//! ([`TabularScanner`]).

pub mod patterns;
pub mod tabular;
pub mod text;

pub use patterns::{PatternRegistry, PatternRule, RuleCategory, RuleSelection, RuleSet};
pub use tabular::TabularScanner;
pub use text::{TextFindings, TextMatchRecord, TextScanner};
