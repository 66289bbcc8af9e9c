//! Predicate — Boolean expressions over atomic rules
//!
//! An atomic [`Rule`] answers one question about a subject (a class, a
//! method). [`Predicate`] composes rules with AND/OR/NOT. The composition
//! engine knows nothing about the rule kinds; adding a rule variant never
//! touches this module.

use crate::PredicateTrace;
use std::fmt::{Debug, Display};

/// An atomic predicate over a subject.
///
/// Rules are plain tagged values (enums), so they are `Clone`, comparable and
/// shareable across threads.
pub trait Rule: Debug + Display + Send + Sync {
    /// What the rule inspects.
    type Subject: ?Sized;

    /// Returns `true` if the rule holds for `subject`.
    fn holds(&self, subject: &Self::Subject) -> bool;
}

/// Composite predicate with boolean logic.
///
/// Evaluation short-circuits: `And` stops on the first `false`, `Or` on the
/// first `true`. `And([])` is `true` and `Or([])` is `false`.
///
/// # Example
///
/// ```
/// use suitex::{MethodDescription, MethodRule, Predicate};
///
/// let pred = Predicate::Or(vec![
///     Predicate::Rule(MethodRule::NamePrefix("test".into())),
///     Predicate::Rule(MethodRule::HasAttribute("Test".into())),
/// ]);
///
/// assert!(pred.evaluate(&MethodDescription::new("testLogin")));
/// assert!(!pred.evaluate(&MethodDescription::new("setUp")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate<R> {
    /// A single rule.
    Rule(R),

    /// All predicates must match (logical AND).
    And(Vec<Predicate<R>>),

    /// Any predicate must match (logical OR).
    Or(Vec<Predicate<R>>),

    /// Inverts the inner predicate (logical NOT).
    Not(Box<Predicate<R>>),
}

impl<R: Rule> Predicate<R> {
    /// Evaluate against a subject.
    pub fn evaluate(&self, subject: &R::Subject) -> bool {
        match self {
            Self::Rule(rule) => rule.holds(subject),
            Self::And(predicates) => predicates.iter().all(|p| p.evaluate(subject)),
            Self::Or(predicates) => predicates.iter().any(|p| p.evaluate(subject)),
            Self::Not(p) => !p.evaluate(subject),
        }
    }

    /// Evaluate with full trace for debugging.
    ///
    /// Unlike [`evaluate()`](Self::evaluate), this does NOT short-circuit
    /// And/Or; every child is evaluated. The `matched` result is the same.
    #[must_use]
    pub fn evaluate_with_trace(&self, subject: &R::Subject) -> PredicateTrace {
        match self {
            Self::Rule(rule) => PredicateTrace::Rule {
                matched: rule.holds(subject),
                rule: rule.to_string(),
            },
            Self::And(predicates) => {
                let children: Vec<PredicateTrace> = predicates
                    .iter()
                    .map(|p| p.evaluate_with_trace(subject))
                    .collect();
                let matched = children.iter().all(PredicateTrace::matched);
                PredicateTrace::And { matched, children }
            }
            Self::Or(predicates) => {
                let children: Vec<PredicateTrace> = predicates
                    .iter()
                    .map(|p| p.evaluate_with_trace(subject))
                    .collect();
                let matched = children.iter().any(PredicateTrace::matched);
                PredicateTrace::Or { matched, children }
            }
            Self::Not(p) => {
                let inner = p.evaluate_with_trace(subject);
                PredicateTrace::Not {
                    matched: !inner.matched(),
                    inner: Box::new(inner),
                }
            }
        }
    }
}

impl<R> Predicate<R> {
    /// OR over atomic rules, in order.
    ///
    /// A single rule is returned unwrapped.
    #[must_use]
    pub fn any_of(rules: impl IntoIterator<Item = R>) -> Self {
        let mut predicates: Vec<Self> = rules.into_iter().map(Self::Rule).collect();
        if predicates.len() == 1 {
            if let Some(only) = predicates.pop() {
                return only;
            }
        }
        Self::Or(predicates)
    }

    /// Negate a predicate.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }
}
