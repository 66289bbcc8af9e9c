//! Evaluation trace types for debugging test conventions.
//!
//! Trace types mirror [`Predicate`](crate::Predicate) and
//! [`Filter`](crate::Filter) but capture evaluation results instead of rules.
//! Use [`Filter::explain()`](crate::Filter::explain) to see why a class or a
//! method was (or was not) picked up as a test.
//!
//! # Two Levels of Trace
//!
//! - [`PredicateTrace`] — per predicate: which sub-expressions matched?
//! - [`FilterTrace`] — per class: class predicate plus one trace per method

/// Trace of a predicate evaluation.
///
/// In And/Or, ALL children are evaluated (no short-circuit) for maximum
/// debugging value. The `matched` result is still correct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateTrace {
    /// An atomic rule.
    Rule {
        /// Whether the rule held.
        matched: bool,
        /// Display form of the rule (e.g. `name starts with "test"`).
        rule: String,
    },
    /// AND: all children must match.
    And {
        /// Whether all children matched.
        matched: bool,
        /// Trace of each child.
        children: Vec<PredicateTrace>,
    },
    /// OR: any child must match.
    Or {
        /// Whether any child matched.
        matched: bool,
        /// Trace of each child.
        children: Vec<PredicateTrace>,
    },
    /// NOT: inverts inner result.
    Not {
        /// Whether the NOT predicate matched (i.e., inner did NOT match).
        matched: bool,
        /// Trace of the inner predicate.
        inner: Box<PredicateTrace>,
    },
}

impl PredicateTrace {
    /// Get the overall match result of this predicate.
    #[must_use]
    pub fn matched(&self) -> bool {
        match self {
            Self::Rule { matched, .. }
            | Self::And { matched, .. }
            | Self::Or { matched, .. }
            | Self::Not { matched, .. } => *matched,
        }
    }

    /// Display forms of the atomic rules that held, depth first.
    #[must_use]
    pub fn matched_rules(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_matched(&mut out);
        out
    }

    fn collect_matched<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Rule { matched, rule } => {
                if *matched {
                    out.push(rule);
                }
            }
            Self::And { children, .. } | Self::Or { children, .. } => {
                children.iter().for_each(|c| c.collect_matched(out));
            }
            Self::Not { inner, .. } => inner.collect_matched(out),
        }
    }
}

/// Trace of one method against the method predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodTrace {
    /// Method name.
    pub name: String,
    /// Evaluation of the method predicate.
    pub trace: PredicateTrace,
}

impl MethodTrace {
    /// Whether the method qualifies as a test.
    #[must_use]
    pub fn matched(&self) -> bool {
        self.trace.matched()
    }
}

/// Trace of a full [`Filter`](crate::Filter) evaluation for one class.
///
/// # INV: agrees with `select()`
///
/// `selected()` is `true` exactly when
/// [`Filter::select()`](crate::Filter::select) returns `Some`, and the
/// matched methods are the ones `select()` keeps. Methods are traced even
/// when the class predicate fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterTrace {
    /// Class name.
    pub class: String,
    /// Evaluation of the class predicate.
    pub class_trace: PredicateTrace,
    /// One trace per declared method, in declaration order.
    pub methods: Vec<MethodTrace>,
}

impl FilterTrace {
    /// Whether the class is selected.
    #[must_use]
    pub fn selected(&self) -> bool {
        self.class_trace.matched()
    }

    /// Names of the methods that would be kept, in order.
    #[must_use]
    pub fn selected_methods(&self) -> Vec<&str> {
        if !self.selected() {
            return Vec::new();
        }
        self.methods
            .iter()
            .filter(|m| m.matched())
            .map(|m| m.name.as_str())
            .collect()
    }
}
