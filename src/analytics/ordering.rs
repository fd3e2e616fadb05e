//! Relative ordering of issues within a board column or sprint backlog.
//!
//! A drop computes a single new order value for the moved issue from the
//! midpoint of its new neighbours, so only one record needs persisting.
//! When the neighbours are too close together for a usable midpoint (or the
//! scope already violates strict ordering) the whole scope is respaced at a
//! fixed stride and every changed record is reported instead.
//!
//! An issue sits in a column and a sprint backlog at the same time, so a
//! move given the whole snapshot never picks a value already held in the
//! issue's other scope.

use crate::config::OrderingConfig;
use crate::domain::issue::{Issue, IssueId, IssueStatus};
use crate::domain::sprint::SprintId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A set of issues sharing one ordering sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Scope {
    /// Board column: every issue with this status
    Column(IssueStatus),
    /// Sprint backlog, or the product backlog when `None`
    Sprint(Option<SprintId>),
}

impl Scope {
    pub fn contains(&self, issue: &Issue) -> bool {
        match self {
            Self::Column(status) => issue.status == *status,
            Self::Sprint(sprint_id) => issue.sprint_id == *sprint_id,
        }
    }

    fn change(&self) -> ScopeChange {
        match self {
            Self::Column(status) => ScopeChange::Status(*status),
            Self::Sprint(sprint_id) => ScopeChange::Sprint(sprint_id.clone()),
        }
    }
}

/// Field change that re-parents an issue into another scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScopeChange {
    Status(IssueStatus),
    Sprint(Option<SprintId>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reparent {
    pub issue_id: IssueId,
    pub change: ScopeChange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub issue_id: IssueId,
    pub order: f64,
}

/// Result of a drop: the scope's new sequence and the records to persist
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderPlan {
    /// Every issue of the destination scope in its new order, with the
    /// order value it holds after the move
    pub sequence: Vec<OrderUpdate>,
    /// Only the records whose order value changed
    pub updates: Vec<OrderUpdate>,
    /// Present when the issue moved across scopes
    pub reparent: Option<Reparent>,
    /// The scope was respaced because no usable midpoint existed
    pub renormalized: bool,
}

impl ReorderPlan {
    fn unchanged(scope: &[&Issue]) -> Self {
        Self {
            sequence: scope.iter().map(|issue| to_update(issue, issue.order)).collect(),
            ..Default::default()
        }
    }

    pub fn is_noop(&self) -> bool {
        self.updates.is_empty() && self.reparent.is_none()
    }

    /// Applies the plan to a local copy of the issues, e.g. for an
    /// optimistic view while the external store persists the same changes
    pub fn apply(&self, issues: &mut [Issue], at: DateTime<Utc>) {
        let index: HashMap<IssueId, usize> = issues
            .iter()
            .enumerate()
            .map(|(i, issue)| (issue.id.clone(), i))
            .collect();

        if let Some(reparent) = &self.reparent {
            if let Some(&i) = index.get(&reparent.issue_id) {
                match &reparent.change {
                    ScopeChange::Status(status) => issues[i].set_status(*status, at),
                    ScopeChange::Sprint(sprint_id) => issues[i].set_sprint(sprint_id.clone(), at),
                }
            }
        }

        for update in &self.updates {
            if let Some(&i) = index.get(&update.issue_id) {
                issues[i].order = update.order;
                issues[i].updated_at = at;
            }
        }
    }
}

/// Issues of a scope sorted by order value. Ties keep their input order.
pub fn scope_sequence<'a>(issues: &'a [Issue], scope: &Scope) -> Vec<&'a Issue> {
    sorted_by_order(issues.iter().filter(|issue| scope.contains(issue)))
}

/// Moves an issue to `target_index` within its own scope, using the
/// default ordering configuration.
///
/// # Examples
/// ```
/// use sprintboard_core::analytics::ordering::reorder;
/// use sprintboard_core::domain::issue::{Issue, IssueId};
///
/// let column = vec![
///     Issue::new("a", "A").with_order(1.0),
///     Issue::new("b", "B").with_order(2.0),
///     Issue::new("c", "C").with_order(3.0),
/// ];
///
/// let plan = reorder(&column, &IssueId::from("c"), 0);
/// assert_eq!(plan.updates.len(), 1);
/// assert!(plan.updates[0].order < 1.0);
/// ```
pub fn reorder(issues_in_scope: &[Issue], moved_id: &IssueId, target_index: usize) -> ReorderPlan {
    reorder_with(&OrderingConfig::default(), issues_in_scope, moved_id, target_index)
}

/// Moves an issue to `target_index` within `issues_in_scope`.
///
/// The target index refers to the sequence with the moved issue removed and
/// is clamped to its length. Moving to the current position, or moving an
/// issue that is not in the scope, is a no-op.
///
/// Only the scope itself is visible here, so new values are not checked
/// against issues of the other scope kind. Use [`move_issue_with`] with the
/// whole snapshot when columns and sprint backlogs share order values.
pub fn reorder_with(
    config: &OrderingConfig,
    issues_in_scope: &[Issue],
    moved_id: &IssueId,
    target_index: usize,
) -> ReorderPlan {
    let config = usable(config);
    reorder_among(&config, &Reserved::default(), issues_in_scope.iter(), moved_id, target_index)
}

/// Moves an issue into `destination` at `target_index`, using the default
/// ordering configuration. See [`move_issue_with`].
pub fn move_issue(
    issues: &[Issue],
    moved_id: &IssueId,
    destination: &Scope,
    target_index: usize,
) -> ReorderPlan {
    move_issue_with(&OrderingConfig::default(), issues, moved_id, destination, target_index)
}

/// Moves an issue into `destination` at `target_index`.
///
/// `issues` is the whole snapshot; the destination scope is selected from
/// it. A move into another scope re-parents the issue first (the plan
/// carries the status or sprint change) and then orders it among the
/// destination's issues. New order values never coincide with a value held
/// by an issue outside the destination, so the issue's other scope stays
/// unique too.
pub fn move_issue_with(
    config: &OrderingConfig,
    issues: &[Issue],
    moved_id: &IssueId,
    destination: &Scope,
    target_index: usize,
) -> ReorderPlan {
    let config = usable(config);
    let Some(moved) = issues.iter().find(|issue| &issue.id == moved_id) else {
        tracing::debug!("Issue {} not found in snapshot, ignoring move", moved_id);
        return ReorderPlan::unchanged(&scope_sequence(issues, destination));
    };

    let reserved = Reserved::outside(issues, destination, Some(moved_id));

    if destination.contains(moved) {
        let scope = issues.iter().filter(|issue| destination.contains(issue));
        return reorder_among(&config, &reserved, scope, moved_id, target_index);
    }

    let others = sorted_by_order(
        issues
            .iter()
            .filter(|issue| destination.contains(issue) && &issue.id != moved_id),
    );
    let to = target_index.min(others.len());
    let reparent = Reparent {
        issue_id: moved.id.clone(),
        change: destination.change(),
    };

    place(&config, &reserved, others, moved, to, Some(reparent))
}

/// Respaces a scope of the snapshot to multiples of the configured stride,
/// keeping its current sequence. Values held by issues outside the scope
/// are skipped.
pub fn renormalize(config: &OrderingConfig, issues: &[Issue], scope: &Scope) -> ReorderPlan {
    let config = usable(config);
    let reserved = Reserved::outside(issues, scope, None);
    respace(&config, &reserved, scope_sequence(issues, scope), None)
}

/// Falls back to the default configuration when `config` is unusable
fn usable(config: &OrderingConfig) -> OrderingConfig {
    match config.validate() {
        Ok(()) => *config,
        Err(err) => {
            tracing::warn!("{}; using default ordering configuration", err);
            OrderingConfig::default()
        }
    }
}

/// Order values owned by issues outside the scope being reordered
#[derive(Default)]
struct Reserved(HashSet<u64>);

impl Reserved {
    fn outside(issues: &[Issue], scope: &Scope, moved_id: Option<&IssueId>) -> Self {
        Self(
            issues
                .iter()
                .filter(|issue| !scope.contains(issue) && Some(&issue.id) != moved_id)
                .map(|issue| Self::key(issue.order))
                .collect(),
        )
    }

    fn key(order: f64) -> u64 {
        // 0.0 and -0.0 compare equal
        if order == 0.0 {
            0.0f64.to_bits()
        } else {
            order.to_bits()
        }
    }

    fn contains(&self, order: f64) -> bool {
        self.0.contains(&Self::key(order))
    }
}

fn reorder_among<'a>(
    config: &OrderingConfig,
    reserved: &Reserved,
    scope: impl Iterator<Item = &'a Issue>,
    moved_id: &IssueId,
    target_index: usize,
) -> ReorderPlan {
    let mut others = sorted_by_order(scope);

    let Some(from) = others.iter().position(|issue| &issue.id == moved_id) else {
        tracing::debug!("Issue {} is not in the reorder scope, ignoring move", moved_id);
        return ReorderPlan::unchanged(&others);
    };

    let moved = others.remove(from);
    let to = target_index.min(others.len());
    if to == from {
        others.insert(from, moved);
        return ReorderPlan::unchanged(&others);
    }

    place(config, reserved, others, moved, to, None)
}

fn place<'a>(
    config: &OrderingConfig,
    reserved: &Reserved,
    mut others: Vec<&'a Issue>,
    moved: &'a Issue,
    to: usize,
    reparent: Option<Reparent>,
) -> ReorderPlan {
    let prev = to.checked_sub(1).map(|i| others[i].order);
    let next = others.get(to).map(|issue| issue.order);
    let step = config.boundary_step;

    let candidate = match (prev, next) {
        (Some(p), Some(n)) if n - p >= config.min_gap => free_between(reserved, p, n),
        (Some(_), Some(_)) => None,
        (Some(p), None) => free_between(reserved, p, p + 2.0 * step),
        (None, Some(n)) => free_between(reserved, n - 2.0 * step, n),
        (None, None) if moved.order.is_finite() && !reserved.contains(moved.order) => {
            Some(moved.order)
        }
        (None, None) => {
            let base = if moved.order.is_finite() { moved.order } else { 0.0 };
            free_between(reserved, base - step, base + step)
        }
    };

    others.insert(to, moved);

    match candidate {
        Some(order) if strictly_increasing(&others, to, order) => {
            let sequence: Vec<OrderUpdate> = others
                .iter()
                .enumerate()
                .map(|(i, issue)| to_update(issue, if i == to { order } else { issue.order }))
                .collect();
            let updates = if order == moved.order {
                Vec::new()
            } else {
                vec![to_update(moved, order)]
            };
            ReorderPlan {
                sequence,
                updates,
                reparent,
                renormalized: false,
            }
        }
        _ => {
            tracing::debug!(
                "No usable order gap around position {} for issue {}, renormalizing {} issues",
                to,
                moved.id,
                others.len()
            );
            respace(config, reserved, others, reparent)
        }
    }
}

/// First unreserved value strictly inside `(lo, hi)`, trying the midpoint
/// before finer dyadic subdivisions
fn free_between(reserved: &Reserved, lo: f64, hi: f64) -> Option<f64> {
    const MAX_DEPTH: u32 = 6;
    for depth in 1..=MAX_DEPTH {
        let parts = 1u32 << depth;
        for k in (1..parts).step_by(2) {
            let order = lo + (hi - lo) * f64::from(k) / f64::from(parts);
            if order.is_finite() && order > lo && order < hi && !reserved.contains(order) {
                return Some(order);
            }
        }
    }
    None
}

fn respace(
    config: &OrderingConfig,
    reserved: &Reserved,
    sequence: Vec<&Issue>,
    reparent: Option<Reparent>,
) -> ReorderPlan {
    let mut plan = ReorderPlan {
        reparent,
        renormalized: true,
        ..Default::default()
    };
    let nudge = config.stride / 1024.0;
    let mut last = f64::NEG_INFINITY;
    for (i, issue) in sequence.iter().enumerate() {
        let mut order = config.stride * (i + 1) as f64;
        if order <= last {
            order = last + config.stride;
        }
        while reserved.contains(order) {
            order += nudge;
        }
        last = order;

        let update = to_update(issue, order);
        if issue.order != order {
            plan.updates.push(update.clone());
        }
        plan.sequence.push(update);
    }
    plan
}

/// Checks the sequence would be strictly increasing with `order` at `at`
fn strictly_increasing(sequence: &[&Issue], at: usize, order: f64) -> bool {
    let value = |i: usize| if i == at { order } else { sequence[i].order };
    (1..sequence.len()).all(|i| value(i - 1) < value(i))
}

fn sorted_by_order<'a>(issues: impl Iterator<Item = &'a Issue>) -> Vec<&'a Issue> {
    let mut sorted: Vec<&Issue> = issues.collect();
    sorted.sort_by(|a, b| a.order.total_cmp(&b.order));
    sorted
}

fn to_update(issue: &Issue, order: f64) -> OrderUpdate {
    OrderUpdate {
        issue_id: issue.id.clone(),
        order,
    }
}
