// Walks one candidate visit order through the level rules, accumulating the
// travel cost estimate. An order that breaks a rule is rejected, not an
// error: the solvers filter hundreds of thousands of them.

use thiserror::Error;

use crate::graph::{Cost, Graph, SurchargeRule};
use crate::level::{Category, Level, Route, Target};

/// A validated route with its total cost estimate.
#[derive(Clone, Debug, PartialEq)]
pub struct Walk {
    pub route: Route,
    pub cost: Cost,
}

/// Why a candidate order is illegal. Only interesting in logs and tests.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// A lever-gated location was ordered before the lever.
    GatedBeforeLever(Target),
    /// The first stop is not reachable from the entrance.
    BadOpener(Target),
    /// Arrived at a socket with no battery in hand.
    EmptyHandedAt(Target),
    /// Arrived at a battery while already carrying one.
    AlreadyCarryingAt(Target),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    Accepted(Walk),
    Rejected(Rejection),
}

#[derive(Error, Debug, PartialEq)]
pub enum SimError {
    /// The table has no estimate for a leg the route legally walks.
    #[error("no distance estimate for leg {from:?} -> {to:?}")]
    MissingDistance { from: Target, to: Target },
}

/// Validates one order of the must-visit targets and prices the full walk
/// from the start. Positions in `ordering` do not include the start; the
/// returned walk's route does.
pub fn simulate(
    ordering: &[Target],
    level: &Level,
    graph: &Graph,
) -> Result<Verdict, SimError> {
    debug_assert_eq!(ordering.len(), level.must_visit.len());

    // The lever must come before everything it gates.
    let lever_at = ordering
        .iter()
        .position(|&t| t == level.lever)
        .unwrap_or(usize::MAX);
    for &gated in &level.lever_gated {
        if let Some(gated_at) = ordering.iter().position(|&t| t == gated) {
            if gated_at < lever_at {
                return Ok(Verdict::Rejected(Rejection::GatedBeforeLever(gated)));
            }
        }
    }

    if let Some(&first) = ordering.first() {
        if !level.is_initial(first) {
            return Ok(Verdict::Rejected(Rejection::BadOpener(first)));
        }
    }

    let mut route = Route::new();
    route.push(level.start);
    let mut prev = level.start;
    let mut total: Cost = 0.0;
    let mut carrying = false;
    for &next in ordering {
        match next.category() {
            Category::Socket if !carrying => {
                return Ok(Verdict::Rejected(Rejection::EmptyHandedAt(next)));
            }
            Category::Battery if carrying => {
                return Ok(Verdict::Rejected(Rejection::AlreadyCarryingAt(next)));
            }
            _ => (),
        }
        let leg = graph
            .cost(prev, next)
            .ok_or(SimError::MissingDistance { from: prev, to: next })?;
        total += leg;
        route.push(next);
        match next.category() {
            Category::Battery => carrying = true,
            Category::Socket => carrying = false,
            _ => (),
        }
        prev = next;
    }

    total += surcharge_total(&route, level.lever, &graph.surcharges);
    Ok(Verdict::Accepted(Walk { route, cost: total }))
}

/// Sum of the surcharge rules matching a completed route. The offsets are
/// positions in the walked route with the start prepended, not in the raw
/// ordering; both rules of the flat table are keyed on that indexing.
pub(crate) fn surcharge_total(
    route: &[Target],
    lever: Target,
    rules: &[SurchargeRule],
) -> Cost {
    let lever_at = route.iter().position(|&t| t == lever);
    let mut total = 0.0;
    for rule in rules {
        let target_at = route.iter().position(|&t| t == rule.target);
        if let (Some(lever_at), Some(target_at)) = (lever_at, target_at) {
            if target_at > lever_at && target_at - lever_at == rule.steps_after_lever {
                total += rule.extra;
            }
        }
    }
    total
}
