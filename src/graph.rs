// Distance estimates between level locations, plus the surcharge rules that
// depend on where the lever sits in a walked route.

use std::collections::HashMap;

use log::info;
use serde::Deserialize;
use thiserror::Error;

use crate::level::{ParseError, Target, NUM_TARGETS};

pub type Cost = f32;

/// Extra cost paid when `target` ends up exactly `steps_after_lever`
/// positions after the lever in the walked route, entrance included.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurchargeRule {
    pub target: Target,
    pub steps_after_lever: usize,
    pub extra: Cost,
}

#[derive(Deserialize)]
struct RawSurcharge {
    target: String,
    steps_after_lever: usize,
    extra: Cost,
}

#[derive(Deserialize)]
struct RawTable {
    distances: HashMap<String, HashMap<String, Cost>>,
    #[serde(default)]
    surcharges: Vec<RawSurcharge>,
}

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("distance table is not valid JSON")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Symbol(#[from] ParseError),
    #[error("negative distance {cost} for leg {from:?} -> {to:?}")]
    NegativeDistance { from: Target, to: Target, cost: Cost },
    #[error("negative surcharge {extra} for {target:?}")]
    NegativeSurcharge { target: Target, extra: Cost },
}

#[derive(Clone)]
pub struct Graph {
    // adjacency[from][to]. Partial on purpose: only legs that show up in
    // some legal route have estimates.
    adjacency: [[Option<Cost>; NUM_TARGETS]; NUM_TARGETS],
    pub surcharges: Vec<SurchargeRule>,
}

impl Graph {
    pub fn from_json(data: &str) -> Result<Graph, GraphError> {
        let raw: RawTable = serde_json::from_str(data)?;
        let mut adjacency = [[None; NUM_TARGETS]; NUM_TARGETS];
        let mut legs = 0;
        for (from, reachable) in &raw.distances {
            let from = Target::from_symbol(from)?;
            for (to, &cost) in reachable {
                let to = Target::from_symbol(to)?;
                if cost < 0.0 {
                    return Err(GraphError::NegativeDistance { from, to, cost });
                }
                adjacency[from.index()][to.index()] = Some(cost);
                legs += 1;
            }
        }
        let mut surcharges = Vec::with_capacity(raw.surcharges.len());
        for rule in &raw.surcharges {
            let target = Target::from_symbol(&rule.target)?;
            if rule.extra < 0.0 {
                return Err(GraphError::NegativeSurcharge { target, extra: rule.extra });
            }
            surcharges.push(SurchargeRule {
                target,
                steps_after_lever: rule.steps_after_lever,
                extra: rule.extra,
            });
        }
        info!("Distance table loaded: {legs} legs, {} surcharge rules", surcharges.len());
        Ok(Graph { adjacency, surcharges })
    }

    /// The built-in rough flat measurements (a jump counted as 2 units).
    pub fn flat() -> Graph {
        Graph::from_json(include_str!("../data/flat.json"))
            .expect("embedded flat distance table is valid")
    }

    /// Estimate for one leg. `None` legs never occur in a legal route; the
    /// simulator treats walking one as a hard error.
    #[inline]
    pub fn cost(&self, from: Target, to: Target) -> Option<Cost> {
        self.adjacency[from.index()][to.index()]
    }
}
