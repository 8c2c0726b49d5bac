// Solver implementations that rank every legal visit order by cost.
//
// On the flat level (9 must-visit targets) the exhaustive solver walks all
// 362880 orders; the pruning solver reaches the identical ranking while only
// expanding prefixes that still respect the level rules.

use itertools::Itertools;
use log::info;
use rustc_hash::FxHashMap;
use std::time::Instant;
use thiserror::Error;

use crate::graph::{Cost, Graph};
use crate::level::{format_route, Category, Level, Route, Target, NUM_TARGETS};
use crate::simulate::{simulate, surcharge_total, SimError, Verdict, Walk};

#[derive(Error, Debug)]
pub enum RankError {
    #[error("route {0} is not one of the accepted orders")]
    UnknownRoute(String),
}

/// All accepted walks, cheapest first. Equal costs keep enumeration order.
pub struct Ranking {
    walks: Vec<Walk>,
    by_route: FxHashMap<Route, usize>,
    candidates: usize,
}

impl Ranking {
    fn new(mut walks: Vec<Walk>, candidates: usize) -> Self {
        walks.sort_by(|a, b| a.cost.total_cmp(&b.cost));
        let by_route = walks
            .iter()
            .enumerate()
            .map(|(rank, walk)| (walk.route.clone(), rank))
            .collect();
        Ranking { walks, by_route, candidates }
    }

    pub fn len(&self) -> usize {
        self.walks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walks.is_empty()
    }

    /// Size of the candidate space before filtering (must-visit count
    /// factorial), whatever the solver actually expanded.
    pub fn candidates(&self) -> usize {
        self.candidates
    }

    pub fn best(&self, k: usize) -> &[Walk] {
        &self.walks[..k.min(self.walks.len())]
    }

    pub fn worst(&self, k: usize) -> &[Walk] {
        &self.walks[self.walks.len() - k.min(self.walks.len())..]
    }

    /// Walks with their 0-based rank, cheapest first.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Walk)> {
        self.walks.iter().enumerate()
    }

    /// Resolves a literal walked route (start included) back to its rank.
    pub fn rank_of(&self, route: &[Target]) -> Result<(usize, &Walk), RankError> {
        if route.len() > NUM_TARGETS {
            return Err(RankError::UnknownRoute(format_route(route)));
        }
        let key: Route = route.iter().copied().collect();
        match self.by_route.get(&key) {
            Some(&rank) => Ok((rank, &self.walks[rank])),
            None => Err(RankError::UnknownRoute(format_route(route))),
        }
    }
}

pub trait Solver {
    // Name to display for this solver.
    fn name(&self) -> &str;

    // Implementation of the solver.
    fn do_rank(&mut self, level: &Level, graph: &Graph) -> Result<Ranking, SimError>;

    // Wrapper to do_rank, to log timing and acceptance information.
    fn rank(&mut self, level: &Level, graph: &Graph) -> Result<Ranking, SimError> {
        let start = Instant::now();
        let ranking = self.do_rank(level, graph)?;
        info!("Solver {} took {:?}", self.name(), start.elapsed());
        info!(
            "Solver {} kept {} of {} orders",
            self.name(),
            ranking.len(),
            ranking.candidates()
        );
        if let Some(best) = ranking.best(1).first() {
            info!("Cheapest route: {} ({})", format_route(&best.route), best.cost);
        }
        Ok(ranking)
    }
}

// Feeds every permutation of the must-visit set to the simulator and keeps
// the accepted walks. The reference implementation.
pub struct ExhaustiveSolver {}

// Depth-first generation that abandons a prefix as soon as it breaks the
// opener, lever-precedence or carrying rules. Candidates are tried in
// must-visit order at every depth, so accepted walks come out in the same
// order the exhaustive solver finds them.
pub struct PruningSolver {}

impl Solver for ExhaustiveSolver {
    fn name(&self) -> &str {
        "exhaustive"
    }

    fn do_rank(&mut self, level: &Level, graph: &Graph) -> Result<Ranking, SimError> {
        let n = level.must_visit.len();
        let mut walks = Vec::new();
        let mut candidates = 0;
        for ordering in level.must_visit.iter().copied().permutations(n) {
            candidates += 1;
            if let Verdict::Accepted(walk) = simulate(&ordering, level, graph)? {
                walks.push(walk);
            }
        }
        Ok(Ranking::new(walks, candidates))
    }
}

impl Solver for PruningSolver {
    fn name(&self) -> &str {
        "pruning"
    }

    fn do_rank(&mut self, level: &Level, graph: &Graph) -> Result<Ranking, SimError> {
        let mut search = PrefixSearch {
            level,
            graph,
            used: vec![false; level.must_visit.len()],
            route: Route::new(),
            walks: Vec::new(),
        };
        search.route.push(level.start);
        search.extend(level.start, 0.0, false, false)?;
        Ok(Ranking::new(search.walks, factorial(level.must_visit.len())))
    }
}

struct PrefixSearch<'a> {
    level: &'a Level,
    graph: &'a Graph,
    used: Vec<bool>,
    route: Route,
    walks: Vec<Walk>,
}

impl PrefixSearch<'_> {
    fn extend(
        &mut self,
        at: Target,
        cost_so_far: Cost,
        carrying: bool,
        lever_pulled: bool,
    ) -> Result<(), SimError> {
        if self.route.len() == self.level.must_visit.len() + 1 {
            let cost = cost_so_far
                + surcharge_total(&self.route, self.level.lever, &self.graph.surcharges);
            self.walks.push(Walk { route: self.route.clone(), cost });
            return Ok(());
        }
        let first = self.route.len() == 1;
        for i in 0..self.level.must_visit.len() {
            if self.used[i] {
                continue;
            }
            let next = self.level.must_visit[i];
            if first && !self.level.is_initial(next) {
                continue;
            }
            if !lever_pulled && self.level.is_gated(next) {
                continue;
            }
            match next.category() {
                Category::Socket if !carrying => continue,
                Category::Battery if carrying => continue,
                _ => (),
            }
            let leg = self
                .graph
                .cost(at, next)
                .ok_or(SimError::MissingDistance { from: at, to: next })?;
            let now_carrying = match next.category() {
                Category::Battery => true,
                Category::Socket => false,
                _ => carrying,
            };
            self.used[i] = true;
            self.route.push(next);
            self.extend(
                next,
                cost_so_far + leg,
                now_carrying,
                lever_pulled || next == self.level.lever,
            )?;
            self.route.pop();
            self.used[i] = false;
        }
        Ok(())
    }
}

fn factorial(n: usize) -> usize {
    (1..=n).product()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::parse_route;
    use crate::simulate::Rejection;

    // The synthetic 3-stop level used to exercise substitute tables.
    fn mini() -> (Level, Graph) {
        let level = Level {
            start: Target::Entrance,
            lever: Target::Lever,
            must_visit: vec![Target::Lever, Target::ChairShelf, Target::SocketA],
            lever_gated: vec![],
            initial_targets: vec![Target::Lever, Target::ChairShelf],
        };
        let graph = Graph::from_json(
            r#"{
                "distances": {
                    "E": {"3": 1, "1": 5},
                    "3": {"1": 1, "A": 1},
                    "1": {"3": 1, "A": 1},
                    "A": {"3": 1}
                },
                "surcharges": []
            }"#,
        )
        .unwrap();
        (level, graph)
    }

    #[test]
    fn test_match_exhaustive() {
        let level = Level::flat();
        let graph = Graph::flat();
        let slow = ExhaustiveSolver {}.rank(&level, &graph).unwrap();
        let fast = PruningSolver {}.rank(&level, &graph).unwrap();
        assert_eq!(slow.len(), fast.len());
        assert_eq!(slow.candidates(), fast.candidates());
        for ((rank_a, a), (rank_b, b)) in slow.iter().zip(fast.iter()) {
            assert_eq!(rank_a, rank_b);
            assert_eq!(a, b, "rankings diverge at rank {rank_a}");
        }
    }

    #[test]
    fn test_flat_ranking_shape() {
        let level = Level::flat();
        let graph = Graph::flat();
        let ranking = PruningSolver {}.rank(&level, &graph).unwrap();
        assert_eq!(ranking.candidates(), 362880);
        assert!(!ranking.is_empty());
        assert!(ranking.len() < ranking.candidates());
        // Sorted, and re-sorting is a no-op.
        let costs: Vec<Cost> = ranking.iter().map(|(_, w)| w.cost).collect();
        let mut resorted = costs.clone();
        resorted.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(costs, resorted);
    }

    #[test]
    fn test_flat_walk_invariants() {
        let level = Level::flat();
        let graph = Graph::flat();
        let ranking = PruningSolver {}.rank(&level, &graph).unwrap();
        for (_, walk) in ranking.iter() {
            assert_eq!(walk.route.len(), level.must_visit.len() + 1);
            assert_eq!(walk.route[0], level.start);
            for &target in &level.must_visit {
                assert_eq!(walk.route.iter().filter(|&&t| t == target).count(), 1);
            }
            let lever_at = walk.route.iter().position(|&t| t == level.lever).unwrap();
            for &gated in &level.lever_gated {
                let gated_at = walk.route.iter().position(|&t| t == gated).unwrap();
                assert!(lever_at < gated_at);
            }
            // The simulator reproduces the walk from its raw ordering.
            match simulate(&walk.route[1..], &level, &graph).unwrap() {
                Verdict::Accepted(again) => assert_eq!(&again, walk),
                Verdict::Rejected(why) => panic!("accepted walk re-rejected: {why:?}"),
            }
        }
    }

    #[test]
    fn test_best_worst() {
        let level = Level::flat();
        let graph = Graph::flat();
        let ranking = PruningSolver {}.rank(&level, &graph).unwrap();
        let all: Vec<&Walk> = ranking.iter().map(|(_, w)| w).collect();
        assert_eq!(ranking.best(3).iter().collect::<Vec<_>>(), all[..3].to_vec());
        assert_eq!(
            ranking.worst(3).iter().collect::<Vec<_>>(),
            all[all.len() - 3..].to_vec()
        );
        // Oversized requests just return everything.
        assert_eq!(ranking.best(usize::MAX).len(), ranking.len());
        assert_eq!(ranking.worst(usize::MAX).len(), ranking.len());
    }

    #[test]
    fn test_rank_of() {
        let level = Level::flat();
        let graph = Graph::flat();
        let ranking = PruningSolver {}.rank(&level, &graph).unwrap();

        let route = parse_route("E,3,1,A,2,C,4,D,5,B").unwrap();
        let (rank, walk) = ranking.rank_of(&route).unwrap();
        assert_eq!(walk.cost, 74.5);
        assert_eq!(ranking.iter().nth(rank).unwrap().1, walk);

        let best = &ranking.best(1)[0];
        assert_eq!(ranking.rank_of(&best.route).unwrap().0, 0);

        // One of the hand-picked illustration routes.
        let shown = parse_route("E,2,B,3,5,A,4,C,1,D").unwrap();
        assert!(ranking.rank_of(&shown).is_ok());

        // A structurally illegal route is an error, not a sentinel.
        let illegal = parse_route("E,A,3,1,2,4,5,B,C,D").unwrap();
        assert!(matches!(
            ranking.rank_of(&illegal),
            Err(RankError::UnknownRoute(_))
        ));
    }

    #[test]
    fn test_mini_level_ranking() {
        let (level, graph) = mini();
        let ranking = ExhaustiveSolver {}.rank(&level, &graph).unwrap();
        assert_eq!(ranking.candidates(), 6);
        // Of the 6 orders: two open at the socket, one walks to it
        // empty-handed, three survive.
        assert_eq!(ranking.len(), 3);
        let routes: Vec<String> =
            ranking.iter().map(|(_, w)| format_route(&w.route)).collect();
        // 3-1-A costs 3; the two openings at 1 tie at 7 and keep the order
        // they were generated in.
        assert_eq!(routes, vec!["E -> 3 -> 1 -> A", "E -> 1 -> 3 -> A", "E -> 1 -> A -> 3"]);
        let costs: Vec<Cost> = ranking.iter().map(|(_, w)| w.cost).collect();
        assert_eq!(costs, vec![3.0, 7.0, 7.0]);

        let fast = PruningSolver {}.rank(&level, &graph).unwrap();
        for ((_, a), (_, b)) in ranking.iter().zip(fast.iter()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_mini_level_rejections() {
        let (level, graph) = mini();
        let verdict =
            simulate(&[Target::SocketA, Target::Lever, Target::ChairShelf], &level, &graph)
                .unwrap();
        assert_eq!(
            verdict,
            Verdict::Rejected(Rejection::BadOpener(Target::SocketA))
        );
    }
}
