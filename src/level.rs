// Static description of the flat level: which locations exist, what kind
// each one is, and the visit rules that follow from the room layout.

use arrayvec::ArrayVec;
use itertools::Itertools;
use thiserror::Error;

/// Number of distinct locations, entrance included.
pub const NUM_TARGETS: usize = 10;

/// A visit sequence, entrance first. Sized for the full level.
pub type Route = ArrayVec<Target, NUM_TARGETS>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    Entrance,
    ChairShelf,
    MiddleTable,
    Lever,
    BelowLever,
    LeverShelf,
    SocketA,
    SocketB,
    SocketC,
    SocketD,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Category {
    /// The fixed origin, never part of the must-visit set.
    Start,
    /// Picking one up means carrying it until the next socket.
    Battery,
    /// Needs a battery in hand, plugging it in frees the hands.
    Socket,
    /// Pulling it unlocks the locations behind it.
    Lever,
}

impl Target {
    pub const ALL: [Target; NUM_TARGETS] = [
        Target::Entrance,
        Target::ChairShelf,
        Target::MiddleTable,
        Target::Lever,
        Target::BelowLever,
        Target::LeverShelf,
        Target::SocketA,
        Target::SocketB,
        Target::SocketC,
        Target::SocketD,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// One-character id used in the distance table and on the map.
    pub fn symbol(self) -> char {
        match self {
            Target::Entrance => 'E',
            Target::ChairShelf => '1',
            Target::MiddleTable => '2',
            Target::Lever => '3',
            Target::BelowLever => '4',
            Target::LeverShelf => '5',
            Target::SocketA => 'A',
            Target::SocketB => 'B',
            Target::SocketC => 'C',
            Target::SocketD => 'D',
        }
    }

    pub fn from_symbol(token: &str) -> Result<Target, ParseError> {
        match token {
            "E" => Ok(Target::Entrance),
            "1" => Ok(Target::ChairShelf),
            "2" => Ok(Target::MiddleTable),
            "3" => Ok(Target::Lever),
            "4" => Ok(Target::BelowLever),
            "5" => Ok(Target::LeverShelf),
            "A" => Ok(Target::SocketA),
            "B" => Ok(Target::SocketB),
            "C" => Ok(Target::SocketC),
            "D" => Ok(Target::SocketD),
            _ => Err(ParseError::UnknownSymbol(token.to_string())),
        }
    }

    /// Label used on the reference map.
    pub fn name(self) -> &'static str {
        match self {
            Target::Entrance => "Entrance",
            Target::ChairShelf => "Chair shelf",
            Target::MiddleTable => "Middle table",
            Target::Lever => "Lever",
            Target::BelowLever => "Below lever",
            Target::LeverShelf => "Lever shelf",
            Target::SocketA => "First socket from left",
            Target::SocketB => "Second socket",
            Target::SocketC => "Third socket",
            Target::SocketD => "Fourth socket",
        }
    }

    pub fn category(self) -> Category {
        match self {
            Target::Entrance => Category::Start,
            Target::ChairShelf
            | Target::MiddleTable
            | Target::BelowLever
            | Target::LeverShelf => Category::Battery,
            Target::Lever => Category::Lever,
            Target::SocketA | Target::SocketB | Target::SocketC | Target::SocketD => {
                Category::Socket
            }
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown location symbol {0:?}")]
    UnknownSymbol(String),
}

/// Parses a comma-separated route, e.g. "E,3,1,A,2,C,4,D,5,B".
pub fn parse_route(s: &str) -> Result<Vec<Target>, ParseError> {
    s.split(',').map(|token| Target::from_symbol(token.trim())).collect()
}

pub fn format_route(route: &[Target]) -> String {
    route.iter().map(|t| t.symbol()).join(" -> ")
}

/// Visit rules of one level. Passed around explicitly so tests can run
/// smaller synthetic levels against substitute distance tables.
#[derive(Clone, Debug)]
pub struct Level {
    pub start: Target,
    pub lever: Target,
    /// Every target a legal route visits exactly once, lever included.
    pub must_visit: Vec<Target>,
    /// Only reachable once the lever has been pulled.
    pub lever_gated: Vec<Target>,
    /// The only targets reachable directly from the start.
    pub initial_targets: Vec<Target>,
}

impl Level {
    /// The level as measured on the reference map.
    pub fn flat() -> Self {
        Level {
            start: Target::Entrance,
            lever: Target::Lever,
            must_visit: vec![
                Target::SocketA,
                Target::SocketB,
                Target::SocketC,
                Target::SocketD,
                Target::ChairShelf,
                Target::MiddleTable,
                Target::Lever,
                Target::BelowLever,
                Target::LeverShelf,
            ],
            lever_gated: vec![Target::BelowLever, Target::LeverShelf],
            initial_targets: vec![Target::ChairShelf, Target::MiddleTable, Target::Lever],
        }
    }

    pub fn is_gated(&self, target: Target) -> bool {
        self.lever_gated.contains(&target)
    }

    pub fn is_initial(&self, target: Target) -> bool {
        self.initial_targets.contains(&target)
    }
}
