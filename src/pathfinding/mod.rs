mod astar;

pub use astar::{astar, PathConfig, Pathfinder};

pub mod prelude {
    pub use crate::pathfinding::astar::*;
}
