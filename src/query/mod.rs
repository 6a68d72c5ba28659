pub mod executor;
pub mod results;

pub use executor::{QueryExecutor, RankedDoc, parse_terms};
pub use results::{AccumulatorTree, RankingTree};
