//! Parent selection
pub mod tournament;

pub use self::tournament::tournament_select;
