pub mod comparator;
pub mod names;

pub use comparator::DocumentComparator;
pub use names::NameSimilarityChecker;
