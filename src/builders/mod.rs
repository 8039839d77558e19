//! Fluent builders producing operation trees.

mod filter;
mod index;
mod projection;
mod sort;
mod stage;
mod update;

pub use filter::Filter;
pub use index::IndexKeys;
pub use projection::Projection;
pub use sort::Sort;
pub use stage::Accumulator;
pub use update::Update;
