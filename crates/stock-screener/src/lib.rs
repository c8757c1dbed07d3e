pub mod ranker;
pub mod screener;
pub mod summary;

pub use ranker::*;
pub use screener::*;
pub use summary::*;
