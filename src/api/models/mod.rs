pub mod common;
pub mod sites;
pub mod equipment;
pub mod dashboard;

pub use common::*;
pub use sites::*;
pub use equipment::*;
pub use dashboard::*;
