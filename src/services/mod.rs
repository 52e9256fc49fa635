pub mod discovery;
pub mod persistence;
pub mod providers;
pub mod review;
pub mod session;
pub mod update;

pub use discovery::{DiscoveryEngine, DiscoveryPolicy};
pub use persistence::ProfileStore;
pub use session::{SessionView, SwipeDecision, SwipeOutcome, SwipeSession};
pub use update::{CachePolicy, UpdateController};
