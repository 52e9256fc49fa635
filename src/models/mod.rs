pub mod history;
pub mod omdb;
pub mod profile;
pub mod queue;
pub mod title;

pub use history::{Decision, History, HistoryEntry};
pub use omdb::{OmdbSearchResponse, OmdbTitle};
pub use profile::{Preferences, Profile, Theme};
pub use queue::{DailyQueue, QUEUE_SIZE};
pub use title::{MediaKind, Title};
