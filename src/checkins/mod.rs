pub mod activity;
pub mod board;
pub mod catalog;
pub mod controller;
pub mod random;
pub mod ranking;

pub use activity::RecentActivityLog;
pub use board::{BoardSnapshot, CheckinBoard, TickParams};
pub use catalog::{CheckinSeed, SeedKind};
pub use controller::CheckinController;
pub use random::{RandomSource, RngSource};
pub use ranking::GenreRanking;
