pub mod checkin;
pub mod genre;

pub use checkin::CheckinRecord;
pub use genre::GenreRecord;
