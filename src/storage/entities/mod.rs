pub mod conversations;
pub mod drawing_diary;
pub mod emotion;
pub mod images;
pub mod lemons;
pub mod messages;
pub mod report;
pub mod report_summary;
pub mod tags;
pub mod users;
