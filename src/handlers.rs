pub mod quotes;
pub mod status;
pub mod users;
