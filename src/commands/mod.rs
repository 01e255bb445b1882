pub mod delete;
pub mod export;
pub mod init;
pub mod list;
pub mod open;
pub mod rate;
pub mod reply;
pub mod show;
pub mod status;
