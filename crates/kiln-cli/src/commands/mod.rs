pub mod build;
pub mod clean;
pub mod dispatch;
pub mod env;
pub mod manifest;
pub mod serve;
pub mod test;
