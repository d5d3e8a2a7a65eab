pub mod generate;
pub mod init;
pub mod lists;
pub mod routes;

mod project;
