pub mod db;
pub mod error;
pub mod interactions;
pub mod models;
pub mod routes;
