pub mod dashboard;
pub mod db;
pub mod settings;
