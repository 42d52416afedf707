pub mod db;
pub mod factories;
