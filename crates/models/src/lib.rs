pub mod errors;
pub mod db;
pub mod wire_time;
pub mod pickup;
