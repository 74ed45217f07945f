pub mod database;
pub mod price;
