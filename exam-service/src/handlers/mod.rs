pub mod health;
pub mod papers;
pub mod questions;
pub mod users;
