pub mod books;
pub mod health;
pub mod recommendations;
pub mod stats;
pub mod users;
