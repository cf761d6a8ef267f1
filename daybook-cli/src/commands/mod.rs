pub mod day;
pub mod delete;
pub mod edit;
pub mod new;
pub mod week;
