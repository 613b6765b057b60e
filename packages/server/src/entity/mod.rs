pub mod problem;
pub mod user;
pub mod user_problem;
