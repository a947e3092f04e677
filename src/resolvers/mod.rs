pub mod invoke;
pub mod verification;
