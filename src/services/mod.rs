pub mod comment;
pub mod extract;
pub mod normalize;
pub mod script;
pub mod submission;
