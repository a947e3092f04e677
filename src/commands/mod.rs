pub mod job_status;
pub mod page;
pub mod poll;
pub mod script;
pub mod submit;
