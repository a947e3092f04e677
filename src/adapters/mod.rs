pub mod text_generation;
pub mod video_vendor;
