pub mod advice;
pub mod classification;
pub mod detection;
pub mod pipeline;
pub mod report;
pub mod sampling;
pub mod shared;
pub mod video;
