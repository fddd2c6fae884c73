pub mod frame_batch;
pub mod frame_sampler;
pub mod sample_request;
