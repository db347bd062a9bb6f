pub mod elimination;
pub mod input;
pub mod log_pager;
pub mod number_format;
pub mod step_recorder;
