pub mod prints;
pub mod run_params;
pub mod run_result;
pub mod sample;
pub mod series;
