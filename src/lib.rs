// src/lib.rs — Library root for rulecatch

pub mod cli;
pub mod detector;
pub mod infra;
pub mod rules;
pub mod storage;
pub mod transcript;
pub mod util;
