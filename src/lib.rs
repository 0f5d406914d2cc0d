pub mod config;
pub mod error;
pub mod rest;
pub mod storage;
