pub mod bean;
pub mod error;
pub mod excel;
