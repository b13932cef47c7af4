pub mod batch;
pub mod clean;
pub mod info;
pub mod validate;
