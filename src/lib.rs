pub mod capture;
pub mod circumference;
pub mod config;
pub mod frame;
pub mod geometry;
pub mod measure;
pub mod session;
pub mod skeleton;
