pub mod config;
pub mod playlist;
pub mod profile;
pub mod run;
pub mod shop;
pub mod stats;
