pub mod logger;
pub mod photogrammetry;
