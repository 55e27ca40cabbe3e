mod steps;
mod world;

pub use world::VendorPerfWorld;
