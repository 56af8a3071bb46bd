//! Public-transit route lookup for commute-time checks, plus the station
//! coordinate table commute destinations are resolved against.

pub mod client;
pub mod stations;

pub use client::{TransitClient, TransitConfig, TransitRoute};
pub use stations::station_coords;
