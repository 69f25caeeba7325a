//! Electric-vehicle trip simulator with charging-stop planning.

pub mod chargers;
pub mod config;
pub mod geo;
pub mod io;
pub mod providers;
pub mod report;
/// Range tracking, simulation engine, and trip plan types.
pub mod sim;
pub mod vehicle;
