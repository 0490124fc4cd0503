//! Flight schedule query engine.
//!
//! Loads a static flight schedule once and answers queries over it: a
//! fixed filter pipeline (location, time window, day of week, airline,
//! cargo/passenger, added/removed services) and a depth-bounded search for
//! multi-leg itineraries, served over HTTP.

pub mod config;
pub mod domain;
pub mod filter;
pub mod planner;
pub mod query;
pub mod schedule;
pub mod web;
