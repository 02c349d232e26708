//! Event finder.
//!
//! Finds Ticketmaster events within a radius of a UK postcode over the next
//! two years and exports them as a CSV file, from the command line or through
//! a small web interface.

pub mod cache;
pub mod config;
pub mod domain;
pub mod export;
pub mod finder;
pub mod postcodes;
pub mod ticketmaster;
pub mod web;
