//! Status dashboard for a community game server network.
//!
//! Polls a public server-status API for every configured node, keeps a
//! board of rendered cards plus fleet totals, and serves a redacted raw
//! payload viewer.

pub mod config;
pub mod handlers;
pub mod models;
pub mod status;
pub mod storage;
pub mod utils;
pub mod view;
pub mod viewer;
