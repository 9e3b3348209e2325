pub mod auth;
pub mod config;
pub mod db;
pub mod delivery;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod presence;
pub mod relay;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod websocket;
