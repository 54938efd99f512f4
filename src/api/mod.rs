// JSON HTTP API over the query router

pub mod handlers;
pub mod models;
pub mod routes;
