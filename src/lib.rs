pub mod app_state;
pub mod authorization;
pub mod configuration;
pub mod dispatch;
pub mod dispatch_worker;
pub mod domain;
pub mod email_client;
pub mod routes;
pub mod startup;
pub mod storage;
pub mod telemetry;
