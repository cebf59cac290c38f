pub mod dashboard_handlers;
