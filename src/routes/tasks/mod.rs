pub mod tasks_handlers;
