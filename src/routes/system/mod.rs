pub mod system_handlers;
