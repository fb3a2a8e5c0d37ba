pub mod events_controller;
pub mod status_controller;
