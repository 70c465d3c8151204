pub mod composite_command;
pub mod compositor;
pub mod placement;
