pub mod actuator;
pub mod v1;
