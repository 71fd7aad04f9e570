pub mod dav_ports;
pub mod restore_ports;
