pub mod dtos;
pub mod ports;
pub mod services;

// Re-exportaciones para facilitar el acceso a los principales puertos
pub use ports::dav_ports::DavClient;
pub use ports::restore_ports::RestoreUseCase;
