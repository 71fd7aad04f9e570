pub mod dav_client;
pub mod multistatus;
