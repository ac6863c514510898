pub mod building;
pub mod export;
pub mod init;
