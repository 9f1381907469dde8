pub mod manage;
pub mod notion;
pub mod zoom;
