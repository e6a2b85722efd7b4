pub mod forecast;
pub mod gap;
pub mod occupation;
pub mod resource;
pub mod resume;
pub mod skill;
