pub mod finder;
pub mod handlers;
pub mod policy;

pub use finder::ResourceFinder;
