//! Role mapping: free-text job title → official occupation and SOC code.

pub mod handlers;
pub mod local_table;
pub mod mapper;

pub use mapper::RoleMapper;
