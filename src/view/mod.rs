// View modules for Shiori

pub mod chrome;
pub mod content;
pub mod modals;
pub mod sidebar;
