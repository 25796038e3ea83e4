pub mod mode;
pub mod navigation;
pub mod session;
pub mod sidebar;
pub mod ui;

pub use mode::{AppMode, ModeState};
pub use navigation::NavigationState;
pub use session::SessionState;
pub use sidebar::{ScrollRequest, SidebarState};
pub use ui::UIState;
