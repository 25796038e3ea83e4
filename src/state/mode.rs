// Mode state - application modal and input state

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum AppMode {
    Normal,
    Filtering,
    Help,
}

pub struct ModeState {
    pub mode: AppMode,
    pub focus_filter: bool,
}

impl ModeState {
    pub fn new() -> Self {
        Self {
            mode: AppMode::Normal,
            focus_filter: false,
        }
    }

    pub fn set_mode(&mut self, mode: AppMode) {
        self.mode = mode;
    }

    pub fn set_filter_focus(&mut self, focus: bool) {
        self.focus_filter = focus;
    }
}
