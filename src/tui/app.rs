use crate::tui::input::UserAction;

/// 选择界面的状态
pub struct ChooserApp {
    pub title: String,
    pub options: Vec<String>,
    pub columns: usize,             // 当前网格列数，由渲染器根据宽度更新
    pub selected_index: usize,      // 当前高亮的选项
    pub scroll_offset: usize,       // 网格滚动偏移（行）
    pub confirmed: bool,
    pub should_quit: bool,
}

impl ChooserApp {
    pub fn new(title: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            title: title.into(),
            options,
            columns: 1,
            selected_index: 0,
            scroll_offset: 0,
            confirmed: false,
            should_quit: false,
        }
    }

    /// 处理退出操作（不做选择）
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// 确认当前高亮的选项
    pub fn confirm(&mut self) {
        if !self.options.is_empty() {
            self.confirmed = true;
            self.should_quit = true;
        }
    }

    /// 按用户操作更新状态，上下移动按整行（列数）跳转
    pub fn apply(&mut self, action: UserAction) {
        if self.options.is_empty() {
            if action == UserAction::Quit {
                self.quit();
            }
            return;
        }

        let last = self.options.len() - 1;
        let cols = self.columns.max(1);
        match action {
            UserAction::Quit => self.quit(),
            UserAction::Confirm => self.confirm(),
            UserAction::MoveUp => {
                self.selected_index = self.selected_index.saturating_sub(cols);
            }
            UserAction::MoveDown => {
                self.selected_index = self.selected_index.saturating_add(cols).min(last);
            }
            UserAction::MoveLeft => {
                self.selected_index = self.selected_index.saturating_sub(1);
            }
            UserAction::MoveRight => {
                self.selected_index = self.selected_index.saturating_add(1).min(last);
            }
            UserAction::None => {}
        }
    }

    /// 确认后的选择结果
    pub fn selection(&self) -> Option<usize> {
        self.confirmed.then_some(self.selected_index)
    }
}
