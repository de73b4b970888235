use crate::models::KeybindingsConfig;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// 输入处理器，负责将按键事件映射到选择操作
pub struct InputHandler {
    keybindings: KeybindingsConfig,
}

/// 用户操作类型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UserAction {
    Quit,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Confirm,
    None,
}

impl InputHandler {
    pub fn new(keybindings: KeybindingsConfig) -> Self {
        Self { keybindings }
    }

    /// 处理按键事件，返回对应的用户操作
    pub fn handle_key_event(&self, key_event: KeyEvent) -> UserAction {
        // 部分平台会同时上报按下和松开
        if key_event.kind == KeyEventKind::Release {
            return UserAction::None;
        }

        match key_event.code {
            KeyCode::Char(c) => self.handle_char_key(c),
            KeyCode::Up => UserAction::MoveUp,
            KeyCode::Down => UserAction::MoveDown,
            KeyCode::Left => UserAction::MoveLeft,
            KeyCode::Right => UserAction::MoveRight,
            KeyCode::Enter => self.get_named_action("enter"),
            KeyCode::Esc => UserAction::Quit,
            _ => UserAction::None,
        }
    }

    /// 处理字符按键
    fn handle_char_key(&self, c: char) -> UserAction {
        let key_str = if c == ' ' { "space".to_string() } else { c.to_string() };
        self.find_matching_action(&key_str)
    }

    /// 名称形式的按键（enter/space），只在配置了时生效
    fn get_named_action(&self, name: &str) -> UserAction {
        self.find_matching_action(name)
    }

    /// 构建操作映射表
    fn build_action_map(&self) -> [(&str, UserAction); 6] {
        [
            (&self.keybindings.quit, UserAction::Quit),
            (&self.keybindings.up, UserAction::MoveUp),
            (&self.keybindings.down, UserAction::MoveDown),
            (&self.keybindings.left, UserAction::MoveLeft),
            (&self.keybindings.right, UserAction::MoveRight),
            (&self.keybindings.confirm, UserAction::Confirm),
        ]
    }

    /// 查找匹配的操作
    fn find_matching_action(&self, key_str: &str) -> UserAction {
        self.build_action_map()
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(key_str))
            .map(|(_, action)| *action)
            .unwrap_or(UserAction::None)
    }
}
