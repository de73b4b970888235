use crate::models::{KeybindingsConfig, TuiConfig};
use crate::tui::ChooserApp;
use crate::tui::utils::{calculate_list_layout, parse_color};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// TUI渲染器，负责处理所有UI渲染逻辑
pub struct Renderer {
    border: Color,
    selected: Color,
    text: Color,
    help_line: Option<String>,
}

impl Renderer {
    pub fn new(config: &TuiConfig, keybindings: &KeybindingsConfig) -> Self {
        let help_line = config.show_help_bar.then(|| {
            format!(
                "{}/{}/{}/{}: move   {}: select   {}/esc: cancel",
                keybindings.up,
                keybindings.down,
                keybindings.left,
                keybindings.right,
                keybindings.confirm,
                keybindings.quit
            )
        });
        Self {
            border: parse_color(&config.colors.border),
            selected: parse_color(&config.colors.selected),
            text: parse_color(&config.colors.text),
            help_line,
        }
    }

    /// 从app结构体中读取数据并渲染
    pub fn draw(&self, f: &mut Frame, app: &mut ChooserApp) {
        let help_height = if self.help_line.is_some() { 1 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Min(3), Constraint::Length(help_height)])
            .split(f.area());

        self.draw_option_list(f, app, chunks[0]);
        if let Some(help) = &self.help_line {
            let help_bar = Paragraph::new(help.as_str())
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            f.render_widget(help_bar, chunks[1]);
        }
    }

    /// 绘制选项网格
    fn draw_option_list(&self, f: &mut Frame, app: &mut ChooserApp, area: Rect) {
        // 处理空列表情况
        if app.options.is_empty() {
            let empty_list = Paragraph::new("Nothing to choose from")
                .block(self.block(app.title.clone()))
                .alignment(Alignment::Center);
            f.render_widget(empty_list, area);
            return;
        }

        let max_name_length = app
            .options
            .iter()
            .map(|name| name.chars().count())
            .max()
            .unwrap_or(1);
        let num_names = app.options.len();
        let (cols, spacing) =
            calculate_list_layout(max_name_length, num_names, area.width.saturating_sub(2));
        app.columns = cols;

        let (visible_rows, total_rows, scroll_offset) = self.calculate_scroll_info(
            num_names,
            cols,
            area.height,
            app.selected_index,
            app.scroll_offset,
        );
        app.scroll_offset = scroll_offset;

        let lines = self.build_option_lines(
            &app.options,
            cols,
            visible_rows,
            scroll_offset,
            app.selected_index,
            spacing,
            max_name_length,
        );

        let title = self.generate_list_title(&app.title, total_rows, visible_rows, scroll_offset);
        let option_list = Paragraph::new(lines)
            .block(self.block(title))
            .alignment(Alignment::Left);

        f.render_widget(option_list, area);
    }

    fn block(&self, title: String) -> Block<'static> {
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border))
    }

    /// 计算滚动信息
    fn calculate_scroll_info(
        &self,
        total_options: usize,
        cols: usize,
        area_height: u16,
        selected_index: usize,
        current_offset: usize,
    ) -> (usize, usize, usize) {
        let visible_rows = (area_height.saturating_sub(2) as usize).max(1);
        let total_rows = total_options.div_ceil(cols);
        let selected_row = selected_index / cols;

        let mut scroll_offset = current_offset;
        if selected_row < scroll_offset {
            scroll_offset = selected_row;
        } else if selected_row >= scroll_offset + visible_rows {
            scroll_offset = selected_row + 1 - visible_rows;
        }

        (visible_rows, total_rows, scroll_offset)
    }

    /// 构建选项网格的行
    #[allow(clippy::too_many_arguments)]
    fn build_option_lines(
        &self,
        names: &[String],
        cols: usize,
        visible_rows: usize,
        scroll_offset: usize,
        selected_index: usize,
        spacing: usize,
        max_name_length: usize,
    ) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let total = names.len();
        let total_rows = total.div_ceil(cols);

        for display_row in 0..visible_rows {
            let actual_row = scroll_offset + display_row;
            if actual_row >= total_rows {
                break;
            }

            let mut row_spans = Vec::new();
            for col in 0..cols {
                let index = actual_row * cols + col;
                if index >= total {
                    break;
                }

                let style = self.get_option_style(index == selected_index);
                let formatted_name = format!("{:width$}", names[index], width = max_name_length);
                row_spans.push(Span::styled(formatted_name, style));

                if col < cols - 1 && index < total - 1 {
                    row_spans.push(Span::raw(" ".repeat(spacing)));
                }
            }
            lines.push(Line::from(row_spans));
        }

        lines
    }

    /// 获取选项样式
    fn get_option_style(&self, is_selected: bool) -> Style {
        if is_selected {
            Style::default()
                .fg(self.selected)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(self.text)
        }
    }

    /// 生成列表标题
    fn generate_list_title(
        &self,
        title: &str,
        total_rows: usize,
        visible_rows: usize,
        scroll_offset: usize,
    ) -> String {
        if total_rows > visible_rows {
            let percentage =
                ((scroll_offset as f64 / (total_rows - visible_rows) as f64) * 100.0) as u32;
            format!("{} [{}%]", title, percentage)
        } else {
            title.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn options(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("dataset_{:02}", i)).collect()
    }

    #[test]
    fn test_draw_option_grid() {
        let renderer = Renderer::new(&TuiConfig::default(), &KeybindingsConfig::default());
        let mut app = ChooserApp::new("Choose dataset", options(6));
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();

        terminal.draw(|f| renderer.draw(f, &mut app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Choose dataset"));
        assert!(text.contains("dataset_00"));
        assert!(text.contains("dataset_05"));
        assert!(text.contains("select"));
        // 56列宽可放下多列
        assert!(app.columns > 1);
    }

    #[test]
    fn test_draw_scrolls_to_selection() {
        let config = TuiConfig {
            show_help_bar: false,
            ..TuiConfig::default()
        };
        let renderer = Renderer::new(&config, &KeybindingsConfig::default());
        let mut app = ChooserApp::new("Choose", options(30));
        app.selected_index = 29;
        let mut terminal = Terminal::new(TestBackend::new(16, 8)).unwrap();

        terminal.draw(|f| renderer.draw(f, &mut app)).unwrap();

        assert_eq!(app.columns, 1);
        assert!(app.scroll_offset > 0);
        let text = buffer_text(&terminal);
        assert!(text.contains("dataset_29"));
        assert!(!text.contains("dataset_00"));
    }

    #[test]
    fn test_draw_empty_options() {
        let renderer = Renderer::new(&TuiConfig::default(), &KeybindingsConfig::default());
        let mut app = ChooserApp::new("Choose region", Vec::new());
        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();

        terminal.draw(|f| renderer.draw(f, &mut app)).unwrap();
        assert!(buffer_text(&terminal).contains("Nothing to choose from"));
    }
}
