use crate::chooser::Chooser;
use crate::models::{KeybindingsConfig, TuiConfig};
use crate::tui::{ChooserApp, Event, EventHandler, InputHandler, Renderer};
use anyhow::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;
use std::time::Duration;

const TICK_RATE: Duration = Duration::from_millis(250);

/// 全屏选择器，每次选择进入备用屏幕，选择结束后恢复终端
pub struct TuiChooser {
    input_handler: InputHandler,
    renderer: Renderer,
}

impl TuiChooser {
    pub fn new(config: &TuiConfig, keybindings: KeybindingsConfig) -> Self {
        let renderer = Renderer::new(config, &keybindings);
        Self {
            input_handler: InputHandler::new(keybindings),
            renderer,
        }
    }

    /// 运行一次选择的主循环
    fn run(&self, app: &mut ChooserApp) -> Result<()> {
        // 设置终端
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            disable_raw_mode()?;
            return Err(err.into());
        }

        let backend = CrosstermBackend::new(stdout);
        match Terminal::new(backend) {
            Ok(mut terminal) => {
                let result = self.event_loop(&mut terminal, app);
                // 无论选择是否出错都先恢复终端
                let cleanup = Self::cleanup(&mut terminal);
                result.and(cleanup)
            }
            Err(err) => {
                disable_raw_mode()?;
                execute!(io::stdout(), LeaveAlternateScreen)?;
                Err(err.into())
            }
        }
    }

    fn event_loop(
        &self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        app: &mut ChooserApp,
    ) -> Result<()> {
        let events = EventHandler::new(TICK_RATE);

        while !app.should_quit {
            // 渲染界面
            terminal.draw(|f| self.renderer.draw(f, app))?;

            // 处理事件
            match events.next()? {
                Event::Input(key) => app.apply(self.input_handler.handle_key_event(key)),
                Event::Tick => {}
            }
        }
        Ok(())
    }

    // 清理终端设置
    fn cleanup(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        Ok(())
    }
}

impl Chooser for TuiChooser {
    fn choose(&mut self, title: &str, options: &[String]) -> Result<Option<usize>> {
        if options.is_empty() {
            return Ok(None);
        }

        let mut app = ChooserApp::new(title, options.to_vec());
        self.run(&mut app)?;
        Ok(app.selection())
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        let answers = vec!["yes".to_string(), "no".to_string()];
        Ok(self.choose(question, &answers)? == Some(0))
    }
}
