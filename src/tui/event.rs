use anyhow::Result;
use crossterm::event::{self, Event as CEvent, KeyEvent};
use std::time::Duration;

pub enum Event {
    Input(KeyEvent),
    Tick,
}

/// 轮询终端事件，超时后返回Tick
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            if let CEvent::Key(key) = event::read()? {
                return Ok(Event::Input(key));
            }
        }
        Ok(Event::Tick)
    }
}
