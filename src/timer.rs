//! Countdown that bounds each level attempt.

use crate::constants::TARGET_FPS;

#[derive(Clone, Debug, PartialEq)]
pub struct GameTimer {
    seconds_left: u32,
    /// Nominal frames accumulated towards the next second.
    accum: f32,
}

impl GameTimer {
    pub fn new(seconds: u32) -> Self {
        Self {
            seconds_left: seconds,
            accum: 0.0,
        }
    }

    pub fn set(&mut self, seconds: u32) {
        self.seconds_left = seconds;
        self.accum = 0.0;
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    pub fn is_expired(&self) -> bool {
        self.seconds_left == 0
    }

    /// Take one second off. Returns true only on the tick that reaches zero;
    /// an expired timer stays at zero.
    pub fn countdown(&mut self) -> bool {
        if self.seconds_left == 0 {
            return false;
        }
        self.seconds_left -= 1;
        self.seconds_left == 0
    }

    /// Advance by a frame delta. Returns true if the timer ran out during it.
    pub fn advance(&mut self, delta: f32) -> bool {
        self.accum += delta;
        let mut expired = false;
        while self.accum >= TARGET_FPS {
            self.accum -= TARGET_FPS;
            expired |= self.countdown();
        }
        expired
    }

    /// `m:ss` for the HUD.
    pub fn display(&self) -> String {
        format!("{}:{:02}", self.seconds_left / 60, self.seconds_left % 60)
    }
}
