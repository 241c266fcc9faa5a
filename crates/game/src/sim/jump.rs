/// Jump buffer and coyote time, both counting down in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JumpAssist {
    pub buffer_remaining: f32,
    pub coyote_remaining: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpWindows {
    pub buffer_seconds: f32,
    pub coyote_seconds: f32,
}

impl JumpAssist {
    /// Advances both timers by one tick and reports whether a jump fires.
    ///
    /// `grounded` is the ground state carried over from the previous tick's
    /// collision pass. A fired jump zeroes both timers together.
    pub fn update(
        &mut self,
        windows: JumpWindows,
        jump_pressed: bool,
        grounded: bool,
        dt: f32,
    ) -> bool {
        if jump_pressed {
            self.buffer_remaining = windows.buffer_seconds;
        }
        self.buffer_remaining = (self.buffer_remaining - dt).max(0.0);
        self.coyote_remaining = if grounded {
            windows.coyote_seconds
        } else {
            (self.coyote_remaining - dt).max(0.0)
        };

        if self.buffer_remaining > 0.0 && self.coyote_remaining > 0.0 {
            *self = Self::default();
            return true;
        }
        false
    }
}
