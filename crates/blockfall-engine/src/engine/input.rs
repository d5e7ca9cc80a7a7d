/// Pressed state of every game command, sampled once per tick.
///
/// Both slide signals may be set at once; the session tries the left slide
/// first and only tries the right one when the left slide did not happen.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InputSignals {
    pub move_left: bool,
    pub move_right: bool,
    pub rotate: bool,
    pub soft_drop: bool,
    pub hard_drop: bool,
    pub restart: bool,
    pub quit: bool,
}

impl InputSignals {
    pub const NONE: Self = Self {
        move_left: false,
        move_right: false,
        rotate: false,
        soft_drop: false,
        hard_drop: false,
        restart: false,
        quit: false,
    };

    /// Combines two samples, keeping every signal pressed in either.
    #[must_use]
    pub fn merged(self, other: Self) -> Self {
        Self {
            move_left: self.move_left || other.move_left,
            move_right: self.move_right || other.move_right,
            rotate: self.rotate || other.rotate,
            soft_drop: self.soft_drop || other.soft_drop,
            hard_drop: self.hard_drop || other.hard_drop,
            restart: self.restart || other.restart,
            quit: self.quit || other.quit,
        }
    }
}
