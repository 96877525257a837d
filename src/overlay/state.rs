//! Card strip state
//!
//! Scroll position and transient notifications for the level card overlay

/// How long a status message stays up, in seconds
pub const STATUS_DURATION: f32 = 2.0;

pub struct CardStrip {
    /// Card the strip is scrolling towards
    pub selected: usize,
    /// Horizontal scroll animation value (0.0 = first card centred)
    pub scroll: f32,
    pub status_message: Option<String>,
    pub status_timer: f32,
}

impl CardStrip {
    pub fn new(selected: usize) -> Self {
        Self {
            selected,
            scroll: selected as f32,
            status_message: None,
            status_timer: 0.0,
        }
    }

    /// Update animations (call once per frame with delta time)
    pub fn update(&mut self, dt: f32) {
        self.scroll = Self::ease_towards(self.scroll, self.selected as f32, dt * 8.0);

        if self.status_message.is_some() {
            self.status_timer -= dt;
            if self.status_timer <= 0.0 {
                self.status_message = None;
                self.status_timer = 0.0;
            }
        }
    }

    fn ease_towards(current: f32, target: f32, speed: f32) -> f32 {
        current + (target - current) * speed.min(1.0)
    }

    /// Scroll to a card. Wrapping from the last card to the first scrolls
    /// back across the strip.
    pub fn select(&mut self, index: usize) {
        self.selected = index;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_timer = STATUS_DURATION;
    }

    /// Signed distance of a card from the strip centre, in cards
    pub fn offset_of(&self, index: usize) -> f32 {
        index as f32 - self.scroll
    }
}
