/// Counts ticks and fires once every `every` ticks, then starts over.
#[derive(Debug, Clone)]
pub struct ToastCounter {
    every: u32,
    count: u32,
}

impl ToastCounter {
    pub fn new(every: u32) -> Self {
        Self {
            every: every.max(1),
            count: 0,
        }
    }

    /// Count one tick. Returns true when a toast is due.
    pub fn advance(&mut self) -> bool {
        self.count += 1;
        if self.count >= self.every {
            self.count = 0;
            true
        } else {
            false
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}
