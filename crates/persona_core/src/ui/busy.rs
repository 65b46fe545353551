//! Busy indicator shown while a request is in flight.

/// Overlay state.
///
/// `show`/`hide` toggle visibility without nesting: one `hide` clears any
/// number of `show`s. `times_shown` only counts shows for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusyIndicator {
    visible: bool,
    times_shown: u64,
}

impl BusyIndicator {
    /// Makes the overlay visible and counts the show.
    pub fn show(&mut self) {
        self.visible = true;
        self.times_shown += 1;
    }

    /// Hides the overlay regardless of how many shows preceded it.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn times_shown(&self) -> u64 {
        self.times_shown
    }
}
