use std::ops::RangeInclusive;

/// One-way reveal latches for page sections.
///
/// A section latches the first time the active index reaches it and never
/// un-latches, so entry animations play once even when the reader scrolls
/// back up. Because every latch is "some observed index was `>=` mine",
/// the whole set is captured by the highest index seen so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionRevealTracker {
    high_water: Option<usize>,
}

impl SectionRevealTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the active section. Returns the sections this observation
    /// revealed for the first time, if any.
    pub fn observe(&mut self, active_index: usize) -> Option<RangeInclusive<usize>> {
        let start = match self.high_water {
            Some(hw) if active_index <= hw => return None,
            Some(hw) => hw + 1,
            None => 0,
        };
        self.high_water = Some(active_index);
        Some(start..=active_index)
    }

    /// Whether `section_index` is revealed, after observing
    /// `current_active_index`.
    pub fn is_revealed(&mut self, section_index: usize, current_active_index: usize) -> bool {
        self.observe(current_active_index);
        self.was_revealed(section_index)
    }

    /// Whether `section_index` has latched, without observing anything.
    pub fn was_revealed(&self, section_index: usize) -> bool {
        self.high_water.is_some_and(|hw| section_index <= hw)
    }

    pub fn furthest_reached(&self) -> Option<usize> {
        self.high_water
    }

    /// Clear every latch, e.g. when the page is mounted again.
    pub fn reset(&mut self) {
        self.high_water = None;
    }
}
