use crate::Location;

/// Types that may remember where they were created.
pub trait Tracked {

    fn location(&self) -> Option<Location>;

    /// The tracked location, or the caller's if there is none.
    #[track_caller]
    #[inline(always)]
    fn location_or_this(&self) -> Location {
        self.location()
            .unwrap_or_else(|| caller!())
    }
}

impl Tracked for Location {

    #[inline(always)]
    fn location(&self) -> Option<Location> {
        Some(*self)
    }
}

impl Tracked for Option<Location> {

    #[inline(always)]
    fn location(&self) -> Option<Location> {
        *self
    }
}
