//! Element types that count their lifecycle events.
//!
//! Counters are thread-local, so tests running on separate threads never see
//! each other's events.

use core::{cell::Cell, ptr::NonNull};

use avec_mem::{ConstructError, ConstructKind, Element, TryDefault};

/// Lifecycle events recorded for one instrumented type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    pub default_constructed: usize,
    pub constructed_with_id: usize,
    pub copied: usize,
    pub moved: usize,
    pub destroyed: usize,
}

impl Counters {

    pub const ZERO: Self = Self {
        default_constructed: 0,
        constructed_with_id: 0,
        copied: 0,
        moved: 0,
        destroyed: 0,
    };

    /// Constructions of any kind minus destructions.
    #[inline(always)]
    pub fn alive(&self) -> isize {
        let constructed = self.default_constructed
            + self.constructed_with_id
            + self.copied
            + self.moved;
        constructed as isize - self.destroyed as isize
    }
}

macro_rules! instrumented {
    (
        $(#[$meta:meta])*
        $name:ident {
            nothrow_move: $nothrow_move:expr,
            copyable: $copyable:expr $(,)?
        }
    ) => {
        paste::paste! {

            thread_local! {
                static [<$name:snake:upper _COUNTERS>]: Cell<Counters> = const { Cell::new(Counters::ZERO) };
                static [<$name:snake:upper _COUNTDOWN>]: Cell<usize> = const { Cell::new(0) };
                static [<$name:snake:upper _PANICS>]: Cell<bool> = const { Cell::new(false) };
            }

            $(#[$meta])*
            #[derive(Debug)]
            pub struct $name {
                pub id: i32,
                pub throw_on_copy: bool,
            }

            impl $name {

                pub fn with_id(id: i32) -> Self {
                    Self::record(|c| c.constructed_with_id += 1);
                    Self {
                        id,
                        throw_on_copy: false,
                    }
                }

                pub fn counters() -> Counters {
                    [<$name:snake:upper _COUNTERS>].with(Cell::get)
                }

                /// Zeroes the counters and disarms every fault.
                pub fn reset_counters() {
                    [<$name:snake:upper _COUNTERS>].with(|c| c.set(Counters::ZERO));
                    [<$name:snake:upper _COUNTDOWN>].with(|c| c.set(0));
                    [<$name:snake:upper _PANICS>].with(|c| c.set(false));
                }

                #[inline(always)]
                pub fn alive() -> isize {
                    Self::counters().alive()
                }

                /// Makes the `n`th default construction from now on fail. `0` disarms.
                pub fn set_default_construction_throw_countdown(n: usize) {
                    [<$name:snake:upper _COUNTDOWN>].with(|c| c.set(n));
                }

                /// Makes armed faults panic instead of returning an error.
                pub fn set_faults_panic(panics: bool) {
                    [<$name:snake:upper _PANICS>].with(|c| c.set(panics));
                }

                fn fault(kind: ConstructKind, reason: &'static str) -> ConstructError {
                    if [<$name:snake:upper _PANICS>].with(Cell::get) {
                        panic!("{}", reason)
                    }
                    ConstructError::new(kind, reason)
                }

                fn record(f: impl FnOnce(&mut Counters)) {
                    [<$name:snake:upper _COUNTERS>].with(|cell| {
                        let mut counters = cell.get();
                        f(&mut counters);
                        cell.set(counters);
                    });
                }
            }

            impl TryDefault for $name {

                fn try_default() -> Result<Self, ConstructError> {
                    let fail = [<$name:snake:upper _COUNTDOWN>].with(|c| match c.get() {
                        0 => false,
                        n => {
                            c.set(n - 1);
                            n == 1
                        },
                    });
                    if fail {
                        return Err(Self::fault(ConstructKind::Default, "countdown reached zero"))
                    }
                    Self::record(|c| c.default_constructed += 1);
                    Ok(Self {
                        id: 0,
                        throw_on_copy: false,
                    })
                }
            }

            unsafe impl Element for $name {

                const NOTHROW_MOVE: bool = $nothrow_move;
                const COPYABLE: bool = $copyable;

                unsafe fn move_construct(src: NonNull<Self>, dst: NonNull<Self>) {
                    unsafe {
                        let from = src.as_ref();
                        dst.write(Self {
                            id: from.id,
                            throw_on_copy: from.throw_on_copy,
                        });
                        Self::record(|c| c.moved += 1);
                        src.drop_in_place();
                    }
                }

                fn copy_construct(&self) -> Result<Self, ConstructError> {
                    if !Self::COPYABLE {
                        return Err(ConstructError::new(ConstructKind::Copy, "type is move-only"))
                    }
                    if self.throw_on_copy {
                        return Err(Self::fault(ConstructKind::Copy, "throw_on_copy is set"))
                    }
                    Self::record(|c| c.copied += 1);
                    Ok(Self {
                        id: self.id,
                        throw_on_copy: false,
                    })
                }

                fn copy_assign(&mut self, src: &Self) -> Result<(), ConstructError> {
                    if !Self::COPYABLE {
                        return Err(ConstructError::new(ConstructKind::Copy, "type is move-only"))
                    }
                    self.id = src.id;
                    self.throw_on_copy = src.throw_on_copy;
                    Ok(())
                }
            }

            impl Drop for $name {

                fn drop(&mut self) {
                    Self::record(|c| c.destroyed += 1);
                    self.id = 0;
                }
            }
        }
    };
}

instrumented! {
    /// Moves cannot fail, so reallocation moves it.
    Obj {
        nothrow_move: true,
        copyable: true,
    }
}

instrumented! {
    /// Moves may fail and copies are possible, so reallocation copies it and
    /// keeps the originals until every copy succeeded.
    FragileObj {
        nothrow_move: false,
        copyable: true,
    }
}

instrumented! {
    /// Moves may fail but copies are impossible, so reallocation moves it.
    MoveOnlyObj {
        nothrow_move: false,
        copyable: false,
    }
}

/// Marks a live [`CookieObj`].
pub const DEFAULT_COOKIE: u32 = 0xdeadbeef;

/// Carries a cookie that destruction wipes, so reading a destroyed value shows.
#[derive(Clone, Debug)]
pub struct CookieObj {
    cookie: u32,
}

impl CookieObj {

    #[inline(always)]
    pub fn is_alive(&self) -> bool {
        self.cookie == DEFAULT_COOKIE
    }
}

impl Default for CookieObj {

    fn default() -> Self {
        Self {
            cookie: DEFAULT_COOKIE,
        }
    }
}

impl Drop for CookieObj {

    fn drop(&mut self) {
        self.cookie = 0;
    }
}

avec_mem::impl_element!(CookieObj);
