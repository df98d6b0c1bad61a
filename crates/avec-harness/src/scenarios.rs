//! Lifecycle scenarios run by the harness binary and the integration tests.
//!
//! Each scenario resets the counters of the types it uses and checks them with
//! [`ensure!`], so a failure names the broken expectation and where it is.

use avec_error::{Context, Result, ensure};
use avec_mem::{DynArray, Element};

use crate::instrumented::{CookieObj, FragileObj, MoveOnlyObj, Obj};

pub const SIZE: usize = 100_500;
pub const NEW_SIZE: usize = 10_000;
pub const SMALL_SIZE: usize = 100;
pub const MEDIUM_SIZE: usize = 100;
pub const LARGE_SIZE: usize = 250;
pub const INDEX: usize = 10;
pub const MAGIC: i32 = 42;
pub const ID: i32 = 42;

#[derive(Clone, Copy, Debug)]
pub struct Scenario {
    pub name: &'static str,
    pub run: fn() -> Result<()>,
}

impl Scenario {

    #[inline(always)]
    pub fn run(&self) -> Result<()> {
        (self.run)()
    }
}

const SCENARIOS: &[Scenario] = &[
    Scenario { name: "basics", run: basics },
    Scenario { name: "construction_failures", run: construction_failures },
    Scenario { name: "forced_copy_failures", run: forced_copy_failures },
    Scenario { name: "move_assign", run: move_assign },
    Scenario { name: "resize_push_pop", run: resize_push_pop },
    Scenario { name: "self_referential_push", run: self_referential_push },
    Scenario { name: "insert_erase", run: insert_erase },
    Scenario { name: "emplace", run: emplace },
];

#[inline(always)]
pub fn all() -> &'static [Scenario] {
    SCENARIOS
}

fn offset_of<T>(array: &DynArray<T>, element: &T) -> usize {
    (element as *const T as usize - array.as_ptr() as usize) / size_of::<T>()
}

/// Reservation, sized construction, indexing and copies of plain and
/// instrumented elements.
pub fn basics() -> Result<()> {
    Obj::reset_counters();
    {
        let mut v = DynArray::<i32>::new();
        ensure!(v.capacity() == 0 && v.len() == 0, "new array is not empty");
        v.reserve(SIZE).ctx_err("reserve on empty array")?;
        ensure!(v.capacity() == SIZE, "capacity {} after reserve({})", v.capacity(), SIZE);
        ensure!(v.is_empty(), "reserve constructed elements");
    }
    {
        let mut v = DynArray::<i32>::with_len(SIZE).ctx_err("sized construction")?;
        ensure!(v.capacity() == SIZE && v.len() == SIZE, "sized array is {}/{}", v.len(), v.capacity());
        ensure!(v[0] == 0, "element not default constructed");
        ensure!(core::ptr::eq(&v[0], &v.as_slice()[0]), "mutable and shared access disagree");
        v[INDEX] = MAGIC;
        ensure!(v[INDEX] == MAGIC, "write through index lost");
        ensure!(offset_of(&v, &v[100]) == 100, "elements are not contiguous");
        v.reserve(SIZE * 2).ctx_err("growing reserve")?;
        ensure!(v.len() == SIZE && v.capacity() == SIZE * 2, "reserve gave {}/{}", v.len(), v.capacity());
        ensure!(v[INDEX] == MAGIC, "reserve lost element {}", INDEX);
    }
    {
        let mut v = DynArray::<i32>::with_len(SIZE).ctx_err("sized construction")?;
        v[INDEX] = MAGIC;
        let copy = v.try_clone().ctx_err("copy")?;
        ensure!(!core::ptr::eq(&v[INDEX], &copy[INDEX]), "copy shares storage");
        ensure!(v[INDEX] == copy[INDEX] && v == copy, "copy differs from source");
    }
    {
        let mut v = DynArray::<Obj>::new();
        v.reserve(SIZE).ctx_err("reserve of instrumented elements")?;
        ensure!(Obj::alive() == 0, "reserve constructed {} objects", Obj::alive());
    }
    {
        let mut v = DynArray::<Obj>::with_len(SIZE).ctx_err("sized construction")?;
        ensure!(Obj::alive() == SIZE as isize, "{} alive after sized construction", Obj::alive());
        let before = Obj::counters();
        v.reserve(SIZE * 2).ctx_err("growing reserve")?;
        let after = Obj::counters();
        ensure!(Obj::alive() == SIZE as isize, "{} alive after reserve", Obj::alive());
        ensure!(after.copied == before.copied, "reserve copied nothrow-movable elements");
        ensure!(after.moved == before.moved + SIZE, "reserve moved {} elements", after.moved - before.moved);
    }
    ensure!(Obj::alive() == 0, "{} objects leaked", Obj::alive());
    Ok(())
}

/// Failing default constructions and copies unwind everything they built.
pub fn construction_failures() -> Result<()> {
    Obj::reset_counters();
    Obj::set_default_construction_throw_countdown(SMALL_SIZE / 2);
    ensure!(DynArray::<Obj>::with_len(SMALL_SIZE).is_err(), "failing default construction succeeded");
    ensure!(
        Obj::counters().default_constructed == SMALL_SIZE / 2 - 1,
        "{} default constructions before the failure",
        Obj::counters().default_constructed,
    );
    ensure!(Obj::alive() == 0, "{} objects survived a failed construction", Obj::alive());

    Obj::reset_counters();
    {
        let mut v = DynArray::<Obj>::with_len(SMALL_SIZE).ctx_err("sized construction")?;
        v[SMALL_SIZE / 2].throw_on_copy = true;
        ensure!(v.try_clone().is_err(), "failing copy succeeded");
        ensure!(Obj::counters().copied == SMALL_SIZE / 2, "{} copies before the failure", Obj::counters().copied);
        ensure!(Obj::alive() == SMALL_SIZE as isize, "{} alive after failed copy", Obj::alive());
    }

    Obj::reset_counters();
    {
        let mut v = DynArray::<Obj>::with_len(SMALL_SIZE).ctx_err("sized construction")?;
        v[SMALL_SIZE - 1].throw_on_copy = true;
        v.reserve(SMALL_SIZE * 2).ctx_err("reserve moves and never copies")?;
        ensure!(v.capacity() == SMALL_SIZE * 2 && v.len() == SMALL_SIZE, "reserve gave {}/{}", v.len(), v.capacity());
        ensure!(Obj::alive() == SMALL_SIZE as isize, "{} alive after reserve", Obj::alive());
    }
    ensure!(Obj::alive() == 0, "{} objects leaked", Obj::alive());
    Ok(())
}

/// Types whose moves may fail are copied on reallocation, and a failing copy
/// leaves the array exactly as it was.
pub fn forced_copy_failures() -> Result<()> {
    ensure!(!DynArray::<FragileObj>::TRANSFER_BY_MOVE, "fragile elements would be moved");
    ensure!(DynArray::<MoveOnlyObj>::TRANSFER_BY_MOVE, "move-only elements would be copied");

    FragileObj::reset_counters();
    {
        let mut v = DynArray::<FragileObj>::with_len(SMALL_SIZE).ctx_err("sized construction")?;
        v[SMALL_SIZE - 1].throw_on_copy = true;
        let before = v.as_ptr();
        ensure!(v.reserve(SMALL_SIZE * 2).is_err(), "failing copy during reserve succeeded");
        ensure!(FragileObj::counters().copied == SMALL_SIZE - 1, "{} copies before the failure", FragileObj::counters().copied);
        ensure!(v.capacity() == SMALL_SIZE && v.len() == SMALL_SIZE, "failed reserve left {}/{}", v.len(), v.capacity());
        ensure!(v.as_ptr() == before, "failed reserve replaced the storage");
        ensure!(FragileObj::alive() == SMALL_SIZE as isize, "{} alive after failed reserve", FragileObj::alive());

        v[SMALL_SIZE - 1].throw_on_copy = false;
        let before = FragileObj::counters();
        v.reserve(SMALL_SIZE * 2).ctx_err("copying reserve")?;
        let after = FragileObj::counters();
        ensure!(after.copied == before.copied + SMALL_SIZE, "reserve copied {}", after.copied - before.copied);
        ensure!(after.moved == before.moved, "reserve moved fragile elements");
        ensure!(FragileObj::alive() == SMALL_SIZE as isize, "{} alive after reserve", FragileObj::alive());
    }
    ensure!(FragileObj::alive() == 0, "{} fragile objects leaked", FragileObj::alive());

    MoveOnlyObj::reset_counters();
    {
        let mut v = DynArray::<MoveOnlyObj>::with_len(SMALL_SIZE).ctx_err("sized construction")?;
        v.reserve(SMALL_SIZE * 2).ctx_err("moving reserve")?;
        ensure!(MoveOnlyObj::counters().moved == SMALL_SIZE, "reserve moved {}", MoveOnlyObj::counters().moved);
        ensure!(v.try_clone().is_err(), "move-only elements were copied");
        ensure!(MoveOnlyObj::alive() == SMALL_SIZE as isize, "{} alive after failed copy", MoveOnlyObj::alive());
    }
    ensure!(MoveOnlyObj::alive() == 0, "{} move-only objects leaked", MoveOnlyObj::alive());
    Ok(())
}

/// Moves hand over storage without touching elements; assignment reuses
/// storage when it fits.
pub fn move_assign() -> Result<()> {
    {
        let mut v = DynArray::<i32>::with_len(MEDIUM_SIZE).ctx_err("sized construction")?;
        let moved = v.take();
        ensure!(moved.len() == MEDIUM_SIZE && moved.capacity() == MEDIUM_SIZE, "moved array is {}/{}", moved.len(), moved.capacity());
        ensure!(v.is_empty() && v.capacity() == 0, "moved-from array kept storage");
    }

    Obj::reset_counters();
    {
        let mut v = DynArray::<Obj>::with_len(MEDIUM_SIZE).ctx_err("sized construction")?;
        v[MEDIUM_SIZE / 2].id = ID;
        ensure!(Obj::counters().default_constructed == MEDIUM_SIZE, "wrong default construction count");
        let moved = v;
        ensure!(moved.len() == MEDIUM_SIZE, "moved array has {} elements", moved.len());
        ensure!(moved[MEDIUM_SIZE / 2].id == ID, "moved array lost id");
    }
    ensure!(Obj::alive() == 0, "{} objects leaked", Obj::alive());
    let counters = Obj::counters();
    ensure!(counters.moved == 0 && counters.copied == 0, "array move touched elements");
    ensure!(counters.default_constructed == MEDIUM_SIZE, "wrong default construction count");

    Obj::reset_counters();
    {
        let mut medium = DynArray::<Obj>::with_len(MEDIUM_SIZE).ctx_err("sized construction")?;
        medium[MEDIUM_SIZE / 2].id = ID;
        let mut large = DynArray::<Obj>::with_len(LARGE_SIZE).ctx_err("sized construction")?;
        large.assign_from(&medium).ctx_err("shrinking assignment")?;
        ensure!(large.len() == MEDIUM_SIZE && large.capacity() == LARGE_SIZE, "assignment gave {}/{}", large.len(), large.capacity());
        ensure!(large[MEDIUM_SIZE / 2].id == ID, "assignment lost id");
        ensure!(Obj::alive() == (MEDIUM_SIZE * 2) as isize, "{} alive after assignment", Obj::alive());
    }

    Obj::reset_counters();
    {
        let mut v = DynArray::<Obj>::with_len(MEDIUM_SIZE).ctx_err("sized construction")?;
        {
            let mut large = DynArray::<Obj>::with_len(LARGE_SIZE).ctx_err("sized construction")?;
            large[LARGE_SIZE - 1].id = ID;
            v.assign_from(&large).ctx_err("reallocating assignment")?;
            ensure!(v.len() == LARGE_SIZE && large.capacity() == LARGE_SIZE, "assignment gave {}", v.len());
            ensure!(v[LARGE_SIZE - 1].id == ID && large[LARGE_SIZE - 1].id == ID, "assignment lost id");
            ensure!(Obj::alive() == (LARGE_SIZE * 2) as isize, "{} alive after assignment", Obj::alive());
        }
        ensure!(Obj::alive() == LARGE_SIZE as isize, "{} alive after source dropped", Obj::alive());
    }
    ensure!(Obj::alive() == 0, "{} objects leaked", Obj::alive());

    Obj::reset_counters();
    {
        let mut v = DynArray::<Obj>::with_len(MEDIUM_SIZE).ctx_err("sized construction")?;
        v[MEDIUM_SIZE - 1].id = ID;
        let mut small = DynArray::<Obj>::with_len(MEDIUM_SIZE / 2).ctx_err("sized construction")?;
        small.reserve(MEDIUM_SIZE + 1).ctx_err("reserve")?;
        let copies = Obj::counters().copied;
        small.assign_from(&v).ctx_err("growing assignment in place")?;
        ensure!(small.len() == v.len() && small.capacity() == MEDIUM_SIZE + 1, "assignment gave {}/{}", small.len(), small.capacity());
        ensure!(small[MEDIUM_SIZE - 1].id == ID, "assignment lost id");
        let copied = Obj::counters().copied - copies;
        ensure!(copied == MEDIUM_SIZE - MEDIUM_SIZE / 2, "assignment copy-constructed {}", copied);
    }
    ensure!(Obj::alive() == 0, "{} objects leaked", Obj::alive());
    Ok(())
}

/// Resizing, appending and popping, with exact event counts.
pub fn resize_push_pop() -> Result<()> {
    Obj::reset_counters();
    {
        let mut v = DynArray::<Obj>::new();
        v.resize(SIZE).ctx_err("growing resize")?;
        ensure!(v.len() == SIZE && v.capacity() == SIZE, "resize gave {}/{}", v.len(), v.capacity());
        ensure!(Obj::counters().default_constructed == SIZE, "resize default constructed {}", Obj::counters().default_constructed);
    }
    ensure!(Obj::alive() == 0, "{} objects leaked", Obj::alive());

    Obj::reset_counters();
    {
        let mut v = DynArray::<Obj>::with_len(SIZE).ctx_err("sized construction")?;
        v.resize(NEW_SIZE).ctx_err("shrinking resize")?;
        ensure!(v.len() == NEW_SIZE && v.capacity() == SIZE, "resize gave {}/{}", v.len(), v.capacity());
        ensure!(Obj::counters().destroyed == SIZE - NEW_SIZE, "resize destroyed {}", Obj::counters().destroyed);
    }
    ensure!(Obj::alive() == 0, "{} objects leaked", Obj::alive());

    Obj::reset_counters();
    {
        let mut v = DynArray::<Obj>::with_len(SIZE).ctx_err("sized construction")?;
        let o = Obj::with_id(ID);
        v.emplace_back_with(|_| o.copy_construct()).ctx_err("appending a copy")?;
        ensure!(v.len() == SIZE + 1 && v.capacity() == SIZE * 2, "append gave {}/{}", v.len(), v.capacity());
        ensure!(v[SIZE].id == ID, "appended copy lost id");
        let c = Obj::counters();
        ensure!(c.default_constructed == SIZE && c.copied == 1, "copy append counted {:?}", c);
        ensure!(c.constructed_with_id == 1 && c.moved == SIZE, "copy append counted {:?}", c);
    }
    ensure!(Obj::alive() == 0, "{} objects leaked", Obj::alive());

    Obj::reset_counters();
    {
        let mut v = DynArray::<Obj>::with_len(SIZE).ctx_err("sized construction")?;
        v.push_back(Obj::with_id(ID)).ctx_err("appending a value")?;
        ensure!(v.len() == SIZE + 1 && v.capacity() == SIZE * 2, "append gave {}/{}", v.len(), v.capacity());
        ensure!(v[SIZE].id == ID, "appended value lost id");
        let c = Obj::counters();
        ensure!(c.default_constructed == SIZE && c.copied == 0, "move append counted {:?}", c);
        ensure!(c.constructed_with_id == 1 && c.moved == SIZE + 1, "move append counted {:?}", c);
    }

    Obj::reset_counters();
    {
        let mut v = DynArray::<Obj>::new();
        v.push_back(Obj::with_id(ID)).ctx_err("appending a value")?;
        drop(v.pop_back());
        ensure!(v.is_empty() && v.capacity() == 1, "pop gave {}/{}", v.len(), v.capacity());
        ensure!(Obj::alive() == 0, "{} alive after pop", Obj::alive());
        ensure!(v.pop_back().is_none(), "pop on empty array returned an element");
    }
    Ok(())
}

/// Appending an element of the array itself survives the reallocation.
pub fn self_referential_push() -> Result<()> {
    {
        let mut v = DynArray::<CookieObj>::with_len(1).ctx_err("sized construction")?;
        ensure!(v.len() == v.capacity(), "array not full");
        v.push_back_copy(0).ctx_err("appending own element")?;
        ensure!(v[0].is_alive() && v[1].is_alive(), "appending own element destroyed a value");
    }
    Obj::reset_counters();
    {
        let mut v = DynArray::<Obj>::with_len(1).ctx_err("sized construction")?;
        v[0].id = ID;
        v.emplace_back_with(|items| items[0].copy_construct()).ctx_err("appending own element")?;
        ensure!(v[0].id == ID && v[1].id == ID, "ids after self append are {} and {}", v[0].id, v[1].id);
        v.emplace_with(1, |items| Ok(Obj::with_id(items[1].id + 1))).ctx_err("inserting from own element")?;
        ensure!(v.len() == 3, "insert from own element gave {} elements", v.len());
        ensure!(v[1].id == ID + 1 && v[2].id == ID, "insert from own element misplaced values");
    }
    ensure!(Obj::alive() == 0, "{} objects leaked", Obj::alive());
    Ok(())
}

/// Insertion and erasure shift the following elements by one and keep order.
pub fn insert_erase() -> Result<()> {
    Obj::reset_counters();
    {
        let mut v = DynArray::<Obj>::with_capacity(8).ctx_err("with capacity")?;
        for id in 0..4 {
            v.push_back(Obj::with_id(id)).ctx_err("append")?;
        }
        let pos = v.insert(2, Obj::with_id(10)).ctx_err("insert in capacity")?;
        ensure!(pos == 2 && v.capacity() == 8, "insert returned {} with capacity {}", pos, v.capacity());
        let ids: Vec<i32> = v.iter().map(|o| o.id).collect();
        ensure!(ids == [0, 1, 10, 2, 3], "ids after insert are {:?}", ids);

        for id in 5..8 {
            v.push_back(Obj::with_id(id)).ctx_err("append")?;
        }
        ensure!(v.len() == v.capacity(), "array not full");
        v.insert(0, Obj::with_id(20)).ctx_err("insert with reallocation")?;
        ensure!(v.capacity() == 16, "insert grew capacity to {}", v.capacity());
        let ids: Vec<i32> = v.iter().map(|o| o.id).collect();
        ensure!(ids == [20, 0, 1, 10, 2, 3, 5, 6, 7], "ids after growing insert are {:?}", ids);

        let next = v.erase(3);
        ensure!(next == 3 && v[3].id == 2, "erase returned {} followed by {}", next, v[3].id);
        let end = v.len();
        ensure!(v.erase(end) == end, "erase at end removed an element");
        let ids: Vec<i32> = v.iter().map(|o| o.id).collect();
        ensure!(ids == [20, 0, 1, 2, 3, 5, 6, 7], "ids after erase are {:?}", ids);
        ensure!(Obj::alive() == v.len() as isize, "{} alive for {} elements", Obj::alive(), v.len());
    }
    ensure!(Obj::alive() == 0, "{} objects leaked", Obj::alive());

    let mut empty = DynArray::<i32>::new();
    ensure!(empty.erase(0) == 0, "erase on empty array");
    Ok(())
}

/// Emplacement builds the element in place and leaves the array unchanged
/// when the constructor fails.
pub fn emplace() -> Result<()> {
    Obj::reset_counters();
    {
        let mut v = DynArray::<Obj>::with_capacity(4).ctx_err("with capacity")?;
        v.emplace_back_with(|_| Ok(Obj::with_id(1))).ctx_err("emplace back")?;
        v.emplace_back_with(|_| Ok(Obj::with_id(3))).ctx_err("emplace back")?;
        let c = Obj::counters();
        ensure!(c.moved == 0 && c.copied == 0, "emplace back counted {:?}", c);
        v.emplace_with(1, |_| Ok(Obj::with_id(2))).ctx_err("emplace in the middle")?;
        let ids: Vec<i32> = v.iter().map(|o| o.id).collect();
        ensure!(ids == [1, 2, 3], "ids after emplace are {:?}", ids);

        let before = v.len();
        let failed = v.emplace_with(0, |_| {
            Err(avec_mem::ConstructError::new(avec_mem::ConstructKind::Emplace, "refused"))
        });
        ensure!(failed.is_err() && v.len() == before, "failed emplace changed the array");
        ensure!(Obj::alive() == 3, "{} alive after failed emplace", Obj::alive());
    }
    ensure!(Obj::alive() == 0, "{} objects leaked", Obj::alive());

    FragileObj::reset_counters();
    {
        let mut v = DynArray::<FragileObj>::with_len(2).ctx_err("sized construction")?;
        v[0].throw_on_copy = true;
        let failed = v.emplace_back_with(|_| Ok(FragileObj::with_id(9)));
        ensure!(failed.is_err(), "emplace survived a failed transfer");
        ensure!(v.len() == 2 && v.capacity() == 2, "failed emplace left {}/{}", v.len(), v.capacity());
        ensure!(FragileObj::alive() == 2, "{} alive after failed emplace", FragileObj::alive());
    }
    ensure!(FragileObj::alive() == 0, "{} fragile objects leaked", FragileObj::alive());
    Ok(())
}
