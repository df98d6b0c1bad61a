//! Rollback when an element hook panics instead of returning an error.

use std::panic::{self, AssertUnwindSafe};

use avec_harness::{FragileObj, Obj};
use avec_mem::{ConstructError, DynArray};

fn full_of_obj(n: i32) -> DynArray<Obj> {
    let mut v = DynArray::with_capacity(n as usize).unwrap();
    for id in 0..n {
        v.push_back(Obj::with_id(id)).unwrap();
    }
    v
}

#[test]
fn test_panicking_emplace_at_full_capacity_keeps_array() {
    Obj::reset_counters();
    let mut v = full_of_obj(4);
    assert_eq!(v.capacity(), 4);
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        v.emplace_with(2, |_| -> Result<Obj, ConstructError> { panic!("emplace") })
    }));
    assert!(result.is_err());
    assert_eq!(v.len(), 4);
    assert_eq!(v.capacity(), 4);
    assert_eq!(Obj::alive(), 4);
    let ids: Vec<i32> = v.iter().map(|o| o.id).collect();
    assert_eq!(ids, [0, 1, 2, 3]);
    drop(v);
    assert_eq!(Obj::alive(), 0);
}

#[test]
fn test_panicking_emplace_with_spare_capacity_keeps_array() {
    Obj::reset_counters();
    let mut v = full_of_obj(4);
    v.reserve(8).unwrap();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        v.emplace_with(1, |_| -> Result<Obj, ConstructError> { panic!("emplace") })
    }));
    assert!(result.is_err());
    assert_eq!(v.len(), 4);
    assert_eq!(v.capacity(), 8);
    assert_eq!(Obj::alive(), 4);
    let ids: Vec<i32> = v.iter().map(|o| o.id).collect();
    assert_eq!(ids, [0, 1, 2, 3]);
}

#[test]
fn test_panicking_default_construction_unwinds_sized_array() {
    Obj::reset_counters();
    Obj::set_default_construction_throw_countdown(5);
    Obj::set_faults_panic(true);
    let result = panic::catch_unwind(|| DynArray::<Obj>::with_len(10));
    assert!(result.is_err());
    assert_eq!(Obj::counters().default_constructed, 4);
    assert_eq!(Obj::counters().destroyed, 4);
    assert_eq!(Obj::alive(), 0);
    Obj::reset_counters();
}

#[test]
fn test_panicking_copy_during_reserve_keeps_originals() {
    FragileObj::reset_counters();
    let mut v = DynArray::<FragileObj>::with_len(10).unwrap();
    for (i, o) in v.iter_mut().enumerate() {
        o.id = i as i32;
    }
    v[6].throw_on_copy = true;
    FragileObj::set_faults_panic(true);
    let result = panic::catch_unwind(AssertUnwindSafe(|| v.reserve(40)));
    assert!(result.is_err());
    assert_eq!(v.len(), 10);
    assert_eq!(v.capacity(), 10);
    assert_eq!(FragileObj::counters().copied, 6);
    assert_eq!(FragileObj::counters().destroyed, 6);
    assert_eq!(FragileObj::alive(), 10);
    let ids: Vec<i32> = v.iter().map(|o| o.id).collect();
    assert_eq!(ids, (0..10).collect::<Vec<_>>());
    FragileObj::reset_counters();
    drop(v);
    assert_eq!(FragileObj::counters().destroyed, 10);
}
