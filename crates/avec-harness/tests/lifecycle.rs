//! Element lifecycle guarantees observed through the instrumented types.

use avec_harness::{CookieObj, FragileObj, MoveOnlyObj, Obj};
use avec_mem::{ArrayError, ConstructKind, DynArray};

#[test]
fn test_sized_construction_is_exact() {
    Obj::reset_counters();
    for n in [0, 1, 7, 64] {
        let v = DynArray::<Obj>::with_len(n).unwrap();
        assert_eq!(v.len(), n);
        assert_eq!(v.capacity(), n);
        assert_eq!(Obj::alive(), n as isize);
        drop(v);
        assert_eq!(Obj::alive(), 0);
    }
}

#[test]
fn test_failed_sized_construction_leaves_nothing_alive() {
    Obj::reset_counters();
    Obj::set_default_construction_throw_countdown(50);
    let err = DynArray::<Obj>::with_len(100).unwrap_err();
    assert_eq!(err.construct_error().map(|e| e.kind), Some(ConstructKind::Default));
    assert_eq!(Obj::counters().default_constructed, 49);
    assert_eq!(Obj::counters().destroyed, 49);
    assert_eq!(Obj::alive(), 0);
}

#[test]
fn test_copy_is_independent_and_keeps_source() {
    Obj::reset_counters();
    let mut a = DynArray::<Obj>::with_len(5).unwrap();
    for (i, o) in a.iter_mut().enumerate() {
        o.id = i as i32;
    }
    let b = a.try_clone().unwrap();
    assert_eq!(Obj::alive(), 10);
    for i in 0..5 {
        assert_eq!(a[i].id, b[i].id);
        assert!(!core::ptr::eq(&a[i], &b[i]));
    }
    a[0].id = 100;
    assert_eq!(b[0].id, 0);
}

#[test]
fn test_move_fires_no_events() {
    Obj::reset_counters();
    let mut a = DynArray::<Obj>::with_len(10).unwrap();
    a.reserve(20).unwrap();
    let before = Obj::counters();
    let mut b = a.take();
    assert_eq!(b.len(), 10);
    assert_eq!(b.capacity(), 20);
    let mut c = DynArray::new();
    c.swap(&mut b);
    assert_eq!(c.capacity(), 20);
    assert_eq!(b.capacity(), 0);
    assert_eq!(Obj::counters(), before);
}

#[test]
fn test_reserve_within_capacity_is_silent() {
    Obj::reset_counters();
    let mut v = DynArray::<Obj>::with_len(8).unwrap();
    let before = Obj::counters();
    v.reserve(4).unwrap();
    v.reserve(8).unwrap();
    assert_eq!(v.capacity(), 8);
    assert_eq!(Obj::counters(), before);
}

#[test]
fn test_reserve_moves_nothrow_elements() {
    Obj::reset_counters();
    let mut v = DynArray::<Obj>::with_len(8).unwrap();
    v.reserve(13).unwrap();
    let c = Obj::counters();
    assert_eq!(v.capacity(), 13);
    assert_eq!(c.moved, 8);
    assert_eq!(c.copied, 0);
    assert_eq!(c.destroyed, 8);
}

#[test]
fn test_failed_forced_copy_is_idempotent() {
    FragileObj::reset_counters();
    let mut v = DynArray::<FragileObj>::with_len(10).unwrap();
    for (i, o) in v.iter_mut().enumerate() {
        o.id = i as i32;
    }
    v[6].throw_on_copy = true;
    for _ in 0..2 {
        let err = v.reserve(40).unwrap_err();
        assert!(matches!(err, ArrayError::Construct(_)));
        assert_eq!(v.len(), 10);
        assert_eq!(v.capacity(), 10);
        assert_eq!(FragileObj::alive(), 10);
    }
    let ids: Vec<i32> = v.iter().map(|o| o.id).collect();
    assert_eq!(ids, (0..10).collect::<Vec<_>>());
}

#[test]
fn test_failed_growing_push_keeps_array_and_drops_value() {
    FragileObj::reset_counters();
    let mut v = DynArray::<FragileObj>::with_len(3).unwrap();
    v[2].throw_on_copy = true;
    assert!(v.push_back(FragileObj::with_id(7)).is_err());
    assert_eq!(v.len(), 3);
    assert_eq!(v.capacity(), 3);
    assert_eq!(FragileObj::alive(), 3);
}

#[test]
fn test_move_only_elements_are_moved() {
    MoveOnlyObj::reset_counters();
    let mut v = DynArray::<MoveOnlyObj>::new();
    for id in 0..5 {
        v.push_back(MoveOnlyObj::with_id(id)).unwrap();
    }
    assert_eq!(v.capacity(), 8);
    assert_eq!(MoveOnlyObj::counters().copied, 0);
    assert_eq!(MoveOnlyObj::alive(), 5);
    let mut other = DynArray::<MoveOnlyObj>::new();
    assert!(other.assign_from(&v).is_err());
    assert!(other.is_empty());
}

#[test]
fn test_push_back_doubles_and_appends() {
    Obj::reset_counters();
    let mut v = DynArray::<Obj>::with_len(4).unwrap();
    for (i, o) in v.iter_mut().enumerate() {
        o.id = i as i32;
    }
    v.push_back(Obj::with_id(4)).unwrap();
    assert_eq!(v.capacity(), 8);
    let ids: Vec<i32> = v.iter().map(|o| o.id).collect();
    assert_eq!(ids, [0, 1, 2, 3, 4]);
}

#[test]
fn test_self_referential_push_at_full_capacity() {
    let mut v = DynArray::<CookieObj>::with_len(1).unwrap();
    assert_eq!(v.len(), v.capacity());
    v.push_back_copy(0).unwrap();
    assert!(v[0].is_alive());
    assert!(v[1].is_alive());
    v.push_back_copy(1).unwrap();
    assert!(v.iter().all(CookieObj::is_alive));
}

#[test]
fn test_pop_back_on_empty_is_noop() {
    let mut v = DynArray::<Obj>::new();
    assert!(v.pop_back().is_none());
    assert_eq!(v.len(), 0);
    assert_eq!(v.capacity(), 0);
}

#[test]
fn test_insert_and_erase_shift_by_one() {
    Obj::reset_counters();
    let mut v = DynArray::<Obj>::new();
    for id in 0..6 {
        v.push_back(Obj::with_id(id)).unwrap();
    }
    v.insert(3, Obj::with_id(30)).unwrap();
    let ids: Vec<i32> = v.iter().map(|o| o.id).collect();
    assert_eq!(ids, [0, 1, 2, 30, 3, 4, 5]);
    assert_eq!(v.erase(1), 1);
    let ids: Vec<i32> = v.iter().map(|o| o.id).collect();
    assert_eq!(ids, [0, 2, 30, 3, 4, 5]);
    assert_eq!(Obj::alive(), 6);
}

#[test]
fn test_shrinking_resize_destroys_tail_only() {
    Obj::reset_counters();
    let mut v = DynArray::<Obj>::with_len(1000).unwrap();
    v.resize(100).unwrap();
    assert_eq!(Obj::counters().destroyed, 900);
    assert_eq!(v.capacity(), 1000);
    v.resize(300).unwrap();
    assert_eq!(Obj::counters().default_constructed, 1200);
    assert_eq!(v.capacity(), 1000);
}

#[test]
fn test_failed_resize_rolls_back_new_tail() {
    Obj::reset_counters();
    let mut v = DynArray::<Obj>::with_len(10).unwrap();
    Obj::set_default_construction_throw_countdown(5);
    assert!(v.resize(20).is_err());
    assert_eq!(v.len(), 10);
    assert_eq!(Obj::alive(), 10);
}
