//! Instrumented element types and the scenario suite for `avec-mem`.

pub mod instrumented;
pub mod scenarios;
pub mod bench;
pub mod config;

pub use instrumented::{
    Counters,
    Obj,
    FragileObj,
    MoveOnlyObj,
    CookieObj,
    DEFAULT_COOKIE,
};
