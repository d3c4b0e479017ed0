// tests/support/mocks/mod.rs
//! テストサポートモック再エクスポートモジュール
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod repos;
pub mod security;
pub mod time;
pub mod util;

pub use repos::{FailingRevokeRepo, FlakyCodeRepo};
pub use security::{CountingPasswordHasher, StrictPasswordHasher};
pub use time::{TestClock, fixed_now};
pub use util::QueuedCodeGenerator;
