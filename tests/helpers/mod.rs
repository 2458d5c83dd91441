#![allow(dead_code, unused_imports)]

mod fake_immich;
mod test_server;

pub use fake_immich::{FakeImmich, RecordedRequest};
pub use test_server::TestServer;

pub const KEY_A: &str = "api-key-aaaa";
pub const KEY_B: &str = "api-key-bbbb";
pub const KEY_C: &str = "api-key-cccc";
pub const SHARE_KEY: &str = "share-key-1";
