pub mod calls;
pub mod engine;
pub mod mocked;
pub mod stubs;

pub use calls::CallLog;
pub use engine::MockEngine;
pub use mocked::Mocked;
pub use stubs::StubTable;
