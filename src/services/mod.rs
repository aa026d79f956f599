pub mod storage;

pub use storage::AvatarStore;
