// Adapters layer: concrete implementations of the domain ports.

pub mod mock_backend;

pub use mock_backend::{
    AlwaysFail, MockBackend, NeverFail, RandomFailure, RandomIdGenerator, SequentialIdGenerator,
};
