//! Call bounded context - the slice of call lifecycle the call log observes

pub mod aggregate;
pub mod entity;
pub mod event;
pub mod value_object;

pub use aggregate::Call;
pub use entity::CallInfo;
pub use event::CallTransitionEvent;
pub use value_object::CallState;
