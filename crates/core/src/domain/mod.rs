// Domain Layer - Pure business logic and entities

pub mod booking;
pub mod error;
pub mod priority;
pub mod resource;
pub mod slot;

// Re-exports
pub use booking::{Booking, BookingId, BookingStatus, NewBooking};
pub use error::DomainError;
pub use priority::Priority;
pub use resource::{Requester, RequesterId, Resource, ResourceId};
pub use slot::{parse_slot, within_working_hours, Slot};
