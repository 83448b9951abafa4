// Public API - what other modules can use
pub use handlers::{create_booking, delete_booking, list_bookings, update_booking};
pub use models::{BookingDocument, BookingQuery, BookingUpdate, NewBooking};
pub use repository::{BookingRepository, BOOKINGS_COLLECTION};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
