/// Weekly availability endpoints
pub mod availability;
/// Booking lifecycle endpoints
pub mod bookings;
/// Health and version endpoints
pub mod health;
/// Open-slot discovery endpoint
pub mod slots;
