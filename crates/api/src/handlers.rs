/// Weekly availability management
pub mod availability;
/// Booking lifecycle endpoints
pub mod bookings;
/// Open-slot discovery
pub mod slots;
