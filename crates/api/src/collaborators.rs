//! Default implementations of the outbound ports wired in by the server
//! binary. Both are deliberately minimal: the notifier records events in the
//! service log until a delivery channel is configured, and the meeting-link
//! provider mints room URLs under a configured base instead of calling a
//! conferencing vendor.

use async_trait::async_trait;
use tracing::info;
use tutorsync_core::errors::ScheduleResult;
use tutorsync_core::models::booking::Booking;
use tutorsync_core::ports::{BookingEvent, MeetingLinkProvider, Notifier};

/// Notifier that writes booking events to the service log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn booking_event(&self, event: BookingEvent) -> ScheduleResult<()> {
        info!("Booking {} moved to {}", event.booking_id, event.status);
        Ok(())
    }
}

/// Meeting-link provider that derives a room URL from the booking ID.
pub struct StaticMeetingLinks {
    base_url: String,
}

impl StaticMeetingLinks {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl MeetingLinkProvider for StaticMeetingLinks {
    async fn create_link(&self, booking: &Booking) -> ScheduleResult<String> {
        Ok(format!(
            "{}/session/{}",
            self.base_url.trim_end_matches('/'),
            booking.id
        ))
    }
}
