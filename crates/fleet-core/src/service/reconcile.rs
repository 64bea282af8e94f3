//! Periodic reconciliation: expire stale OTP challenges and finalize
//! overdue bookings.
//!
//! Both sweeps are idempotent, safe to run concurrently with request
//! traffic, and runnable on demand against an injected clock. A failure
//! on one record is logged and skipped; the sweep never aborts wholesale.

use std::sync::Arc;

use crate::error::DomainError;
use crate::ports::{BookingRepository, Clock, OtpRepository, VehicleRepository};

/// Outcome of a booking sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Bookings this pass transitioned to completed.
    pub completed: u64,
    /// Records that failed to update and were skipped.
    pub failed: u64,
}

pub struct Reconciler {
    otps: Arc<dyn OtpRepository>,
    bookings: Arc<dyn BookingRepository>,
    vehicles: Arc<dyn VehicleRepository>,
    clock: Arc<dyn Clock>,
}

impl Reconciler {
    pub fn new(
        otps: Arc<dyn OtpRepository>,
        bookings: Arc<dyn BookingRepository>,
        vehicles: Arc<dyn VehicleRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            otps,
            bookings,
            vehicles,
            clock,
        }
    }

    /// Delete every OTP record past its expiry, verified or not.
    pub async fn sweep_otps(&self) -> Result<u64, DomainError> {
        let removed = self.otps.delete_expired(self.clock.now()).await?;
        if removed > 0 {
            tracing::info!(removed, "expired otp records swept");
        }
        Ok(removed)
    }

    /// Complete every booking whose end time has passed and hand the
    /// vehicle back.
    ///
    /// The completed flag is flipped with a compare-and-swap, so a
    /// booking deleted or completed mid-sweep is simply skipped and a
    /// second pass finds nothing left to do.
    pub async fn sweep_bookings(&self) -> Result<SweepReport, DomainError> {
        let now = self.clock.now();
        let overdue = self.bookings.find_overdue(now).await?;

        let mut report = SweepReport::default();
        for booking in overdue {
            match self.bookings.complete_if_pending(booking.id).await {
                Ok(true) => {
                    report.completed += 1;
                    match self.vehicles.set_available(booking.vehicle_id, true).await {
                        Ok(()) | Err(crate::error::RepoError::NotFound) => {}
                        Err(e) => {
                            report.failed += 1;
                            tracing::warn!(booking_id = %booking.id,
                                vehicle_id = %booking.vehicle_id, error = %e,
                                "completed booking but failed to release vehicle");
                        }
                    }
                }
                Ok(false) => {
                    // Raced with a delete or an earlier sweep.
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(booking_id = %booking.id, error = %e,
                        "skipping booking during sweep");
                }
            }
        }

        if report.completed > 0 || report.failed > 0 {
            tracing::info!(
                completed = report.completed,
                failed = report.failed,
                "booking sweep finished"
            );
        }
        Ok(report)
    }
}
