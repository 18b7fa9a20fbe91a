use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::models::{Booking, BookingStatus, Role};

/// A user may act on their own resources; admin may act on anyone's.
pub fn ensure_self_or_admin(user: &AuthUser, owner_id: i64) -> AppResult<()> {
    if user.role != Role::Admin && user.user_id != owner_id {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Booking status transition policy.
///
/// Admin bypasses all restrictions. Otherwise the booking's client may only
/// cancel, the booking's assistant may confirm, complete or cancel, and any
/// other caller is rejected.
pub fn authorize_transition(
    user: &AuthUser,
    booking: &Booking,
    next: BookingStatus,
) -> AppResult<()> {
    if user.role == Role::Admin {
        return Ok(());
    }
    let allowed: &[BookingStatus] = if user.user_id == booking.client_id {
        &[BookingStatus::Cancelled]
    } else if user.user_id == booking.assistant_id {
        &[
            BookingStatus::Confirmed,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ]
    } else {
        &[]
    };
    if !allowed.contains(&next) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}
