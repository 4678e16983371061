//! Raw upstream record types used by the classifier and bucketing passes.
//!
//! Only the fields those passes read are modelled; everything else in the
//! upstream items is ignored. All fields are optional because the upstream
//! omits keys freely; absence is data, not an error.

use serde::Deserialize;

/// One booking row from the booking-report endpoint's `Items` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingItem {
    #[serde(rename = "MemberID", default)]
    pub member_id: Option<i64>,
    #[serde(rename = "Member", default)]
    pub member: Option<BookingMember>,
    #[serde(rename = "Desc", default)]
    pub desc: Option<String>,
    /// Booking timestamp in `yyyy-MM-dd'T'HH:mm:ss` format.
    #[serde(rename = "BookDate", default)]
    pub book_date: Option<String>,
}

impl BookingItem {
    /// The acquisition-source field nested under `Member`.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.member.as_ref().and_then(|m| m.source.as_deref())
    }
}

/// The customer object embedded in a [`BookingItem`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingMember {
    #[serde(rename = "Source", default)]
    pub source: Option<String>,
}

/// One sales order from the sales-list endpoint's `Items` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalesOrderItem {
    /// Order creation timestamp in `yyyy-MM-dd'T'HH:mm:ss` format.
    #[serde(rename = "CreateDate", default)]
    pub create_date: Option<String>,
}
