// Room selection and reservation intake for the hotel booking page

pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod guests;
pub mod selection;
pub mod session;
pub mod session_cache;
pub mod summary;
pub mod validation;

// Re-export key types for convenience
pub use catalog::{generate_rooms, CatalogError, Room, RoomCatalog, RoomId, RoomType};
pub use config::{ConfigError, ContactConfig, DateStyle, HotelConfig, RoomPrices};
pub use dispatch::{
    DispatchError, LogDispatcher, MessageDispatcher, MessageLink, RecordingDispatcher,
};
pub use guests::{GuestInfo, GuestRegister};
pub use selection::{RoomSelection, RoomState, RoomView, SelectionRejected};
pub use session::{GuestError, PreparedReservation, ReservationSession, SubmitError};
pub use session_cache::{CatalogCacheStatsReport, SessionCatalogs};
pub use summary::{format_date, format_price, ReservationSummary, StayDates, SummaryLine};
pub use validation::{Field, FieldErrors, ReservationForm};
