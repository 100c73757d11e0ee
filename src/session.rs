// Reservation flow for one visitor session
// Owns the selection, the guest register and the holder form; rooms are read
// from the session's frozen catalog and never modified.

use crate::catalog::{Room, RoomCatalog, RoomId};
use crate::config::{ContactConfig, DateStyle, HotelConfig};
use crate::dispatch::{DispatchError, MessageDispatcher, MessageLink};
use crate::guests::{GuestInfo, GuestRegister};
use crate::selection::{RoomSelection, RoomView, SelectionRejected};
use crate::session_cache::SessionCatalogs;
use crate::summary::{ReservationSummary, StayDates};
use crate::validation::{Field, FieldErrors, ReservationForm};
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuestError {
    #[error("Room {0} is not part of the selection")]
    RoomNotSelected(String),

    #[error("Invalid guest details: {0}")]
    Invalid(FieldErrors),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("No room selected")]
    EmptySelection,

    #[error("Guest details missing for rooms: {}", join_ids(.rooms))]
    MissingGuestInfo { rooms: Vec<RoomId> },

    #[error("Invalid reservation form: {0}")]
    Invalid(FieldErrors),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl SubmitError {
    // Notice shown to the visitor when submission is blocked
    pub fn notice(&self) -> &'static str {
        match self {
            SubmitError::EmptySelection => "Por favor seleccione al menos una habitación",
            SubmitError::MissingGuestInfo { .. } => {
                "Por favor, complete la información de huésped para todas las habitaciones seleccionadas"
            }
            SubmitError::Invalid(_) => "Por favor, corrija los campos marcados en el formulario",
            SubmitError::Dispatch(_) => {
                "No fue posible abrir el chat de reservas, intente de nuevo"
            }
        }
    }
}

fn join_ids(rooms: &[RoomId]) -> String {
    rooms
        .iter()
        .map(RoomId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedReservation {
    pub summary: ReservationSummary,
    pub message: String,
    pub link: MessageLink,
}

pub struct ReservationSession {
    catalog: Arc<RoomCatalog>,
    contact: ContactConfig,
    date_style: DateStyle,
    selection: RoomSelection,
    guests: GuestRegister,
    form: ReservationForm,
}

impl ReservationSession {
    pub fn new(catalog: Arc<RoomCatalog>, config: &HotelConfig) -> Self {
        Self {
            catalog,
            contact: config.contact.clone(),
            date_style: config.date_style,
            selection: RoomSelection::new(),
            guests: GuestRegister::new(),
            form: ReservationForm::default(),
        }
    }

    // Opens a session on the catalog frozen for `session_id`
    pub fn open(catalogs: &SessionCatalogs, session_id: &str) -> Self {
        Self::new(catalogs.get_or_generate(session_id), catalogs.config())
    }

    pub fn catalog(&self) -> &RoomCatalog {
        &self.catalog
    }

    pub fn select_floor(&mut self, floor: u8) -> Result<(), SelectionRejected> {
        if floor == 0 || floor > self.catalog.floor_count() {
            return Err(SelectionRejected::UnknownFloor(floor));
        }
        self.selection.select_floor(floor);
        Ok(())
    }

    pub fn active_floor(&self) -> Option<u8> {
        self.selection.active_floor()
    }

    pub fn floor_view(&self) -> Vec<RoomView<'_>> {
        self.selection.floor_view(&self.catalog)
    }

    pub fn select_room(&mut self, room_id: &str) -> Result<(), SelectionRejected> {
        let room = self
            .catalog
            .get(room_id)
            .ok_or_else(|| SelectionRejected::UnknownRoom(room_id.to_string()))?;

        self.selection.select(room).map_err(|rejected| {
            tracing::debug!(room = room_id, reason = %rejected, "room selection rejected");
            rejected
        })
    }

    /// Removes the room and its guest details; removing twice is a no-op.
    pub fn deselect_room(&mut self, room_id: &str) -> bool {
        let removed = self.selection.deselect(room_id).is_some();
        self.guests.remove(room_id);
        removed
    }

    pub fn is_selected(&self, room_id: &str) -> bool {
        self.selection.is_selected(room_id)
    }

    pub fn selected_rooms(&self) -> &[Room] {
        self.selection.rooms()
    }

    pub fn total(&self) -> u64 {
        self.selection.total()
    }

    pub fn upsert_guest(
        &mut self,
        room_id: &str,
        name: &str,
        identification: &str,
    ) -> Result<(), GuestError> {
        let room = self
            .selection
            .rooms()
            .iter()
            .find(|room| room.id.as_str() == room_id)
            .ok_or_else(|| GuestError::RoomNotSelected(room_id.to_string()))?;

        self.guests
            .upsert(room.id.clone(), name, identification)
            .map_err(GuestError::Invalid)
    }

    pub fn remove_guest(&mut self, room_id: &str) -> bool {
        self.guests.remove(room_id).is_some()
    }

    pub fn has_guest(&self, room_id: &str) -> bool {
        self.guests.has_guest(room_id)
    }

    pub fn guest(&self, room_id: &str) -> Option<&GuestInfo> {
        self.guests.get(room_id)
    }

    // Selected rooms still waiting for guest details, in selection order
    pub fn rooms_missing_guest(&self) -> Vec<RoomId> {
        self.selection
            .rooms()
            .iter()
            .filter(|room| !self.guests.has_guest(room.id.as_str()))
            .map(|room| room.id.clone())
            .collect()
    }

    pub fn form(&self) -> &ReservationForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ReservationForm {
        &mut self.form
    }

    pub fn validate(&self, today: NaiveDate) -> FieldErrors {
        self.form.validate(today)
    }

    pub fn validate_field(&self, field: Field, today: NaiveDate) -> Option<String> {
        self.form.validate_field(field, today)
    }

    /// Checks every submission precondition and builds the message and link
    /// without dispatching anything.
    pub fn prepare(&self, today: NaiveDate) -> Result<PreparedReservation, SubmitError> {
        if self.selection.is_empty() {
            return Err(SubmitError::EmptySelection);
        }

        let missing = self.rooms_missing_guest();
        if !missing.is_empty() {
            return Err(SubmitError::MissingGuestInfo { rooms: missing });
        }

        let errors = self.form.validate(today);
        let stay = match (errors.is_empty(), self.form.check_in, self.form.check_out) {
            (true, Some(check_in), Some(check_out)) => StayDates {
                check_in,
                check_out,
            },
            _ => return Err(SubmitError::Invalid(errors)),
        };

        let summary = ReservationSummary::new(&self.form, stay, self.selection.rooms(), &self.guests);
        let message = summary.message(self.date_style);
        let link = MessageLink::new(&self.contact, &message);

        Ok(PreparedReservation {
            summary,
            message,
            link,
        })
    }

    /// Prepares the reservation and hands it to `dispatcher`. The draft is
    /// discarded once the link was opened and kept when anything failed.
    pub fn submit(
        &mut self,
        today: NaiveDate,
        dispatcher: &dyn MessageDispatcher,
    ) -> Result<PreparedReservation, SubmitError> {
        let prepared = self.prepare(today).map_err(|e| {
            tracing::debug!(error = %e, "reservation submission blocked");
            e
        })?;

        if let Err(e) = dispatcher.open(&prepared.link) {
            tracing::warn!(error = %e, "failed to dispatch reservation message");
            return Err(e.into());
        }

        tracing::info!(
            rooms = prepared.summary.lines.len(),
            total = prepared.summary.total,
            "reservation message dispatched"
        );
        self.reset();
        Ok(prepared)
    }

    pub fn submit_today(
        &mut self,
        dispatcher: &dyn MessageDispatcher,
    ) -> Result<PreparedReservation, SubmitError> {
        self.submit(chrono::Local::now().date_naive(), dispatcher)
    }

    // Clears the draft; the catalog stays frozen for the session
    pub fn reset(&mut self) {
        self.selection = RoomSelection::new();
        self.guests.clear();
        self.form = ReservationForm::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RoomType;
    use crate::dispatch::RecordingDispatcher;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 5, 20)
    }

    // Every room available so the scenarios do not depend on the draw
    fn open_session() -> ReservationSession {
        let config = HotelConfig {
            availability_probability: 1.0,
            date_style: DateStyle::Numeric,
            ..HotelConfig::default()
        };
        let catalog = RoomCatalog::generate(&config, &mut StdRng::seed_from_u64(3));
        ReservationSession::new(Arc::new(catalog), &config)
    }

    fn fill_holder(session: &mut ReservationSession) {
        let form = session.form_mut();
        form.name = "Laura Gómez".to_string();
        form.phone = "3001234567".to_string();
        form.identification = "1020304050".to_string();
        form.birth_date = Some(date(1990, 3, 14));
        form.check_in = Some(date(2025, 6, 1));
        form.check_out = Some(date(2025, 6, 3));
    }

    #[test]
    fn test_two_room_reservation_is_dispatched() -> anyhow::Result<()> {
        let mut session = open_session();
        let dispatcher = RecordingDispatcher::new();

        session.select_floor(1)?;
        session.select_room("103")?;
        session.select_room("104")?;
        session.upsert_guest("103", "Ana Ruiz", "12345678")?;
        session.upsert_guest("104", "Pedro Ruiz", "87654321")?;
        fill_holder(&mut session);

        let family = session.catalog().get("103").unwrap().price;
        let double = session.catalog().get("104").unwrap().price;
        assert_eq!(session.catalog().get("103").unwrap().room_type, RoomType::Family);
        assert_eq!(session.catalog().get("104").unwrap().room_type, RoomType::Double);

        let prepared = session.submit(today(), &dispatcher)?;
        assert_eq!(prepared.summary.total, family + double);
        assert!(prepared
            .message
            .contains("1. Habitación 103 (Familiar) del piso 1 a nombre de Ana Ruiz (ID: 12345678)"));
        assert!(prepared
            .message
            .contains("2. Habitación 104 (Doble) del piso 1 a nombre de Pedro Ruiz (ID: 87654321)"));
        assert!(prepared.message.contains("Total de la reserva: $300.000"));
        assert!(prepared.message.contains("del 01/06/2025 al 03/06/2025"));

        let opened = dispatcher.last().expect("link opened");
        assert!(opened.as_str().starts_with("https://wa.me/573138165536?text="));
        assert_eq!(opened.text().as_deref(), Some(prepared.message.as_str()));

        // Draft discarded after dispatch
        assert!(session.selected_rooms().is_empty());
        assert!(!session.has_guest("103"));
        assert_eq!(session.form(), &ReservationForm::default());
        Ok(())
    }

    #[test]
    fn test_missing_guest_blocks_submission() {
        let mut session = open_session();
        let dispatcher = RecordingDispatcher::new();
        session.select_room("103").unwrap();
        fill_holder(&mut session);

        let error = session.submit(today(), &dispatcher).unwrap_err();
        assert_eq!(
            error,
            SubmitError::MissingGuestInfo {
                rooms: vec![RoomId::from("103")]
            }
        );
        assert!(error.notice().contains("huésped"));
        assert!(dispatcher.opened().is_empty());
        assert!(session.is_selected("103"));
    }

    #[test]
    fn test_empty_selection_blocks_submission() {
        let mut session = open_session();
        fill_holder(&mut session);

        let error = session.prepare(today()).unwrap_err();
        assert_eq!(error, SubmitError::EmptySelection);
    }

    #[test]
    fn test_invalid_form_blocks_submission() {
        let mut session = open_session();
        session.select_room("101").unwrap();
        session.upsert_guest("101", "Ana Ruiz", "12345678").unwrap();
        fill_holder(&mut session);
        session.form_mut().check_out = Some(date(2025, 6, 1));

        match session.prepare(today()) {
            Err(SubmitError::Invalid(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors.contains(Field::CheckOut));
            }
            other => panic!("expected invalid form, got {:?}", other),
        }
        assert!(session.validate_field(Field::CheckOut, today()).is_some());
    }

    #[test]
    fn test_deselect_removes_guest_info() {
        let mut session = open_session();
        session.select_room("201").unwrap();
        session.upsert_guest("201", "Ana Ruiz", "12345678").unwrap();

        assert!(session.deselect_room("201"));
        assert!(!session.has_guest("201"));
        assert!(!session.deselect_room("201"));

        // Selecting it again starts without guest details
        session.select_room("201").unwrap();
        assert_eq!(session.rooms_missing_guest(), vec![RoomId::from("201")]);
    }

    #[test]
    fn test_guest_requires_selected_room() {
        let mut session = open_session();
        assert_eq!(
            session.upsert_guest("301", "Ana Ruiz", "12345678"),
            Err(GuestError::RoomNotSelected("301".to_string()))
        );

        session.select_room("301").unwrap();
        assert!(matches!(
            session.upsert_guest("301", "A", "12345678"),
            Err(GuestError::Invalid(_))
        ));
        assert!(!session.has_guest("301"));

        session.upsert_guest("301", "Ana Ruiz", "12345678").unwrap();
        assert_eq!(session.guest("301").unwrap().name, "Ana Ruiz");
        assert!(session.remove_guest("301"));
        assert!(!session.remove_guest("301"));
    }

    #[test]
    fn test_selection_rejections() {
        let config = HotelConfig {
            availability_probability: 0.0,
            ..HotelConfig::default()
        };
        let catalog = RoomCatalog::generate(&config, &mut StdRng::seed_from_u64(1));
        let mut session = ReservationSession::new(Arc::new(catalog), &config);

        assert_eq!(
            session.select_room("101"),
            Err(SelectionRejected::Unavailable(RoomId::from("101")))
        );
        assert_eq!(
            session.select_room("999"),
            Err(SelectionRejected::UnknownRoom("999".to_string()))
        );
        assert_eq!(session.select_floor(7), Err(SelectionRejected::UnknownFloor(7)));
        assert_eq!(session.select_floor(0), Err(SelectionRejected::UnknownFloor(0)));
        assert!(session.selected_rooms().is_empty());

        let mut session = open_session();
        session.select_room("101").unwrap();
        assert_eq!(
            session.select_room("101"),
            Err(SelectionRejected::AlreadySelected(RoomId::from("101")))
        );
    }

    #[test]
    fn test_failed_dispatch_keeps_draft() {
        let mut session = open_session();
        let dispatcher = RecordingDispatcher::new();
        dispatcher.fail_next(1);

        session.select_room("105").unwrap();
        session.upsert_guest("105", "Ana Ruiz", "12345678").unwrap();
        fill_holder(&mut session);

        assert!(matches!(
            session.submit(today(), &dispatcher),
            Err(SubmitError::Dispatch(_))
        ));
        assert!(session.is_selected("105"));
        assert!(session.has_guest("105"));

        session.submit(today(), &dispatcher).unwrap();
        assert_eq!(dispatcher.opened().len(), 1);
    }

    #[test]
    fn test_floor_view_and_running_total() {
        let mut session = open_session();
        assert!(session.floor_view().is_empty());

        session.select_floor(2).unwrap();
        session.select_room("201").unwrap();
        session.select_room("203").unwrap();

        assert_eq!(session.active_floor(), Some(2));
        assert_eq!(session.floor_view().len(), 5);
        assert_eq!(session.total(), 80_000 + 180_000);
    }

    #[test]
    fn test_open_reuses_session_catalog() {
        let catalogs = SessionCatalogs::new(HotelConfig::default());
        let first = ReservationSession::open(&catalogs, "visitor-1");
        let second = ReservationSession::open(&catalogs, "visitor-1");

        assert_eq!(first.catalog().rooms(), second.catalog().rooms());
    }
}
