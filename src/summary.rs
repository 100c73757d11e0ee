// Reservation summary and the message handed to the messaging channel

use crate::catalog::{Room, RoomId, RoomType};
use crate::config::DateStyle;
use crate::guests::{GuestInfo, GuestRegister};
use crate::validation::ReservationForm;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt::Write;

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

pub fn format_date(date: NaiveDate, style: DateStyle) -> String {
    match style {
        DateStyle::Long => format!(
            "{} de {} de {}",
            date.day(),
            MONTHS_ES[date.month0() as usize],
            date.year()
        ),
        DateStyle::Numeric => date.format("%d/%m/%Y").to_string(),
    }
}

// "$1.234.567"
pub fn format_price(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    grouped.push('$');
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StayDates {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub room_id: RoomId,
    pub room_type: RoomType,
    pub floor: u8,
    pub price: u64,
    pub guest: Option<GuestInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationSummary {
    pub holder_name: String,
    pub holder_identification: String,
    pub holder_phone: String,
    pub stay: StayDates,
    pub lines: Vec<SummaryLine>,
    pub total: u64,
}

impl ReservationSummary {
    pub fn new(
        form: &ReservationForm,
        stay: StayDates,
        rooms: &[Room],
        guests: &GuestRegister,
    ) -> Self {
        let lines: Vec<SummaryLine> = rooms
            .iter()
            .map(|room| SummaryLine {
                room_id: room.id.clone(),
                room_type: room.room_type,
                floor: room.floor,
                price: room.price,
                guest: guests.get(room.id.as_str()).cloned(),
            })
            .collect();
        let total = lines.iter().map(|line| line.price).sum();

        Self {
            holder_name: form.name.trim().to_string(),
            holder_identification: form.identification.trim().to_string(),
            holder_phone: form.phone.trim().to_string(),
            stay,
            lines,
            total,
        }
    }

    /// Plain-text message, identical for identical drafts.
    pub fn message(&self, style: DateStyle) -> String {
        let mut message = format!(
            "Hola, mi nombre es {} con identificación {}. Me gustaría reservar las siguientes habitaciones del {} al {}:\n\n",
            self.holder_name,
            self.holder_identification,
            format_date(self.stay.check_in, style),
            format_date(self.stay.check_out, style),
        );

        for (index, line) in self.lines.iter().enumerate() {
            // Writing into a String cannot fail
            let _ = write!(
                message,
                "{}. Habitación {} ({}) del piso {}",
                index + 1,
                line.room_id,
                line.room_type.label(),
                line.floor
            );
            if let Some(guest) = &line.guest {
                let _ = write!(
                    message,
                    " a nombre de {} (ID: {})",
                    guest.name, guest.identification
                );
            }
            message.push('\n');
        }

        let _ = write!(
            message,
            "\nTotal de la reserva: {}\nMi número de contacto es {}.",
            format_price(self.total),
            self.holder_phone
        );
        message
    }
}
