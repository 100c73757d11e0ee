// Reservation form validation
// A single pass over the whole form yields every field error at once; the
// submit gate and the per-field (on blur) checks both read from that pass.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_PHONE_CHARS: usize = 7;
pub const MIN_IDENTIFICATION_CHARS: usize = 8;
pub const ADULT_AGE: i32 = 18;
// Earliest year offered by the birth-date picker
pub const BIRTH_YEAR_FLOOR: i32 = 1940;

const NAME_REQUIRED: &str = "El nombre es requerido";
const PHONE_INVALID: &str = "Ingrese un número de teléfono válido";
const IDENTIFICATION_INVALID: &str = "Ingrese un número de identificación válido";
const BIRTH_DATE_REQUIRED: &str = "Seleccione su fecha de nacimiento";
const UNDERAGE: &str = "Debe ser mayor de 18 años para realizar una reserva";
const CHECK_IN_REQUIRED: &str = "Seleccione una fecha para su reserva";
const CHECK_IN_PAST: &str = "La fecha de entrada no puede ser anterior a hoy";
const CHECK_OUT_REQUIRED: &str = "Seleccione una fecha de salida";
const CHECK_OUT_NOT_AFTER_CHECK_IN: &str =
    "La fecha de salida debe ser posterior a la fecha de entrada";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    #[serde(rename = "name")]
    HolderName,
    #[serde(rename = "phone")]
    HolderPhone,
    #[serde(rename = "identification")]
    HolderIdentification,
    #[serde(rename = "birthDate")]
    BirthDate,
    #[serde(rename = "checkInDate")]
    CheckIn,
    #[serde(rename = "checkOutDate")]
    CheckOut,
    #[serde(rename = "guest.name")]
    GuestName,
    #[serde(rename = "guest.identification")]
    GuestIdentification,
}

impl Field {
    pub fn path(&self) -> &'static str {
        match self {
            Field::HolderName => "name",
            Field::HolderPhone => "phone",
            Field::HolderIdentification => "identification",
            Field::BirthDate => "birthDate",
            Field::CheckIn => "checkInDate",
            Field::CheckOut => "checkOutDate",
            Field::GuestName => "guest.name",
            Field::GuestIdentification => "guest.identification",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Field path to message, one message per field (the first rule that failed).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
        }
        Ok(())
    }
}

fn has_min_chars(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

/// Whole years between `birth_date` and `today`; the birthday itself counts.
pub fn age_in_years(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

// Disabled-date predicates for the calendar pickers

pub fn check_in_disabled(date: NaiveDate, today: NaiveDate) -> bool {
    date < today
}

pub fn check_out_disabled(date: NaiveDate, check_in: Option<NaiveDate>) -> bool {
    match check_in {
        Some(check_in) => date <= check_in,
        None => true,
    }
}

pub fn birth_date_disabled(date: NaiveDate, today: NaiveDate) -> bool {
    date > today
}

// Years offered by the birth-date picker; the newest one still allows an adult
pub fn birth_year_range(today: NaiveDate) -> std::ops::RangeInclusive<i32> {
    BIRTH_YEAR_FLOOR..=today.year() - ADULT_AGE
}

/// Holder and stay fields of a reservation, as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationForm {
    pub name: String,
    pub phone: String,
    pub identification: String,
    pub birth_date: Option<NaiveDate>,
    #[serde(rename = "checkInDate")]
    pub check_in: Option<NaiveDate>,
    #[serde(rename = "checkOutDate")]
    pub check_out: Option<NaiveDate>,
}

impl ReservationForm {
    pub fn validate(&self, today: NaiveDate) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if !has_min_chars(&self.name, MIN_NAME_CHARS) {
            errors.add(Field::HolderName, NAME_REQUIRED);
        }
        if !has_min_chars(&self.phone, MIN_PHONE_CHARS) {
            errors.add(Field::HolderPhone, PHONE_INVALID);
        }
        if !has_min_chars(&self.identification, MIN_IDENTIFICATION_CHARS) {
            errors.add(Field::HolderIdentification, IDENTIFICATION_INVALID);
        }

        match self.birth_date {
            None => errors.add(Field::BirthDate, BIRTH_DATE_REQUIRED),
            Some(birth_date) if age_in_years(birth_date, today) < ADULT_AGE => {
                errors.add(Field::BirthDate, UNDERAGE)
            }
            Some(_) => {}
        }

        match self.check_in {
            None => errors.add(Field::CheckIn, CHECK_IN_REQUIRED),
            Some(check_in) if check_in_disabled(check_in, today) => {
                errors.add(Field::CheckIn, CHECK_IN_PAST)
            }
            Some(_) => {}
        }

        if self.check_out.is_none() {
            errors.add(Field::CheckOut, CHECK_OUT_REQUIRED);
        }

        // Cross-field rule, only once both dates passed on their own
        if let (Some(check_in), Some(check_out)) = (self.check_in, self.check_out) {
            if !errors.contains(Field::CheckIn) && check_out <= check_in {
                errors.add(Field::CheckOut, CHECK_OUT_NOT_AFTER_CHECK_IN);
            }
        }

        errors
    }

    pub fn validate_field(&self, field: Field, today: NaiveDate) -> Option<String> {
        self.validate(today).get(field).map(str::to_string)
    }
}

pub fn validate_guest(name: &str, identification: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if !has_min_chars(name, MIN_NAME_CHARS) {
        errors.add(Field::GuestName, NAME_REQUIRED);
    }
    if !has_min_chars(identification, MIN_IDENTIFICATION_CHARS) {
        errors.add(Field::GuestIdentification, IDENTIFICATION_INVALID);
    }
    errors
}
