use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::employee::{Employee, Gender};

const FIRST_NAMES: [&str; 5] = ["John", "Michael", "David", "Paul", "Mark"];
const LAST_NAMES: [&str; 5] = ["Smith", "Johnson", "Williams", "Brown", "Jones"];
const GENDERS: [Gender; 2] = [Gender::Male, Gender::Female];

fn random_birth_date<R: Rng + ?Sized>(rng: &mut R) -> NaiveDate {
    let year = rng.gen_range(1950..2005);
    let month = rng.gen_range(1..12);
    let day = rng.gen_range(1..28);
    NaiveDate::from_ymd_opt(year, month, day).expect("days below 28 exist in every month")
}

/// An employee with a "<last> <first>" name drawn from a small fixed pool.
pub fn random_employee<R: Rng + ?Sized>(rng: &mut R) -> Employee {
    let last = LAST_NAMES.choose(rng).copied().unwrap_or(LAST_NAMES[0]);
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or(FIRST_NAMES[0]);
    let gender = GENDERS.choose(rng).copied().unwrap_or(Gender::Male);
    Employee::new(format!("{} {}", last, first), random_birth_date(rng), gender)
}

/// A male employee named "<prefix><NNNN> John".
pub fn prefixed_employee<R: Rng + ?Sized>(rng: &mut R, prefix: &str) -> Employee {
    let number: u32 = rng.gen_range(1000..9999);
    Employee::new(
        format!("{}{} John", prefix, number),
        random_birth_date(rng),
        Gender::Male,
    )
}
