use validator::Validate;

use crate::errors::AppError;
use crate::models::employee::{parse_birth_date, Employee, Gender};

/// Raw mode 2 arguments, before they are turned into an `Employee`.
#[derive(Debug, Validate)]
pub struct NewEmployee {
    #[validate(length(min = 1, max = 255))]
    pub full_name: String,
    pub birth_date: String,
    #[validate(custom = "validate_gender")]
    pub gender: String,
}

fn validate_gender(gender: &str) -> Result<(), validator::ValidationError> {
    if gender.parse::<Gender>().is_err() {
        return Err(validator::ValidationError::new("Gender must be either 'Male' or 'Female'"));
    }
    Ok(())
}

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|err| AppError::InvalidArguments(err.to_string()))
}

impl NewEmployee {
    pub fn from_args(full_name: &str, birth_date: &str, gender: &str) -> Self {
        Self {
            full_name: full_name.trim().to_string(),
            birth_date: birth_date.trim().to_string(),
            gender: gender.trim().to_string(),
        }
    }

    pub fn into_employee(self) -> Result<Employee, AppError> {
        validate_payload(&self)?;
        let birth_date = parse_birth_date(&self.birth_date)?;
        let gender = self.gender.parse::<Gender>()?;
        Ok(Employee::new(self.full_name, birth_date, gender))
    }
}
