use crate::errors::ServiceError;
use serde::de::DeserializeOwned;

/// Validator wraps a request body so that handlers can only get to the
/// inner value after its rules have been checked.
///
/// It deserializes exactly like the wrapped type:
///
/// ``` ignore
/// async fn create(message: Json<Validator<EventMessage>>) -> Response {
///     let message = message.into_inner().validate()?;
/// }
/// ```
#[derive(Deserialize, Debug)]
pub struct Validator<T>(T);

pub trait Validate {
    fn validate(&self) -> Result<(), ServiceError>;
}

impl<T> Validator<T> {
    #[allow(dead_code)]
    pub fn new(i: T) -> Validator<T> {
        Validator::<T>(i)
    }
}

impl<T> Validator<T>
where
    T: Validate,
    T: DeserializeOwned,
{
    pub fn validate(self) -> Result<T, ServiceError> {
        self.0.validate()?;
        Ok(self.0)
    }
}

/// returns an error when the trimmed text is empty or longer than `max` characters
pub fn text_length(field: &str, value: &str, max: usize) -> Result<(), ServiceError> {
    let length = value.trim().chars().count();

    if length == 0 {
        invalid!(format!("{} can't be empty", field));
    }

    if length > max {
        invalid!(format!("{} is too long, maximum {} characters", field, max));
    }

    Ok(())
}
