pub mod logger;

use validator::ValidationErrors;

/// Joins every field error message into one human readable line.
///
/// Fields are visited in name order so the output is stable.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.keys().collect();
    fields.sort();

    fields
        .into_iter()
        .flat_map(|field| {
            field_errors[field].iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct NewDevice {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(range(min = 1))]
        count: i64,
    }

    #[test]
    fn messages_are_joined_in_field_order() {
        let device = NewDevice {
            name: String::new(),
            count: 0,
        };
        let errors = device.validate().unwrap_err();
        assert_eq!(
            format_validation_errors(&errors),
            "count is invalid; Name is required"
        );
    }
}
