use validator::{ValidationErrors, ValidationErrorsKind};

pub fn validation_errors_to_string(errors: ValidationErrors, adder: Option<String>) -> String {
    let map = errors.into_errors();

    let key_option = map.keys().next().copied();

    if let Some(field) = key_option {
        if let Some(error) = map.get(field) {
            return match error {
                ValidationErrorsKind::Struct(errors) => {
                    validation_errors_to_string(*errors.clone(), Some(format!("of item {field}")))
                }
                ValidationErrorsKind::List(list) => {
                    if let Some((index, errors)) = list.iter().next() {
                        validation_errors_to_string(
                            *errors.clone(),
                            Some(format!("of list {field} with index {index}")),
                        )
                    } else {
                        String::new()
                    }
                }
                ValidationErrorsKind::Field(errors) => {
                    if let Some(error) = errors.first() {
                        if let Some(adder) = adder {
                            format!(
                                "Field {} {} failed validation with error: {}",
                                field, adder, error.code
                            )
                        } else {
                            format!("Field {} failed validation with error: {}", field, error.code)
                        }
                    } else {
                        String::new()
                    }
                }
            };
        }
    }

    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Signup {
        #[validate(email)]
        email: String,
    }

    #[test]
    fn field_errors_name_the_field() {
        let bad = Signup {
            email: "not-an-email".to_string(),
        };
        let errors = bad.validate().unwrap_err();
        let msg = validation_errors_to_string(errors, None);
        assert!(msg.contains("email"), "got: {msg}");
    }
}
