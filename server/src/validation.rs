use thiserror::Error;

use crate::recipe::RecipeDraft;

/// A single constraint violation. The `Display` form is the message shown
/// to the caller verbatim.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at least {minimum} characters")]
    TooShort {
        field: &'static str,
        minimum: usize,
    },

    #[error("{field} must not contain empty entries")]
    EmptyEntry { field: &'static str },
}

const MINIMUM_IMAGE_LENGTH: usize = 1;
const MINIMUM_NAME_LENGTH: usize = 3;
const MINIMUM_DESCRIPTION_LENGTH: usize = 5;

/// Decides whether a canonical candidate record is acceptable for storage.
/// Checks run in a fixed order and stop at the first violation.
pub fn validate(draft: &RecipeDraft) -> Result<(), ValidationError> {
    check_length("img_name", &draft.image, MINIMUM_IMAGE_LENGTH)?;
    check_length("name", &draft.name, MINIMUM_NAME_LENGTH)?;
    check_length("description", &draft.description, MINIMUM_DESCRIPTION_LENGTH)?;
    check_entries("ingredients", &draft.ingredients)?;
    check_entries("instructions", &draft.instructions)?;

    Ok(())
}

fn check_length(
    field: &'static str,
    value: &str,
    minimum: usize,
) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }

    if value.chars().count() < minimum {
        return Err(ValidationError::TooShort { field, minimum });
    }

    Ok(())
}

fn check_entries(field: &'static str, entries: &[String]) -> Result<(), ValidationError> {
    if entries.iter().any(|entry| entry.is_empty()) {
        return Err(ValidationError::EmptyEntry { field });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate, ValidationError};
    use crate::recipe::RecipeDraft;

    fn valid_draft() -> RecipeDraft {
        RecipeDraft {
            image: "uploads/171234-pie.jpg".to_owned(),
            name: "Plum galette".to_owned(),
            description: "Rustic free-form plum tart.".to_owned(),
            ingredients: vec!["plums".to_owned(), "flour".to_owned()],
            instructions: vec!["roll".to_owned(), "bake".to_owned()],
        }
    }

    #[test]
    fn complete_drafts_pass() {
        assert_eq!(validate(&valid_draft()), Ok(()));
    }

    #[test]
    fn empty_sequences_pass() {
        let draft = RecipeDraft {
            ingredients: vec![],
            instructions: vec![],
            ..valid_draft()
        };

        assert_eq!(validate(&draft), Ok(()));
    }

    #[test]
    fn missing_names_are_reported() {
        let draft = RecipeDraft {
            name: String::new(),
            ..valid_draft()
        };

        assert_eq!(
            validate(&draft),
            Err(ValidationError::Required { field: "name" })
        );
    }

    #[test]
    fn short_names_are_reported() {
        let draft = RecipeDraft {
            name: "ab".to_owned(),
            ..valid_draft()
        };

        let error = validate(&draft).unwrap_err();
        assert_eq!(
            error,
            ValidationError::TooShort {
                field: "name",
                minimum: 3
            }
        );
        assert_eq!(error.to_string(), "name must be at least 3 characters");
    }

    #[test]
    fn short_descriptions_are_reported() {
        let draft = RecipeDraft {
            description: "abcd".to_owned(),
            ..valid_draft()
        };

        assert_eq!(
            validate(&draft),
            Err(ValidationError::TooShort {
                field: "description",
                minimum: 5
            })
        );
    }

    #[test]
    fn missing_images_are_reported() {
        let draft = RecipeDraft {
            image: String::new(),
            ..valid_draft()
        };

        assert_eq!(
            validate(&draft),
            Err(ValidationError::Required { field: "img_name" })
        );
    }

    #[test]
    fn empty_entries_are_reported() {
        let draft = RecipeDraft {
            ingredients: vec!["plums".to_owned(), String::new()],
            ..valid_draft()
        };

        assert_eq!(
            validate(&draft),
            Err(ValidationError::EmptyEntry {
                field: "ingredients"
            })
        );

        let draft = RecipeDraft {
            instructions: vec![String::new()],
            ..valid_draft()
        };

        assert_eq!(
            validate(&draft),
            Err(ValidationError::EmptyEntry {
                field: "instructions"
            })
        );
    }

    #[test]
    fn only_the_first_violation_is_reported() {
        let draft = RecipeDraft {
            name: "ab".to_owned(),
            description: "abc".to_owned(),
            ..valid_draft()
        };

        assert_eq!(
            validate(&draft),
            Err(ValidationError::TooShort {
                field: "name",
                minimum: 3
            })
        );
    }

    #[test]
    fn length_is_counted_in_characters() {
        let draft = RecipeDraft {
            name: "åäö".to_owned(),
            ..valid_draft()
        };

        assert_eq!(validate(&draft), Ok(()));
    }
}
