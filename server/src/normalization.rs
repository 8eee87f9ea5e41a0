use crate::recipe::{ListField, RecipeDraft, RecipeForm};

/// Prefix under which uploaded images are served, relative to the public
/// directory.
pub const UPLOADS_PREFIX: &str = "uploads";

/// Normalizes a list-like field into an ordered sequence. A sequence passes
/// through unchanged; a single string is split on `,` with each piece
/// trimmed and empty pieces dropped; an absent field is an empty sequence.
pub fn split_list(field: Option<ListField>) -> Vec<String> {
    match field {
        None => vec![],
        Some(ListField::Many(entries)) => entries,
        Some(ListField::One(value)) => value
            .split(',')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(ToOwned::to_owned)
            .collect(),
    }
}

/// Resolves the authoritative image reference. An uploaded file wins over
/// any caller-supplied value; without one, the caller-supplied `img_name`
/// is used unchanged.
pub fn image_reference(stored_filename: Option<&str>, img_name: Option<String>) -> String {
    match stored_filename {
        Some(filename) => format!("{}/{}", UPLOADS_PREFIX, filename),
        None => img_name.unwrap_or_default(),
    }
}

/// Builds the canonical candidate record from a raw submission and the
/// stored filename of an uploaded image, if any.
pub fn canonicalize(form: RecipeForm, stored_filename: Option<&str>) -> RecipeDraft {
    RecipeDraft {
        image: image_reference(stored_filename, form.img_name),
        name: form.name.unwrap_or_default(),
        description: form.description.unwrap_or_default(),
        ingredients: split_list(form.ingredients),
        instructions: split_list(form.instructions),
    }
}
