use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A single recipe in the catalog.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, sqlx::FromRow)]
pub struct Recipe {
    /// The ID of the recipe.
    id: Uuid,

    /// The path or name of the display image.
    #[serde(rename = "img_name")]
    image: String,

    /// The name provided.
    name: String,

    /// The description provided.
    description: String,

    /// The ingredients, in order.
    ingredients: Vec<String>,

    /// The preparation steps, in order.
    instructions: Vec<String>,

    /// The date and time it was created. Listings sort on this, newest
    /// first.
    #[serde(rename = "createdAt", with = "time::serde::timestamp")]
    created_at: OffsetDateTime,
}

impl Recipe {
    pub fn new(id: Uuid, created_at: OffsetDateTime, draft: RecipeDraft) -> Self {
        Recipe {
            id,
            image: draft.image,
            name: draft.name,
            description: draft.description,
            ingredients: draft.ingredients,
            instructions: draft.instructions,
            created_at,
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// Replaces every caller-supplied field wholesale, keeping `id` and
    /// `created_at`.
    pub fn replace(&mut self, draft: RecipeDraft) {
        self.image = draft.image;
        self.name = draft.name;
        self.description = draft.description;
        self.ingredients = draft.ingredients;
        self.instructions = draft.instructions;
    }
}

/// A canonical candidate recipe, before the persistence layer has assigned
/// `id` and `created_at`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecipeDraft {
    pub(crate) image: String,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) ingredients: Vec<String>,
    pub(crate) instructions: Vec<String>,
}

/// A list-like field as submitted: either an ordered sequence or a single
/// (possibly comma-separated) string.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ListField {
    Many(Vec<String>),
    One(String),
}

/// The raw fields of a create or update submission, before normalization.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RecipeForm {
    #[serde(default)]
    pub(crate) img_name: Option<String>,

    #[serde(default)]
    pub(crate) name: Option<String>,

    #[serde(default)]
    pub(crate) description: Option<String>,

    #[serde(default)]
    pub(crate) ingredients: Option<ListField>,

    #[serde(default)]
    pub(crate) instructions: Option<ListField>,
}

impl RecipeForm {
    /// Builds a form from collected multipart text fields. A field that
    /// appears more than once becomes a sequence.
    pub fn from_fields(mut fields: HashMap<String, Vec<String>>) -> Self {
        RecipeForm {
            img_name: take_single(&mut fields, "img_name"),
            name: take_single(&mut fields, "name"),
            description: take_single(&mut fields, "description"),
            ingredients: take_list(&mut fields, "ingredients"),
            instructions: take_list(&mut fields, "instructions"),
        }
    }
}

fn take_single(fields: &mut HashMap<String, Vec<String>>, name: &str) -> Option<String> {
    fields.remove(name).and_then(|mut values| {
        if values.is_empty() {
            None
        } else {
            Some(values.remove(0))
        }
    })
}

fn take_list(fields: &mut HashMap<String, Vec<String>>, name: &str) -> Option<ListField> {
    fields.remove(name).map(|mut values| {
        if values.len() == 1 {
            ListField::One(values.remove(0))
        } else {
            ListField::Many(values)
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{ListField, RecipeForm};

    fn fields(entries: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(name, values)| {
                (
                    (*name).to_owned(),
                    values.iter().map(|v| (*v).to_owned()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn repeated_fields_become_sequences() {
        let form = RecipeForm::from_fields(fields(&[
            ("name", &["Plum galette"]),
            ("ingredients", &["plums", "flour"]),
        ]));

        assert_eq!(form.name.as_deref(), Some("Plum galette"));
        match form.ingredients {
            Some(ListField::Many(entries)) => assert_eq!(entries, vec!["plums", "flour"]),
            other => panic!("expected a sequence, got {:?}", other),
        }
    }

    #[test]
    fn single_fields_stay_single() {
        let form = RecipeForm::from_fields(fields(&[("ingredients", &["plums,flour"])]));

        match form.ingredients {
            Some(ListField::One(value)) => assert_eq!(value, "plums,flour"),
            other => panic!("expected a single value, got {:?}", other),
        }
    }

    #[test]
    fn missing_fields_are_absent() {
        let form = RecipeForm::from_fields(HashMap::new());

        assert!(form.img_name.is_none());
        assert!(form.name.is_none());
        assert!(form.description.is_none());
        assert!(form.ingredients.is_none());
        assert!(form.instructions.is_none());
    }
}
