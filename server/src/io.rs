use std::collections::HashMap;
use std::io;

use bytes::{Buf, Bytes};
use futures::stream::StreamExt;
use warp::filters::multipart::{FormData, Part};

use crate::errors::BackendError;
use crate::recipe::RecipeForm;

/// The multipart field under which an image file is submitted.
const PICTURE_FIELD: &str = "picture";

/// A request body: multipart form data or a JSON object.
pub enum Body {
    Form(FormData),
    Json(RecipeForm),
}

/// An image file received as part of a submission.
#[derive(Clone, Debug)]
pub struct UploadedImage {
    /// The filename supplied by the client.
    pub filename: String,

    /// The raw file content.
    pub content: Vec<u8>,
}

/// Splits a form submission into its text fields and the uploaded image,
/// if one was sent.
pub async fn parse_submission(
    content: FormData,
) -> Result<(RecipeForm, Option<UploadedImage>), BackendError> {
    let mut content = content;
    let mut fields: HashMap<String, Vec<String>> = HashMap::new();
    let mut image = None;

    while let Some(part) = content.next().await {
        let part = part.map_err(|_| BackendError::MalformedFormSubmission)?;
        let name = part.name().to_owned();
        let filename = part.filename().map(ToOwned::to_owned);

        match filename {
            Some(filename) if name == PICTURE_FIELD => {
                let content = part_as_vec(part)
                    .await
                    .map_err(|_| BackendError::MalformedFormSubmission)?;
                image = Some(UploadedImage { filename, content });
            }
            _ => {
                let raw = part_as_vec(part)
                    .await
                    .map_err(|_| BackendError::MalformedFormSubmission)?;
                let value =
                    String::from_utf8(raw).map_err(|_| BackendError::MalformedFormSubmission)?;
                fields.entry(name).or_default().push(value);
            }
        }
    }

    Ok((RecipeForm::from_fields(fields), image))
}

/// Collects chunks of [`Part`].
pub async fn part_as_vec(raw: Part) -> Result<Vec<u8>, ()> {
    let vec_of_results = part_as_stream(raw).collect::<Vec<_>>().await;

    let vec_of_vecs = vec_of_results
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ())?;

    Ok(vec_of_vecs.concat())
}

/// Collects raw data from [`Part`].
pub fn part_as_stream(raw: Part) -> impl futures::Stream<Item = Result<Bytes, io::Error>> {
    raw.stream().map(|r| {
        r.map(|mut buf| buf.copy_to_bytes(buf.remaining()))
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "could not retrieve chunk"))
    })
}
