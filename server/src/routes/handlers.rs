use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, Logger};
use uuid::Uuid;
use warp::{
    http::StatusCode,
    reject,
    reply::{json, with_header, with_status, Reply},
};

use crate::environment::{Environment, SafeStore};
use crate::errors::BackendError;
use crate::io::{self, Body, UploadedImage};
use crate::normalization;
use crate::recipe::RecipeForm;
use crate::routes::{
    rejection::{Context, Rejection},
    response::SuccessResponse,
};
use crate::validation;

const SERVER_TIMING_HEADER: &str = "server-timing";
type RouteResult = Result<Box<dyn Reply>, reject::Rejection>;

macro_rules! timed {
    ($($expression:stmt);+) => {
        let start = Instant::now();

        let result = { $($expression)+ };

        Ok(Box::new(with_header(
            result,
            SERVER_TIMING_HEADER,
            format_server_timing(start.elapsed()),
        )) as Box<dyn Reply>)
    };
}

pub async fn list(environment: Environment) -> RouteResult {
    timed! {
        let recipes = environment
            .db
            .list()
            .await
            .map_err(|e: BackendError| Rejection::new(Context::list(), e))?;

        json(&recipes)
    }
}

pub async fn create(environment: Environment, body: Body) -> RouteResult {
    timed! {
        let Environment {
            logger,
            db,
            store,
            ..
        } = environment.clone();

        let error_handler = |e: BackendError| Rejection::new(Context::create(None), e);

        debug!(logger, "Parsing submission...");
        let (form, image) = read_submission(body).await.map_err(&error_handler)?;

        debug!(logger, "Saving image...");
        let stored_filename = save_image(logger.clone(), store.clone(), image)
            .await
            .map_err(&error_handler)?;

        debug!(logger, "Normalizing submission...");
        let draft = normalization::canonicalize(form, stored_filename.as_deref());

        debug!(logger, "Validating recipe...");
        validation::validate(&draft)
            .map_err(BackendError::from)
            .map_err(&error_handler)?;

        debug!(logger, "Writing recipe to database...");
        let recipe = db.insert(draft).await.map_err(&error_handler)?;

        debug!(logger, "Sending response...");
        with_header(
            with_status(json(&recipe), StatusCode::CREATED),
            "location",
            environment.urls.recipe(recipe.id()).as_str(),
        )
    }
}

pub async fn retrieve(environment: Environment, id: String) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::retrieve(id.clone()), e);

        let parsed = Uuid::parse_str(&id)
            .map_err(|_| BackendError::InvalidId(id.clone()))
            .map_err(&error_handler)?;
        debug!(environment.logger, "Retrieving recipe..."; "id" => format!("{}", &parsed));

        let option = environment
            .db
            .retrieve(&parsed)
            .await
            .map_err(&error_handler)?;

        match option {
            Some(recipe) => with_status(json(&recipe), StatusCode::OK),
            None => with_status(json(&()), StatusCode::NOT_FOUND),
        }
    }
}

pub async fn update(environment: Environment, id: String, body: Body) -> RouteResult {
    timed! {
        let Environment {
            logger,
            db,
            store,
            ..
        } = environment.clone();

        let error_handler = |e: BackendError| Rejection::new(Context::update(id.clone()), e);

        let parsed = Uuid::parse_str(&id)
            .map_err(|_| BackendError::InvalidId(id.clone()))
            .map_err(&error_handler)?;

        debug!(logger, "Parsing submission..."; "id" => format!("{}", &parsed));
        let (form, image) = read_submission(body).await.map_err(&error_handler)?;

        debug!(logger, "Saving image...");
        let stored_filename = save_image(logger.clone(), store.clone(), image)
            .await
            .map_err(&error_handler)?;

        debug!(logger, "Normalizing submission...");
        let draft = normalization::canonicalize(form, stored_filename.as_deref());

        debug!(logger, "Validating recipe...");
        validation::validate(&draft)
            .map_err(BackendError::from)
            .map_err(&error_handler)?;

        debug!(logger, "Replacing recipe...");
        let option = db.update(&parsed, draft).await.map_err(&error_handler)?;

        match option {
            Some(recipe) => with_status(json(&recipe), StatusCode::OK),
            None => with_status(json(&()), StatusCode::NOT_FOUND),
        }
    }
}

pub async fn delete(environment: Environment, id: String) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::delete(id.clone()), e);

        let parsed = Uuid::parse_str(&id)
            .map_err(|_| BackendError::InvalidId(id.clone()))
            .map_err(&error_handler)?;
        debug!(environment.logger, "Deleting recipe..."; "id" => format!("{}", &parsed));

        let option = environment
            .db
            .delete(&parsed)
            .await
            .map_err(&error_handler)?;

        match option {
            Some(recipe) => with_status(
                json(&SuccessResponse::Deleted {
                    message: "Deleted",
                    recipe,
                }),
                StatusCode::OK,
            ),
            None => with_status(json(&()), StatusCode::NOT_FOUND),
        }
    }
}

async fn read_submission(body: Body) -> Result<(RecipeForm, Option<UploadedImage>), BackendError> {
    match body {
        Body::Form(form) => io::parse_submission(form).await,
        Body::Json(form) => Ok((form, None)),
    }
}

async fn save_image(
    _logger: Arc<Logger>,
    store: Arc<SafeStore>,
    image: Option<UploadedImage>,
) -> Result<Option<String>, BackendError> {
    match image {
        Some(image) => Ok(Some(store.save(&image.filename, image.content).await?)),
        None => Ok(None),
    }
}

fn format_server_timing(seconds: Duration) -> String {
    format!("handler;dur={}", seconds.as_secs_f64() * 1000.0)
}
